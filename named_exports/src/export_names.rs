use indexmap::IndexSet;
use oxc_ast::ast::{AssignmentTarget, Expression, Program, Statement};

/// Names assigned through `exports.NAME = …` or `module.exports.NAME = …`
/// at the top level of a module, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportNameSet {
    names: IndexSet<String>,
}

impl ExportNameSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ExportNameSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Only top-level expression statements are inspected. Assignments nested in
/// blocks or functions and computed members never contribute a name.
pub fn extract_export_names(program: &Program<'_>) -> ExportNameSet {
    program
        .body
        .iter()
        .filter_map(|statement| match statement {
            Statement::ExpressionStatement(it) => assigned_export_name(&it.expression),
            _ => None,
        })
        .collect()
}

fn assigned_export_name<'b>(expression: &'b Expression<'_>) -> Option<&'b str> {
    let Expression::AssignmentExpression(assignment) = expression else {
        return None;
    };
    let AssignmentTarget::StaticMemberExpression(member) = &assignment.left else {
        return None;
    };
    is_exports_object(&member.object).then(|| member.property.name.as_str())
}

fn is_exports_object(object: &Expression<'_>) -> bool {
    match object {
        Expression::Identifier(ident) => ident.name.as_str() == "exports",
        Expression::StaticMemberExpression(member) => {
            let is_module = matches!(
                &member.object,
                Expression::Identifier(ident) if ident.name.as_str() == "module"
            );
            is_module && member.property.name.as_str() == "exports"
        }
        _ => false,
    }
}
