use std::collections::HashSet;

use oxc_ast::ast::{
    BindingPatternKind, Expression, Program, StaticMemberExpression, VariableDeclarator,
};
use oxc_ast_visit::{Visit, walk};
use oxc_span::GetSpan;

use crate::syntax::span_text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRequireEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// Collapses `require(x).default` to `require(x)` and `tmp.default` to `tmp`
/// where `tmp` was bound to a `require(...)` call.
///
/// Bindings are recorded as the walk reaches them, so a `tmp.default` visited
/// before its `require` declarator is left alone.
pub fn find_default_requires(
    program: &Program<'_>,
    source_text: &str,
) -> Vec<DefaultRequireEdit> {
    let mut collector = DefaultRequireCollector {
        source_text,
        require_bindings: HashSet::new(),
        edits: vec![],
    };
    collector.visit_program(program);
    collector.edits
}

struct DefaultRequireCollector<'s> {
    source_text: &'s str,
    require_bindings: HashSet<String>,
    edits: Vec<DefaultRequireEdit>,
}

impl DefaultRequireCollector<'_> {
    fn collapsed_object(&self, object: &Expression<'_>) -> Option<String> {
        match object {
            Expression::CallExpression(call) => {
                let is_require = matches!(
                    &call.callee,
                    Expression::Identifier(ident) if ident.name.as_str() == "require"
                );
                let [argument] = &call.arguments[..] else {
                    return None;
                };
                let span = argument.span();
                is_require.then(|| {
                    format!(
                        "require({})",
                        span_text(self.source_text, span.start, span.end)
                    )
                })
            }
            Expression::Identifier(ident) => {
                let name = ident.name.as_str();
                self.require_bindings
                    .contains(name)
                    .then(|| name.to_string())
            }
            _ => None,
        }
    }
}

impl<'a> Visit<'a> for DefaultRequireCollector<'_> {
    fn visit_variable_declarator(&mut self, it: &VariableDeclarator<'a>) {
        if let BindingPatternKind::BindingIdentifier(ident) = &it.id.kind
            && it.init.as_ref().is_some_and(is_require_call)
        {
            self.require_bindings.insert(ident.name.as_str().to_string());
        }
        walk::walk_variable_declarator(self, it);
    }

    fn visit_static_member_expression(&mut self, it: &StaticMemberExpression<'a>) {
        if it.property.name.as_str() == "default"
            && let Some(replacement) = self.collapsed_object(&it.object)
        {
            self.edits.push(DefaultRequireEdit {
                start: it.span.start as usize,
                end: it.span.end as usize,
                replacement,
            });
            return;
        }
        walk::walk_static_member_expression(self, it);
    }
}

fn is_require_call(expression: &Expression<'_>) -> bool {
    matches!(
        expression,
        Expression::CallExpression(call)
            if matches!(&call.callee, Expression::Identifier(ident) if ident.name.as_str() == "require")
    )
}
