use oxc_ast::ast::{Program, Statement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleClassification {
    EsModuleSyntax,
    /// Public surface is assigned onto `exports` / `module.exports`.
    AssignmentStyle,
}

pub fn classify_module(program: &Program<'_>) -> ModuleClassification {
    if program.body.iter().any(is_module_syntax_statement) {
        ModuleClassification::EsModuleSyntax
    } else {
        ModuleClassification::AssignmentStyle
    }
}

fn is_module_syntax_statement(statement: &Statement<'_>) -> bool {
    matches!(
        statement,
        Statement::ImportDeclaration(_)
            | Statement::ExportNamedDeclaration(_)
            | Statement::ExportDefaultDeclaration(_)
            | Statement::ExportAllDeclaration(_)
    )
}
