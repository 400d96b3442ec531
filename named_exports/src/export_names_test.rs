use std::path::Path;

use oxc_allocator::Allocator;

use crate::export_names::extract_export_names;
use crate::module_kind::{ModuleClassification, classify_module};
use crate::syntax::parse_program;

fn export_names_of(source: &str) -> Vec<String> {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, source, Path::new("/virtual/lib.js")).expect("parse");
    extract_export_names(&program)
        .iter()
        .map(str::to_string)
        .collect()
}

fn classification_of(source: &str) -> ModuleClassification {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, source, Path::new("/virtual/lib.js")).expect("parse");
    classify_module(&program)
}

#[test]
fn collects_exports_and_module_exports_members_in_order() {
    let names = export_names_of(
        "exports.foo = 1;\nmodule.exports.bar = function () {};\nexports.baz = exports.foo;\n",
    );
    assert_eq!(names, vec!["foo", "bar", "baz"]);
}

#[test]
fn repeated_assignments_yield_one_name() {
    let names = export_names_of("exports.foo = 1;\nexports.foo = 2;\n");
    assert_eq!(names, vec!["foo"]);
}

#[test]
fn ignores_nested_computed_and_whole_object_assignments() {
    let names = export_names_of(
        r#"
if (process.env.NODE_ENV) { exports.inBlock = 1; }
function define() { exports.inFunction = 1; }
exports['computed'] = 1;
module.exports = { literal: 1 };
exports = { rebound: 1 };
other.exports.foreign = 1;
var local = exports.notAnAssignment;
exports.kept = 1;
"#,
    );
    assert_eq!(names, vec!["kept"]);
}

#[test]
fn module_without_module_syntax_is_assignment_style() {
    assert_eq!(
        classification_of("const x = require('x');\nexports.x = x;\n"),
        ModuleClassification::AssignmentStyle
    );
    assert_eq!(classification_of(""), ModuleClassification::AssignmentStyle);
}

#[test]
fn any_import_or_export_statement_means_module_syntax() {
    let sources = [
        "import x from 'x';\nexports.a = 1;",
        "export const a = 1;",
        "export default 1;",
        "export * from 'x';",
        "exports.a = 1;\nexport { };",
    ];
    for source in sources {
        assert_eq!(
            classification_of(source),
            ModuleClassification::EsModuleSyntax,
            "{source}"
        );
    }
}

#[test]
fn dynamic_import_alone_does_not_make_module_syntax() {
    assert_eq!(
        classification_of("exports.load = () => import('x');\n"),
        ModuleClassification::AssignmentStyle
    );
}
