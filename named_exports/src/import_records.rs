use indexmap::IndexMap;
use oxc_ast::ast::{ImportDeclaration, ImportDeclarationSpecifier, Program, Statement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub library: String,
    pub default_binding: Option<String>,
    /// Imported name to local alias, in source order.
    pub named_bindings: IndexMap<String, String>,
    /// Type-only specifiers (`{ type T }`); carried so a rewritten clause still declares them.
    pub type_bindings: IndexMap<String, String>,
    pub source_start: usize,
    pub source_end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportScan {
    pub records: Vec<ImportRecord>,
    /// End offset of the last top-level import declaration, relative ones included.
    pub injection_index: Option<usize>,
}

pub fn extract_import_records(program: &Program<'_>) -> ImportScan {
    let mut scan = ImportScan::default();
    for statement in &program.body {
        let Statement::ImportDeclaration(declaration) = statement else {
            continue;
        };
        scan.injection_index = Some(declaration.span.end as usize);
        if let Some(record) = import_record(declaration) {
            scan.records.push(record);
        }
    }
    scan
}

fn import_record(declaration: &ImportDeclaration<'_>) -> Option<ImportRecord> {
    let library = declaration.source.value.as_str();
    if library.starts_with('.') || declaration.import_kind.is_type() {
        return None;
    }

    let mut default_binding = None;
    let mut named_bindings = IndexMap::new();
    let mut type_bindings = IndexMap::new();
    for specifier in declaration.specifiers.iter().flatten() {
        match specifier {
            ImportDeclarationSpecifier::ImportDefaultSpecifier(it) => {
                default_binding = Some(it.local.name.as_str().to_string());
            }
            // `{ default as L }` stays a named binding, so its fallback reads
            // `.default` off the module object.
            ImportDeclarationSpecifier::ImportSpecifier(it) => {
                let imported = it.imported.name().to_string();
                // Bindings are keyed by imported name; a name imported twice is left as written.
                if named_bindings.contains_key(&imported)
                    || type_bindings.contains_key(&imported)
                {
                    return None;
                }
                let local = it.local.name.as_str().to_string();
                if it.import_kind.is_type() {
                    type_bindings.insert(imported, local);
                } else {
                    named_bindings.insert(imported, local);
                }
            }
            ImportDeclarationSpecifier::ImportNamespaceSpecifier(_) => {}
        }
    }

    if named_bindings.is_empty() {
        return None;
    }

    Some(ImportRecord {
        library: library.to_string(),
        default_binding,
        named_bindings,
        type_bindings,
        source_start: declaration.span.start as usize,
        source_end: declaration.span.end as usize,
    })
}
