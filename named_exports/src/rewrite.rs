use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;
use oxc_syntax::identifier::is_identifier_name;
use tokio::task::JoinSet;

use crate::diagnostics::Diagnostics;
use crate::edit_buffer::EditBuffer;
use crate::error::NamedExportsError;
use crate::export_cache::ExportResolutionCache;
use crate::export_names::ExportNameSet;
use crate::import_records::ImportRecord;

pub const SYNTHETIC_PREFIX: &str = "__import$";

/// Fresh default-binding names, numbered across a whole compilation run.
#[derive(Debug, Default)]
pub struct SyntheticNames {
    next: AtomicUsize,
}

impl SyntheticNames {
    pub fn fresh(&self) -> String {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{SYNTHETIC_PREFIX}{index}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingPartition {
    pub resolved: IndexMap<String, String>,
    pub unresolved: IndexMap<String, String>,
}

pub fn partition_bindings(
    named_bindings: &IndexMap<String, String>,
    exports: &ExportNameSet,
) -> BindingPartition {
    let mut partition = BindingPartition::default();
    for (imported, local) in named_bindings {
        let side = if exports.contains(imported) {
            &mut partition.resolved
        } else {
            &mut partition.unresolved
        };
        side.insert(imported.clone(), local.clone());
    }
    partition
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePlan {
    pub library: String,
    pub resolved_bindings: IndexMap<String, String>,
    /// Never empty; imports with nothing to destructure are not planned.
    pub unresolved_bindings: IndexMap<String, String>,
    /// Re-emitted as `type T` specifiers after the resolved ones.
    pub type_bindings: IndexMap<String, String>,
    pub default_binding: String,
    pub source_start: usize,
    pub source_end: usize,
}

impl RewritePlan {
    pub fn import_statement(&self) -> String {
        let mut statement = format!("import {}", self.default_binding);
        let specifiers = self
            .resolved_bindings
            .iter()
            .map(|(imported, local)| render_import_specifier(imported, local))
            .chain(self.type_bindings.iter().map(|(imported, local)| {
                format!("type {}", render_import_specifier(imported, local))
            }))
            .collect::<Vec<_>>();
        if !specifiers.is_empty() {
            statement.push_str(&format!(", {{ {} }}", specifiers.join(", ")));
        }
        statement.push_str(&format!(" from {};", quote_js_string(&self.library, '\'')));
        statement
    }

    pub fn fallback_statement(&self) -> String {
        let pattern = self
            .unresolved_bindings
            .iter()
            .map(|(imported, local)| render_destructure_property(imported, local))
            .collect::<Vec<_>>()
            .join(", ");
        format!("const {{ {pattern} }} = {};", self.default_binding)
    }
}

/// Resolves every record concurrently and returns plans for the imports that
/// need a runtime fallback, in source order.
pub async fn plan_rewrites(
    exports: &Arc<ExportResolutionCache>,
    synthetic_names: &SyntheticNames,
    diagnostics: &dyn Diagnostics,
    records: Vec<ImportRecord>,
    importer: &Path,
) -> Result<Vec<RewritePlan>, NamedExportsError> {
    let mut lookups = JoinSet::new();
    for (index, record) in records.iter().enumerate() {
        let exports = Arc::clone(exports);
        let library = record.library.clone();
        let importer = importer.to_path_buf();
        lookups.spawn(async move { (index, exports.resolve(&library, &importer).await) });
    }

    let mut resolved = (0..records.len()).map(|_| None).collect::<Vec<_>>();
    while let Some(joined) = lookups.join_next().await {
        let (index, lookup) = joined?;
        resolved[index] = match lookup {
            Ok(names) => names,
            Err(err) => {
                diagnostics.warn(&err.to_string());
                None
            }
        };
    }

    let plans = records
        .into_iter()
        .zip(resolved)
        .filter_map(|(record, names)| {
            let names = names?;
            let partition = partition_bindings(&record.named_bindings, &names);
            if partition.unresolved.is_empty() {
                tracing::debug!(library = %record.library, "all named imports resolved statically");
                return None;
            }
            let default_binding = record
                .default_binding
                .unwrap_or_else(|| synthetic_names.fresh());
            Some(RewritePlan {
                library: record.library,
                resolved_bindings: partition.resolved,
                unresolved_bindings: partition.unresolved,
                type_bindings: record.type_bindings,
                default_binding,
                source_start: record.source_start,
                source_end: record.source_end,
            })
        })
        .collect();
    Ok(plans)
}

/// Replaces each planned import in place and inserts all fallbacks once, after
/// the last import declaration.
pub fn apply_rewrites(
    buffer: &mut EditBuffer<'_>,
    plans: &[RewritePlan],
    injection_index: usize,
) -> Result<(), NamedExportsError> {
    if plans.is_empty() {
        return Ok(());
    }
    let mut fallbacks = Vec::with_capacity(plans.len());
    for plan in plans {
        buffer.overwrite(plan.source_start, plan.source_end, plan.import_statement())?;
        fallbacks.push(plan.fallback_statement());
    }
    buffer.append_left(injection_index, format!("\n{}\n", fallbacks.join("\n")))?;
    Ok(())
}

fn render_import_specifier(imported: &str, local: &str) -> String {
    if imported == local {
        return imported.to_string();
    }
    format!("{} as {local}", render_module_name(imported))
}

fn render_destructure_property(imported: &str, local: &str) -> String {
    if imported == local {
        return imported.to_string();
    }
    format!("{}: {local}", render_module_name(imported))
}

fn render_module_name(name: &str) -> String {
    if is_identifier_name(name) {
        name.to_string()
    } else {
        quote_js_string(name, '"')
    }
}

fn quote_js_string(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
