use std::path::Path;

use oxc_allocator::Allocator;

use crate::context::CompilationContext;
use crate::default_require::{DefaultRequireEdit, find_default_requires};
use crate::edit_buffer::EditBuffer;
use crate::error::NamedExportsError;
use crate::import_records::{ImportScan, extract_import_records};
use crate::module_kind::{ModuleClassification, classify_module};
use crate::rewrite::{apply_rewrites, plan_rewrites};
use crate::source_map::{MapOptions, SourceMap};
use crate::syntax::parse_program;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub code: String,
    pub map: Option<SourceMap>,
}

/// `Unchanged` is a final, successful outcome: the host keeps the input as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Changed(TransformResult),
    Unchanged,
}

impl TransformOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, TransformOutcome::Changed(_))
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            TransformOutcome::Changed(result) => Some(&result.code),
            TransformOutcome::Unchanged => None,
        }
    }
}

enum FileShape {
    Imports(ImportScan),
    AssignmentStyle(Vec<DefaultRequireEdit>),
}

impl CompilationContext {
    /// Transforms one file. Parse failures of the file itself are errors;
    /// problems with individual dependencies only leave their imports as is.
    pub async fn transform(
        &self,
        code: &str,
        id: &str,
    ) -> Result<TransformOutcome, NamedExportsError> {
        if !self.filter.is_eligible(id) {
            return Ok(TransformOutcome::Unchanged);
        }
        let path = Path::new(id);
        let shape = {
            let allocator = Allocator::default();
            let program = parse_program(&allocator, code, path)?;
            match classify_module(&program) {
                ModuleClassification::EsModuleSyntax => {
                    FileShape::Imports(extract_import_records(&program))
                }
                ModuleClassification::AssignmentStyle => {
                    FileShape::AssignmentStyle(find_default_requires(&program, code))
                }
            }
        };

        match shape {
            FileShape::Imports(scan) => self.rewrite_imports(code, path, scan).await,
            FileShape::AssignmentStyle(edits) => self.rewrite_default_requires(code, id, edits),
        }
    }

    async fn rewrite_imports(
        &self,
        code: &str,
        path: &Path,
        scan: ImportScan,
    ) -> Result<TransformOutcome, NamedExportsError> {
        let Some(injection_index) = scan
            .injection_index
            .filter(|_| !scan.records.is_empty())
        else {
            return Ok(TransformOutcome::Unchanged);
        };
        let plans = plan_rewrites(
            &self.exports,
            &self.synthetic_names,
            self.diagnostics.as_ref(),
            scan.records,
            path,
        )
        .await?;
        if plans.is_empty() {
            return Ok(TransformOutcome::Unchanged);
        }
        tracing::debug!(file = %path.display(), rewritten = plans.len(), "rewriting imports");

        let mut buffer = EditBuffer::new(code);
        apply_rewrites(&mut buffer, &plans, injection_index)?;
        Ok(self.finish(&buffer, path, self.config.hires))
    }

    fn rewrite_default_requires(
        &self,
        code: &str,
        id: &str,
        edits: Vec<DefaultRequireEdit>,
    ) -> Result<TransformOutcome, NamedExportsError> {
        if !self.config.default_requires || edits.is_empty() {
            return Ok(TransformOutcome::Unchanged);
        }
        let mut buffer = EditBuffer::new(code);
        for edit in edits {
            buffer.overwrite(edit.start, edit.end, edit.replacement)?;
        }
        Ok(self.finish(&buffer, Path::new(id), true))
    }

    fn finish(&self, buffer: &EditBuffer<'_>, path: &Path, hires: bool) -> TransformOutcome {
        if !self.config.source_map {
            return TransformOutcome::Changed(TransformResult {
                code: buffer.to_string(),
                map: None,
            });
        }
        let options = MapOptions {
            file: path
                .file_name()
                .map(|name| name.to_string_lossy().to_string()),
            source: path.to_string_lossy().to_string(),
            include_content: true,
            hires,
        };
        let (code, map) = buffer.render_with_map(&options);
        TransformOutcome::Changed(TransformResult {
            code,
            map: Some(map),
        })
    }
}
