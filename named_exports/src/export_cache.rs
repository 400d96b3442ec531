use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use oxc_allocator::Allocator;
use tokio::sync::OnceCell;

use crate::diagnostics::Diagnostics;
use crate::error::ExtractionError;
use crate::export_names::{ExportNameSet, extract_export_names};
use crate::loader::{LoaderChain, read_module_source};
use crate::module_kind::{ModuleClassification, classify_module};
use crate::resolve::ModuleResolver;
use crate::syntax::parse_program;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportLookup {
    Names(Arc<ExportNameSet>),
    /// The target uses module syntax; its exports are not enumerated here.
    NotApplicable,
}

pub type CachedLookup = Result<ExportLookup, ExtractionError>;

/// Per-path memo of export extraction for one compilation run.
///
/// The cell for a path is created before the extraction starts, so concurrent
/// requests await the same in-flight read instead of starting their own.
/// Failures are cached as well; entries are never evicted.
pub struct ExportResolutionCache {
    resolver: Arc<dyn ModuleResolver>,
    loaders: Arc<LoaderChain>,
    diagnostics: Arc<dyn Diagnostics>,
    entries: DashMap<PathBuf, Arc<OnceCell<CachedLookup>>>,
    extractions: AtomicUsize,
}

impl ExportResolutionCache {
    pub fn new(
        resolver: Arc<dyn ModuleResolver>,
        loaders: Arc<LoaderChain>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            resolver,
            loaders,
            diagnostics,
            entries: DashMap::new(),
            extractions: AtomicUsize::new(0),
        }
    }

    /// `Ok(None)` when the library is external, cannot be resolved (reported
    /// as a warning), or resolves to a module-syntax file.
    pub async fn resolve(
        &self,
        library: &str,
        importer: &Path,
    ) -> Result<Option<Arc<ExportNameSet>>, ExtractionError> {
        if self.resolver.is_external(library, importer) {
            tracing::debug!(%library, "external library, leaving imports untouched");
            return Ok(None);
        }
        let Some(path) = self.resolve_path(library, importer).await else {
            self.diagnostics.warn(&format!(
                "could not resolve '{library}' imported from {}",
                importer.display()
            ));
            return Ok(None);
        };
        match self.exports_at(&path).await? {
            ExportLookup::Names(names) => Ok(Some(names)),
            ExportLookup::NotApplicable => {
                tracing::debug!(%library, path = %path.display(), "target uses module syntax");
                Ok(None)
            }
        }
    }

    pub async fn exports_at(&self, path: &Path) -> CachedLookup {
        let cell = self
            .entries
            .entry(path.to_path_buf())
            .or_default()
            .value()
            .clone();
        cell.get_or_init(|| self.extract(path)).await.clone()
    }

    /// Number of extractions actually performed, one per distinct path.
    pub fn extraction_count(&self) -> usize {
        self.extractions.load(Ordering::SeqCst)
    }

    async fn resolve_path(&self, library: &str, importer: &Path) -> Option<PathBuf> {
        let resolver = Arc::clone(&self.resolver);
        let library = library.to_string();
        let importer = importer.to_path_buf();
        tokio::task::spawn_blocking(move || resolver.resolve(&library, &importer))
            .await
            .ok()
            .flatten()
    }

    async fn extract(&self, path: &Path) -> CachedLookup {
        self.extractions.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(path = %path.display(), "extracting export names");
        let source = read_module_source(Arc::clone(&self.loaders), path)
            .await
            .map_err(|err| ExtractionError {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        analyze_module_source(path, &source)
    }
}

pub fn analyze_module_source(path: &Path, source_text: &str) -> CachedLookup {
    let allocator = Allocator::default();
    let program =
        parse_program(&allocator, source_text, path).map_err(|err| ExtractionError {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    Ok(match classify_module(&program) {
        ModuleClassification::EsModuleSyntax => ExportLookup::NotApplicable,
        ModuleClassification::AssignmentStyle => {
            ExportLookup::Names(Arc::new(extract_export_names(&program)))
        }
    })
}
