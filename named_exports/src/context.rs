use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::NamedExportsConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::NamedExportsError;
use crate::export_cache::ExportResolutionCache;
use crate::filter::IdFilter;
use crate::loader::{LoaderChain, ModuleLoader};
use crate::resolve::{ModuleResolver, OxcModuleResolver};
use crate::rewrite::SyntheticNames;

/// State shared by every file transformed in one compilation run.
///
/// Contexts are independent of each other: two runs never share cache
/// entries or synthetic name numbering.
pub struct CompilationContext {
    pub(crate) root: PathBuf,
    pub(crate) config: NamedExportsConfig,
    pub(crate) filter: IdFilter,
    pub(crate) diagnostics: Arc<dyn Diagnostics>,
    pub(crate) exports: Arc<ExportResolutionCache>,
    pub(crate) synthetic_names: SyntheticNames,
}

impl CompilationContext {
    pub fn builder(root: impl Into<PathBuf>) -> CompilationContextBuilder {
        CompilationContextBuilder::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &NamedExportsConfig {
        &self.config
    }

    pub fn exports(&self) -> &ExportResolutionCache {
        &self.exports
    }

    pub fn is_eligible(&self, id: &str) -> bool {
        self.filter.is_eligible(id)
    }
}

pub struct CompilationContextBuilder {
    root: PathBuf,
    config: NamedExportsConfig,
    resolver: Option<Arc<dyn ModuleResolver>>,
    loaders: LoaderChain,
    diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl CompilationContextBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: NamedExportsConfig::default(),
            resolver: None,
            loaders: LoaderChain::default(),
            diagnostics: None,
        }
    }

    pub fn config(mut self, config: NamedExportsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn ModuleResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Loaders are consulted in the order they are added.
    pub fn loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.loaders.push(loader);
        self
    }

    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn build(self) -> Result<CompilationContext, NamedExportsError> {
        let root = self.config.root.clone().unwrap_or(self.root);
        let root = dunce::canonicalize(&root).unwrap_or(root);
        let filter = IdFilter::new(&root, &self.config.include, &self.config.exclude)?;
        let resolver: Arc<dyn ModuleResolver> = match self.resolver {
            Some(resolver) => resolver,
            None => Arc::new(OxcModuleResolver::new(&root, &self.config.external)?),
        };
        let diagnostics: Arc<dyn Diagnostics> = match self.diagnostics {
            Some(diagnostics) => diagnostics,
            None => Arc::new(TracingDiagnostics),
        };
        let exports = Arc::new(ExportResolutionCache::new(
            resolver,
            Arc::new(self.loaders),
            Arc::clone(&diagnostics),
        ));
        Ok(CompilationContext {
            root,
            config: self.config,
            filter,
            diagnostics,
            exports,
            synthetic_names: SyntheticNames::default(),
        })
    }
}
