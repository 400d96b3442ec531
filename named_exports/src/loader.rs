use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::NamedExportsError;

/// A host-provided source for module text, tried before reading from disk.
///
/// `Ok(None)` (or an empty string) means the loader does not claim the path.
pub trait ModuleLoader: Send + Sync {
    fn name(&self) -> &str;
    fn load(&self, path: &Path) -> Result<Option<String>, NamedExportsError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { loader: String, source: String },
    /// No loader produced text; the caller reads the file itself.
    Unclaimed,
}

#[derive(Clone, Default)]
pub struct LoaderChain {
    loaders: Vec<Arc<dyn ModuleLoader>>,
}

impl std::fmt::Debug for LoaderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.loaders.iter().map(|loader| loader.name()))
            .finish()
    }
}

impl LoaderChain {
    pub fn new(loaders: Vec<Arc<dyn ModuleLoader>>) -> Self {
        Self { loaders }
    }

    pub fn push(&mut self, loader: Arc<dyn ModuleLoader>) {
        self.loaders.push(loader);
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// First non-empty result wins; loaders after it are not consulted.
    pub fn load(&self, path: &Path) -> Result<LoadOutcome, NamedExportsError> {
        for loader in &self.loaders {
            match loader.load(path)? {
                Some(source) if !source.is_empty() => {
                    return Ok(LoadOutcome::Loaded {
                        loader: loader.name().to_string(),
                        source,
                    });
                }
                _ => continue,
            }
        }
        Ok(LoadOutcome::Unclaimed)
    }
}

/// Runs the chain off the async workers, then falls back to the file on disk.
pub async fn read_module_source(
    chain: Arc<LoaderChain>,
    path: &Path,
) -> Result<String, NamedExportsError> {
    if !chain.is_empty() {
        let owned_path = path.to_path_buf();
        let outcome =
            tokio::task::spawn_blocking(move || chain.load(&owned_path)).await??;
        if let LoadOutcome::Loaded { loader, source } = outcome {
            tracing::debug!(path = %path.display(), %loader, "module source provided by loader");
            return Ok(source);
        }
    }
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| NamedExportsError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// In-memory module texts keyed by absolute path.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    sources: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.sources.insert(path.into(), source.into());
        self
    }
}

impl ModuleLoader for MemoryLoader {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, path: &Path) -> Result<Option<String>, NamedExportsError> {
        Ok(self.sources.get(path).cloned())
    }
}
