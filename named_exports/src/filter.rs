use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::NamedExportsError;

/// Suffix hosts put on virtual proxy modules; those are never user code.
pub const PROXY_MARKER: &str = "?commonjs-proxy";

pub const DEFAULT_EXCLUDE: &str = "**/node_modules/**";

#[derive(Debug, Clone)]
pub struct IdFilter {
    root: PathBuf,
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl IdFilter {
    /// An empty `include` admits every id; an empty `exclude` falls back to
    /// skipping `node_modules`.
    pub fn new(
        root: &Path,
        include: &[String],
        exclude: &[String],
    ) -> Result<Self, NamedExportsError> {
        let include = (!include.is_empty())
            .then(|| build_glob_set(include))
            .transpose()?;
        let exclude = if exclude.is_empty() {
            build_glob_set(&[DEFAULT_EXCLUDE.to_string()])?
        } else {
            build_glob_set(exclude)?
        };
        Ok(Self {
            root: root.to_path_buf(),
            include,
            exclude,
        })
    }

    pub fn is_eligible(&self, id: &str) -> bool {
        if id.contains('\0') || id.contains(PROXY_MARKER) {
            return false;
        }
        let path = Path::new(id);
        if !path.is_absolute() {
            return false;
        }
        let rel = path
            .strip_prefix(&self.root)
            .ok()
            .and_then(|p| p.to_str())
            .map(|s| s.replace('\\', "/"));
        let matches = |set: &GlobSet| {
            set.is_match(path) || rel.as_deref().is_some_and(|r| set.is_match(Path::new(r)))
        };
        if matches(&self.exclude) {
            return false;
        }
        self.include.as_ref().is_none_or(matches)
    }
}

pub(crate) fn build_glob_set(patterns: &[String]) -> Result<GlobSet, NamedExportsError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns.iter().filter(|s| !s.trim().is_empty()) {
        let glob = Glob::new(pattern).map_err(|err| NamedExportsError::InvalidGlob {
            pattern: pattern.clone(),
            message: err.to_string(),
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|err| NamedExportsError::InvalidGlob {
            pattern: patterns.join(", "),
            message: err.to_string(),
        })
}
