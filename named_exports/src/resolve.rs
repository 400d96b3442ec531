use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use globset::GlobSet;
use oxc_resolver::{
    ResolveOptions, Resolver, TsconfigDiscovery, TsconfigOptions, TsconfigReferences,
};

use crate::error::NamedExportsError;
use crate::filter::build_glob_set;

const EXTENSIONS: [&str; 9] = [
    ".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".mts", ".cts", ".json",
];

const NODE_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "timers",
    "tls",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "worker_threads",
    "zlib",
];

/// Maps import specifiers to files on disk.
pub trait ModuleResolver: Send + Sync {
    /// External libraries are left to the host and never analyzed.
    fn is_external(&self, library: &str, importer: &Path) -> bool;

    fn resolve(&self, library: &str, importer: &Path) -> Option<PathBuf>;
}

/// `oxc_resolver` backed resolution with per-directory tsconfig discovery.
#[derive(Debug)]
pub struct OxcModuleResolver {
    root: PathBuf,
    external: Option<GlobSet>,
    by_dir: DashMap<PathBuf, Arc<Resolver>>,
}

impl OxcModuleResolver {
    pub fn new(root: &Path, external: &[String]) -> Result<Self, NamedExportsError> {
        let external = (!external.is_empty())
            .then(|| build_glob_set(external))
            .transpose()?;
        Ok(Self {
            root: root.to_path_buf(),
            external,
            by_dir: DashMap::new(),
        })
    }

    fn resolver_for(&self, from_dir: &Path) -> Arc<Resolver> {
        if let Some(hit) = self.by_dir.get(from_dir) {
            return Arc::clone(hit.value());
        }
        let tsconfig_path = find_tsconfig_json(from_dir, &self.root);
        let created = Arc::new(build_oxc_resolver(tsconfig_path.as_deref()));
        self.by_dir
            .entry(from_dir.to_path_buf())
            .or_insert(created)
            .value()
            .clone()
    }
}

impl ModuleResolver for OxcModuleResolver {
    fn is_external(&self, library: &str, _importer: &Path) -> bool {
        is_node_builtin(library)
            || self
                .external
                .as_ref()
                .is_some_and(|set| set.is_match(library))
    }

    fn resolve(&self, library: &str, importer: &Path) -> Option<PathBuf> {
        let raw_specifier = library.trim();
        if raw_specifier.is_empty() {
            return None;
        }
        let from_dir = importer.parent().unwrap_or(&self.root);
        let resolver = self.resolver_for(from_dir);
        let path = resolver
            .resolve(from_dir, raw_specifier)
            .ok()?
            .into_path_buf();
        Some(dunce::canonicalize(&path).unwrap_or(path))
    }
}

pub fn is_node_builtin(library: &str) -> bool {
    library.starts_with("node:") || NODE_BUILTINS.contains(&library)
}

fn build_oxc_resolver(tsconfig_path: Option<&Path>) -> Resolver {
    let extensions = EXTENSIONS
        .into_iter()
        .map(|ext| ext.to_string())
        .collect::<Vec<_>>();
    let tsconfig = tsconfig_path.map(|path| {
        TsconfigDiscovery::Manual(TsconfigOptions {
            config_file: path.to_path_buf(),
            references: TsconfigReferences::Disabled,
        })
    });
    Resolver::new(ResolveOptions {
        extensions,
        tsconfig,
        condition_names: vec![
            "import".to_string(),
            "module".to_string(),
            "default".to_string(),
        ],
        main_fields: vec!["module".to_string(), "main".to_string()],
        ..Default::default()
    })
}

fn find_tsconfig_json(from_dir: &Path, root: &Path) -> Option<PathBuf> {
    std::iter::successors(Some(from_dir), |dir| dir.parent())
        .take_while(|dir| dir.starts_with(root))
        .find_map(|dir| {
            let candidate = dir.join("tsconfig.json");
            candidate.exists().then_some(candidate)
        })
}
