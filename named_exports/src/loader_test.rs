use std::path::Path;
use std::sync::Arc;

use crate::error::NamedExportsError;
use crate::loader::{LoadOutcome, LoaderChain, MemoryLoader, ModuleLoader, read_module_source};

struct FailingLoader;

impl ModuleLoader for FailingLoader {
    fn name(&self) -> &str {
        "failing"
    }

    fn load(&self, path: &Path) -> Result<Option<String>, NamedExportsError> {
        Err(NamedExportsError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::other("loader exploded"),
        })
    }
}

#[test]
fn first_non_empty_result_wins() {
    let loaders: Vec<Arc<dyn ModuleLoader>> = vec![
        Arc::new(MemoryLoader::new().with_source("/a.js", "")),
        Arc::new(MemoryLoader::new().with_source("/a.js", "exports.first = 1;")),
        Arc::new(FailingLoader),
    ];
    let chain = LoaderChain::new(loaders);

    assert_eq!(
        chain.load(Path::new("/a.js")).expect("load"),
        LoadOutcome::Loaded {
            loader: "memory".to_string(),
            source: "exports.first = 1;".to_string(),
        }
    );
}

#[test]
fn unclaimed_when_no_loader_has_the_path() {
    let mut chain = LoaderChain::default();
    chain.push(Arc::new(MemoryLoader::new().with_source("/a.js", "x")));
    assert_eq!(
        chain.load(Path::new("/b.js")).expect("load"),
        LoadOutcome::Unclaimed
    );
}

#[test]
fn loader_errors_stop_the_chain() {
    let loaders: Vec<Arc<dyn ModuleLoader>> = vec![
        Arc::new(FailingLoader),
        Arc::new(MemoryLoader::new().with_source("/a.js", "x")),
    ];
    let chain = LoaderChain::new(loaders);
    assert!(chain.load(Path::new("/a.js")).is_err());
}

#[tokio::test]
async fn falls_back_to_the_file_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("index.js");
    std::fs::write(&file, "exports.disk = 1;\n").expect("write");

    let mut chain = LoaderChain::default();
    chain.push(Arc::new(MemoryLoader::new()));
    let source = read_module_source(Arc::new(chain), &file).await.expect("read");

    assert_eq!(source, "exports.disk = 1;\n");
}

#[tokio::test]
async fn missing_files_are_io_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("missing.js");

    let err = read_module_source(Arc::new(LoaderChain::default()), &file)
        .await
        .expect_err("missing");

    assert!(matches!(err, NamedExportsError::Io { path, .. } if path == file));
}
