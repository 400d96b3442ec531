pub mod config;
pub mod context;
pub mod default_require;
pub mod diagnostics;
pub mod edit_buffer;
pub mod error;
pub mod export_cache;
pub mod export_names;
pub mod filter;
pub mod import_records;
pub mod loader;
pub mod module_kind;
pub mod output;
pub mod resolve;
pub mod rewrite;
pub mod source_map;
pub mod syntax;
pub mod transform;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod export_names_test;
#[cfg(test)]
mod filter_test;
#[cfg(test)]
mod loader_test;

pub use context::{CompilationContext, CompilationContextBuilder};
pub use error::{ExtractionError, NamedExportsError};
pub use transform::{TransformOutcome, TransformResult};
