use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::NamedExportsError;

/// Files under `root` keep their root-relative path below `out_dir`; files
/// outside it are written by file name.
pub fn output_path(root: &Path, file: &Path, out_dir: &Path) -> Option<PathBuf> {
    match file.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => Some(out_dir.join(rel)),
        _ => file.file_name().map(|name| out_dir.join(name)),
    }
}

/// Output paths for `files`, in input order. Two inputs mapping to the same
/// output are rejected before anything is written.
pub fn plan_output_paths(
    root: &Path,
    files: &[PathBuf],
    out_dir: &Path,
) -> Result<Vec<PathBuf>, NamedExportsError> {
    let mut claimed = HashMap::<PathBuf, &Path>::new();
    let mut planned = Vec::with_capacity(files.len());
    for file in files {
        let Some(out) = output_path(root, file, out_dir) else {
            return Err(NamedExportsError::OutputPath {
                path: file.clone(),
                message: "path has no file name".to_string(),
            });
        };
        if let Some(previous) = claimed.insert(out.clone(), file) {
            return Err(NamedExportsError::OutputPath {
                path: file.clone(),
                message: format!(
                    "{} is also the output of {}",
                    out.display(),
                    previous.display()
                ),
            });
        }
        planned.push(out);
    }
    Ok(planned)
}
