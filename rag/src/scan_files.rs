use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::extract_text::DocumentFormat;

/// Lists documents under `source_dir` (or the configured source dir) that can
/// be opened: supported extension, within the upload size limit.
pub fn scan_documents(cfg: &Config, source_dir: Option<&Path>) -> Vec<PathBuf> {
    let base = source_dir.unwrap_or_else(|| Path::new(&cfg.source_dir));
    let mut results = Vec::new();

    let walker = WalkDir::new(base).into_iter().filter_entry(|e| {
        let name = e.file_name().to_string_lossy();
        let hidden = e.depth() > 0 && name.starts_with('.');
        !hidden && !cfg.exclude_dirs.iter().any(|d| d == &name)
    });

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if DocumentFormat::from_path(path).is_err() {
            continue;
        }
        if let Ok(meta) = fs::metadata(path) {
            if meta.len() > cfg.max_file_bytes || meta.len() == 0 {
                continue;
            }
        }
        results.push(path.to_path_buf());
    }

    results.sort();
    results
}
