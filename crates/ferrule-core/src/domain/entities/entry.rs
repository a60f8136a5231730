use std::path::{Path, PathBuf};

use serde::Serialize;

/// One bundler entry point with its HTML template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryPoint {
    pub name: String,
    /// `initEntry` files followed by the entry's own files, without script
    /// extensions.
    pub entry: Vec<String>,
    pub chunks: Vec<String>,
    pub template: PathBuf,
}

/// HTML template paths to try for an entry file, most specific first.
///
/// `pages/example.pc.js` yields `pages/example.pc.html` then
/// `pages/example.html`. The configured default template is not included.
pub fn template_candidates(entry_file: &Path) -> Vec<PathBuf> {
    let dir = entry_file.parent().unwrap_or(Path::new(""));
    let Some(file_name) = entry_file.file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };

    let parts: Vec<&str> = file_name.split('.').collect();
    (1..parts.len())
        .rev()
        .map(|keep| dir.join(format!("{}.html", parts[..keep].join("."))))
        .collect()
}
