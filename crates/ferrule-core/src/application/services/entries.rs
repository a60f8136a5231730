use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::application::ports::Filesystem;
use crate::domain::common::{SCRIPT_EXTENSIONS, resolve_from, strip_script_extension};
use crate::domain::entities::entry::template_candidates;
use crate::domain::{DomainError, EntryPoint, ProjectConfig};
use crate::error::FerruleResult;

/// Never treated as pages.
const IGNORED_FILES: [&str; 1] = [".DS_Store"];

/// Computes entry points from the project configuration and the files on disk.
pub struct EntryResolver<'a> {
    fs: &'a dyn Filesystem,
    config: &'a ProjectConfig,
    root: &'a Path,
}

impl<'a> EntryResolver<'a> {
    pub fn new(fs: &'a dyn Filesystem, config: &'a ProjectConfig, root: &'a Path) -> Self {
        Self { fs, config, root }
    }

    /// Web entry points: the custom `entry` map when it names at least one
    /// entry, otherwise one entry per item of `pagesPath`.
    pub fn entries(&self) -> FerruleResult<Vec<EntryPoint>> {
        let entries = if self.config.has_custom_entry() {
            self.custom_entries()?
        } else {
            self.standard_entries()?
        };
        debug!(count = entries.len(), "entries resolved");
        Ok(entries)
    }

    /// Server entry points. Empty without `ssrConfig`; a list in
    /// `ssrConfig.entry` keeps only the web entries it names.
    pub fn node_entries(&self) -> FerruleResult<Vec<EntryPoint>> {
        let Some(ssr) = &self.config.ssr_config else {
            return Ok(Vec::new());
        };
        let entries = self.entries()?;
        let Some(Value::Array(names)) = &ssr.entry else {
            return Ok(entries);
        };
        Ok(entries
            .into_iter()
            .filter(|e| names.iter().any(|n| n.as_str() == Some(e.name.as_str())))
            .collect())
    }

    fn standard_entries(&self) -> FerruleResult<Vec<EntryPoint>> {
        let pages = &self.config.pages_path;
        if !self.fs.is_dir(pages) {
            return Err(DomainError::EntryNotFound {
                path: pages.clone(),
            }
            .into());
        }

        let mut entries = Vec::new();
        for item in self.fs.list_dir(pages)? {
            if IGNORED_FILES.contains(&item.as_str()) || self.config.ignore_pages.contains(&item) {
                continue;
            }
            let file = self.really_entry(&pages.join(&item))?;

            let name = if file.parent() == Some(pages.as_path()) {
                file_stem(&file)
            } else {
                file.parent()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            };
            let template = self.template_for(&file);
            entries.push(self.entry_point(name, vec![file], template));
        }
        Ok(entries)
    }

    fn custom_entries(&self) -> FerruleResult<Vec<EntryPoint>> {
        let Some(map) = &self.config.entry else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::with_capacity(map.len());
        for (name, value) in map {
            let files = match value {
                Value::String(file) => vec![file.as_str()],
                Value::Array(items) => items
                    .iter()
                    .map(|v| {
                        v.as_str().ok_or_else(|| {
                            DomainError::InvalidConfig(format!(
                                "entry.{name} must be a file or a list of files"
                            ))
                        })
                    })
                    .collect::<Result<_, _>>()?,
                _ => {
                    return Err(DomainError::InvalidConfig(format!(
                        "entry.{name} must be a file or a list of files"
                    ))
                    .into());
                }
            };

            let files = files
                .into_iter()
                .map(|f| self.really_entry(&resolve_from(self.root, [f])))
                .collect::<FerruleResult<Vec<_>>>()?;
            // the last file decides the template
            let template = match files.last() {
                Some(last) => self.template_for(last),
                None => self.config.template.clone(),
            };
            entries.push(self.entry_point(name.clone(), files, template));
        }
        Ok(entries)
    }

    fn entry_point(&self, name: String, files: Vec<PathBuf>, template: PathBuf) -> EntryPoint {
        let entry = self
            .config
            .init_entry
            .iter()
            .chain(files.iter())
            .map(|p| strip_script_extension(&p.to_string_lossy()).to_string())
            .collect();
        EntryPoint {
            chunks: vec![name.clone()],
            name,
            entry,
            template,
        }
    }

    /// Resolve an entry path to an actual file: `path.<ext>`, then the path
    /// itself, then `path/index.<ext>` for a directory.
    fn really_entry(&self, path: &Path) -> FerruleResult<PathBuf> {
        if let Some(file) = self.with_extension(path) {
            return Ok(file);
        }
        if !self.fs.exists(path) {
            return Err(DomainError::EntryNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        if !self.fs.is_dir(path) {
            return Ok(path.to_path_buf());
        }
        self.with_extension(&path.join("index")).ok_or_else(|| {
            DomainError::EntryIndexMissing {
                dir: path.to_path_buf(),
            }
            .into()
        })
    }

    fn with_extension(&self, path: &Path) -> Option<PathBuf> {
        SCRIPT_EXTENSIONS
            .iter()
            .map(|ext| {
                let mut candidate = path.as_os_str().to_owned();
                candidate.push(ext);
                PathBuf::from(candidate)
            })
            .find(|candidate| self.fs.exists(candidate) && !self.fs.is_dir(candidate))
    }

    fn template_for(&self, file: &Path) -> PathBuf {
        template_candidates(file)
            .into_iter()
            .find(|t| self.fs.exists(t))
            .unwrap_or_else(|| self.config.template.clone())
    }
}

fn file_stem(file: &Path) -> String {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.rfind('.') {
        Some(dot) if dot > 0 => name[..dot].to_string(),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::test_support::{FakeFs, host_with};
    use crate::error::FerruleError;

    fn pages() -> FakeFs {
        FakeFs::new()
            .with_file("/work/app/src/pages/about.tsx", "")
            .with_file("/work/app/src/pages/home/index.js", "")
            .with_file("/work/app/src/pages/home/index.html", "")
            .with_file("/work/app/src/pages/.DS_Store", "")
            .with_file("/work/app/src/pages/draft/index.ts", "")
    }

    #[test]
    fn standard_entries_come_from_pages() {
        let host = host_with(
            Some(json!({ "ignorePages": ["draft"], "initEntry": ["./src/polyfill.js"] })),
            pages(),
        );
        let entries = host.entries().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "about");
        assert_eq!(
            entries[0].entry,
            ["/work/app/src/polyfill", "/work/app/src/pages/about"]
        );
        assert_eq!(entries[0].template, Path::new("/work/app/src/common/template.html"));
        assert_eq!(entries[1].name, "home");
        assert_eq!(entries[1].chunks, ["home"]);
        assert_eq!(entries[1].template, Path::new("/work/app/src/pages/home/index.html"));
    }

    #[test]
    fn missing_pages_directory_is_an_error() {
        let host = host_with(None, FakeFs::new());
        assert!(matches!(
            host.entries(),
            Err(FerruleError::Domain(DomainError::EntryNotFound { .. }))
        ));
    }

    #[test]
    fn directory_without_index_is_an_error() {
        let fs = FakeFs::new().with_file("/work/app/src/pages/empty/style.css", "");
        let host = host_with(None, fs);
        assert!(matches!(
            host.entries(),
            Err(FerruleError::Domain(DomainError::EntryIndexMissing { ref dir }))
                if dir == Path::new("/work/app/src/pages/empty")
        ));
    }

    #[test]
    fn custom_entries_resolve_against_root() {
        let fs = FakeFs::new()
            .with_file("/work/app/src/vendor.js", "")
            .with_file("/work/app/src/main.pc.ts", "")
            .with_file("/work/app/src/main.html", "");
        let host = host_with(
            Some(json!({ "entry": { "main": ["./src/vendor", "src/main.pc.ts"] } })),
            fs,
        );
        let entries = host.entries().unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry, ["/work/app/src/vendor", "/work/app/src/main.pc"]);
        assert_eq!(entries[0].template, Path::new("/work/app/src/main.html"));
    }

    #[test]
    fn empty_entry_map_falls_back_to_pages() {
        let host = host_with(Some(json!({ "entry": {} })), pages());
        assert_eq!(host.entries().unwrap().len(), 3);
    }

    #[test]
    fn missing_custom_entry_file_is_an_error() {
        let host = host_with(Some(json!({ "entry": { "main": "./src/nope" } })), FakeFs::new());
        assert!(matches!(
            host.entries(),
            Err(FerruleError::Domain(DomainError::EntryNotFound { .. }))
        ));
    }

    #[test]
    fn node_entries_filter_by_name() {
        let host = host_with(
            Some(json!({ "ssrConfig": { "entry": ["home"] }, "ignorePages": ["draft"] })),
            pages(),
        );
        let names: Vec<_> = host.node_entries().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["home"]);

        let without_ssr = host_with(None, pages());
        assert!(without_ssr.node_entries().unwrap().is_empty());
    }
}
