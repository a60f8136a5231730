use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;

/// Files and directories a scaffolding action wants on disk.
///
/// Paths are relative to `root`. The structure carries no behavior beyond
/// validation; writing it out is the job of the scaffold writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStructure {
    root: PathBuf,
    entries: Vec<FsEntry>,
}

impl ProjectStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.entries.push(FsEntry::File(FileToWrite {
            path: path.into(),
            content: content.into(),
        }));
    }

    pub fn add_directory(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(FsEntry::Directory(path.into()));
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_directory(path);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rejects empty structures, duplicate paths and absolute paths.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::EmptyStructure);
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            let path = entry.path();
            let shown = path.display().to_string();
            if path.is_absolute() {
                return Err(DomainError::AbsolutePathNotAllowed { path: shown });
            }
            if !seen.insert(path) {
                return Err(DomainError::DuplicatePath { path: shown });
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::File(f) => Some(f),
            FsEntry::Directory(_) => None,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEntry {
    File(FileToWrite),
    Directory(PathBuf),
}

impl FsEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_structure_is_invalid() {
        let s = ProjectStructure::new("/p");
        assert_eq!(s.validate(), Err(DomainError::EmptyStructure));
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let s = ProjectStructure::new("/p")
            .with_file("index.js", "a")
            .with_file("index.js", "b");
        assert!(matches!(s.validate(), Err(DomainError::DuplicatePath { .. })));
    }

    #[test]
    fn absolute_paths_are_rejected() {
        let s = ProjectStructure::new("/p").with_directory("/etc");
        assert!(matches!(
            s.validate(),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn files_skip_directories() {
        let s = ProjectStructure::new("/p")
            .with_directory("src")
            .with_file("src/index.js", "");
        assert_eq!(s.files().count(), 1);
        assert_eq!(s.entry_count(), 2);
        assert!(s.validate().is_ok());
    }
}
