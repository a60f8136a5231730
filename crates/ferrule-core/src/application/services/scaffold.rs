//! Writes a [`ProjectStructure`] to disk, all or nothing.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::application::ApplicationError;
use crate::application::ports::Filesystem;
use crate::domain::{FsEntry, ProjectStructure};
use crate::error::FerruleResult;

pub struct ScaffoldWriter<'a> {
    filesystem: &'a dyn Filesystem,
    overwrite: bool,
}

/// What a write created, in creation order.
#[derive(Debug, Default)]
struct Written {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl<'a> ScaffoldWriter<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self {
            filesystem,
            overwrite: false,
        }
    }

    /// Replace files that already exist instead of refusing.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Write every entry under the structure root.
    ///
    /// Existing files are refused up front unless overwriting. If a write
    /// fails midway, files and directories created by this call are removed.
    #[instrument(skip_all, fields(root = %structure.root().display(), entries = structure.entry_count()))]
    pub fn write(&self, structure: &ProjectStructure) -> FerruleResult<Vec<PathBuf>> {
        structure.validate()?;

        let root = structure.root();
        if !self.overwrite {
            if let Some(existing) = structure
                .files()
                .map(|f| root.join(&f.path))
                .find(|p| self.filesystem.exists(p))
            {
                return Err(ApplicationError::FileExists { path: existing }.into());
            }
        }

        let mut written = Written::default();
        match self.write_all(structure, &mut written) {
            Ok(()) => {
                info!(files = written.files.len(), "scaffold written");
                Ok(written.files)
            }
            Err(e) => {
                warn!("write failed, rolling back");
                self.rollback(&written);
                Err(e)
            }
        }
    }

    fn write_all(&self, structure: &ProjectStructure, written: &mut Written) -> FerruleResult<()> {
        let root = structure.root();
        self.ensure_dir(root, written)?;

        for entry in structure.entries() {
            match entry {
                FsEntry::Directory(dir) => {
                    self.ensure_dir(&root.join(dir), written)?;
                }
                FsEntry::File(file) => {
                    let path = root.join(&file.path);
                    if let Some(parent) = path.parent() {
                        self.ensure_dir(parent, written)?;
                    }
                    let existed = self.filesystem.exists(&path);
                    self.filesystem.write_file(&path, &file.content)?;
                    if !existed {
                        written.files.push(path);
                    }
                }
            }
        }
        Ok(())
    }

    /// Create `dir`, remembering the topmost directory that did not exist.
    fn ensure_dir(&self, dir: &Path, written: &mut Written) -> FerruleResult<()> {
        if self.filesystem.is_dir(dir) {
            return Ok(());
        }
        let topmost = dir
            .ancestors()
            .take_while(|a| !a.as_os_str().is_empty() && !self.filesystem.exists(a))
            .last()
            .unwrap_or(dir)
            .to_path_buf();
        self.filesystem.create_dir_all(dir)?;
        written.dirs.push(topmost);
        Ok(())
    }

    /// Best effort; failures are logged.
    fn rollback(&self, written: &Written) {
        for file in written.files.iter().rev() {
            if let Err(e) = self.filesystem.remove_file(file) {
                warn!(error = %e, path = %file.display(), "rollback failed");
            }
        }
        for dir in written.dirs.iter().rev() {
            match self.filesystem.remove_dir_all(dir) {
                Ok(()) => debug!(path = %dir.display(), "removed"),
                Err(e) => warn!(error = %e, path = %dir.display(), "rollback failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeFs;
    use crate::error::FerruleError;

    fn page() -> ProjectStructure {
        ProjectStructure::new("/work/app/src/pages/home")
            .with_file("index.jsx", "export default () => null;")
            .with_file("index.css", "")
            .with_directory("assets")
    }

    #[test]
    fn writes_files_and_directories() {
        let fs = FakeFs::new().with_dir("/work/app/src/pages");
        let written = ScaffoldWriter::new(&fs).write(&page()).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            fs.read("/work/app/src/pages/home/index.jsx").as_deref(),
            Some("export default () => null;")
        );
        assert!(fs.is_dir(Path::new("/work/app/src/pages/home/assets")));
    }

    #[test]
    fn refuses_existing_files_without_overwrite() {
        let fs = FakeFs::new().with_file("/work/app/src/pages/home/index.css", "body {}");

        let err = ScaffoldWriter::new(&fs).write(&page()).unwrap_err();
        assert!(matches!(
            err,
            FerruleError::Application(ApplicationError::FileExists { .. })
        ));
        assert!(fs.read("/work/app/src/pages/home/index.jsx").is_none());

        ScaffoldWriter::new(&fs).overwrite(true).write(&page()).unwrap();
        assert_eq!(fs.read("/work/app/src/pages/home/index.css").as_deref(), Some(""));
    }

    #[test]
    fn failed_write_rolls_back_new_entries() {
        let fs = FakeFs::new()
            .with_dir("/work/app/src/pages")
            .with_file("/work/app/src/pages/about.js", "keep");
        fs.fail_writes_to("/work/app/src/pages/home/index.css");

        assert!(ScaffoldWriter::new(&fs).write(&page()).is_err());
        assert!(!fs.exists(Path::new("/work/app/src/pages/home")));
        assert!(fs.read("/work/app/src/pages/home/index.jsx").is_none());
        assert_eq!(fs.read("/work/app/src/pages/about.js").as_deref(), Some("keep"));
    }

    #[test]
    fn invalid_structure_writes_nothing() {
        let fs = FakeFs::new();
        let err = ScaffoldWriter::new(&fs)
            .write(&ProjectStructure::new("/work/app"))
            .unwrap_err();
        assert!(matches!(err, FerruleError::Domain(_)));
        assert!(!fs.exists(Path::new("/work/app")));
    }
}
