//! In-crate fakes for unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::application::host::{Host, HostOptions};
use crate::application::ports::{Filesystem, LoadedConfig, ProjectLoader};
use crate::application::ApplicationError;
use crate::domain::{EnvVars, PackageManifest};
use crate::error::FerruleResult;

#[derive(Default)]
struct State {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

/// Map-backed filesystem.
#[derive(Default, Clone)]
pub struct FakeFs {
    state: Arc<Mutex<State>>,
    /// Writes to this path fail.
    fail_on: Arc<Mutex<Option<PathBuf>>>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        let path = path.into();
        let mut state = self.state.lock().unwrap();
        for parent in path.ancestors().skip(1) {
            state.dirs.insert(parent.to_path_buf());
        }
        state.files.insert(path, content.to_string());
        drop(state);
        self
    }

    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut state = self.state.lock().unwrap();
        for dir in path.ancestors() {
            state.dirs.insert(dir.to_path_buf());
        }
        drop(state);
        self
    }

    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        *self.fail_on.lock().unwrap() = Some(path.into());
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state.lock().unwrap().files.get(path.as_ref()).cloned()
    }
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, path: &Path) -> FerruleResult<()> {
        let mut state = self.state.lock().unwrap();
        for dir in path.ancestors() {
            state.dirs.insert(dir.to_path_buf());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> FerruleResult<()> {
        if self.fail_on.lock().unwrap().as_deref() == Some(path) {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "injected failure".into(),
            }
            .into());
        }
        self.state
            .lock()
            .unwrap()
            .files
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn append_file(&self, path: &Path, content: &str) -> FerruleResult<()> {
        if self.fail_on.lock().unwrap().as_deref() == Some(path) {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "injected failure".into(),
            }
            .into());
        }
        self.state
            .lock()
            .unwrap()
            .files
            .entry(path.to_path_buf())
            .or_default()
            .push_str(content);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> FerruleResult<String> {
        self.read(path).ok_or_else(|| {
            ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "not found".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }

    fn list_dir(&self, path: &Path) -> FerruleResult<Vec<String>> {
        let state = self.state.lock().unwrap();
        if !state.dirs.contains(path) {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "not a directory".into(),
            }
            .into());
        }
        let children: BTreeSet<String> = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        Ok(children.into_iter().collect())
    }

    fn remove_file(&self, path: &Path) -> FerruleResult<()> {
        self.state.lock().unwrap().files.remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> FerruleResult<()> {
        let mut state = self.state.lock().unwrap();
        state.files.retain(|p, _| !p.starts_with(path));
        state.dirs.retain(|p| !p.starts_with(path));
        Ok(())
    }
}

/// Loader returning fixed values.
#[derive(Default)]
pub struct FakeLoader {
    pub config: Option<Value>,
    pub manifest: PackageManifest,
    pub dotenv: BTreeMap<String, String>,
}

impl ProjectLoader for FakeLoader {
    fn load_config(
        &self,
        base_dir: &Path,
        explicit: Option<&Path>,
    ) -> FerruleResult<Option<LoadedConfig>> {
        Ok(self.config.clone().map(|data| LoadedConfig {
            path: explicit
                .map(Path::to_path_buf)
                .unwrap_or_else(|| base_dir.join("ferrule.config.json")),
            data,
        }))
    }

    fn load_manifest(&self, _base_dir: &Path) -> FerruleResult<PackageManifest> {
        Ok(self.manifest.clone())
    }

    fn load_env_files(
        &self,
        _base_dir: &Path,
        _node_env: Option<&str>,
    ) -> FerruleResult<BTreeMap<String, String>> {
        Ok(self.dotenv.clone())
    }
}

pub const ROOT: &str = "/work/app";

/// Host rooted at [`ROOT`] with the given config file contents.
pub fn host_with(config: Option<Value>, fs: FakeFs) -> Host {
    let loader = FakeLoader {
        config,
        ..Default::default()
    };
    Host::load(HostOptions::new(ROOT), &loader, Arc::new(fs)).unwrap()
}

pub fn test_host() -> Host {
    host_with(None, FakeFs::new())
}

pub fn env(pairs: &[(&str, &str)]) -> EnvVars {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
