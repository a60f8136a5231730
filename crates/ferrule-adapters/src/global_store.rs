//! Global plugin list persisted in a JSON file.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use ferrule_core::{
    application::{ApplicationError, ports::GlobalPluginStore},
    error::FerruleResult,
};

const PLUGINS_KEY: &str = "plugins";

/// Stores the list under `plugins` in a JSON object; other keys are kept.
#[derive(Debug, Clone)]
pub struct JsonGlobalStore {
    path: PathBuf,
}

impl JsonGlobalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_object(&self) -> FerruleResult<Map<String, Value>> {
        if !self.path.is_file() {
            return Ok(Map::new());
        }
        let text = std::fs::read_to_string(&self.path).map_err(|e| self.error(e))?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text).map_err(|e| self.error(e))? {
            Value::Object(map) => Ok(map),
            _ => Err(self.error("expected a JSON object").into()),
        }
    }

    fn error(&self, reason: impl ToString) -> ApplicationError {
        ApplicationError::GlobalStore {
            reason: format!("{}: {}", self.path.display(), reason.to_string()),
        }
    }
}

impl GlobalPluginStore for JsonGlobalStore {
    fn load(&self) -> FerruleResult<Vec<String>> {
        let object = self.read_object()?;
        let plugins = match object.get(PLUGINS_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(_) => return Err(self.error("\"plugins\" must be an array").into()),
        };
        Ok(plugins)
    }

    fn save(&self, plugins: &[String]) -> FerruleResult<()> {
        let mut object = self.read_object()?;
        object.insert(PLUGINS_KEY.into(), Value::from(plugins.to_vec()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }
        let text = serde_json::to_string_pretty(&Value::Object(object)).map_err(|e| self.error(e))?;
        std::fs::write(&self.path, text + "\n").map_err(|e| self.error(e))?;
        debug!(path = %self.path.display(), count = plugins.len(), "global plugins saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_file_is_an_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonGlobalStore::new(dir.path().join(".ferrule.config.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ferrule.config.json");
        std::fs::write(&path, r#"{ "registry": "https://npm.example", "plugins": ["a"] }"#).unwrap();

        let store = JsonGlobalStore::new(&path);
        store.save(&["a".into(), "b".into()]).unwrap();

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            saved,
            json!({ "registry": "https://npm.example", "plugins": ["a", "b"] })
        );
        assert_eq!(store.load().unwrap(), ["a", "b"]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(JsonGlobalStore::new(&path).load().is_err());
    }
}
