//! Declarative bundler configuration builder.
//!
//! Plugins never edit the final bundler configuration directly. They edit a
//! [`ConfigChain`], a builder with *named* slots (rules, loaders inside a
//! rule, plugins, entries) so that a later contributor can address and
//! replace exactly what an earlier one added. The chain is turned into a
//! plain JSON configuration by [`ConfigChain::to_config`].
//!
//! Slot order is first-insertion order; writing to an existing slot updates
//! it in place.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};

use crate::domain::{entities::config::merge_values, error::DomainError};

// ============================================================================
// Named slots
// ============================================================================

/// Ordered map keyed by slot name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSlots<T> {
    slots: Vec<(String, T)>,
}

impl<T> Default for NamedSlots<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> NamedSlots<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        self.slots.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Fetch a slot, creating it with `init` when absent.
    pub fn entry_or_insert_with(&mut self, name: &str, init: impl FnOnce() -> T) -> &mut T {
        let idx = match self.slots.iter().position(|(n, _)| n == name) {
            Some(idx) => idx,
            None => {
                self.slots.push((name.to_string(), init()));
                self.slots.len() - 1
            }
        };
        &mut self.slots[idx].1
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        let idx = self.slots.iter().position(|(n, _)| n == name)?;
        Some(self.slots.remove(idx).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.slots.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ============================================================================
// Rules and loaders
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforce {
    Pre,
    Post,
}

impl Enforce {
    fn as_str(self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::Post => "post",
        }
    }
}

/// One named loader inside a rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoaderUse {
    loader: String,
    options: Option<Value>,
}

impl LoaderUse {
    pub fn loader(&mut self, loader: impl Into<String>) -> &mut Self {
        self.loader = loader.into();
        self
    }

    /// Replace the loader options.
    pub fn options(&mut self, options: Value) -> &mut Self {
        self.options = Some(options);
        self
    }

    /// Deep-merge into the existing options.
    pub fn merge_options(&mut self, options: Value) -> &mut Self {
        match self.options.as_mut() {
            Some(existing) => merge_values(existing, options),
            None => self.options = Some(options),
        }
        self
    }

    pub fn loader_name(&self) -> &str {
        &self.loader
    }

    pub fn get_options(&self) -> Option<&Value> {
        self.options.as_ref()
    }

    fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("loader".into(), Value::String(self.loader.clone()));
        if let Some(options) = &self.options {
            obj.insert("options".into(), options.clone());
        }
        Value::Object(obj)
    }
}

/// A named module rule.
///
/// `test` holds a regular expression source; the bundler collaborator
/// compiles it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    test: Option<String>,
    include: Vec<String>,
    exclude: Vec<String>,
    enforce: Option<Enforce>,
    uses: NamedSlots<LoaderUse>,
    extra: Map<String, Value>,
}

impl Rule {
    pub fn test(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.test = Some(pattern.into());
        self
    }

    pub fn include(&mut self, path: impl Into<String>) -> &mut Self {
        self.include.push(path.into());
        self
    }

    pub fn exclude(&mut self, path: impl Into<String>) -> &mut Self {
        self.exclude.push(path.into());
        self
    }

    pub fn pre(&mut self) -> &mut Self {
        self.enforce = Some(Enforce::Pre);
        self
    }

    pub fn post(&mut self) -> &mut Self {
        self.enforce = Some(Enforce::Post);
        self
    }

    /// Named loader slot of this rule.
    pub fn use_loader(&mut self, name: &str) -> &mut LoaderUse {
        self.uses.entry_or_insert_with(name, LoaderUse::default)
    }

    pub fn remove_loader(&mut self, name: &str) -> Option<LoaderUse> {
        self.uses.remove(name)
    }

    /// Any other rule property (`type`, `oneOf`, `parser`...).
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn get_test(&self) -> Option<&str> {
        self.test.as_deref()
    }

    pub fn get_enforce(&self) -> Option<Enforce> {
        self.enforce
    }

    pub fn loaders(&self) -> &NamedSlots<LoaderUse> {
        &self.uses
    }

    fn to_value(&self, named: bool) -> Value {
        let mut obj = Map::new();
        if let Some(test) = &self.test {
            obj.insert("test".into(), Value::String(test.clone()));
        }
        if !self.include.is_empty() {
            obj.insert("include".into(), json!(self.include));
        }
        if !self.exclude.is_empty() {
            obj.insert("exclude".into(), json!(self.exclude));
        }
        if let Some(enforce) = self.enforce {
            obj.insert("enforce".into(), Value::String(enforce.as_str().into()));
        }
        if !self.uses.is_empty() {
            let uses = if named {
                Value::Object(
                    self.uses
                        .iter()
                        .map(|(n, u)| (n.to_string(), u.to_value()))
                        .collect(),
                )
            } else {
                Value::Array(self.uses.iter().map(|(_, u)| u.to_value()).collect())
            };
            obj.insert("use".into(), uses);
        }
        for (key, value) in &self.extra {
            obj.insert(key.clone(), value.clone());
        }
        Value::Object(obj)
    }

    fn apply_patch(&mut self, name: &str, patch: &Value) -> Result<(), DomainError> {
        let Some(fields) = patch.as_object() else {
            return Err(patch_error(&format!("module.rule.{name}"), "an object"));
        };
        for (key, value) in fields {
            match key.as_str() {
                "test" => {
                    self.test = Some(expect_str(value, &format!("rule {name}.test"))?.into());
                }
                "include" => self.include.extend(string_list(value, "include")?),
                "exclude" => self.exclude.extend(string_list(value, "exclude")?),
                "enforce" => {
                    self.enforce = match value.as_str() {
                        Some("pre") => Some(Enforce::Pre),
                        Some("post") => Some(Enforce::Post),
                        _ => return Err(patch_error("enforce", "\"pre\" or \"post\"")),
                    }
                }
                "use" => {
                    let Some(uses) = value.as_object() else {
                        return Err(patch_error(&format!("rule {name}.use"), "an object"));
                    };
                    for (use_name, spec) in uses {
                        let slot = self.use_loader(use_name);
                        if let Some(loader) = spec.get("loader").and_then(Value::as_str) {
                            slot.loader(loader);
                        }
                        if let Some(options) = spec.get("options") {
                            slot.merge_options(options.clone());
                        }
                    }
                }
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Plugins, entries, output
// ============================================================================

/// A named bundler plugin: the plugin expression plus constructor arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginSlot {
    plugin: String,
    args: Vec<Value>,
}

impl PluginSlot {
    pub fn use_plugin(&mut self, plugin: impl Into<String>, args: Vec<Value>) -> &mut Self {
        self.plugin = plugin.into();
        self.args = args;
        self
    }

    /// Rewrite the constructor arguments.
    pub fn tap(&mut self, f: impl FnOnce(Vec<Value>) -> Vec<Value>) -> &mut Self {
        self.args = f(std::mem::take(&mut self.args));
        self
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    fn to_value(&self, name: &str) -> Value {
        json!({ "name": name, "plugin": self.plugin, "args": self.args })
    }
}

/// Files of one named entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrySlot {
    files: Vec<String>,
}

impl EntrySlot {
    pub fn add(&mut self, file: impl Into<String>) -> &mut Self {
        self.files.push(file.into());
        self
    }

    pub fn merge<I, S>(&mut self, files: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(files.into_iter().map(Into::into));
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.files.clear();
        self
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output {
    fields: Map<String, Value>,
}

impl Output {
    pub fn path(&mut self, path: &Path) -> &mut Self {
        self.set("path", Value::String(path.display().to_string()))
    }

    pub fn filename(&mut self, template: impl Into<String>) -> &mut Self {
        self.set("filename", Value::String(template.into()))
    }

    pub fn chunk_filename(&mut self, template: impl Into<String>) -> &mut Self {
        self.set("chunkFilename", Value::String(template.into()))
    }

    pub fn public_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.set("publicPath", Value::String(path.into()))
    }

    pub fn library_target(&mut self, target: impl Into<String>) -> &mut Self {
        self.set("libraryTarget", Value::String(target.into()))
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

// ============================================================================
// ConfigChain
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigChain {
    mode: Option<String>,
    context: Option<PathBuf>,
    target: Option<String>,
    devtool: Option<Value>,
    entries: NamedSlots<EntrySlot>,
    output: Output,
    rules: NamedSlots<Rule>,
    plugins: NamedSlots<PluginSlot>,
    externals: Vec<Value>,
    extra: Map<String, Value>,
}

impl ConfigChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&mut self, mode: impl Into<String>) -> &mut Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn context(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.context = Some(dir.into());
        self
    }

    pub fn target(&mut self, target: impl Into<String>) -> &mut Self {
        self.target = Some(target.into());
        self
    }

    /// Source map style; `false` disables source maps.
    pub fn devtool(&mut self, devtool: impl Into<Value>) -> &mut Self {
        self.devtool = Some(devtool.into());
        self
    }

    pub fn entry(&mut self, name: &str) -> &mut EntrySlot {
        self.entries.entry_or_insert_with(name, EntrySlot::default)
    }

    pub fn clear_entries(&mut self) -> &mut Self {
        self.entries = NamedSlots::default();
        self
    }

    pub fn output(&mut self) -> &mut Output {
        &mut self.output
    }

    pub fn rule(&mut self, name: &str) -> &mut Rule {
        self.rules.entry_or_insert_with(name, Rule::default)
    }

    pub fn delete_rule(&mut self, name: &str) -> Option<Rule> {
        self.rules.remove(name)
    }

    pub fn plugin(&mut self, name: &str) -> &mut PluginSlot {
        self.plugins.entry_or_insert_with(name, PluginSlot::default)
    }

    pub fn delete_plugin(&mut self, name: &str) -> Option<PluginSlot> {
        self.plugins.remove(name)
    }

    pub fn externals<I: IntoIterator<Item = Value>>(&mut self, externals: I) -> &mut Self {
        self.externals.extend(externals);
        self
    }

    /// Set an arbitrary top-level key (deep-merged on materialization).
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        let key = key.into();
        match self.extra.get_mut(&key) {
            Some(existing) => merge_values(existing, value),
            None => {
                self.extra.insert(key, value);
            }
        }
        self
    }

    // ---- inspection -------------------------------------------------------

    pub fn get_mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    pub fn get_target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn get_devtool(&self) -> Option<&Value> {
        self.devtool.as_ref()
    }

    pub fn get_output(&self) -> &Output {
        &self.output
    }

    pub fn rules(&self) -> &NamedSlots<Rule> {
        &self.rules
    }

    pub fn plugins(&self) -> &NamedSlots<PluginSlot> {
        &self.plugins
    }

    pub fn entries(&self) -> &NamedSlots<EntrySlot> {
        &self.entries
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains(name)
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.contains(name)
    }

    // ---- merge ------------------------------------------------------------

    /// Apply a declarative patch.
    ///
    /// Known keys address named slots:
    ///
    /// ```json
    /// {
    ///   "mode": "production",
    ///   "entry": { "home": ["./src/home"] },
    ///   "output": { "publicPath": "/cdn/" },
    ///   "module": { "rule": { "js": { "test": "\\.m?js$", "use": { "babel": { "options": {} } } } } },
    ///   "plugin": { "define": { "plugin": "DefinePlugin", "args": [{}] } }
    /// }
    /// ```
    ///
    /// Every other key is deep-merged into the materialized configuration.
    pub fn merge(&mut self, patch: &Value) -> Result<(), DomainError> {
        let Some(fields) = patch.as_object() else {
            return Err(patch_error("chainWebpack", "an object"));
        };

        for (key, value) in fields {
            match key.as_str() {
                "mode" => {
                    self.mode(expect_str(value, "mode")?);
                }
                "target" => {
                    self.target(expect_str(value, "target")?);
                }
                "context" => {
                    self.context(expect_str(value, "context")?);
                }
                "devtool" => {
                    self.devtool(value.clone());
                }
                "entry" => {
                    let Some(entries) = value.as_object() else {
                        return Err(patch_error("entry", "an object"));
                    };
                    for (name, files) in entries {
                        self.entry(name).merge(string_list(files, "entry")?);
                    }
                }
                "output" => {
                    let Some(output) = value.as_object() else {
                        return Err(patch_error("output", "an object"));
                    };
                    for (k, v) in output {
                        self.output.set(k.clone(), v.clone());
                    }
                }
                "module" => {
                    let rules = value.get("rule").and_then(Value::as_object);
                    for (name, rule) in rules.into_iter().flatten() {
                        self.rule(name).apply_patch(name, rule)?;
                    }
                    if let Some(rest) = value.as_object() {
                        let rest: Map<String, Value> = rest
                            .iter()
                            .filter(|(k, _)| *k != "rule")
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect();
                        if !rest.is_empty() {
                            self.set("module", Value::Object(rest));
                        }
                    }
                }
                "plugin" => {
                    let Some(plugins) = value.as_object() else {
                        return Err(patch_error("plugin", "an object"));
                    };
                    for (name, spec) in plugins {
                        let slot = self.plugin(name);
                        if let Some(plugin) = spec.get("plugin").and_then(Value::as_str) {
                            slot.plugin = plugin.to_string();
                        }
                        if let Some(args) = spec.get("args") {
                            slot.args = match args {
                                Value::Array(list) => list.clone(),
                                single => vec![single.clone()],
                            };
                        }
                    }
                }
                "externals" => match value {
                    Value::Array(list) => self.externals.extend(list.iter().cloned()),
                    single => self.externals.push(single.clone()),
                },
                _ => {
                    self.set(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    // ---- materialization --------------------------------------------------

    /// Plain bundler configuration. Slot names are dropped.
    pub fn to_config(&self) -> Value {
        self.render(false)
    }

    /// Human-readable form that keeps rule, loader and plugin names.
    pub fn to_inspect_string(&self) -> String {
        let value = self.render(true);
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }

    fn render(&self, named: bool) -> Value {
        let mut cfg = Map::new();

        if let Some(mode) = &self.mode {
            cfg.insert("mode".into(), Value::String(mode.clone()));
        }
        if let Some(context) = &self.context {
            cfg.insert("context".into(), Value::String(context.display().to_string()));
        }
        if let Some(target) = &self.target {
            cfg.insert("target".into(), Value::String(target.clone()));
        }
        if let Some(devtool) = &self.devtool {
            cfg.insert("devtool".into(), devtool.clone());
        }
        if !self.entries.is_empty() {
            cfg.insert(
                "entry".into(),
                Value::Object(
                    self.entries
                        .iter()
                        .map(|(n, e)| (n.to_string(), json!(e.files)))
                        .collect(),
                ),
            );
        }
        if !self.output.fields.is_empty() {
            cfg.insert("output".into(), Value::Object(self.output.fields.clone()));
        }
        if !self.rules.is_empty() {
            let rules = if named {
                Value::Object(
                    self.rules
                        .iter()
                        .map(|(n, r)| (n.to_string(), r.to_value(true)))
                        .collect(),
                )
            } else {
                Value::Array(self.rules.iter().map(|(_, r)| r.to_value(false)).collect())
            };
            cfg.insert("module".into(), json!({ "rules": rules }));
        }
        if !self.plugins.is_empty() {
            cfg.insert(
                "plugins".into(),
                Value::Array(self.plugins.iter().map(|(n, p)| p.to_value(n)).collect()),
            );
        }
        if !self.externals.is_empty() {
            cfg.insert("externals".into(), Value::Array(self.externals.clone()));
        }

        let mut cfg = Value::Object(cfg);
        merge_values(&mut cfg, Value::Object(self.extra.clone()));
        cfg
    }
}

fn patch_error(field: &str, expected: &str) -> DomainError {
    DomainError::InvalidConfig(format!("chainWebpack.{field} must be {expected}"))
}

fn expect_str<'v>(value: &'v Value, field: &str) -> Result<&'v str, DomainError> {
    value.as_str().ok_or_else(|| patch_error(field, "a string"))
}

fn string_list(value: &Value, field: &str) -> Result<Vec<String>, DomainError> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|v| expect_str(v, field).map(str::to_string))
            .collect(),
        _ => Err(patch_error(field, "a string or a list of strings")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_writer_to_a_named_rule_wins() {
        let mut chain = ConfigChain::new();
        chain.rule("js").test(r"\.js$").use_loader("babel").loader("babel-loader");
        chain.rule("js").test(r"\.m?js$");

        assert_eq!(chain.rules().len(), 1);
        assert_eq!(chain.rules().get("js").unwrap().get_test(), Some(r"\.m?js$"));
        assert_eq!(
            chain.rules().get("js").unwrap().loaders().get("babel").unwrap().loader_name(),
            "babel-loader"
        );
    }

    #[test]
    fn materialized_rules_keep_insertion_order_and_drop_names() {
        let mut chain = ConfigChain::new();
        chain.rule("js").test(r"\.js$");
        chain.rule("css").test(r"\.css$");
        chain.rule("js").exclude("node_modules");

        let cfg = chain.to_config();
        let rules = cfg["module"]["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["test"], r"\.js$");
        assert_eq!(rules[0]["exclude"], json!(["node_modules"]));
        assert_eq!(rules[1]["test"], r"\.css$");
    }

    #[test]
    fn inspect_string_keeps_names() {
        let mut chain = ConfigChain::new();
        chain.rule("eslint").pre().use_loader("eslint").loader("eslint-loader");
        chain.plugin("hmr").use_plugin("HotModuleReplacementPlugin", vec![]);

        let text = chain.to_inspect_string();
        assert!(text.contains("\"eslint\""));
        assert!(text.contains("\"enforce\": \"pre\""));
        assert!(text.contains("\"hmr\""));
    }

    #[test]
    fn plugin_tap_rewrites_args() {
        let mut chain = ConfigChain::new();
        chain.plugin("define").use_plugin("DefinePlugin", vec![json!({ "A": 1 })]);
        chain.plugin("define").tap(|mut args| {
            args[0]["B"] = json!(2);
            args
        });
        assert_eq!(chain.plugins().get("define").unwrap().args(), [json!({ "A": 1, "B": 2 })]);
    }

    #[test]
    fn merge_addresses_named_slots() {
        let mut chain = ConfigChain::new();
        chain.rule("js").test(r"\.js$").use_loader("babel").loader("babel-loader");

        chain
            .merge(&json!({
                "mode": "production",
                "module": { "rule": { "js": { "test": "X", "use": { "babel": { "options": { "cacheDirectory": true } } } } } },
                "plugin": { "banner": { "plugin": "BannerPlugin", "args": ["hi"] } },
                "optimization": { "minimize": false }
            }))
            .unwrap();

        let cfg = chain.to_config();
        assert_eq!(cfg["mode"], "production");
        assert_eq!(cfg["module"]["rules"][0]["test"], "X");
        assert_eq!(cfg["module"]["rules"][0]["use"][0]["loader"], "babel-loader");
        assert_eq!(cfg["module"]["rules"][0]["use"][0]["options"]["cacheDirectory"], true);
        assert_eq!(cfg["plugins"][0]["plugin"], "BannerPlugin");
        assert_eq!(cfg["optimization"]["minimize"], false);
    }

    #[test]
    fn merge_rejects_non_object_patch() {
        let mut chain = ConfigChain::new();
        assert!(chain.merge(&json!("nope")).is_err());
        assert!(chain.merge(&json!({ "mode": 3 })).is_err());
    }

    #[test]
    fn extra_area_is_deep_merged() {
        let mut chain = ConfigChain::new();
        chain.set("optimization", json!({ "splitChunks": { "chunks": "all" } }));
        chain.set("optimization", json!({ "minimize": true }));
        let cfg = chain.to_config();
        assert_eq!(
            cfg["optimization"],
            json!({ "splitChunks": { "chunks": "all" }, "minimize": true })
        );
    }

    #[test]
    fn empty_chain_materializes_to_empty_object() {
        assert_eq!(ConfigChain::new().to_config(), json!({}));
    }
}
