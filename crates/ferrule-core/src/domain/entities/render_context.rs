use std::collections::HashMap;

/// Variables for `{{VARIABLE}}` substitution in scaffolding templates.
///
/// [`RenderContext::with_name`] registers a name together with its derived
/// spellings: `NAME`, `NAME_KEBAB`, `NAME_PASCAL` and `NAME_CAMEL` (for a
/// `key` of `NAME`).
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, key: &str, name: &str) -> Self {
        let pascal = to_pascal_case(name);
        self.variables.insert(key.to_string(), name.to_string());
        self.variables.insert(format!("{key}_KEBAB"), to_kebab_case(name));
        self.variables.insert(format!("{key}_CAMEL"), lower_first(&pascal));
        self.variables.insert(format!("{key}_PASCAL"), pascal);
        self
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace every known `{{KEY}}`. Unknown placeholders are left as-is.
    pub fn render(&self, template: &str) -> String {
        let mut out = template.to_string();
        for (key, value) in &self.variables {
            out = out.replace(&format!("{{{{{key}}}}}"), value);
        }
        out
    }
}

fn words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    // scoped package names render by their last segment
    let input = input.rsplit('/').next().unwrap_or(input);

    for ch in input.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

pub fn to_kebab_case(input: &str) -> String {
    words(input).join("-")
}

pub fn to_pascal_case(input: &str) -> String {
    words(input)
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

fn lower_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
