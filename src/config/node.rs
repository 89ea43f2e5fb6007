//! Dot-path access to a YAML configuration subtree.
//!
//! [`Config`] is a thin handle over a `serde_yaml::Value`. Lookups never fail:
//! a missing key yields an empty subtree, an empty string, or an empty list,
//! and the caller decides which of those is an error.

use serde_yaml::Value;

/// A configuration subtree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    value: Value,
}

impl Config {
    /// Wrap a YAML value.
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Parse YAML text into a config.
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let value: Value = serde_yaml::from_str(content)?;
        Ok(Self::new(value))
    }

    /// The underlying YAML value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(&self.value);
        }

        let mut current = &self.value;
        for segment in path.split('.') {
            current = current.as_mapping()?.get(segment)?;
        }

        Some(current)
    }

    /// Whether `path` is present and not null.
    pub fn has(&self, path: &str) -> bool {
        self.lookup(path).is_some_and(|v| !v.is_null())
    }

    /// The subtree at `path`, or an empty config when absent.
    pub fn get_config(&self, path: &str) -> Config {
        self.lookup(path)
            .map(|v| Config::new(v.clone()))
            .unwrap_or_default()
    }

    /// The direct child `key`, which may itself contain dots.
    ///
    /// Use this for keys obtained from [`Config::keys`].
    pub fn child(&self, key: &str) -> Config {
        self.value
            .as_mapping()
            .and_then(|map| map.get(key))
            .map(|v| Config::new(v.clone()))
            .unwrap_or_default()
    }

    /// The scalar at `path` as a string, or `""` when absent or not a scalar.
    pub fn get_string(&self, path: &str) -> String {
        self.lookup(path).and_then(scalar_to_string).unwrap_or_default()
    }

    /// Like [`Config::get_string`] but falls back to `default` when empty.
    pub fn get_string_or(&self, path: &str, default: &str) -> String {
        let value = self.get_string(path);
        if value.is_empty() {
            default.to_string()
        } else {
            value
        }
    }

    /// The sequence at `path` as strings.
    ///
    /// A single scalar is treated as a one-element list. Non-scalar items are
    /// skipped.
    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        match self.lookup(path) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(other) => scalar_to_string(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Mapping keys in declaration order. Empty for non-mappings.
    pub fn keys(&self) -> Vec<String> {
        match &self.value {
            Value::Mapping(map) => map.keys().filter_map(scalar_to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// True for null, an empty mapping, or an empty sequence.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::Mapping(map) => map.is_empty(),
            Value::Sequence(seq) => seq.is_empty(),
            _ => false,
        }
    }
}

impl From<Value> for Config {
    fn from(value: Value) -> Self {
        Config::new(value)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}
