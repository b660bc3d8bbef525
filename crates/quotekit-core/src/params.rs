use std::collections::BTreeMap;

/// Query parameters for one provider call.
///
/// Always carries the `function` entry. Built fresh for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    entries: BTreeMap<String, String>,
}

impl RequestParams {
    pub const FUNCTION: &'static str = "function";

    pub fn new(function: impl Into<String>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(String::from(Self::FUNCTION), function.into());
        Self { entries }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn function(&self) -> &str {
        self.get(Self::FUNCTION).unwrap_or("unknown")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
