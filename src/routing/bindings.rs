//! Per-request parameter bindings.

use std::ops::Index;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Parameter values captured by a successful match.
///
/// Entries are kept in the order the parameters appear in the matched
/// pattern. A `Bindings` built by the router holds exactly the parameter
/// names declared by the matched route, so handlers can index by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: Vec<(String, String)>,
}

impl Bindings {
    /// Create an empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    /// Look up the value captured for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(name, value)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Index<&str> for Bindings {
    type Output = str;

    /// Panics if `name` was not captured.
    fn index(&self, name: &str) -> &str {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no binding named {name:?}"),
        }
    }
}

impl Serialize for Bindings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_order() {
        let mut bindings = Bindings::new();
        bindings.push("user", "42");
        bindings.push("post", "hello");

        assert_eq!(bindings.get("user"), Some("42"));
        assert_eq!(&bindings["post"], "hello");
        assert_eq!(bindings.get("missing"), None);
        assert_eq!(
            bindings.iter().collect::<Vec<_>>(),
            vec![("user", "42"), ("post", "hello")]
        );
    }

    #[test]
    fn test_serializes_as_object() {
        let mut bindings = Bindings::new();
        bindings.push("url", "abc");

        let json = serde_json::to_value(&bindings).unwrap();
        assert_eq!(json, serde_json::json!({ "url": "abc" }));
    }

    #[test]
    #[should_panic(expected = "no binding named")]
    fn test_index_missing_panics() {
        let bindings = Bindings::new();
        let _ = &bindings["id"];
    }
}
