//! JSON dictionaries for boundary-condition configuration
//!
//! A [`Dictionary`] is a JSON object with typed lookups. Per-face fields are
//! stored either as a list with one number per face, or as a single number
//! when the field is uniform.

use crate::error::{FvmError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Key/value configuration entries backed by a JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: Map<String, Value>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a dictionary from JSON text. The document must be an object.
    pub fn from_json_str(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(FvmError::malformed(
                "<root>",
                format!("expected a JSON object, got {}", json_kind(&other)),
            )),
        }
    }

    /// Render as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Load a dictionary from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Save the dictionary as a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace an entry
    pub fn add(&mut self, key: &str, value: impl Into<Value>) {
        self.entries.insert(key.to_string(), value.into());
    }

    /// Remove an entry, returning it if present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Insert a per-face field, written as one number when uniform
    pub fn add_field(&mut self, key: &str, field: &Array1<f64>) {
        let value = match field.first() {
            Some(&first) if field.iter().all(|&v| v == first) => Value::from(first),
            _ => Value::from(field.to_vec()),
        };
        self.add(key, value);
    }

    /// Insert a nested dictionary
    pub fn add_sub_dict(&mut self, key: &str, dict: Dictionary) {
        self.add(key, Value::Object(dict.entries));
    }

    /// Look up a required number
    pub fn lookup_scalar(&self, key: &str) -> Result<f64> {
        let value = self.require(key)?;
        value.as_f64().ok_or_else(|| {
            FvmError::malformed(key, format!("expected a number, got {}", json_kind(value)))
        })
    }

    /// Look up an optional number
    pub fn lookup_scalar_or(&self, key: &str, default: f64) -> Result<f64> {
        if self.contains(key) {
            self.lookup_scalar(key)
        } else {
            Ok(default)
        }
    }

    /// Look up a required word: a non-empty string without whitespace
    pub fn lookup_word(&self, key: &str) -> Result<String> {
        let value = self.require(key)?;
        let word = value.as_str().ok_or_else(|| {
            FvmError::malformed(key, format!("expected a word, got {}", json_kind(value)))
        })?;
        if word.is_empty() || word.chars().any(char::is_whitespace) {
            return Err(FvmError::malformed(key, format!("'{word}' is not a valid word")));
        }
        Ok(word.to_string())
    }

    /// Look up an optional word, falling back to `default` when absent
    pub fn lookup_word_or(&self, key: &str, default: &str) -> Result<String> {
        if self.contains(key) {
            self.lookup_word(key)
        } else {
            Ok(default.to_string())
        }
    }

    /// Look up a per-face field of `size` entries.
    ///
    /// A single number is expanded to a uniform field.
    pub fn lookup_field(&self, key: &str, size: usize) -> Result<Array1<f64>> {
        match self.require(key)? {
            Value::Number(n) => {
                let v = n
                    .as_f64()
                    .ok_or_else(|| FvmError::malformed(key, "number out of range"))?;
                Ok(Array1::from_elem(size, v))
            }
            Value::Array(items) => {
                if items.len() != size {
                    return Err(FvmError::size_mismatch(key, size, items.len()));
                }
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        item.as_f64().ok_or_else(|| {
                            FvmError::malformed(
                                key,
                                format!("entry {i} is {}, expected a number", json_kind(item)),
                            )
                        })
                    })
                    .collect::<Result<Vec<f64>>>()
                    .map(Array1::from)
            }
            other => Err(FvmError::malformed(
                key,
                format!("expected a number or a list, got {}", json_kind(other)),
            )),
        }
    }

    /// Look up a nested dictionary
    pub fn sub_dict(&self, key: &str) -> Result<Dictionary> {
        match self.require(key)? {
            Value::Object(entries) => Ok(Dictionary {
                entries: entries.clone(),
            }),
            other => Err(FvmError::malformed(
                key,
                format!("expected a dictionary, got {}", json_kind(other)),
            )),
        }
    }

    fn require(&self, key: &str) -> Result<&Value> {
        self.entries.get(key).ok_or_else(|| FvmError::MissingEntry {
            key: key.to_string(),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a dictionary",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_lookup_scalar() {
        let dict = Dictionary::from_json_str(r#"{"conductivity": 2.5, "name": "V"}"#).unwrap();
        assert_eq!(dict.lookup_scalar("conductivity").unwrap(), 2.5);
        assert!(matches!(
            dict.lookup_scalar("missing"),
            Err(FvmError::MissingEntry { .. })
        ));
        assert!(matches!(
            dict.lookup_scalar("name"),
            Err(FvmError::MalformedEntry { .. })
        ));
        assert_eq!(dict.lookup_scalar_or("missing", 1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_lookup_word() {
        let dict =
            Dictionary::from_json_str(r#"{"a": "V_solid", "b": "two words", "c": ""}"#).unwrap();
        assert_eq!(dict.lookup_word("a").unwrap(), "V_solid");
        assert!(dict.lookup_word("b").is_err());
        assert!(dict.lookup_word("c").is_err());
        assert_eq!(dict.lookup_word_or("d", "V").unwrap(), "V");
    }

    #[test]
    fn test_lookup_field() {
        let dict =
            Dictionary::from_json_str(r#"{"u": 0.5, "l": [1, 2, 3], "bad": [1, "x", 3]}"#)
                .unwrap();
        assert_eq!(dict.lookup_field("u", 3).unwrap(), array![0.5, 0.5, 0.5]);
        assert_eq!(dict.lookup_field("l", 3).unwrap(), array![1.0, 2.0, 3.0]);
        assert!(matches!(
            dict.lookup_field("l", 4),
            Err(FvmError::SizeMismatch { expected: 4, got: 3, .. })
        ));
        assert!(matches!(
            dict.lookup_field("bad", 3),
            Err(FvmError::MalformedEntry { .. })
        ));
    }

    #[test]
    fn test_add_field_compacts_uniform() {
        let mut dict = Dictionary::new();
        dict.add_field("u", &array![1.0, 1.0]);
        dict.add_field("l", &array![1.0, 2.0]);
        assert_eq!(dict.get("u"), Some(&Value::from(1.0)));
        assert_eq!(dict.get("l"), Some(&Value::from(vec![1.0, 2.0])));
    }

    #[test]
    fn test_root_must_be_object() {
        let err = Dictionary::from_json_str("[1, 2]").unwrap_err();
        assert!(err.is_dictionary_error());
        let err = Dictionary::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, FvmError::Json(_)));
    }

    #[test]
    fn test_sub_dict() {
        let mut inner = Dictionary::new();
        inner.add("type", "potentialCoupledBaffleMixed");
        let mut outer = Dictionary::new();
        outer.add_sub_dict("top", inner.clone());
        assert_eq!(outer.sub_dict("top").unwrap(), inner);
        assert!(outer.sub_dict("bottom").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boundary.json");

        let mut dict = Dictionary::new();
        dict.add("conductivity", 1.5);
        dict.add_field("refValue", &array![1.0, 2.0]);
        dict.to_file(&path).unwrap();

        let back = Dictionary::from_file(&path).unwrap();
        assert_eq!(back, dict);
        assert_eq!(back.len(), 2);
    }
}
