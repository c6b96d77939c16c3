//! Key-value container for metrics.
use crate::error::TandemError;
use chrono::prelude::{DateTime, Local};
use std::{
    collections::{
        hash_map::{IntoIter, Iter, Keys},
        HashMap,
    },
    convert::Into,
    iter::IntoIterator,
};

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// Scalar, e.g., bookkeeping counters and loss values.
    Scalar(f32),

    /// A point in time.
    DateTime(DateTime<Local>),

    /// A 1-dimensional array, e.g., a flattened observation.
    Array1(Vec<f32>),

    /// Text, e.g., a label or a directory name.
    String(String),
}

/// A container of named values produced during a run.
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Constructs an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Constructs a record containing a single scalar.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Constructs a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns an iterator that consumes the record.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets the value of the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges records, the second record overwriting values of shared keys.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        for (k, v) in record.0.into_iter() {
            self.0.insert(k, v);
        }
    }

    /// Gets a scalar value of the given key.
    pub fn get_scalar(&self, k: &str) -> Result<f32, TandemError> {
        if let Some(v) = self.0.get(k) {
            match v {
                RecordValue::Scalar(v) => Ok(*v),
                _ => Err(TandemError::RecordValueTypeError("Scalar".to_string())),
            }
        } else {
            Err(TandemError::RecordKeyError(k.to_string()))
        }
    }

    /// Gets a 1-dimensional array of the given key.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, TandemError> {
        if let Some(v) = self.0.get(k) {
            match v {
                RecordValue::Array1(v) => Ok(v.clone()),
                _ => Err(TandemError::RecordValueTypeError("Array1".to_string())),
            }
        } else {
            Err(TandemError::RecordKeyError(k.to_string()))
        }
    }

    /// Gets a string of the given key.
    pub fn get_string(&self, k: &str) -> Result<String, TandemError> {
        if let Some(v) = self.0.get(k) {
            match v {
                RecordValue::String(s) => Ok(s.clone()),
                _ => Err(TandemError::RecordValueTypeError("String".to_string())),
            }
        } else {
            Err(TandemError::RecordKeyError(k.to_string()))
        }
    }

    /// Returns `true` if the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordValue};

    #[test]
    fn test_merge_overwrites_shared_keys() {
        let mut r1 = Record::from_scalar("a", 1.0);
        r1.insert("b", RecordValue::Scalar(2.0));
        let r2 = Record::from_scalar("b", 3.0);

        let merged = r1.merge(r2);
        assert_eq!(merged.get_scalar("a").unwrap(), 1.0);
        assert_eq!(merged.get_scalar("b").unwrap(), 3.0);
    }

    #[test]
    fn test_typed_getters() {
        let mut record = Record::empty();
        record.insert("x", RecordValue::Scalar(0.5));
        record.insert("v", RecordValue::Array1(vec![1.0, 2.0]));

        assert_eq!(record.get_scalar("x").unwrap(), 0.5);
        assert_eq!(record.get_array1("v").unwrap(), vec![1.0, 2.0]);
        assert!(record.get_scalar("v").is_err());
        assert!(record.get_scalar("missing").is_err());
    }
}
