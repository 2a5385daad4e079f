//! Key-value records.
use crate::error::CoreError;
use std::collections::{
    hash_map::{IntoIter, Iter},
    HashMap,
};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, e.g., a reward.
    Scalar(f32),

    /// A 1-dimensional array, e.g., an observation or an action.
    Array1(Vec<f32>),

    /// A text value, e.g., the identifier of an environment.
    String(String),
}

/// A container for storing key-value pairs of various data types.
///
/// ```rust
/// use filtenv_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("reward", 0.5);
/// record.insert("act", RecordValue::Array1(vec![0.1, -0.2]));
///
/// assert_eq!(record.get_scalar("reward").unwrap(), 0.5);
/// assert!(record.get_scalar("act").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns an iterator that consumes the record.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records, consuming both.
    ///
    /// If both records contain the same key, the value from `record` wins.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    ///
    /// If both records contain the same key, the value from `record` wins.
    pub fn merge_inplace(&mut self, record: Record) {
        for (k, v) in record.into_iter_in_record() {
            self.0.insert(k, v);
        }
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, CoreError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(CoreError::RecordValueTypeError("Scalar".to_string())),
            None => Err(CoreError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, CoreError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(CoreError::RecordValueTypeError("Array1".to_string())),
            None => Err(CoreError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, CoreError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(CoreError::RecordValueTypeError("String".to_string())),
            None => Err(CoreError::RecordKeyError(k.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn merge_prefers_second_record() {
        let r1 = Record::from_slice(&[
            ("a", RecordValue::Scalar(1.0)),
            ("b", RecordValue::String("x".to_string())),
        ]);
        let r2 = Record::from_scalar("a", 2.0);

        let r = r1.merge(r2);
        assert_eq!(r.get_scalar("a").unwrap(), 2.0);
        assert_eq!(r.get_string("b").unwrap(), "x");
    }

    #[test]
    fn merge_inplace_keeps_existing_keys() {
        let mut r1 = Record::from_scalar("a", 1.0);
        r1.merge_inplace(Record::from_slice(&[(
            "obs",
            RecordValue::Array1(vec![0.5, 0.25]),
        )]));

        assert_eq!(r1.get_scalar("a").unwrap(), 1.0);
        assert_eq!(r1.get_array1("obs").unwrap(), vec![0.5, 0.25]);
    }

    #[test]
    fn typed_getters_report_errors() {
        let r = Record::from_scalar("a", 1.0);
        assert_eq!(
            r.get_array1("a"),
            Err(CoreError::RecordValueTypeError("Array1".to_string()))
        );
        assert_eq!(
            r.get_scalar("missing"),
            Err(CoreError::RecordKeyError("missing".to_string()))
        );
    }
}
