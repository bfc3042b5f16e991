//! The case-insensitive key → value mapping carried across one redirect.

use std::any::Any;
use std::collections::BTreeMap;

use crate::value::{ErasedValue, TempDataValue};

#[derive(Debug)]
struct Entry {
    key: String,
    value: Box<dyn ErasedValue>,
}

/// Flash values keyed by case-insensitive name.
///
/// The spelling of the most recent insert is the one written to the wire.
#[derive(Debug, Default)]
pub struct TempData {
    entries: BTreeMap<String, Entry>,
}

fn fold(key: &str) -> String {
    key.to_lowercase()
}

impl TempData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value stored under the key.
    pub fn insert<V: TempDataValue>(
        &mut self,
        key: impl Into<String>,
        value: V,
    ) -> Option<Box<dyn ErasedValue>> {
        self.insert_boxed(key, Box::new(value))
    }

    pub fn insert_boxed(
        &mut self,
        key: impl Into<String>,
        value: Box<dyn ErasedValue>,
    ) -> Option<Box<dyn ErasedValue>> {
        let key = key.into();
        self.entries
            .insert(fold(&key), Entry { key, value })
            .map(|previous| previous.value)
    }

    /// Borrow the value under `key` as a `T`.
    ///
    /// Loaded integers are `i64`, floats `f64` and sequences `Vec<T>` of the
    /// classified element type.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.get_value(key)?.downcast_ref::<T>()
    }

    pub fn get_value(&self, key: &str) -> Option<&dyn ErasedValue> {
        self.entries.get(&fold(key)).map(|entry| entry.value.as_ref())
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn ErasedValue>> {
        self.entries.remove(&fold(key)).map(|entry| entry.value)
    }

    /// Remove the value under `key` if it is a `T`; other values are kept.
    pub fn take<T: Any>(&mut self, key: &str) -> Option<T> {
        let folded = fold(key);
        if !self.entries.get(&folded)?.value.is::<T>() {
            return None;
        }
        let entry = self.entries.remove(&folded)?;
        entry.value.downcast::<T>().ok()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&fold(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|entry| entry.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn ErasedValue)> {
        self.entries
            .values()
            .map(|entry| (entry.key.as_str(), entry.value.as_ref()))
    }
}
