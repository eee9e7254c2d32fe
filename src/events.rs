use std::{collections::HashMap, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies the schema of a log event (e.g. "this is a wakelock event").
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct TagId(pub i32);

/// Identifies one named field within the payload of a log event.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct KeyId(pub i32);

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key#{}", self.0)
    }
}

/// The typed attributes decoded from one log event.
///
/// Each value type lives in its own mapping, so the same key can carry e.g. an integer and a
/// string at once. A key missing from a mapping simply means no value of that type was recorded.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct Attributes {
    integers: HashMap<KeyId, i64>,
    strings: HashMap<KeyId, String>,
    floats: HashMap<KeyId, f64>,
    booleans: HashMap<KeyId, bool>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps mappings that were already decoded by the caller.
    pub fn from_maps(
        integers: HashMap<KeyId, i64>,
        strings: HashMap<KeyId, String>,
        floats: HashMap<KeyId, f64>,
        booleans: HashMap<KeyId, bool>,
    ) -> Self {
        Self {
            integers,
            strings,
            floats,
            booleans,
        }
    }

    pub fn with_integer(mut self, key: KeyId, value: i64) -> Self {
        self.insert_integer(key, value);
        self
    }

    pub fn with_string(mut self, key: KeyId, value: &str) -> Self {
        self.insert_string(key, value);
        self
    }

    pub fn with_float(mut self, key: KeyId, value: f64) -> Self {
        self.insert_float(key, value);
        self
    }

    pub fn with_boolean(mut self, key: KeyId, value: bool) -> Self {
        self.insert_boolean(key, value);
        self
    }

    /// Records an integer value, returning the one it replaces.
    pub fn insert_integer(&mut self, key: KeyId, value: i64) -> Option<i64> {
        self.integers.insert(key, value)
    }

    pub fn insert_string(&mut self, key: KeyId, value: &str) -> Option<String> {
        self.strings.insert(key, value.to_owned())
    }

    pub fn insert_float(&mut self, key: KeyId, value: f64) -> Option<f64> {
        self.floats.insert(key, value)
    }

    pub fn insert_boolean(&mut self, key: KeyId, value: bool) -> Option<bool> {
        self.booleans.insert(key, value)
    }

    #[inline]
    pub fn integer(&self, key: KeyId) -> Option<i64> {
        self.integers.get(&key).copied()
    }

    #[inline]
    pub fn string(&self, key: KeyId) -> Option<&str> {
        self.strings.get(&key).map(String::as_str)
    }

    #[inline]
    pub fn float(&self, key: KeyId) -> Option<f64> {
        self.floats.get(&key).copied()
    }

    #[inline]
    pub fn boolean(&self, key: KeyId) -> Option<bool> {
        self.booleans.get(&key).copied()
    }

    /// Removes every recorded value of every type.
    pub fn clear(&mut self) {
        self.integers.clear();
        self.strings.clear();
        self.floats.clear();
        self.booleans.clear();
    }

    pub fn len(&self) -> usize {
        self.integers.len() + self.strings.len() + self.floats.len() + self.booleans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A decoded log event: its tag together with its typed attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEvent {
    pub tag: TagId,
    pub attributes: Attributes,
}

impl LogEvent {
    pub fn new(tag: TagId, attributes: Attributes) -> Self {
        Self { tag, attributes }
    }
}
