//! World state: the environment around the player and the open flag map
//! that records narrative facts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weather id a fresh journey starts with.
pub const DEFAULT_WEATHER: &str = "clear";

/// Hour a fresh journey starts at (Dawn).
pub const DEFAULT_HOUR: u64 = 0;

/// Current weather and the monotonically increasing hour counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default = "default_weather")]
    pub weather: String,
    #[serde(default = "default_hour")]
    pub hour: u64,
}

fn default_weather() -> String {
    DEFAULT_WEATHER.to_string()
}

fn default_hour() -> u64 {
    DEFAULT_HOUR
}

impl Environment {
    pub fn new(weather: impl Into<String>, hour: u64) -> Self {
        Self {
            weather: weather.into(),
            hour,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(DEFAULT_WEATHER, DEFAULT_HOUR)
    }
}

/// Flag value types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl FlagValue {
    /// Whether the flag counts as "set" for routing decisions.
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Int(i) => *i != 0,
            FlagValue::Float(f) => *f != 0.0,
            FlagValue::String(s) => !s.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FlagValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Int(value)
    }
}

impl From<f64> for FlagValue {
    fn from(value: f64) -> Self {
        FlagValue::Float(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::String(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        FlagValue::String(value)
    }
}

impl std::fmt::Display for FlagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{}", b),
            FlagValue::Int(i) => write!(f, "{}", i),
            FlagValue::Float(x) => write!(f, "{}", x),
            FlagValue::String(s) => f.write_str(s),
        }
    }
}

/// Open string-keyed map of narrative facts.
///
/// New facts can be recorded without touching a schema. Readers that need
/// precedence (the boss dispatcher) go through [`Flags::is_set`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(BTreeMap<String, FlagValue>);

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FlagValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.0.get(key)
    }

    /// True if the flag exists and is truthy.
    pub fn is_set(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(FlagValue::is_truthy)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(FlagValue::as_str)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(FlagValue::as_int)
    }

    /// Add `delta` to an integer flag, treating a missing or non-integer
    /// value as zero. Saturates at the `i64` bounds. Returns the new value.
    pub fn increment(&mut self, key: &str, delta: i64) -> i64 {
        let next = self.get_int(key).unwrap_or(0).saturating_add(delta);
        self.set(key, next);
        next
    }

    pub fn remove(&mut self, key: &str) -> Option<FlagValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FlagValue>> FromIterator<(K, V)> for Flags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut flags = Flags::new();
        for (key, value) in iter {
            flags.set(key, value);
        }
        flags
    }
}
