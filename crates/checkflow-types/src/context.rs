//! Run arguments and the per-run execution context
//!
//! Arguments are supplied by the caller as a named bag of JSON values.
//! After contract validation accepts them, they are bound into an
//! [`ExecutionContext`] that check bodies read explicitly. The context is
//! created fresh for every run and never shared across runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Named arguments for one run invocation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunArgs(BTreeMap<String, Value>);

impl RunArgs {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add a named argument (builder style)
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Names of all supplied arguments
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RunArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The bag of accepted parameter values for one run.
///
/// Owned by a single run invocation; check bodies receive it by reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutionContext {
    values: BTreeMap<String, Value>,
}

impl ExecutionContext {
    /// Bind accepted arguments into a fresh context.
    ///
    /// Only contract validation should call this; check bodies see the
    /// result read-only.
    pub fn bind(args: &RunArgs) -> Self {
        Self {
            values: args.0.clone(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Convenience accessor for string-valued parameters
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// Convenience accessor for integer-valued parameters
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_i64)
    }

    /// Convenience accessor for boolean-valued parameters
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    /// Names of all bound parameters
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
