//! Environment sources.
//!
//! Resolution reads variables through [`EnvSource`] so that a whole registry
//! build can run against one captured [`EnvSnapshot`] instead of the live
//! process environment.

use std::collections::HashMap;

/// Read-only view of environment variables.
pub trait EnvSource {
    /// Raw value of `name`, `None` when the variable is absent or not unicode.
    fn var(&self, name: &str) -> Option<String>;

    /// Value of `name`, or `fallback` when absent. A set-but-empty variable
    /// is returned as-is.
    fn var_or(&self, name: &str, fallback: &str) -> String {
        self.var(name).unwrap_or_else(|| fallback.to_string())
    }
}

/// The live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// An immutable set of variables captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// An empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment.
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    /// Add or replace one variable.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for EnvSnapshot {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}
