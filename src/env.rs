//! Environment snapshot abstraction.
//!
//! The mapper never reads process-wide state directly: it goes through an
//! [`Env`], so production code uses [`Env::real()`] while tests and other
//! deterministic callers supply [`Env::fixed()`] backed by a `HashMap`.
//! This avoids `unsafe` calls to [`std::env::set_var`] /
//! [`std::env::remove_var`] in tests entirely.

use std::collections::HashMap;

/// Read-only view of the environment at call time.
#[derive(Clone, Debug, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// An `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// An `Env` backed by explicit key-value pairs, ignoring the process
    /// environment entirely.
    pub fn fixed(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Look up a variable by exact (case-sensitive) name.
    ///
    /// Non-unicode values in the real environment are treated as absent.
    pub fn get(&self, name: &str) -> Option<String> {
        match &self.overrides {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }
}
