//! The mapping transformation.
//!
//! [`map`] walks the schema in declaration order, reads each variable from
//! the [`Env`], applies the effective missing-value policy, parses values
//! as JSON unless told otherwise, and deep-writes them into a fresh output
//! object. The first fatal condition aborts the whole call; no partial
//! output is ever returned.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::env::Env;
use crate::path::set_path;
use crate::schema::{Destination, FieldSpec, MissingPolicy, Schema};

/// Errors during mapping.
#[derive(Error, Debug)]
pub enum MapError {
    /// A field spec has no usable destination.
    #[error("invalid field spec for {var}: {reason}")]
    Schema { var: String, reason: String },

    /// A required variable is absent (or empty) in the environment.
    #[error("{var} not provided by the environment")]
    MissingVar { var: String },

    /// A value failed to parse as JSON while the field requires it.
    #[error("failed to parse {var} as JSON: {source}")]
    Parse {
        var: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Global mapping options: the default missing-value policy and an
/// optional log sink for missing variables under `Log`/`Warn`.
pub struct Options {
    on_missing: MissingPolicy,
    log: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global missing-value policy (field-level policies still win).
    pub fn on_missing(mut self, policy: MissingPolicy) -> Self {
        self.on_missing = policy;
        self
    }

    /// Set the log sink invoked with the variable name for each field
    /// skipped under a `Log`/`Warn` policy. Without one, a warning is
    /// printed to stderr.
    pub fn log(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.log = Some(Box::new(sink));
        self
    }

    fn report_missing(&self, var: &str) {
        match &self.log {
            Some(sink) => sink(var),
            None => eprintln!("Warning: {var} not provided by the environment"),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            on_missing: MissingPolicy::Error,
            log: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("on_missing", &self.on_missing)
            .field("log", &self.log.as_ref().map(|_| "<sink>"))
            .finish()
    }
}

/// Map environment variables into a structured configuration object.
///
/// Fields are processed in schema declaration order, so later-declared
/// fields win when destination paths overlap. A variable is considered
/// missing when it is absent from the environment or set to the empty
/// string; any other value (including `"0"`) is present. Values parse as
/// JSON when they can, and fall back to the raw string when they cannot.
pub fn map(schema: &Schema, options: &Options, env: &Env) -> Result<Map<String, Value>, MapError> {
    let mut out = Map::new();

    for (var, spec) in schema {
        let raw = env.get(var).filter(|value| !value.is_empty());
        let Some(raw) = raw else {
            match effective_policy(spec, options) {
                MissingPolicy::Error => {
                    return Err(MapError::MissingVar { var: var.clone() });
                }
                MissingPolicy::Log | MissingPolicy::Warn => options.report_missing(var),
                MissingPolicy::Ignore => {}
            }
            continue;
        };

        let value = parse_value(var, raw, spec)?;
        write_value(&mut out, var, spec, value)?;
    }

    Ok(out)
}

/// Field-level policy wins over the global one, in both directions.
fn effective_policy(spec: &FieldSpec, options: &Options) -> MissingPolicy {
    match spec {
        FieldSpec::Explicit(spec) => spec.on_missing.unwrap_or(options.on_missing),
        _ => options.on_missing,
    }
}

fn parse_value(var: &str, raw: String, spec: &FieldSpec) -> Result<Value, MapError> {
    if let FieldSpec::Explicit(spec) = spec {
        if spec.dont_parse {
            return Ok(Value::String(raw));
        }
    }
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(source) => {
            if let FieldSpec::Explicit(spec) = spec {
                if spec.require_parse {
                    return Err(MapError::Parse {
                        var: var.to_string(),
                        source,
                    });
                }
            }
            // Not JSON: the raw string is the value.
            Ok(Value::String(raw))
        }
    }
}

fn write_value(
    out: &mut Map<String, Value>,
    var: &str,
    spec: &FieldSpec,
    value: Value,
) -> Result<(), MapError> {
    let schema_error = |reason: &str| MapError::Schema {
        var: var.to_string(),
        reason: reason.to_string(),
    };

    match spec {
        FieldSpec::Rename => {
            out.insert(camel_case(var), value);
        }
        FieldSpec::Path(dest) => {
            if dest.is_empty() {
                return Err(schema_error("empty destination path"));
            }
            set_path(out, dest, value);
        }
        FieldSpec::Explicit(spec) => match &spec.to {
            Destination::One(dest) => {
                if dest.is_empty() {
                    return Err(schema_error("must provide a `to` key in field mapping"));
                }
                set_path(out, dest, value);
            }
            Destination::Many(dests) => {
                if dests.is_empty() {
                    return Err(schema_error("must provide a `to` key in field mapping"));
                }
                for dest in dests {
                    if dest.is_empty() {
                        return Err(schema_error("empty destination path"));
                    }
                    set_path(out, dest, value.clone());
                }
            }
        },
    }
    Ok(())
}

/// Derive a camelCase destination key from a variable name: lowercase the
/// whole name, then each underscore removes itself and uppercases exactly
/// the next character. Consecutive underscores are handled position by
/// position; a trailing underscore is dropped.
fn camel_case(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut chars = lower.chars();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(next) = chars.next() {
                out.extend(next.to_uppercase());
            }
        } else {
            out.push(c);
        }
    }
    out
}
