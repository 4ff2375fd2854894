//! Mapping schema types.
//!
//! A [`Schema`] is an ordered map from environment variable name to
//! [`FieldSpec`]. Declaration order matters: fields are processed in order,
//! so when two destination paths overlap, the later-declared field wins.
//!
//! Schemas can be built in code or deserialized from JSON/TOML, where the
//! wire shape of a field spec is `true | "dest.path" | { to, onMissing?,
//! dontParse?, requireParse? }`.

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

/// Ordered mapping from environment variable name to field spec.
pub type Schema = IndexMap<String, FieldSpec>;

/// What to do when a variable is absent (or empty) in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Abort the whole mapping call.
    Error,
    /// Report through the log sink and skip the field.
    Log,
    /// Same as `Log`.
    Warn,
    /// Skip the field silently.
    Ignore,
}

/// How one environment variable maps into the output object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "FieldSpecRepr")]
pub enum FieldSpec {
    /// Write under a top-level key derived by camelCasing the variable name
    /// (`SECRET_API_KEY` becomes `secretApiKey`).
    Rename,
    /// Write at an explicit destination path, dotted for nesting.
    Path(String),
    /// Full per-field configuration.
    Explicit(ExplicitSpec),
}

impl FieldSpec {
    /// Shorthand for [`FieldSpec::Path`].
    pub fn path(dest: impl Into<String>) -> Self {
        FieldSpec::Path(dest.into())
    }

    /// An [`ExplicitSpec`] writing to a single path, other settings default.
    pub fn to(dest: impl Into<String>) -> Self {
        FieldSpec::Explicit(ExplicitSpec {
            to: Destination::One(dest.into()),
            ..ExplicitSpec::default()
        })
    }

    /// An [`ExplicitSpec`] writing the same value to several paths.
    pub fn to_many(dests: impl IntoIterator<Item = impl Into<String>>) -> Self {
        FieldSpec::Explicit(ExplicitSpec {
            to: Destination::Many(dests.into_iter().map(Into::into).collect()),
            ..ExplicitSpec::default()
        })
    }
}

/// Per-field configuration: destination(s), missing-value policy override,
/// and JSON parsing behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitSpec {
    /// Destination path(s) in the output object.
    pub to: Destination,
    /// Overrides the global policy when set, in both directions.
    pub on_missing: Option<MissingPolicy>,
    /// Keep the raw string instead of attempting a JSON parse.
    pub dont_parse: bool,
    /// Turn a failed JSON parse into a fatal error.
    pub require_parse: bool,
}

impl Default for ExplicitSpec {
    /// The default destination is empty, which the mapper rejects with a
    /// schema error. Intended for struct-update syntax where `to` is
    /// always filled in.
    fn default() -> Self {
        Self {
            to: Destination::One(String::new()),
            on_missing: None,
            dont_parse: false,
            require_parse: false,
        }
    }
}

/// One destination path, or several that all receive the same value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Destination {
    One(String),
    Many(Vec<String>),
}

/// A field spec shape that cannot be used (rejected during schema
/// deserialization).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidFieldSpec(String);

/// Wire shape of a field spec. `Flag(false)` and a missing `to` are only
/// representable here, and are rejected in the `TryFrom` conversion.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldSpecRepr {
    Flag(bool),
    Path(String),
    Explicit(ExplicitSpecRepr),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplicitSpecRepr {
    to: Option<Destination>,
    on_missing: Option<MissingPolicy>,
    #[serde(default)]
    dont_parse: bool,
    #[serde(default)]
    require_parse: bool,
}

impl TryFrom<FieldSpecRepr> for FieldSpec {
    type Error = InvalidFieldSpec;

    fn try_from(repr: FieldSpecRepr) -> Result<Self, Self::Error> {
        match repr {
            FieldSpecRepr::Flag(true) => Ok(FieldSpec::Rename),
            FieldSpecRepr::Flag(false) => Err(InvalidFieldSpec(
                "`false` is not a valid field spec (no destination)".into(),
            )),
            FieldSpecRepr::Path(dest) => Ok(FieldSpec::Path(dest)),
            FieldSpecRepr::Explicit(repr) => {
                let to = repr.to.ok_or_else(|| {
                    InvalidFieldSpec("must provide a `to` key in field mapping".into())
                })?;
                Ok(FieldSpec::Explicit(ExplicitSpec {
                    to,
                    on_missing: repr.on_missing,
                    dont_parse: repr.dont_parse,
                    require_parse: repr.require_parse,
                }))
            }
        }
    }
}
