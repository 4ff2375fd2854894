//! envmap — map environment variables into structured configuration.
//!
//! Given a declarative [`Schema`] describing where each environment
//! variable should land, [`map`] produces a nested JSON object: values are
//! parsed as JSON where possible, missing variables are handled per-field
//! or globally, and dotted destination paths create intermediate
//! containers as needed.
//!
//! ```no_run
//! use envmap::{map, Env, FieldSpec, Options, Schema};
//!
//! let mut schema = Schema::new();
//! schema.insert("SECRET_API_KEY".into(), FieldSpec::Rename);
//! schema.insert("DB_PORT".into(), FieldSpec::path("database.port"));
//!
//! let settings = map(&schema, &Options::default(), &Env::real())?;
//! # Ok::<(), envmap::MapError>(())
//! ```

pub mod env;
pub mod mapper;
pub mod path;
pub mod schema;

pub use env::Env;
pub use mapper::{map, MapError, Options};
pub use schema::{Destination, ExplicitSpec, FieldSpec, MissingPolicy, Schema};
