//! Schema-driven argument resolution.
//!
//! Programs declare named parameters once, in a TOML schema document, and
//! this crate resolves each one to a typed value from layered sources:
//! structured/CLI input, then an environment variable, then a static
//! default. The pieces:
//!
//! - [`TypeRegistry`] — maps type names to converters; built-in scalars
//!   (`str`, `int`, `bool`/`switch`, `path`) plus user-registered scalar
//!   and composite types.
//! - [`tokenizer`] — quote-aware splitting of raw default/environment
//!   strings into `;`-delimited records and whitespace-delimited fields.
//! - [`ArgumentsSchema`] / [`ArgumentDescriptor`] — the declared arguments,
//!   validated fail-fast against the registry at load time.
//! - [`Resolver`] / [`ResolvedArgs`] — the resolution pass and its output
//!   mapping.
//! - [`UserValues`] — an optional YAML document of pre-parsed values that
//!   joins the structured channel.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use script_args_core::*;
//!
//! let registry = TypeRegistry::with_builtins();
//! let schema = ArgumentsSchema::from_toml_str(
//!     r#"
//! [workers]
//! type = "int"
//! description = "Worker pool size"
//! cli_arg = "--workers"
//! env_var = "APP_WORKERS"
//! default_value = "4"
//!
//! [labels]
//! type = "list[str]"
//! description = "Labels applied to every job"
//! cli_arg = "--label"
//! default_value = "alpha; beta"
//! "#,
//!     &registry,
//! )?;
//!
//! // CLI wins over env and default; here only the env map supplies a value.
//! let env = HashMap::from([("APP_WORKERS".to_string(), "8".to_string())]);
//! let resolved = Resolver::new(&schema, &registry).resolve(&env)?;
//!
//! assert_eq!(resolved.get("workers")?, Some(&Value::Int(8)));
//! assert_eq!(
//!     resolved.get("labels")?,
//!     Some(&Value::List(vec![
//!         Value::Str("alpha".into()),
//!         Value::Str("beta".into()),
//!     ])),
//! );
//! # Ok::<(), script_args_core::ArgsError>(())
//! ```

mod config;
mod error;
mod registry;
mod resolve;
mod schema;
pub mod tokenizer;
mod types;

pub use config::UserValues;
pub use error::{ArgsError, Result};
pub use registry::{CompositeType, ConvResult, ScalarConverter, TypeRegistry, str_to_bool};
pub use resolve::{EnvLookup, ProcessEnv, ResolvedArgs, Resolver};
pub use schema::{ArgumentDescriptor, ArgumentSpec, ArgumentsSchema};
pub use types::{RawValue, TypeSpec, Value};
