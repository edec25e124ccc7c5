//! Command-line collaborator for schema-driven argument resolution.
//!
//! The resolution engine in `script-args-core` consumes structured values;
//! this crate supplies them from the command line. [`bridge`] turns a
//! loaded schema into a [`clap::Command`] and decodes the parsed matches
//! back into the engine's structured input, honoring the multiplicity
//! rules (last occurrence wins for scalars and plain tuples, every
//! occurrence kept for list shapes).

pub mod bridge;
