//! Argument descriptors and TOML schema loading.
//!
//! A schema document is a TOML table per argument, keyed by argument name:
//!
//! ```toml
//! [cache_dir]
//! type = "path"
//! description = "Directory used for the download cache"
//! cli_arg = "--cache-dir"
//! env_var = "APP_CACHE_DIR"
//! default_value = "cache"
//! parent_path = "work_dir"
//! ```
//!
//! Declaration order is preserved; it is also resolution order, so a
//! `parent_path` referent must be declared before its dependents.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ArgsError, Result};
use crate::registry::TypeRegistry;
use crate::types::TypeSpec;

/// One argument entry as written in the schema document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgumentSpec {
    /// Type string, parsed with the [`TypeSpec`] grammar.
    #[serde(rename = "type")]
    pub type_name: String,
    /// User-facing description; carried but not used by the engine.
    #[serde(default)]
    pub description: String,
    /// CLI flag that sets the value (e.g. `"--cache-dir"`).
    pub cli_arg: String,
    /// Environment variable consulted when the CLI supplies nothing.
    #[serde(default)]
    pub env_var: Option<String>,
    /// Raw default string used when no other source yields a value.
    #[serde(default)]
    pub default_value: Option<String>,
    /// Whether resolution must produce a value.
    #[serde(default)]
    pub required: bool,
    /// Name of another argument whose resolved path prefixes this one.
    /// Only meaningful for `path`-typed entries.
    #[serde(default)]
    pub parent_path: Option<String>,
}

/// A schema entry with its type string parsed.
///
/// The name and type spec are fixed at load time; fallback fields
/// (`default_value`, `env_var`, `required`, `parent_path`) may be adjusted
/// by the owning caller before resolution.
#[derive(Debug, Clone)]
pub struct ArgumentDescriptor {
    name: String,
    spec: TypeSpec,
    /// Raw type string as written in the document.
    pub type_name: String,
    /// User-facing description.
    pub description: String,
    /// CLI flag that sets the value.
    pub cli_arg: String,
    /// Environment fallback variable.
    pub env_var: Option<String>,
    /// Raw default string.
    pub default_value: Option<String>,
    /// Whether resolution must produce a value.
    pub required: bool,
    /// Parent path reference, for `path`-typed entries.
    pub parent_path: Option<String>,
}

impl ArgumentDescriptor {
    /// Builds a descriptor from a document entry, parsing its type string.
    pub fn new(name: &str, spec: ArgumentSpec) -> Self {
        Self {
            name: name.to_string(),
            spec: TypeSpec::parse(&spec.type_name),
            type_name: spec.type_name,
            description: spec.description,
            cli_arg: spec.cli_arg,
            env_var: spec.env_var,
            default_value: spec.default_value,
            required: spec.required,
            parent_path: spec.parent_path,
        }
    }

    /// Unique argument name; the key values are stored under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parsed type spec.
    pub fn spec(&self) -> &TypeSpec {
        &self.spec
    }

    fn is_path_typed(&self) -> bool {
        matches!(&self.spec, TypeSpec::Scalar(name) if name == "path")
    }
}

/// An ordered collection of argument descriptors.
///
/// Loaded from a TOML document and validated fail-fast against a
/// [`TypeRegistry`]: every referenced type must be registered, every
/// `cli_arg` must carry a flag name after its dashes, and every
/// `parent_path` must name another existing argument.
#[derive(Debug, Clone, Default)]
pub struct ArgumentsSchema {
    descriptors: Vec<ArgumentDescriptor>,
}

impl ArgumentsSchema {
    /// Parses and validates a schema from TOML text.
    pub fn from_toml_str(document: &str, registry: &TypeRegistry) -> Result<Self> {
        let table: toml::Table = document.parse()?;
        let mut descriptors = Vec::with_capacity(table.len());
        for (name, entry) in table {
            let spec: ArgumentSpec = entry.try_into()?;
            descriptors.push(ArgumentDescriptor::new(&name, spec));
        }
        let schema = Self { descriptors };
        schema.validate(registry)?;
        debug!(arguments = schema.descriptors.len(), "loaded arguments schema");
        Ok(schema)
    }

    /// Reads and validates a schema from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>, registry: &TypeRegistry) -> Result<Self> {
        let document = std::fs::read_to_string(path)?;
        Self::from_toml_str(&document, registry)
    }

    /// Builds a schema from pre-constructed descriptors.
    ///
    /// Runs the same validation as document loading.
    pub fn from_descriptors(
        descriptors: Vec<ArgumentDescriptor>,
        registry: &TypeRegistry,
    ) -> Result<Self> {
        let schema = Self { descriptors };
        schema.validate(registry)?;
        Ok(schema)
    }

    fn validate(&self, registry: &TypeRegistry) -> Result<()> {
        for descriptor in &self.descriptors {
            for type_name in descriptor.spec().referenced_types() {
                if !registry.contains(type_name) {
                    return Err(ArgsError::UnknownType(type_name.to_string()));
                }
            }
            if descriptor.cli_arg.trim_start_matches('-').is_empty() {
                return Err(ArgsError::InvalidDocument(format!(
                    "argument '{}' has no flag name in cli_arg '{}'",
                    descriptor.name(),
                    descriptor.cli_arg,
                )));
            }
            if let Some(parent) = &descriptor.parent_path {
                if parent == descriptor.name() {
                    return Err(ArgsError::InvalidParent {
                        name: descriptor.name().to_string(),
                        reason: "argument references itself".to_string(),
                    });
                }
                if self.get(parent).is_none() {
                    return Err(ArgsError::InvalidParent {
                        name: descriptor.name().to_string(),
                        reason: format!("no argument named '{parent}'"),
                    });
                }
                if !descriptor.is_path_typed() {
                    warn!(
                        argument = descriptor.name(),
                        "parent_path is only meaningful for path-typed arguments"
                    );
                }
            }
        }
        Ok(())
    }

    /// Descriptors in declaration order.
    pub fn descriptors(&self) -> &[ArgumentDescriptor] {
        &self.descriptors
    }

    /// Looks up a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&ArgumentDescriptor> {
        self.descriptors.iter().find(|d| d.name() == name)
    }

    /// Mutable lookup, for adjusting fallbacks before resolution.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ArgumentDescriptor> {
        self.descriptors.iter_mut().find(|d| d.name() == name)
    }

    /// Number of declared arguments.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the schema declares no arguments.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CompositeType;

    const TWO_ARGS: &str = r#"
[first_arg]
type = "str"
description = "Some fancy description"
cli_arg = "--cli-option-name"
env_var = "ENV_VAR_NAME"
default_value = "first_default"

[second_arg]
type = "tuple[int, bool, path]"
description = "Some fancy description"
cli_arg = "--cli-option-name-for-tuple"
env_var = "ENV_VAR_NAME_TUPLE"
default_value = "10 True ."
"#;

    #[test]
    fn test_loads_entries_in_declaration_order() {
        let registry = TypeRegistry::with_builtins();
        let schema = ArgumentsSchema::from_toml_str(TWO_ARGS, &registry).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.descriptors()[0].name(), "first_arg");
        assert_eq!(schema.descriptors()[1].name(), "second_arg");
        assert_eq!(
            schema.descriptors()[1].spec(),
            &TypeSpec::Tuple(vec!["int".into(), "bool".into(), "path".into()]),
        );
    }

    #[test]
    fn test_entry_fields_carried_through() {
        let registry = TypeRegistry::with_builtins();
        let schema = ArgumentsSchema::from_toml_str(TWO_ARGS, &registry).unwrap();
        let first = schema.get("first_arg").unwrap();
        assert_eq!(first.cli_arg, "--cli-option-name");
        assert_eq!(first.env_var.as_deref(), Some("ENV_VAR_NAME"));
        assert_eq!(first.default_value.as_deref(), Some("first_default"));
        assert!(!first.required);
    }

    #[test]
    fn test_unknown_type_fails_at_load() {
        let registry = TypeRegistry::with_builtins();
        let doc = "[x]\ntype = \"float\"\ncli_arg = \"--x\"\n";
        let err = ArgumentsSchema::from_toml_str(doc, &registry).unwrap_err();
        assert!(matches!(err, ArgsError::UnknownType(name) if name == "float"));
    }

    #[test]
    fn test_unknown_tuple_member_fails_at_load() {
        let registry = TypeRegistry::with_builtins();
        let doc = "[x]\ntype = \"list[tuple[str, float]]\"\ncli_arg = \"--x\"\n";
        assert!(matches!(
            ArgumentsSchema::from_toml_str(doc, &registry),
            Err(ArgsError::UnknownType(_)),
        ));
    }

    #[test]
    fn test_composite_type_accepted_once_registered() {
        let mut registry = TypeRegistry::with_builtins();
        let doc = "[x]\ntype = \"list[Endpoint]\"\ncli_arg = \"--x\"\n";
        assert!(ArgumentsSchema::from_toml_str(doc, &registry).is_err());
        registry.register_composite(CompositeType::new("Endpoint", ["host", "port"]));
        assert!(ArgumentsSchema::from_toml_str(doc, &registry).is_ok());
    }

    #[test]
    fn test_cli_arg_needs_a_flag_name() {
        let registry = TypeRegistry::with_builtins();
        for flag in ["\"--\"", "\"-\"", "\"\""] {
            let doc = format!("[x]\ntype = \"str\"\ncli_arg = {flag}\n");
            assert!(matches!(
                ArgumentsSchema::from_toml_str(&doc, &registry),
                Err(ArgsError::InvalidDocument(_)),
            ));
        }
    }

    #[test]
    fn test_parent_must_exist() {
        let registry = TypeRegistry::with_builtins();
        let doc = "[x]\ntype = \"path\"\ncli_arg = \"--x\"\nparent_path = \"missing\"\n";
        assert!(matches!(
            ArgumentsSchema::from_toml_str(doc, &registry),
            Err(ArgsError::InvalidParent { .. }),
        ));
    }

    #[test]
    fn test_parent_cannot_be_self() {
        let registry = TypeRegistry::with_builtins();
        let doc = "[x]\ntype = \"path\"\ncli_arg = \"--x\"\nparent_path = \"x\"\n";
        assert!(matches!(
            ArgumentsSchema::from_toml_str(doc, &registry),
            Err(ArgsError::InvalidParent { .. }),
        ));
    }

    #[test]
    fn test_fallbacks_mutable_before_resolution() {
        let registry = TypeRegistry::with_builtins();
        let mut schema = ArgumentsSchema::from_toml_str(TWO_ARGS, &registry).unwrap();
        let first = schema.get_mut("first_arg").unwrap();
        first.default_value = Some("10".to_string());
        first.required = true;
        assert_eq!(
            schema.get("first_arg").unwrap().default_value.as_deref(),
            Some("10"),
        );
    }
}
