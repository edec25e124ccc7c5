//! Converter registry mapping type names to conversion behavior.
//!
//! The registry is an explicit, caller-constructed object passed to schema
//! loading and resolution; there is no process-global state. Scalar entries
//! hold a converter closure, composite entries hold an ordered field list
//! whose length fixes the type's arity. Registration is insert-only.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::types::Value;

/// Outcome of one scalar conversion: a typed value or a reason string the
/// engine wraps with the offending argument name.
pub type ConvResult = std::result::Result<Value, String>;

/// A scalar converter: raw token in, typed value out.
pub type ScalarConverter = Box<dyn Fn(&str) -> ConvResult + Send + Sync>;

/// Converts a string to a boolean under the documented contract.
///
/// Literal `"0"` and `"False"` are false, `"1"` and `"True"` are true, the
/// empty string is false, and any other non-empty string — `"None"`,
/// arbitrary text, numbers other than 0/1 — is true. This deliberately
/// differs from generic truthiness rules.
///
/// # Examples
///
/// ```
/// use script_args_core::str_to_bool;
///
/// assert!(!str_to_bool("0"));
/// assert!(!str_to_bool("False"));
/// assert!(!str_to_bool(""));
/// assert!(str_to_bool("1"));
/// assert!(str_to_bool("True"));
/// assert!(str_to_bool("None"));
/// assert!(str_to_bool("123"));
/// ```
pub fn str_to_bool(value: &str) -> bool {
    match value {
        "0" | "False" | "" => false,
        _ => true,
    }
}

fn convert_int(value: &str) -> ConvResult {
    value
        .trim()
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|_| format!("invalid integer literal {value:?}"))
}

fn convert_path(value: &str) -> ConvResult {
    // An empty path means the current directory, never an absent value.
    let path = if value.is_empty() { "." } else { value };
    Ok(Value::Path(PathBuf::from(path)))
}

/// Definition of a user-registered composite type.
///
/// The ordered field list fixes the type's arity: positional input is
/// zipped with the fields in order, mapping input is reordered to match.
///
/// # Examples
///
/// ```
/// use script_args_core::CompositeType;
///
/// let endpoint = CompositeType::new("Endpoint", ["host", "port"]);
/// assert_eq!(endpoint.arity(), 2);
/// assert_eq!(endpoint.fields(), ["host", "port"]);
/// ```
#[derive(Debug, Clone)]
pub struct CompositeType {
    name: String,
    fields: Vec<String>,
}

impl CompositeType {
    /// Creates a composite type definition with the given field order.
    pub fn new<I, S>(name: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Registered type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of constructor fields.
    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

/// Registry of type names known to the resolution engine.
///
/// Built-in scalars: `str` (identity), `int` (strict integer parse),
/// `bool` and `switch` (see [`str_to_bool`]), `path` (empty string becomes
/// `"."`). Callers extend it with scalar converters or composite type
/// definitions before loading a schema; an unregistered name in a schema
/// fails at load time, not at first use.
pub struct TypeRegistry {
    scalars: HashMap<String, ScalarConverter>,
    composites: HashMap<String, CompositeType>,
}

impl TypeRegistry {
    /// Creates a registry holding the built-in scalar types.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            scalars: HashMap::new(),
            composites: HashMap::new(),
        };
        registry.register_scalar("str", |s| Ok(Value::Str(s.to_string())));
        registry.register_scalar("int", convert_int);
        registry.register_scalar("bool", |s| Ok(Value::Bool(str_to_bool(s))));
        registry.register_scalar("switch", |s| Ok(Value::Bool(str_to_bool(s))));
        registry.register_scalar("path", convert_path);
        registry
    }

    /// Registers a scalar converter under the given type name.
    ///
    /// Replaces any previous entry with the same name.
    pub fn register_scalar<F>(&mut self, name: &str, converter: F)
    where
        F: Fn(&str) -> ConvResult + Send + Sync + 'static,
    {
        self.scalars.insert(name.to_string(), Box::new(converter));
    }

    /// Registers a composite type definition.
    pub fn register_composite(&mut self, composite: CompositeType) {
        self.composites.insert(composite.name.clone(), composite);
    }

    /// Whether the name is registered as either a scalar or a composite.
    pub fn contains(&self, name: &str) -> bool {
        self.scalars.contains_key(name) || self.composites.contains_key(name)
    }

    /// Looks up a scalar converter.
    pub fn converter(&self, name: &str) -> Option<&ScalarConverter> {
        self.scalars.get(name)
    }

    /// Looks up a composite type definition.
    pub fn composite(&self, name: &str) -> Option<&CompositeType> {
        self.composites.get(name)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("scalars", &self.scalars.keys().collect::<Vec<_>>())
            .field("composites", &self.composites.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(registry: &TypeRegistry, ty: &str, raw: &str) -> ConvResult {
        registry.converter(ty).expect("builtin converter")(raw)
    }

    #[test]
    fn test_str_is_identity() {
        let registry = TypeRegistry::with_builtins();
        assert_eq!(convert(&registry, "str", "  kept  "), Ok(Value::Str("  kept  ".into())));
    }

    #[test]
    fn test_int_parses_with_surrounding_whitespace() {
        let registry = TypeRegistry::with_builtins();
        assert_eq!(convert(&registry, "int", "123"), Ok(Value::Int(123)));
        assert_eq!(convert(&registry, "int", " 1410 "), Ok(Value::Int(1410)));
        assert_eq!(convert(&registry, "int", "-7"), Ok(Value::Int(-7)));
    }

    #[test]
    fn test_int_rejects_non_numeric_and_empty() {
        let registry = TypeRegistry::with_builtins();
        assert!(convert(&registry, "int", "").is_err());
        assert!(convert(&registry, "int", "12a").is_err());
    }

    #[test]
    fn test_bool_policy_table() {
        let cases = [
            ("0", false),
            ("False", false),
            ("", false),
            ("1", true),
            ("True", true),
            ("None", true),
            ("123", true),
            ("some string", true),
        ];
        let registry = TypeRegistry::with_builtins();
        for (raw, expected) in cases {
            assert_eq!(
                convert(&registry, "bool", raw),
                Ok(Value::Bool(expected)),
                "bool({raw:?})",
            );
            assert_eq!(convert(&registry, "switch", raw), Ok(Value::Bool(expected)));
        }
    }

    #[test]
    fn test_empty_path_is_current_directory() {
        let registry = TypeRegistry::with_builtins();
        assert_eq!(convert(&registry, "path", ""), Ok(Value::Path(".".into())));
        assert_eq!(
            convert(&registry, "path", "./some/dir"),
            Ok(Value::Path("./some/dir".into())),
        );
    }

    #[test]
    fn test_unknown_name_is_absent() {
        let registry = TypeRegistry::with_builtins();
        assert!(registry.converter("float").is_none());
        assert!(!registry.contains("float"));
    }

    #[test]
    fn test_user_scalar_registration() {
        let mut registry = TypeRegistry::with_builtins();
        registry.register_scalar("upper", |s| Ok(Value::Str(s.to_uppercase())));
        assert_eq!(convert(&registry, "upper", "abc"), Ok(Value::Str("ABC".into())));
    }

    #[test]
    fn test_composite_registration() {
        let mut registry = TypeRegistry::with_builtins();
        registry.register_composite(CompositeType::new("Endpoint", ["host", "port"]));
        assert!(registry.contains("Endpoint"));
        assert_eq!(registry.composite("Endpoint").map(CompositeType::arity), Some(2));
    }
}
