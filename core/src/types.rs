//! Type grammar and value model for argument resolution.
//!
//! This module defines the small type grammar used by schema entries
//! (`str`, `int`, `list[...]`, `tuple[...]`, `list[tuple[...]]`), the
//! structured input values fed into the resolution engine, and the typed
//! values it produces.

use std::path::PathBuf;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Parsed form of a schema entry's type string.
///
/// The grammar is resolved once, when a descriptor is created, and is
/// immutable afterwards:
///
/// - `list[tuple[a, b]]` → [`ListOfTuple`](TypeSpec::ListOfTuple)
/// - `tuple[a, b]` (outside a list) → [`Tuple`](TypeSpec::Tuple)
/// - `list[a]` → [`List`](TypeSpec::List)
/// - anything else → [`Scalar`](TypeSpec::Scalar)
///
/// # Examples
///
/// ```
/// use script_args_core::TypeSpec;
///
/// assert_eq!(TypeSpec::parse("int"), TypeSpec::Scalar("int".into()));
/// assert_eq!(TypeSpec::parse("list[str]"), TypeSpec::List("str".into()));
/// assert_eq!(
///     TypeSpec::parse("tuple[str, int]"),
///     TypeSpec::Tuple(vec!["str".into(), "int".into()]),
/// );
/// assert_eq!(
///     TypeSpec::parse("list[tuple[str, int]]"),
///     TypeSpec::ListOfTuple(vec!["str".into(), "int".into()]),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    /// A single value of the named type.
    Scalar(String),
    /// An ordered sequence of values of one element type.
    List(String),
    /// A fixed-arity record with per-position element types.
    Tuple(Vec<String>),
    /// An ordered sequence of fixed-arity records.
    ListOfTuple(Vec<String>),
}

impl TypeSpec {
    /// Parses a type string into its tagged form.
    ///
    /// Never fails: a string that matches none of the grouping patterns is
    /// treated as a scalar type name and validated against the registry at
    /// schema-load time.
    pub fn parse(type_string: &str) -> Self {
        let trimmed = type_string.trim();
        if let Some(inner) = bracket_body(trimmed, "list[") {
            if let Some(tuple_inner) = bracket_body(inner.trim(), "tuple[") {
                return TypeSpec::ListOfTuple(split_type_names(tuple_inner));
            }
            return TypeSpec::List(inner.trim().to_string());
        }
        if let Some(inner) = bracket_body(trimmed, "tuple[") {
            return TypeSpec::Tuple(split_type_names(inner));
        }
        TypeSpec::Scalar(trimmed.to_string())
    }

    /// All scalar type names this spec refers to, for registry validation.
    pub fn referenced_types(&self) -> Vec<&str> {
        match self {
            TypeSpec::Scalar(name) | TypeSpec::List(name) => vec![name.as_str()],
            TypeSpec::Tuple(names) | TypeSpec::ListOfTuple(names) => {
                names.iter().map(String::as_str).collect()
            }
        }
    }
}

fn bracket_body<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    s.strip_prefix(prefix)?.strip_suffix(']')
}

fn split_type_names(inner: &str) -> Vec<String> {
    inner.split(',').map(|name| name.trim().to_string()).collect()
}

/// A resolved, typed argument value.
///
/// The shape mirrors the descriptor's [`TypeSpec`]: a converted scalar, a
/// list of scalars, a tuple of per-position scalars, a list of tuples, or a
/// registered composite type. Serializes to natural JSON/YAML (tuples as
/// arrays, composites as maps).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Boolean value (see the `bool`/`switch` conversion policy).
    Bool(bool),
    /// Filesystem path; an empty source string becomes `"."`.
    Path(PathBuf),
    /// Ordered sequence of converted elements.
    List(Vec<Value>),
    /// Fixed-arity record of per-position converted elements.
    Tuple(Vec<Value>),
    /// Instance of a registered composite type.
    Struct {
        /// Registered composite type name.
        type_name: String,
        /// Field values in the registered field order.
        fields: Vec<(String, Value)>,
    },
}

impl Value {
    /// Returns the text content when this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content when this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean content when this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the path content when this is a path value.
    pub fn as_path(&self) -> Option<&std::path::Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the elements when this is a list or tuple value.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Path(p) => p.serialize(serializer),
            Value::List(items) | Value::Tuple(items) => items.serialize(serializer),
            Value::Struct { fields, .. } => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (field, value) in fields {
                    map.serialize_entry(field, value)?;
                }
                map.end()
            }
        }
    }
}

/// A pre-parsed value supplied through a structured channel.
///
/// Structured sources (decoded CLI occurrences, a YAML user-values document)
/// bypass tokenization: native scalars are used as-is, sequences become list
/// elements or tuple fields, and mappings feed composite types by field
/// name. A bare [`Str`](RawValue::Str) still goes through tokenization when
/// the target type needs records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A free-form string, tokenized when the target type requires it.
    Str(String),
    /// Native integer.
    Int(i64),
    /// Native boolean.
    Bool(bool),
    /// Ordered sequence (list elements, tuple fields, or composite fields).
    Seq(Vec<RawValue>),
    /// Field-name-to-value mapping for a composite type.
    Map(Vec<(String, RawValue)>),
}

impl RawValue {
    /// Converts a YAML node into a structured input value.
    ///
    /// Nulls, floats, and tagged nodes have no place in the model and are
    /// rejected with a reason; the caller attaches the argument name.
    pub fn from_yaml(value: &serde_yaml::Value) -> std::result::Result<Self, String> {
        match value {
            serde_yaml::Value::Bool(b) => Ok(RawValue::Bool(*b)),
            serde_yaml::Value::Number(n) => n
                .as_i64()
                .map(RawValue::Int)
                .ok_or_else(|| format!("non-integer number {n}")),
            serde_yaml::Value::String(s) => Ok(RawValue::Str(s.clone())),
            serde_yaml::Value::Sequence(items) => items
                .iter()
                .map(Self::from_yaml)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(RawValue::Seq),
            serde_yaml::Value::Mapping(map) => {
                let mut fields = Vec::with_capacity(map.len());
                for (key, val) in map {
                    let key = key
                        .as_str()
                        .ok_or_else(|| format!("non-string mapping key {key:?}"))?;
                    fields.push((key.to_string(), Self::from_yaml(val)?));
                }
                Ok(RawValue::Map(fields))
            }
            serde_yaml::Value::Null => Err("null value".to_string()),
            serde_yaml::Value::Tagged(tagged) => {
                Err(format!("unsupported tagged value {:?}", tagged.tag))
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Str(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Str(s)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_spec() {
        assert_eq!(TypeSpec::parse("str"), TypeSpec::Scalar("str".into()));
        assert_eq!(TypeSpec::parse(" path "), TypeSpec::Scalar("path".into()));
    }

    #[test]
    fn test_list_spec() {
        assert_eq!(TypeSpec::parse("list[int]"), TypeSpec::List("int".into()));
        assert_eq!(
            TypeSpec::parse("list[MyType]"),
            TypeSpec::List("MyType".into()),
        );
    }

    #[test]
    fn test_tuple_spec_trims_member_names() {
        assert_eq!(
            TypeSpec::parse("tuple[str, int, bool]"),
            TypeSpec::Tuple(vec!["str".into(), "int".into(), "bool".into()]),
        );
    }

    #[test]
    fn test_list_of_tuple_spec() {
        assert_eq!(
            TypeSpec::parse("list[tuple[str, int, str]]"),
            TypeSpec::ListOfTuple(vec!["str".into(), "int".into(), "str".into()]),
        );
    }

    #[test]
    fn test_unrecognized_grouping_falls_back_to_scalar() {
        assert_eq!(
            TypeSpec::parse("list[str"),
            TypeSpec::Scalar("list[str".into()),
        );
    }

    #[test]
    fn test_referenced_types() {
        assert_eq!(TypeSpec::parse("list[int]").referenced_types(), vec!["int"]);
        assert_eq!(
            TypeSpec::parse("tuple[str, int]").referenced_types(),
            vec!["str", "int"],
        );
    }

    #[test]
    fn test_value_serializes_to_natural_json() {
        let value = Value::List(vec![
            Value::Tuple(vec![Value::Str("a".into()), Value::Int(1)]),
            Value::Tuple(vec![Value::Str("b".into()), Value::Int(2)]),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"[["a",1],["b",2]]"#);
    }

    #[test]
    fn test_struct_serializes_as_map() {
        let value = Value::Struct {
            type_name: "Endpoint".into(),
            fields: vec![
                ("host".into(), Value::Str("localhost".into())),
                ("port".into(), Value::Int(8080)),
            ],
        };
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"host":"localhost","port":8080}"#);
    }

    #[test]
    fn test_raw_value_from_yaml() {
        let node: serde_yaml::Value = serde_yaml::from_str("[1, two, [3]]").unwrap();
        assert_eq!(
            RawValue::from_yaml(&node),
            Ok(RawValue::Seq(vec![
                RawValue::Int(1),
                RawValue::Str("two".into()),
                RawValue::Seq(vec![RawValue::Int(3)]),
            ])),
        );
    }

    #[test]
    fn test_raw_value_rejects_null_and_float() {
        let null: serde_yaml::Value = serde_yaml::from_str("~").unwrap();
        assert!(RawValue::from_yaml(&null).is_err());
        let float: serde_yaml::Value = serde_yaml::from_str("1.5").unwrap();
        assert!(RawValue::from_yaml(&float).is_err());
    }
}
