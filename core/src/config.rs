//! User-values documents: pre-parsed values loaded from YAML.
//!
//! A user-values document is a YAML mapping keyed by argument name. Its
//! values are already structured (strings, integers, lists, mappings) and
//! enter resolution through the structured channel, below decoded CLI
//! input. The document is also kept verbatim so callers can inspect exactly
//! what the user wrote, independent of the resolved mapping.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ArgsError, Result};
use crate::types::RawValue;

/// A loaded user-values document.
///
/// # Examples
///
/// ```
/// use script_args_core::{RawValue, UserValues};
///
/// let user = UserValues::from_yaml_str("retries: 5\nlabels: [a, b]\n")?;
/// assert_eq!(user.values()["retries"], RawValue::Int(5));
/// assert!(user.raw().is_mapping());
/// # Ok::<(), script_args_core::ArgsError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct UserValues {
    raw: serde_yaml::Value,
    values: HashMap<String, RawValue>,
}

impl UserValues {
    /// Parses a user-values document from YAML text.
    ///
    /// The document must be a mapping (or empty); keys must be strings.
    pub fn from_yaml_str(document: &str) -> Result<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(document)?;
        let mut values = HashMap::new();
        match &raw {
            serde_yaml::Value::Mapping(mapping) => {
                for (key, node) in mapping {
                    let key = key.as_str().ok_or_else(|| {
                        ArgsError::InvalidDocument(format!("non-string key {key:?}"))
                    })?;
                    let value =
                        RawValue::from_yaml(node).map_err(|reason| ArgsError::Conversion {
                            name: key.to_string(),
                            reason,
                        })?;
                    values.insert(key.to_string(), value);
                }
            }
            serde_yaml::Value::Null => {}
            other => {
                return Err(ArgsError::InvalidDocument(format!(
                    "expected a mapping of argument values, got {other:?}"
                )));
            }
        }
        Ok(Self { raw, values })
    }

    /// Reads a user-values document from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let document = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&document)
    }

    /// The document exactly as parsed, before any coercion.
    pub fn raw(&self) -> &serde_yaml::Value {
        &self.raw
    }

    /// Structured values keyed by argument name.
    pub fn values(&self) -> &HashMap<String, RawValue> {
        &self.values
    }

    /// Consumes the document, yielding the structured values.
    pub fn into_values(self) -> HashMap<String, RawValue> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_native_types() {
        let user = UserValues::from_yaml_str(
            "string_arg: some (not so) random string\n\
             int_arg: 123\n\
             int_arg_as_string: '123'\n\
             list_arg: [123, 156, 1956]\n\
             list_of_tuples_arg: [[123, 156], [12, 14]]\n",
        )
        .unwrap();

        let values = user.values();
        assert_eq!(values["string_arg"], RawValue::Str("some (not so) random string".into()));
        assert_eq!(values["int_arg"], RawValue::Int(123));
        assert_eq!(values["int_arg_as_string"], RawValue::Str("123".into()));
        assert_eq!(
            values["list_arg"],
            RawValue::Seq(vec![RawValue::Int(123), RawValue::Int(156), RawValue::Int(1956)]),
        );
        assert_eq!(
            values["list_of_tuples_arg"],
            RawValue::Seq(vec![
                RawValue::Seq(vec![RawValue::Int(123), RawValue::Int(156)]),
                RawValue::Seq(vec![RawValue::Int(12), RawValue::Int(14)]),
            ]),
        );
    }

    #[test]
    fn test_raw_document_is_kept_verbatim() {
        let user = UserValues::from_yaml_str("int_arg: 123\n").unwrap();
        assert_eq!(user.raw()["int_arg"], serde_yaml::Value::from(123));
    }

    #[test]
    fn test_empty_document_is_empty_mapping() {
        let user = UserValues::from_yaml_str("").unwrap();
        assert!(user.values().is_empty());
    }

    #[test]
    fn test_non_mapping_document_is_rejected() {
        assert!(matches!(
            UserValues::from_yaml_str("- 1\n- 2\n"),
            Err(ArgsError::InvalidDocument(_)),
        ));
    }
}
