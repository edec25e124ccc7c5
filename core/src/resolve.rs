//! The value resolution engine.
//!
//! For every descriptor, in declaration order, resolution runs a four-step
//! pipeline: pick a source (structured CLI input > user-values document >
//! environment > default), tokenize raw strings when the target type needs
//! records, check tuple arity, and apply the registry converters
//! positionally. A `path`-typed argument with a `parent_path` reference is
//! joined onto its parent's resolved path afterwards.
//!
//! Resolution is a one-shot synchronous pass; the first failure aborts it.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::error::{ArgsError, Result};
use crate::registry::{CompositeType, TypeRegistry};
use crate::schema::{ArgumentDescriptor, ArgumentsSchema};
use crate::tokenizer::{record_fields, record_token, split_records};
use crate::types::{RawValue, TypeSpec, Value};

/// Read-only environment lookup used during source selection.
///
/// Production code uses [`ProcessEnv`]; tests substitute a plain map so the
/// process environment never has to be mutated.
pub trait EnvLookup {
    /// Returns the variable's value when present.
    fn var(&self, name: &str) -> Option<String>;
}

/// [`EnvLookup`] backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Resolved values keyed by argument name.
///
/// `get` on a name that was never declared (nor later `set`) fails with
/// [`ArgsError::UnknownArgument`]. `set` plainly overwrites the stored
/// value without re-validation — callers may intentionally store a value of
/// a different shape after resolution.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ResolvedArgs {
    values: HashMap<String, Option<Value>>,
}

impl ResolvedArgs {
    /// Returns the resolved value for an argument.
    ///
    /// `Ok(None)` means the argument was declared but no source supplied a
    /// value; an unknown name is an error naming the offending key.
    pub fn get(&self, name: &str) -> Result<Option<&Value>> {
        self.values
            .get(name)
            .map(Option::as_ref)
            .ok_or_else(|| ArgsError::UnknownArgument(name.to_string()))
    }

    /// Overwrites (or introduces) a stored value, without validation.
    pub fn set(&mut self, name: &str, value: Option<Value>) {
        self.values.insert(name.to_string(), value);
    }

    /// Whether a value slot exists for the name.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The full name-to-value mapping.
    pub fn values(&self) -> &HashMap<String, Option<Value>> {
        &self.values
    }
}

/// One-shot resolver tying a schema, a registry, and the structured inputs
/// together.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use script_args_core::{ArgumentsSchema, Resolver, TypeRegistry, Value};
///
/// let registry = TypeRegistry::with_builtins();
/// let schema = ArgumentsSchema::from_toml_str(
///     "[retries]\ntype = \"int\"\ncli_arg = \"--retries\"\ndefault_value = \"3\"\n",
///     &registry,
/// )?;
///
/// let env: HashMap<String, String> = HashMap::new();
/// let resolved = Resolver::new(&schema, &registry).resolve(&env)?;
/// assert_eq!(resolved.get("retries")?, Some(&Value::Int(3)));
/// # Ok::<(), script_args_core::ArgsError>(())
/// ```
pub struct Resolver<'a> {
    schema: &'a ArgumentsSchema,
    registry: &'a TypeRegistry,
    cli_values: HashMap<String, RawValue>,
    user_values: HashMap<String, RawValue>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver with no structured inputs attached.
    pub fn new(schema: &'a ArgumentsSchema, registry: &'a TypeRegistry) -> Self {
        Self {
            schema,
            registry,
            cli_values: HashMap::new(),
            user_values: HashMap::new(),
        }
    }

    /// Attaches decoded CLI values (the highest-precedence source).
    pub fn with_cli_values(mut self, values: HashMap<String, RawValue>) -> Self {
        self.cli_values = values;
        self
    }

    /// Attaches user-document values, consulted after the CLI channel.
    pub fn with_user_values(mut self, values: HashMap<String, RawValue>) -> Self {
        self.user_values = values;
        self
    }

    /// Runs the resolution pass over every descriptor in declaration order.
    pub fn resolve(&self, env: &dyn EnvLookup) -> Result<ResolvedArgs> {
        let mut resolved = ResolvedArgs::default();
        for descriptor in self.schema.descriptors() {
            let value = self.resolve_one(descriptor, env, &resolved)?;
            resolved.set(descriptor.name(), value);
        }
        Ok(resolved)
    }

    fn resolve_one(
        &self,
        descriptor: &ArgumentDescriptor,
        env: &dyn EnvLookup,
        resolved: &ResolvedArgs,
    ) -> Result<Option<Value>> {
        let name = descriptor.name();
        let selected = if let Some(raw) = self.cli_values.get(name) {
            debug!(argument = name, source = "cli", "selected source");
            Some(raw.clone())
        } else if let Some(raw) = self.user_values.get(name) {
            debug!(argument = name, source = "user", "selected source");
            Some(raw.clone())
        } else if let Some(text) = descriptor.env_var.as_deref().and_then(|var| env.var(var)) {
            debug!(argument = name, source = "env", "selected source");
            Some(RawValue::Str(text))
        } else if let Some(text) = &descriptor.default_value {
            debug!(argument = name, source = "default", "selected source");
            Some(RawValue::Str(text.clone()))
        } else {
            None
        };

        let Some(raw) = selected else {
            if descriptor.required {
                return Err(ArgsError::MissingRequired(name.to_string()));
            }
            return Ok(None);
        };

        let mut value = self.coerce(descriptor, raw)?;
        if let Some(parent) = &descriptor.parent_path {
            value = compose_with_parent(value, parent, resolved);
        }
        Ok(Some(value))
    }

    fn coerce(&self, descriptor: &ArgumentDescriptor, raw: RawValue) -> Result<Value> {
        let name = descriptor.name();
        match (descriptor.spec(), raw) {
            (TypeSpec::Scalar(ty), RawValue::Str(text)) => self.convert_token(name, ty, &text),
            (TypeSpec::Scalar(ty), raw) => self.coerce_element(name, ty, raw),

            (TypeSpec::List(ty), RawValue::Str(text)) => {
                let items = split_records(&text)
                    .into_iter()
                    .map(|record| self.convert_token(name, ty, &record_token(record)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(items))
            }
            (TypeSpec::List(ty), RawValue::Seq(items)) => {
                let items = items
                    .into_iter()
                    .map(|item| self.coerce_element(name, ty, item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(items))
            }

            (TypeSpec::Tuple(types), RawValue::Str(text)) => {
                // A plain tuple consumes exactly one record; a record
                // delimiter in the raw string cannot mean anything here.
                let records = split_records(&text);
                match records.as_slice() {
                    [record] => self.convert_text_record(name, types, record),
                    _ => Err(ArgsError::Conversion {
                        name: name.to_string(),
                        reason: format!("expected a single record, got {}", records.len()),
                    }),
                }
            }
            (TypeSpec::Tuple(types), RawValue::Seq(items)) => {
                self.coerce_structured_record(name, types, items)
            }

            (TypeSpec::ListOfTuple(types), RawValue::Str(text)) => {
                let records = split_records(&text)
                    .into_iter()
                    .map(|record| self.convert_text_record(name, types, record))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(records))
            }
            (TypeSpec::ListOfTuple(types), RawValue::Seq(records)) => {
                let records = records
                    .into_iter()
                    .map(|record| match record {
                        RawValue::Seq(items) => {
                            self.coerce_structured_record(name, types, items)
                        }
                        other => Err(ArgsError::Conversion {
                            name: name.to_string(),
                            reason: format!("expected a record sequence, got {other:?}"),
                        }),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(records))
            }

            (_, raw) => Err(ArgsError::Conversion {
                name: name.to_string(),
                reason: format!("value shape {raw:?} does not fit type '{}'", descriptor.type_name),
            }),
        }
    }

    /// Converts one textual token: scalar converter, or positional
    /// composite fields when the name is a registered composite.
    fn convert_token(&self, name: &str, ty: &str, token: &str) -> Result<Value> {
        if let Some(converter) = self.registry.converter(ty) {
            return converter(token).map_err(|reason| ArgsError::Conversion {
                name: name.to_string(),
                reason,
            });
        }
        if let Some(composite) = self.registry.composite(ty) {
            let fields = record_fields(token);
            return build_composite_positional(
                name,
                composite,
                fields.into_iter().map(Value::Str).collect(),
            );
        }
        Err(ArgsError::UnknownType(ty.to_string()))
    }

    /// Coerces one structured element destined for a scalar slot.
    ///
    /// Strings run through the converter; native scalars are used as-is;
    /// sequences and mappings feed composite constructors.
    fn coerce_element(&self, name: &str, ty: &str, raw: RawValue) -> Result<Value> {
        match raw {
            RawValue::Str(text) => self.convert_token(name, ty, &text),
            RawValue::Int(i) => Ok(Value::Int(i)),
            RawValue::Bool(b) => Ok(Value::Bool(b)),
            RawValue::Seq(items) => {
                let composite = self.expect_composite(name, ty)?;
                let values = items
                    .into_iter()
                    .map(|item| native_field_value(name, item))
                    .collect::<Result<Vec<_>>>()?;
                build_composite_positional(name, composite, values)
            }
            RawValue::Map(entries) => {
                let composite = self.expect_composite(name, ty)?;
                build_composite_named(name, composite, entries)
            }
        }
    }

    fn convert_text_record(&self, name: &str, types: &[String], record: &str) -> Result<Value> {
        let fields = record_fields(record);
        check_arity(name, types.len(), fields.len())?;
        let values = types
            .iter()
            .zip(fields)
            .map(|(ty, field)| self.convert_token(name, ty, &field))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Tuple(values))
    }

    fn coerce_structured_record(
        &self,
        name: &str,
        types: &[String],
        items: Vec<RawValue>,
    ) -> Result<Value> {
        check_arity(name, types.len(), items.len())?;
        let values = types
            .iter()
            .zip(items)
            .map(|(ty, item)| self.coerce_element(name, ty, item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Tuple(values))
    }

    fn expect_composite(&self, name: &str, ty: &str) -> Result<&CompositeType> {
        self.registry
            .composite(ty)
            .ok_or_else(|| ArgsError::Conversion {
                name: name.to_string(),
                reason: format!("type '{ty}' does not accept grouped values"),
            })
    }
}

fn check_arity(name: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ArgsError::Arity {
            name: name.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Joins a resolved path onto its parent's resolved path.
///
/// Composition only happens when both sides actually resolved to paths; an
/// unresolved parent leaves the child untouched.
fn compose_with_parent(value: Value, parent: &str, resolved: &ResolvedArgs) -> Value {
    let parent_value = resolved.get(parent).ok().flatten();
    match (parent_value, value) {
        (Some(Value::Path(base)), Value::Path(child)) => Value::Path(base.join(child)),
        (_, value) => value,
    }
}

fn native_field_value(name: &str, raw: RawValue) -> Result<Value> {
    match raw {
        RawValue::Str(s) => Ok(Value::Str(s)),
        RawValue::Int(i) => Ok(Value::Int(i)),
        RawValue::Bool(b) => Ok(Value::Bool(b)),
        other => Err(ArgsError::Conversion {
            name: name.to_string(),
            reason: format!("composite fields must be scalars, got {other:?}"),
        }),
    }
}

fn build_composite_positional(
    name: &str,
    composite: &CompositeType,
    values: Vec<Value>,
) -> Result<Value> {
    check_arity(name, composite.arity(), values.len())?;
    Ok(Value::Struct {
        type_name: composite.name().to_string(),
        fields: composite
            .fields()
            .iter()
            .cloned()
            .zip(values)
            .collect(),
    })
}

fn build_composite_named(
    name: &str,
    composite: &CompositeType,
    entries: Vec<(String, RawValue)>,
) -> Result<Value> {
    check_arity(name, composite.arity(), entries.len())?;
    let mut entries: HashMap<String, RawValue> = entries.into_iter().collect();
    let mut fields = Vec::with_capacity(composite.arity());
    for field in composite.fields() {
        let raw = entries.remove(field).ok_or_else(|| ArgsError::Conversion {
            name: name.to_string(),
            reason: format!("missing composite field '{field}'"),
        })?;
        fields.push((field.clone(), native_field_value(name, raw)?));
    }
    Ok(Value::Struct {
        type_name: composite.name().to_string(),
        fields,
    })
}
