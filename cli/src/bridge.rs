//! Dynamic clap registration and decoding for a loaded schema.
//!
//! Every descriptor becomes one clap argument. Arity of record-shaped
//! types is enforced by clap's `num_args`, so a wrong field count on the
//! command line surfaces as a usage error rather than a resolution error —
//! the two failure styles are deliberately distinct.

use std::collections::HashMap;

use clap::{Arg, ArgAction, ArgMatches, Command};
use script_args_core::{ArgumentsSchema, RawValue, TypeRegistry, TypeSpec};

/// Builds a clap command with one argument per schema descriptor.
///
/// Flags repeat freely (`Append`); how repetition collapses is decided in
/// [`decode_matches`]. A `switch` takes an optional value and defaults to
/// `"1"` (true) when the flag is given bare.
pub fn build_command(schema: &ArgumentsSchema, registry: &TypeRegistry) -> Command {
    let mut command = Command::new("script-args").no_binary_name(true);
    for descriptor in schema.descriptors() {
        let mut arg = Arg::new(descriptor.name().to_string()).action(ArgAction::Append);
        // "--x" is always a long flag, however short its name; "-x" with a
        // single character is a short flag. Schema validation guarantees a
        // non-empty name after the dashes.
        let flag = descriptor.cli_arg.as_str();
        arg = if let Some(long) = flag.strip_prefix("--") {
            arg.long(long.to_string())
        } else {
            let name = flag.trim_start_matches('-');
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => arg.short(c),
                _ => arg.long(name.to_string()),
            }
        };
        arg = match descriptor.spec() {
            TypeSpec::Scalar(ty) if ty == "switch" => {
                arg.num_args(0..=1).default_missing_value("1")
            }
            TypeSpec::Scalar(ty) | TypeSpec::List(ty) => match registry.composite(ty) {
                Some(composite) => arg.num_args(composite.arity()),
                None => arg.num_args(1),
            },
            TypeSpec::Tuple(types) | TypeSpec::ListOfTuple(types) => arg.num_args(types.len()),
        };
        command = command.arg(arg);
    }
    command
}

/// Decodes parsed matches into the engine's structured CLI input.
///
/// Scalars and plain tuples keep the last occurrence; lists and lists of
/// tuples keep every occurrence, one element or record each. Arguments
/// with no occurrence are simply absent from the map, which lets the
/// engine fall through to env and default sources.
pub fn decode_matches(
    schema: &ArgumentsSchema,
    registry: &TypeRegistry,
    matches: &ArgMatches,
) -> HashMap<String, RawValue> {
    let mut values = HashMap::new();
    for descriptor in schema.descriptors() {
        let Some(occurrences) = matches.get_occurrences::<String>(descriptor.name()) else {
            continue;
        };
        let occurrences: Vec<Vec<String>> = occurrences
            .map(|occurrence| occurrence.cloned().collect())
            .collect();
        let Some(last) = occurrences.last() else { continue };

        let raw = match descriptor.spec() {
            TypeSpec::Scalar(ty) if registry.composite(ty).is_some() => fields_of(last),
            TypeSpec::Scalar(_) => RawValue::Str(last.last().cloned().unwrap_or_default()),
            TypeSpec::List(ty) if registry.composite(ty).is_some() => {
                RawValue::Seq(occurrences.iter().map(|occ| fields_of(occ)).collect())
            }
            TypeSpec::List(_) => RawValue::Seq(
                occurrences
                    .iter()
                    .map(|occ| RawValue::Str(occ.last().cloned().unwrap_or_default()))
                    .collect(),
            ),
            TypeSpec::Tuple(_) => fields_of(last),
            TypeSpec::ListOfTuple(_) => {
                RawValue::Seq(occurrences.iter().map(|occ| fields_of(occ)).collect())
            }
        };
        values.insert(descriptor.name().to_string(), raw);
    }
    values
}

fn fields_of(occurrence: &[String]) -> RawValue {
    RawValue::Seq(occurrence.iter().cloned().map(RawValue::Str).collect())
}
