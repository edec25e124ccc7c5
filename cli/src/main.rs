use std::path::PathBuf;

use clap::Parser;
use script_args_cli::bridge;
use script_args_core::{ArgumentsSchema, ProcessEnv, Resolver, TypeRegistry, UserValues};

/// Resolve script arguments against a TOML schema.
///
/// Flags declared by the schema are parsed from the trailing arguments;
/// values missing there fall back to the environment and to schema
/// defaults. The resolved mapping is printed as JSON on stdout.
#[derive(Debug, Parser)]
#[command(name = "script-args", version)]
struct Cli {
    /// TOML schema describing the arguments.
    #[arg(long)]
    schema: PathBuf,

    /// Optional YAML document with pre-parsed user values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Script arguments to resolve, exactly as they would reach the script.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let registry = TypeRegistry::with_builtins();
    let schema = ArgumentsSchema::from_toml_file(&cli.schema, &registry)?;
    let user = match &cli.config {
        Some(path) => UserValues::from_yaml_file(path)?,
        None => UserValues::default(),
    };

    let command = bridge::build_command(&schema, &registry);
    let matches = match command.try_get_matches_from(&cli.args) {
        Ok(matches) => matches,
        // Usage errors (unknown flag, wrong field count, missing value)
        // follow clap's own failure convention.
        Err(err) => err.exit(),
    };
    let cli_values = bridge::decode_matches(&schema, &registry, &matches);

    let resolved = Resolver::new(&schema, &registry)
        .with_cli_values(cli_values)
        .with_user_values(user.into_values())
        .resolve(&ProcessEnv)?;
    println!("{}", serde_json::to_string_pretty(resolved.values())?);
    Ok(())
}
