use anyhow::{Context, Result};
use cfgstack::init_logging;
use cfgstack::prelude::*;
use clap::{CommandFactory, FromArgMatches, Parser};
use log::debug;
use serde_json::json;
use std::path::PathBuf;

config_schema! {
    /// Settings of the example tool.
    #[derive(Debug)]
    struct ExampleToolConfig {
        message: String as "MESSAGE" = Setting::string().default("Hello!"),
        config_file: Option<PathBuf> as "CONFIG_FILE" = Setting::string().default(json!(null)),
    }
}

/// Command-line options for the example tool.
///
/// Every option is also read from `EXAMPLE_<NAME>` environment variables and
/// from the config file; flags given here take precedence over both.
#[derive(Parser)]
#[command(name = "example-tool", version)]
struct Cli {
    /// Path to a JSON5 or YAML config file
    #[arg(long)]
    config_file: Option<PathBuf>,
    /// The message that will be printed
    #[arg(long)]
    message: Option<String>,
}

fn main() -> Result<()> {
    init_logging();

    let command = Cli::command();
    let matches = command.clone().get_matches();
    let cli = Cli::from_arg_matches(&matches).context("failed to parse command-line arguments")?;
    debug!(
        "parsed arguments (message={:?}, config_file={:?})",
        cli.message, cli.config_file
    );

    let mut config = ExampleToolConfig::layered([EnvConfig::with_prefix("EXAMPLE_")
        .preserve_case()
        .boxed()])
    .context("invalid configuration in the environment")?;

    // Command-line arguments have the highest precedence.
    config.layers_mut().push(ArgsConfig::from_matches(
        &command,
        &matches,
        ArgsProjection::new().uppercase(),
    ));

    // The config file sits between the environment and the command line.
    if let Some(path) = config
        .get_as::<Option<PathBuf>>("CONFIG_FILE")
        .context("invalid CONFIG_FILE")?
    {
        let file = FileConfig::load(&path)
            .with_context(|| format!("failed to load config file {}", path.display()))?;
        config
            .layers_mut()
            .insert(1, ProjectedConfig::new(file, uppercase_projection()));
    }

    config.validate().context("invalid configuration")?;
    eprintln!("Config: {config}");

    let resolved: ExampleToolConfig = config.extract()?;
    debug!("resolved config: {resolved:?}");
    println!("{}", resolved.message);
    Ok(())
}
