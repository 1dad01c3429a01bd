use std::{
    io::Read,
    path::{Path, PathBuf},
};

mod demo;
mod flatten;
mod grow;
mod nest;
mod terminal;

use arbor::{Config, Record, TreeFields, Value};
use clap::{ArgAction, ValueEnum};
use demo::Demo;
use flatten::Flatten;
use grow::Grow;
use nest::Nest;

use anyhow::Context;
use serde::Serialize;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML file supplying default field names and delimiter
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path).map_err(|message| anyhow::anyhow!(message))?,
            None => Config::default(),
        };

        self.command
            .unwrap_or_else(|| Command::Demo(Demo::default()))
            .run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Flatten nested trees into a parent-linked flat set
    Flatten(Flatten),

    /// Grow a parent-linked flat set into nested trees
    Grow(Grow),

    /// Rebuild nested records from delimiter-encoded keys
    Nest(Nest),

    /// Run a built-in sample tree through flatten and grow (default)
    Demo(Demo),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Flatten(command) => command.run(config),
            Self::Grow(command) => command.run(config),
            Self::Nest(command) => command.run(config),
            Self::Demo(command) => command.run(config),
        }
    }
}

/// Supported document formats for input and output.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

/// Resolves the field-name triple from CLI flags, falling back to the
/// configuration for any flag that was not given.
fn tree_fields(
    config: &Config,
    id: Option<&str>,
    reference: Option<&str>,
    children: Option<&str>,
) -> anyhow::Result<TreeFields> {
    TreeFields::parse(
        id.unwrap_or(&config.id_field),
        reference.unwrap_or(&config.reference_field),
        children.unwrap_or(&config.children_field),
    )
    .context("invalid field name")
}

/// Reads an input document from a path, or from stdin for `-`.
fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))
    }
}

/// Parses a document into a single value.
fn parse_value(text: &str, format: Format) -> anyhow::Result<Value> {
    match format {
        Format::Json => serde_json::from_str(text).context("invalid JSON input"),
        Format::Yaml => serde_yaml::from_str(text).context("invalid YAML input"),
    }
}

/// Parses a document as a sequence of records. A single top-level record is
/// treated as a one-element sequence.
fn parse_records(text: &str, format: Format) -> anyhow::Result<Vec<Record>> {
    match parse_value(text, format)? {
        Value::Record(record) => Ok(vec![record]),
        Value::Seq(values) => values
            .into_iter()
            .map(|element| match element {
                Value::Record(record) => Ok(record),
                other => Err(anyhow::anyhow!(
                    "expected a sequence of records, found `{other}`"
                )),
            })
            .collect(),
        other => Err(anyhow::anyhow!(
            "expected a record or a sequence of records, found `{other}`"
        )),
    }
}

/// Writes a value to stdout in the requested format.
fn write_output<T: Serialize>(value: &T, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(value).context("failed to encode JSON")?
        ),
        Format::Yaml => print!(
            "{}",
            serde_yaml::to_string(value).context("failed to encode YAML")?
        ),
    }
    Ok(())
}
