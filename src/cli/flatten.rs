use std::path::PathBuf;

use arbor::{Config, transform};
use clap::Parser;
use tracing::instrument;

/// Command arguments for `arbor flatten`.
#[derive(Debug, Parser)]
#[command(about = "Flatten nested trees into a parent-linked flat set")]
pub struct Flatten {
    /// Input document (`-` for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Input and output format
    #[arg(long, value_enum, default_value_t)]
    format: super::Format,

    /// Name of the identifier field
    #[arg(long)]
    id: Option<String>,

    /// Name of the parent-reference field
    #[arg(long)]
    reference: Option<String>,

    /// Name of the children field
    #[arg(long)]
    children: Option<String>,
}

impl Flatten {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let fields = super::tree_fields(
            config,
            self.id.as_deref(),
            self.reference.as_deref(),
            self.children.as_deref(),
        )?;

        let text = super::read_input(&self.input)?;
        let forest = super::parse_records(&text, self.format)?;

        let flat = transform::flatten(&forest, &fields);
        super::write_output(&flat, self.format)
    }
}
