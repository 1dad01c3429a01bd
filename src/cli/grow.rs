use std::path::PathBuf;

use arbor::{Config, GrowOptions, transform};
use clap::Parser;
use tracing::instrument;

/// Command arguments for `arbor grow`.
#[derive(Debug, Parser)]
#[command(about = "Grow a parent-linked flat set into nested trees")]
pub struct Grow {
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

    /// Strip the reference field from records nested under a parent
    #[arg(long)]
    remove_reference: bool,

    /// Fail on duplicate identifiers instead of keeping the last record
    #[arg(long)]
    reject_duplicates: bool,
}

impl Grow {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let fields = super::tree_fields(
            config,
            self.id.as_deref(),
            self.reference.as_deref(),
            self.children.as_deref(),
        )?;
        let options = GrowOptions {
            remove_reference: self.remove_reference,
            reject_duplicates: self.reject_duplicates,
        };

        let text = super::read_input(&self.input)?;
        let records = super::parse_records(&text, self.format)?;

        let forest = transform::grow(&records, &fields, &options)?;
        super::write_output(&forest, self.format)
    }
}
