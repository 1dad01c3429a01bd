use std::path::PathBuf;

use arbor::{Config, NestOptions, Value, transform};
use clap::Parser;
use tracing::instrument;

/// Command arguments for `arbor nest`.
#[derive(Debug, Parser)]
#[command(about = "Rebuild nested records from delimiter-encoded keys")]
pub struct Nest {
    /// Input document (`-` for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Input and output format
    #[arg(long, value_enum, default_value_t)]
    format: super::Format,

    /// Delimiter marking nesting boundaries in keys
    #[arg(long)]
    delimiter: Option<String>,
}

impl Nest {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let options = NestOptions {
            delimiter: self
                .delimiter
                .unwrap_or_else(|| config.delimiter.clone()),
        };

        let text = super::read_input(&self.input)?;

        // The output mirrors the input shape: one record in, one record out.
        match super::parse_value(&text, self.format)? {
            Value::Record(record) => {
                super::write_output(&transform::nest(&record, &options), self.format)
            }
            Value::Seq(values) => {
                let records = values
                    .into_iter()
                    .map(|element| match element {
                        Value::Record(record) => Ok(record),
                        other => Err(anyhow::anyhow!(
                            "expected a sequence of records, found `{other}`"
                        )),
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                super::write_output(&transform::nest_all(&records, &options), self.format)
            }
            other => Err(anyhow::anyhow!(
                "expected a record or a sequence of records, found `{other}`"
            )),
        }
    }
}
