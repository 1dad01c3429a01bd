use arbor::{Config, GrowOptions, Record, Value, transform};
use clap::Parser;
use tracing::instrument;

use super::terminal::Colorize;

/// Command arguments for `arbor demo`.
#[derive(Debug, Default, Parser)]
#[command(about = "Run a built-in sample tree through flatten and grow")]
pub struct Demo {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: super::Format,
}

impl Demo {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let fields = super::tree_fields(config, None, None, None)?;
        let forest = sample_forest();

        println!("{}", "Flat:".info());
        let flat = transform::flatten(&forest, &fields);
        super::write_output(&flat, self.format)?;

        println!("{}", "Tree:".info());
        let regrown = transform::grow(&flat, &fields, &GrowOptions::default())?;
        super::write_output(&regrown, self.format)?;

        if transform::flatten(&regrown, &fields) == flat {
            println!("{}", "Round trip reproduced the flat set".success());
        } else {
            println!("{}", "Round trip diverged".warning());
        }

        Ok(())
    }
}

/// A root with two children, the second of which carries a leaf of its own.
fn sample_forest() -> Vec<Record> {
    vec![Record::from_iter([
        ("id", Value::from(1)),
        ("title", Value::from("A root node")),
        (
            "children",
            Value::Seq(vec![
                Value::Record(Record::from_iter([
                    ("id", Value::from(2)),
                    ("title", Value::from("A child")),
                ])),
                Value::Record(Record::from_iter([
                    ("id", Value::from(3)),
                    ("title", Value::from("Another child")),
                    (
                        "children",
                        Value::Seq(vec![Value::Record(Record::from_iter([
                            ("id", Value::from(4)),
                            ("title", Value::from("A leaf")),
                        ]))]),
                    ),
                ])),
            ]),
        ),
    ])]
}
