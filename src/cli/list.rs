use std::path::Path;

use clap::Parser;
use registry::{Record, Registry};
use tracing::instrument;

use super::terminal::Paint;

#[derive(Debug, Parser)]
#[command(about = "List everyone in the registry")]
pub struct List {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let registry = Registry::open(root);
        let records = registry.records()?;

        if records.is_empty() {
            println!("No people found yet. Add one with 'reg add'.");
            return Ok(());
        }

        match self.output {
            OutputFormat::Table => render_table(&records),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &records)?;
                println!();
            }
        }

        Ok(())
    }
}

fn render_table(records: &[Record]) {
    let name_width = records
        .iter()
        .map(|r| r.first_name.chars().count() + r.last_name.chars().count() + 1)
        .max()
        .unwrap_or(0)
        .max(4);

    println!(
        "{}",
        format!("{:<10}  {:<name_width$}  {:<10}  ADDRESS", "ID", "NAME", "BIRTHDATE").muted()
    );
    for record in records {
        let name = format!("{} {}", record.first_name, record.last_name);
        println!(
            "{:<10}  {name:<name_width$}  {:<10}  {}",
            record.id,
            record.birthdate,
            record.address.replace('|', ", ")
        );
    }
}
