use std::path::Path;

use clap::Parser;
use registry::{PersonId, Profile, Registry};
use tracing::instrument;

use super::terminal::Paint;

#[derive(Debug, Parser)]
#[command(about = "Display a person with their demerit points")]
pub struct Show {
    /// The ID of the person to display
    id: PersonId,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let registry = Registry::open(root);

        let Some(profile) = registry.profile(&self.id)? else {
            anyhow::bail!("Person {} not found", self.id);
        };

        match self.output {
            OutputFormat::Pretty => output_pretty(&profile),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &profile)?;
                println!();
            }
        }

        Ok(())
    }
}

fn output_pretty(profile: &Profile) {
    let record = &profile.record;

    println!("{}", format!("# {}", record.id).heading());
    println!("  Name:      {} {}", record.first_name, record.last_name);
    println!("  Address:   {}", record.address.replace('|', ", "));
    println!("  Birthdate: {}", record.birthdate);
    println!();

    println!("{}", "Demerit points".muted());
    if profile.demerit_points.is_empty() {
        println!("  none");
    }
    for (date, points) in &profile.demerit_points {
        println!("  {date}  {points}");
    }
    println!();

    let standing = &profile.standing;
    let summary = format!(
        "{} points in the last two years (limit {})",
        standing.window_total, standing.limit
    );
    if profile.is_suspended() {
        println!("{}", format!("⚠️  Suspended: {summary}").suspended());
    } else {
        println!("{}", format!("Not suspended: {summary}").stored());
    }
}
