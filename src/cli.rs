use std::path::{Path, PathBuf};

mod list;
mod show;
mod terminal;
mod update;

use clap::ArgAction;
use list::List;
use registry::{CalendarDate, DemeritPoints, Offence, Person, PersonId, Registry};
use show::Show;
use terminal::Paint;
use tracing::instrument;
use update::Update;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the root of the registry directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run(&self.root)
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
    /// Initialize a new registry
    Init(Init),

    /// Add a person
    Add(Add),

    /// Update a person's details
    ///
    /// Details that are not given keep their stored values.
    Update(Update),

    /// Record demerit points against a person
    Demerit(Demerit),

    /// Show a person with their demerit points and suspension status
    Show(Show),

    /// List everyone in the registry
    List(List),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run(root)?,
            Self::Add(command) => command.run(root)?,
            Self::Update(command) => command.run(root)?,
            Self::Demerit(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::List(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(registry::Config::FILE_NAME);
        if config_path.exists() {
            anyhow::bail!(
                "Registry already initialized (found existing {})",
                registry::Config::FILE_NAME
            );
        }

        std::fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", root.display()))?;

        registry::Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", registry::Config::FILE_NAME))?;

        println!("Initialized registry in {}", root.display());
        println!("  Created: {}", registry::Config::FILE_NAME);
        println!();
        println!("Next steps:");
        println!(
            "  reg add 56s_d%&fAB Jane Citizen \"32|Highland Street|Melbourne|Victoria|Australia\" \
             15-11-1990"
        );

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Add {
    /// The person ID (10 characters, e.g. 56s_d%&fAB)
    id: String,

    /// First name
    first_name: String,

    /// Last name
    last_name: String,

    /// Address as number|street|city|state|country
    address: String,

    /// Birthdate as DD-MM-YYYY
    birthdate: String,
}

impl Add {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let person = Person::parse(
            &self.id,
            &self.first_name,
            &self.last_name,
            &self.address,
            &self.birthdate,
        )?;

        let mut registry = Registry::open(root);
        registry.insert(&person)?;

        println!("{}", format!("✅ Added {}", person.id).stored());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Demerit {
    /// The person ID
    id: PersonId,

    /// Offence date as DD-MM-YYYY
    date: CalendarDate,

    /// Demerit points (1-6)
    points: DemeritPoints,
}

impl Demerit {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut registry = Registry::open(root);
        let standing = registry.record_offence(
            &self.id,
            Offence {
                date: self.date,
                points: self.points,
            },
        )?;

        println!(
            "{}",
            format!(
                "✅ Recorded {} points against {} on {}",
                self.points, self.id, self.date
            )
            .stored()
        );

        let summary = format!(
            "{} points in the last two years (limit {})",
            standing.window_total, standing.limit
        );
        if standing.suspended {
            println!("{}", format!("⚠️  Suspended: {summary}").suspended());
        } else {
            println!("{}", summary.muted());
        }

        Ok(())
    }
}
