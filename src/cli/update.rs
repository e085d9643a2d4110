use std::path::Path;

use registry::{Changes, Details, PersonId, Registry};
use tracing::instrument;

use super::terminal::Paint;

#[derive(Debug, clap::Parser)]
pub struct Update {
    /// The ID of the person to update
    id: PersonId,

    /// New first name
    #[arg(long)]
    first_name: Option<String>,

    /// New last name
    #[arg(long)]
    last_name: Option<String>,

    /// New address as number|street|city|state|country
    #[arg(long)]
    address: Option<String>,

    /// New birthdate as DD-MM-YYYY (cannot be combined with other changes)
    #[arg(long)]
    birthdate: Option<String>,

    /// Reassign the person a new ID
    #[arg(long)]
    new_id: Option<PersonId>,
}

impl Update {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut registry = Registry::open(root);

        let Some(current) = registry.find(&self.id)? else {
            anyhow::bail!("Person {} not found", self.id);
        };

        let details = Details::parse(
            self.first_name.as_deref().unwrap_or(&current.first_name),
            self.last_name.as_deref().unwrap_or(&current.last_name),
            self.address.as_deref().unwrap_or(&current.address),
            self.birthdate.as_deref().unwrap_or(&current.birthdate),
        )?;

        let mut changes = Changes::new(details);
        if let Some(new_id) = self.new_id {
            changes = changes.with_id(new_id);
        }

        registry.update(&self.id, &changes)?;

        let id = changes.new_id.as_ref().unwrap_or(&self.id);
        println!("{}", format!("✅ Updated {id}").stored());
        Ok(())
    }
}
