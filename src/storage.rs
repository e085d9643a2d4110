pub mod ledger;
pub mod record;
pub mod registry;

pub use ledger::{Ledger, LineFile, MemoryLedger};
pub use record::{OffenceLine, Record};
pub use registry::{
    AddPersonError, DemeritError, Outcome, Profile, Registry, UpdateError, Veto,
};
