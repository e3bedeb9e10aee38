//! Domain models: entries, durations, monthly metadata, and roles.

pub mod common;
pub mod entry;
pub mod monthly;
pub mod role;
pub mod time;

pub use common::Displayable;
pub use entry::{Entry, EntryType};
pub use monthly::MonthlyInformation;
pub use role::Role;
pub use time::Time;
