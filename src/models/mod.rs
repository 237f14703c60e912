pub mod cooldown;
pub mod day;
pub mod outcome;
pub mod record;

pub use cooldown::Cooldown;
pub use day::{Day, DaySelector, Part, DAYS_PER_YEAR};
pub use outcome::{ClassifiedOutcome, OutcomeKind, OutcomePayload};
pub use record::{Answer, DayRecord, PartRecord, RunConfig};
