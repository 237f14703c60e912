pub mod cooldown_gate;
pub mod record_store;
pub mod response_classifier;
pub mod solution_runner;

pub use cooldown_gate::{CooldownGate, CooldownStore};
pub use record_store::RunRecordStore;
pub use response_classifier::ResponseClassifier;
pub use solution_runner::{PartRun, RunOutcome, SolutionRunner};
