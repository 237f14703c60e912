pub mod submission;
pub mod submit_ctx;

pub use submission::{apply_outcome, cooldown_after, PartAction, SubmissionFlow, SubmitReport};
pub use submit_ctx::SubmitCtx;
