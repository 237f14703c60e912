pub mod logging;

pub use logging::{ms_fixed, truncate_text};
