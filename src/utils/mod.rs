pub mod constants;
pub mod progress;
pub mod timestamps;

pub use constants::*;
pub use progress::ProgressReporter;
pub use timestamps::parse_timestamp;
