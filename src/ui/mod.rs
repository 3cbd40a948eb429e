// Fri Oct 16 2026 - Alex

pub mod cli;
pub mod progress;

pub use cli::{CliInterface, Commands, SourceArgs};
pub use progress::BatchProgress;
