// Fri Oct 16 2026 - Alex

pub mod aob;
pub mod builder;
pub mod error;

pub use aob::{AobPattern, AobToken, Segment, WILDCARD};
pub use builder::PatternBuilder;
pub use error::PatternError;
