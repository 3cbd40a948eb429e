// Fri Oct 16 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Invalid AOB token '{token}' at position {position}")]
    InvalidToken { token: String, position: usize },
    #[error("AOB pattern is empty")]
    Empty,
}
