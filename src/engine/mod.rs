// Fri Oct 16 2026 - Alex

pub mod generator;
pub mod request;

pub use generator::SignatureGenerator;
pub use request::{Analysis, AnalysisRequest, ByteSource};
