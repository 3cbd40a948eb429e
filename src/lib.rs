// Fri Oct 16 2026 - Alex

pub mod binary;
pub mod codec;
pub mod config;
pub mod engine;
pub mod output;
pub mod pattern;
pub mod signature;
pub mod ui;
pub mod utils;

pub use binary::LibraryFile;
pub use codec::{Architecture, CodecRegistry, InstructionCodec};
pub use config::Config;
pub use engine::{Analysis, AnalysisRequest, SignatureGenerator};
pub use pattern::{AobPattern, PatternBuilder};
pub use signature::{SearchComposer, SearchOptions, SearchResult};
