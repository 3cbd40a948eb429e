// Fri Oct 16 2026 - Alex

//! Turns an AOB into a scanner query: typed values are carved from the concrete runs, ranked
//! by how rare they are in the library, and the rarest are composed into a group search.

pub mod composer;
pub mod error;
pub mod ranker;
pub mod result;
pub mod values;

pub use composer::{SearchComposer, SearchOptions, MAX_GROUP_VALUES};
pub use error::SignatureError;
pub use ranker::{count_occurrences, OccurrenceRanker, RankedCandidate};
pub use result::{GroupSearch, SearchResult, SingleValue};
pub use values::{ValueCandidate, ValueExtractor, ValueType};
