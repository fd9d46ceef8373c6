//! Query-filter-project engine behind the list tools
//!
//! ```text
//! fetch_all(kind) ──► state / alias filters ──► entity-reference filter ──► project ──► summary
//!                      (summary fields only)     (per-record config fetch)   compact | verbose
//! ```
//!
//! Per-record fetches fan out up to the engine's concurrency bound and are
//! reassembled in the filtered order.

mod engine;
mod filter;
mod reference;

pub use engine::{
    Projection, QueryEngine, QueryError, QueryOutcome, QueryResult, COMPACT_HINT,
    DEFAULT_FETCH_CONCURRENCY,
};
pub use filter::FilterCriteria;
pub use reference::{record_references, references_entity};
