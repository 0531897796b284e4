//! Local implementations for docgist: tagged-stream heading extraction, extractive
//! summaries, text cleanup, byte-to-text extraction, and the parse/index filters that write
//! the results into document metadata.
//!
//! Everything here is synchronous and free of shared state; components own their config.

pub mod config;
pub mod extract;
pub mod filters;
pub mod heading;
pub mod summary;
pub mod tagged;
pub mod textprep;

pub use config::{DocgistConfig, FilterConfig, HeadingConfig, SummaryConfig};
pub use filters::{DocumentPipeline, HeadingsParseFilter, SummaryIndexingFilter};
pub use heading::HeadingExtractor;
pub use summary::{SimilarityMatrix, Summarizer};
