//! Public facade crate for `docgist`.
//!
//! Re-exports the backend-agnostic types/traits from `docgist-core` together with the
//! heading extractor, summarizer and filters from `docgist-local`.

pub use docgist_core::*;
pub use docgist_local::{
    textprep, DocgistConfig, DocumentPipeline, FilterConfig, HeadingConfig, HeadingExtractor,
    HeadingsParseFilter, SimilarityMatrix, Summarizer, SummaryConfig, SummaryIndexingFilter,
};
