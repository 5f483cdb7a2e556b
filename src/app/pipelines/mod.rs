pub mod enrich_pipeline;
pub mod search_pipeline;

pub use enrich_pipeline::{EnrichPipeline, MatchRequest};
pub use search_pipeline::{SearchPipeline, SearchRequest};
