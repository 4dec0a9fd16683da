//! Metadata resolution, citation enrichment and the query pipeline.
//!
//! Sits on top of `costbot-generation`: each answered query has its cited
//! sources looked up in object storage and its citations turned into
//! display-ready records.

pub mod citations;
pub mod metadata;
pub mod rag;

#[cfg(test)]
mod tests;

pub use citations::{BlogPostInfo, ContentType, EnrichedCitation, EpisodeInfo};
pub use metadata::{
    MetadataResolution, MetadataResolver, ObjectStore, S3ObjectStore, SourceMetadata,
};
pub use rag::{ask, AskOptions, AskOutcome, QueryContext};
