//! Citation enrichment and display views.

pub mod enrich;
pub mod episode;

pub use enrich::{
    enrich, enrich_all, extract_first_timestamp, ContentType, EnrichedCitation, PLAYBACK_URL_KEY,
};
pub use episode::{BlogPostInfo, EpisodeInfo};
