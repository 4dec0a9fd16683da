//! Citation enrichment.
//!
//! Joins each citation with the metadata of its primary source and derives
//! the fields the presentation layer needs: the playback link and start
//! offset for recorded episodes, and the content-type tag that picks the
//! display template.

use super::episode::{BlogPostInfo, EpisodeInfo};
use crate::metadata::{MetadataResolution, SourceMetadata};
use costbot_generation::filter::{BLOG_POST_TAG, CONTENT_TYPE_KEY, LIVESTREAM_TAG};
use costbot_generation::Citation;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Attribute holding the playback URL of a recorded episode.
pub const PLAYBACK_URL_KEY: &str = "youtube_url";

/// First bracketed decimal, e.g. `[123.45]`.
static TIMESTAMP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([0-9]+\.[0-9]+)\]").expect("timestamp pattern is valid"));

/// Kind of source document, taken from its `content_type` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    /// Full livestream episode
    Episode,
    /// Blog post
    BlogPost,
    /// Any other tag, kept verbatim
    Other(String),
}

impl ContentType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            LIVESTREAM_TAG => Self::Episode,
            BLOG_POST_TAG => Self::BlogPost,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Episode => LIVESTREAM_TAG,
            Self::BlogPost => BLOG_POST_TAG,
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for ContentType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        content_type.as_str().to_string()
    }
}

/// A citation with the metadata of its primary source and derived fields.
///
/// Derived fields are `None` whenever the metadata or the attribute they
/// come from is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCitation {
    pub citation: Citation,

    pub metadata: Option<SourceMetadata>,

    /// Recording to play for this citation
    pub playback_url: Option<String>,

    /// Offset into the recording, in seconds
    pub playback_start: Option<f64>,

    pub content_type: Option<ContentType>,
}

impl EnrichedCitation {
    /// Episode card data, for citations backed by a recording.
    pub fn episode_info(&self) -> Option<EpisodeInfo> {
        self.playback_url.as_ref()?;
        self.metadata
            .as_ref()
            .map(|m| EpisodeInfo::from_attributes(&m.attributes))
    }

    /// Blog post info line, for citations backed by a blog post.
    pub fn blog_post_info(&self) -> Option<BlogPostInfo> {
        if self.content_type != Some(ContentType::BlogPost) {
            return None;
        }
        self.metadata
            .as_ref()
            .map(|m| BlogPostInfo::from_attributes(&m.attributes))
    }
}

/// Enrich one citation from the resolved metadata.
pub fn enrich(citation: &Citation, metadata: &MetadataResolution) -> EnrichedCitation {
    let source = citation
        .primary_locator()
        .and_then(|locator| metadata.get(locator))
        .cloned();

    let Some(source) = source else {
        return EnrichedCitation {
            citation: citation.clone(),
            metadata: None,
            playback_url: None,
            playback_start: None,
            content_type: None,
        };
    };

    let playback_url = source.text(PLAYBACK_URL_KEY);
    let playback_start = match (&playback_url, citation.primary_reference()) {
        (Some(_), Some(reference)) => extract_first_timestamp(&reference.content_text),
        _ => None,
    };
    let content_type = source
        .text(CONTENT_TYPE_KEY)
        .map(|tag| ContentType::from_tag(&tag));

    EnrichedCitation {
        citation: citation.clone(),
        metadata: Some(source),
        playback_url,
        playback_start,
        content_type,
    }
}

/// Enrich every citation, preserving order.
pub fn enrich_all(citations: &[Citation], metadata: &MetadataResolution) -> Vec<EnrichedCitation> {
    citations.iter().map(|c| enrich(c, metadata)).collect()
}

/// Seconds offset of the first `[<digits>.<digits>]` token in `text`.
pub fn extract_first_timestamp(text: &str) -> Option<f64> {
    TIMESTAMP_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fakes::{citation, resolution};
    use serde_json::json;

    #[test]
    fn test_extract_first_timestamp() {
        assert_eq!(
            extract_first_timestamp("...discussed at [42.50] during the call"),
            Some(42.5)
        );
        assert_eq!(
            extract_first_timestamp("[3.0] first, then [99.9]"),
            Some(3.0)
        );
        assert_eq!(extract_first_timestamp("no marker here"), None);
        assert_eq!(extract_first_timestamp("integer only [42]"), None);
        assert_eq!(extract_first_timestamp("unclosed [42.5"), None);
    }

    #[test]
    fn test_timestamp_requires_ascii_digits() {
        assert_eq!(
            extract_first_timestamp("at [\u{664}\u{662}.\u{665}] then [7.5]"),
            Some(7.5)
        );
    }

    #[test]
    fn test_missing_metadata_leaves_fields_unset() {
        let cited = citation("answer part", &[("at [5.0] we said", "s3://b/ep.txt")]);
        let enriched = enrich(&cited, &MetadataResolution::default());

        assert_eq!(enriched.citation, cited);
        assert!(enriched.metadata.is_none());
        assert!(enriched.playback_url.is_none());
        assert!(enriched.playback_start.is_none());
        assert!(enriched.content_type.is_none());
        assert!(enriched.episode_info().is_none());
        assert!(enriched.blog_post_info().is_none());
    }

    #[test]
    fn test_citation_without_references() {
        let cited = citation("answer part", &[]);
        let enriched = enrich(&cited, &MetadataResolution::default());
        assert!(enriched.metadata.is_none());
    }

    #[test]
    fn test_episode_citation() {
        let cited = citation("part", &[("we covered it at [128.75] in depth", "s3://b/ep.txt")]);
        let metadata = resolution(&[(
            "s3://b/ep.txt",
            json!({
                "content_type": "ame_full_episode",
                "youtube_url": "https://www.youtube.com/watch?v=abc",
                "ep_num": 12
            }),
        )]);

        let enriched = enrich(&cited, &metadata);

        assert_eq!(
            enriched.playback_url.as_deref(),
            Some("https://www.youtube.com/watch?v=abc")
        );
        assert_eq!(enriched.playback_start, Some(128.75));
        assert_eq!(enriched.content_type, Some(ContentType::Episode));
        assert_eq!(enriched.episode_info().unwrap().episode_number.as_deref(), Some("12"));
        assert!(enriched.blog_post_info().is_none());
    }

    #[test]
    fn test_timestamp_ignored_without_playback_url() {
        let cited = citation("part", &[("see [10.5]", "s3://b/post.md")]);
        let metadata = resolution(&[(
            "s3://b/post.md",
            json!({"content_type": "cloudfix_blogpost", "x_url": "https://example.com/post"}),
        )]);

        let enriched = enrich(&cited, &metadata);

        assert!(enriched.playback_url.is_none());
        assert!(enriched.playback_start.is_none());
        assert_eq!(enriched.content_type, Some(ContentType::BlogPost));
        assert_eq!(
            enriched.blog_post_info().unwrap().url.as_deref(),
            Some("https://example.com/post")
        );
    }

    #[test]
    fn test_missing_attributes_degrade() {
        let cited = citation("part", &[("text", "s3://b/doc.txt")]);
        let metadata = resolution(&[("s3://b/doc.txt", json!({}))]);

        let enriched = enrich(&cited, &metadata);

        assert!(enriched.metadata.is_some());
        assert!(enriched.playback_url.is_none());
        assert!(enriched.content_type.is_none());
    }

    #[test]
    fn test_unknown_content_type_kept() {
        assert_eq!(
            ContentType::from_tag("podcast_clip"),
            ContentType::Other("podcast_clip".to_string())
        );
        assert_eq!(ContentType::from_tag("ame_full_episode").as_str(), "ame_full_episode");
        assert_eq!(
            serde_json::to_value(ContentType::BlogPost).unwrap(),
            json!("cloudfix_blogpost")
        );
    }

    #[test]
    fn test_enrich_all_preserves_order() {
        let citations = vec![
            citation("first", &[("a", "s3://b/1")]),
            citation("second", &[("b", "s3://b/2")]),
        ];
        let enriched = enrich_all(&citations, &MetadataResolution::default());
        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].citation.generated_text, "first");
        assert_eq!(enriched[1].citation.generated_text, "second");
    }
}
