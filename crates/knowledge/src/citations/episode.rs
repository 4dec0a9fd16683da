//! Typed views over source attributes for display.

use crate::metadata::{attribute_text, Attributes};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Shown when an episode has no guest recorded.
pub const GUEST_FALLBACK: &str = "Guest details not available";

const SCHEDULED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SCHEDULED_DISPLAY_FORMAT: &str = "%B %d, %Y at %H:%M";

/// Episode card data of a recorded livestream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeInfo {
    pub episode_number: Option<String>,
    pub show_name: Option<String>,
    pub guest_name: String,
    pub scheduled_date: Option<NaiveDateTime>,
    pub aws_services: Option<String>,
    pub linkedin_url: Option<String>,
    pub youtube_url: Option<String>,
    pub recording_url: Option<String>,
    pub audio_url: Option<String>,
}

impl EpisodeInfo {
    pub fn from_attributes(attributes: &Attributes) -> Self {
        let text = |key: &str| attribute_text(attributes, key);

        Self {
            episode_number: text("ep_num"),
            show_name: text("show_name"),
            guest_name: text("guest_1_name").unwrap_or_else(|| GUEST_FALLBACK.to_string()),
            scheduled_date: text("scheduled_date").and_then(|raw| {
                NaiveDateTime::parse_from_str(&raw, SCHEDULED_DATE_FORMAT)
                    .map_err(|e| tracing::debug!("Unparseable scheduled_date {:?}: {}", raw, e))
                    .ok()
            }),
            aws_services: text("aws_services"),
            linkedin_url: text("linkedin_url"),
            youtube_url: text("youtube_url"),
            recording_url: text("recorded_s3_uri"),
            audio_url: text("audio_url"),
        }
    }

    /// Scheduled date as e.g. "March 07, 2024 at 17:00".
    pub fn scheduled_display(&self) -> Option<String> {
        self.scheduled_date
            .map(|date| date.format(SCHEDULED_DISPLAY_FORMAT).to_string())
    }
}

/// Info line of a blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPostInfo {
    pub url: Option<String>,
}

impl BlogPostInfo {
    pub fn from_attributes(attributes: &Attributes) -> Self {
        Self {
            url: attribute_text(attributes, "x_url"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attributes(value: serde_json::Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_full_episode() {
        let info = EpisodeInfo::from_attributes(&attributes(json!({
            "ep_num": 101,
            "show_name": "AWS Made Easy",
            "guest_1_name": "Jeff Barr",
            "scheduled_date": "2024-03-07 17:00:00",
            "aws_services": "S3, EBS",
            "linkedin_url": "https://linkedin.com/x",
            "youtube_url": "https://youtube.com/watch?v=1",
            "recorded_s3_uri": "s3://rec/101.mp4",
            "audio_url": "https://audio/101.mp3"
        })));

        assert_eq!(info.episode_number.as_deref(), Some("101"));
        assert_eq!(info.guest_name, "Jeff Barr");
        assert_eq!(
            info.scheduled_display().as_deref(),
            Some("March 07, 2024 at 17:00")
        );
        assert_eq!(info.recording_url.as_deref(), Some("s3://rec/101.mp4"));
    }

    #[test]
    fn test_sparse_episode() {
        let info = EpisodeInfo::from_attributes(&attributes(json!({
            "scheduled_date": "next tuesday"
        })));

        assert_eq!(info.guest_name, GUEST_FALLBACK);
        assert!(info.episode_number.is_none());
        assert!(info.scheduled_date.is_none());
        assert!(info.scheduled_display().is_none());
    }

    #[test]
    fn test_blog_post_info() {
        let info = BlogPostInfo::from_attributes(&attributes(json!({"x_url": "https://blog/x"})));
        assert_eq!(info.url.as_deref(), Some("https://blog/x"));
    }
}
