//! Terminal and JSON rendering of answered queries.

use costbot_core::AppResult;
use costbot_knowledge::{AskOutcome, EnrichedCitation, EpisodeInfo};
use std::fmt::Write;

/// Pretty-printed retrieval configuration.
pub fn render_retrieval_configuration(configuration: &serde_json::Value) -> AppResult<String> {
    let json = serde_json::to_string_pretty(configuration)?;
    Ok(format!("Retrieval Configuration:\n{}\n", json))
}

/// The outcome as a single JSON document.
pub fn render_json(outcome: &AskOutcome) -> AppResult<String> {
    let mut value = serde_json::to_value(outcome)?;
    if let Some(object) = value.as_object_mut() {
        object.insert(
            "metadataFailures".to_string(),
            serde_json::json!(outcome.failure_messages()),
        );
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Answer and citations as markdown-flavoured text.
pub fn render_text(outcome: &AskOutcome) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "## Answer:\n{}\n", outcome.answer.trim());

    if outcome.citations.is_empty() {
        return out;
    }

    let _ = writeln!(out, "### Citations:");
    for (i, citation) in outcome.citations.iter().enumerate() {
        let _ = writeln!(out);
        render_citation(&mut out, i + 1, citation);
    }

    out
}

fn render_citation(out: &mut String, number: usize, enriched: &EnrichedCitation) {
    let _ = writeln!(out, "#### Citation {}", number);
    let _ = writeln!(out, "{}", enriched.citation.generated_text.trim());

    for reference in &enriched.citation.retrieved_references {
        let _ = writeln!(out, "> {}", reference.content_text.trim().replace('\n', "\n> "));
    }

    if let (Some(url), Some(start)) = (&enriched.playback_url, enriched.playback_start) {
        let _ = writeln!(out, "Video: {}", video_link(url, start));
    }

    if let Some(episode) = enriched.episode_info() {
        render_episode(out, &episode);
    }

    if let Some(post) = enriched.blog_post_info() {
        if let Some(url) = post.url {
            let _ = writeln!(out, "CloudFix blog post: {}", url);
        }
    }
}

fn render_episode(out: &mut String, episode: &EpisodeInfo) {
    let title = match &episode.episode_number {
        Some(number) => format!("Episode {}", number),
        None => "Episode".to_string(),
    };
    match &episode.show_name {
        Some(show) => {
            let _ = writeln!(out, "{} ({})", title, show);
        }
        None => {
            let _ = writeln!(out, "{}", title);
        }
    }

    let _ = writeln!(out, "  Guest: {}", episode.guest_name);

    let fields = [
        ("Scheduled Date", episode.scheduled_display()),
        ("AWS Services", episode.aws_services.clone()),
        ("LinkedIn", episode.linkedin_url.clone()),
        ("YouTube", episode.youtube_url.clone()),
        ("Recorded Episode (Video)", episode.recording_url.clone()),
        ("Recorded Episode (Audio)", episode.audio_url.clone()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(out, "  {}: {}", label, value);
        }
    }
}

/// Playback link starting at `start` seconds, rounded to the nearest second.
pub fn video_link(url: &str, start: f64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}t={}s", url, separator, start.round() as u64)
}

/// Print per-source metadata failures to stderr.
pub fn report_failures(outcome: &AskOutcome) {
    for message in outcome.failure_messages() {
        eprintln!("Warning: metadata unavailable for {}", message);
    }
}
