//! Content basis classification for raw user input.
//!
//! A single free-text input may carry a video reference, a topic, or both.
//! [`classify`] splits it without touching the network: the first substring
//! matching the recognized video-URL grammar becomes the video reference and
//! the trimmed remainder becomes the topic.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Recognized video-URL grammar: standard watch/embed/shorts paths and the
/// short host, each followed by a video id.
static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?(?:youtube\.com/(?:watch\?v=|embed/|shorts/)|youtu\.be/)([\w-]+)")
        .expect("video URL grammar compiles")
});

/// The classified seed driving one generation run.
///
/// Invariant: after a successful classification at least one field is
/// present. Both fields absent means the raw input was empty, which callers
/// must treat as a precondition violation rather than a pipeline error.
///
/// # Examples
///
/// ```
/// use atelier_core::{classify, ContentBasis};
///
/// let basis = classify("https://youtu.be/abc123 explain this for kids");
/// assert_eq!(basis.video_reference.as_deref(), Some("https://youtu.be/abc123"));
/// assert_eq!(basis.topic_or_details.as_deref(), Some("explain this for kids"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentBasis {
    /// URI of a single source video, when one was recognized in the input
    pub video_reference: Option<String>,
    /// Free-text topic or extra detail, when any non-URL text remained
    pub topic_or_details: Option<String>,
}

impl ContentBasis {
    /// True when neither a video reference nor a topic is present.
    pub fn is_empty(&self) -> bool {
        self.video_reference.is_none() && self.topic_or_details.is_none()
    }
}

/// Classify raw user input into a [`ContentBasis`].
///
/// Scans for the first substring matching the video-URL grammar. If the match
/// yields a valid video id, it becomes the video reference and the remainder
/// of the input (with the match removed and whitespace trimmed) becomes the
/// topic. Otherwise the whole trimmed input is the topic. Empty or
/// whitespace-only input produces an empty basis.
///
/// Pure and idempotent; no side effects.
pub fn classify(raw: &str) -> ContentBasis {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ContentBasis::default();
    }

    if let Some(m) = VIDEO_URL.find(trimmed) {
        let matched = m.as_str();
        if video_id(matched).is_some() {
            let remainder = trimmed.replacen(matched, "", 1);
            let remainder = remainder.trim();
            tracing::debug!(video = %matched, topic_len = remainder.len(), "Classified input with video reference");
            return ContentBasis {
                video_reference: Some(matched.to_string()),
                topic_or_details: (!remainder.is_empty()).then(|| remainder.to_string()),
            };
        }
    }

    ContentBasis {
        video_reference: None,
        topic_or_details: Some(trimmed.to_string()),
    }
}

/// Extract the video id from a URL matching the recognized grammar.
///
/// # Examples
///
/// ```
/// use atelier_core::video_id;
///
/// assert_eq!(video_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
/// assert_eq!(video_id("https://example.com/watch?v=abc"), None);
/// ```
pub fn video_id(url: &str) -> Option<&str> {
    VIDEO_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|id| !id.is_empty())
}

/// Canonical embed URL for a recognized video URL.
///
/// # Examples
///
/// ```
/// use atelier_core::embed_url;
///
/// assert_eq!(
///     embed_url("https://youtu.be/abc123").as_deref(),
///     Some("https://www.youtube.com/embed/abc123")
/// );
/// ```
pub fn embed_url(url: &str) -> Option<String> {
    video_id(url).map(|id| format!("https://www.youtube.com/embed/{id}"))
}
