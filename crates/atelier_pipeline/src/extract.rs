//! Recovery of structured payloads from free-form model text.
//!
//! Generative backends demarcate structured output with triple-backtick
//! fences, optionally tagged with a content-type hint, but do not always
//! comply. These extractors unwrap a whole-string fence when one is present
//! and fall back progressively. Both functions are pure: same input, same
//! output, no observable effects.

use atelier_error::{AtelierResult, ExtractError};
use regex::Regex;
use std::sync::LazyLock;

/// A fence spanning the entire (trimmed) string, with an optional language
/// tag; the inner content is capture 2.
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").expect("fence pattern compiles")
});

/// Unwrap a whole-string fence, if present.
fn unwrap_fence(text: &str) -> Option<&str> {
    FENCE
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim())
}

/// Extract a JSON value from model text.
///
/// Trims the input, unwraps a whole-string fence when present, and attempts
/// a strict parse. On failure, a recovery pass parses the substring between
/// the first `{` and the last `}` inclusive. If both attempts fail, the
/// error carries a bounded preview of the text and the underlying parse
/// message.
///
/// # Examples
///
/// ```
/// use atelier_pipeline::extract_json;
///
/// let value = extract_json("```json\n{\"spec\": \"build an app\"}\n```").unwrap();
/// assert_eq!(value["spec"], "build an app");
/// ```
///
/// # Errors
///
/// Returns an error if no strict or recovered parse succeeds.
pub fn extract_json(text: &str) -> AtelierResult<serde_json::Value> {
    let trimmed = text.trim();
    let candidate = unwrap_fence(trimmed).unwrap_or(trimmed);

    let strict_err = match serde_json::from_str(candidate) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    // Recovery pass: the model may have wrapped the object in prose.
    if let (Some(first), Some(last)) = (candidate.find('{'), candidate.rfind('}')) {
        if last > first {
            if let Ok(value) = serde_json::from_str(&candidate[first..=last]) {
                return Ok(value);
            }
        }
    }

    tracing::error!(
        error = %strict_err,
        text_length = candidate.len(),
        "Failed to parse JSON content from model text"
    );
    Err(ExtractError::new(format!("Failed to parse JSON response: {strict_err}"), candidate).into())
}

/// Extract an HTML document string from model text.
///
/// Trims the input and unwraps a whole-string fence when present. Absence of
/// fencing is tolerated as a fallback: the trimmed input is returned
/// unchanged, since callers may still receive usable markup. Never fails.
///
/// # Examples
///
/// ```
/// use atelier_pipeline::extract_html;
///
/// assert_eq!(extract_html("```html\n<p>hi</p>\n```"), "<p>hi</p>");
/// assert_eq!(extract_html("  <p>hi</p>  "), "<p>hi</p>");
/// ```
pub fn extract_html(text: &str) -> String {
    let trimmed = text.trim();
    unwrap_fence(trimmed).unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fenced_json_with_escapes() {
        let value = extract_json("```json\n{\"spec\":\"Hello \\\"world\\\"\"}\n```").unwrap();
        assert_eq!(value, json!({"spec": "Hello \"world\""}));
    }

    #[test]
    fn untagged_fence_unwraps() {
        let value = extract_json("```\n{\"a\": 1}\n```").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn bare_json_parses() {
        let value = extract_json(" {\"a\": [1, 2]} ").unwrap();
        assert_eq!(value, json!({"a": [1, 2]}));
    }

    #[test]
    fn fence_roundtrip_preserves_value() {
        let original = json!({
            "quiz": [{"question": "Q?", "options": ["a", "b"], "correctAnswer": "a"}],
            "nested": {"n": 1.5, "t": true, "s": "line\nbreak"}
        });
        let fenced = format!("```json\n{}\n```", serde_json::to_string(&original).unwrap());
        assert_eq!(extract_json(&fenced).unwrap(), original);
    }

    #[test]
    fn recovery_pass_skips_surrounding_prose() {
        let value = extract_json("Sure! Here you go: {\"spec\": \"x\"} Hope that helps.").unwrap();
        assert_eq!(value, json!({"spec": "x"}));
    }

    #[test]
    fn garbage_fails_with_bounded_preview() {
        let err = extract_json("not json at all").unwrap_err();
        assert!(err.to_string().contains("not json at all"));
    }

    #[test]
    fn html_fence_unwraps() {
        assert_eq!(
            extract_html("```html\n<!DOCTYPE html><html></html>\n```"),
            "<!DOCTYPE html><html></html>"
        );
    }

    #[test]
    fn unfenced_html_returned_trimmed() {
        assert_eq!(
            extract_html("  <!DOCTYPE html><html></html>\n"),
            "<!DOCTYPE html><html></html>"
        );
    }

    #[test]
    fn extract_html_is_idempotent() {
        let inputs = [
            "```html\n<p>x</p>\n```",
            "<p>x</p>",
            "  padded  ",
            "```\nfenced\n```",
        ];
        for input in inputs {
            let once = extract_html(input);
            assert_eq!(extract_html(&once), once, "input: {input:?}");
        }
    }
}
