//! Wire types for the multimodal-generation protocol.

use atelier_core::{GenerateRequest, GroundingReference, ResponseFormat};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One content part: text or a file attached by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    /// Plain text
    #[serde(rename = "text")]
    Text(String),
    /// File attached by URI
    #[serde(rename = "fileData")]
    FileData(FileData),
}

/// A file-by-reference attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// URI of the file
    pub file_uri: String,
    /// MIME type hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// A role-tagged list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// "user" or "model"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// The content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Decoding and output-shape configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Output token cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Response MIME hint ("application/json" for strict JSON)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// One safety setting on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySettingDto {
    /// Harm category name
    pub category: String,
    /// Blocking threshold name
    pub threshold: String,
}

/// Outbound multimodal-generation request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation contents
    pub contents: Vec<Content>,
    /// Decoding configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    /// Safety thresholds
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub safety_settings: Vec<SafetySettingDto>,
    /// Tool toggles; `[{"googleSearch": {}}]` enables external search
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tools: Vec<serde_json::Value>,
}

impl GeminiRequest {
    /// Assemble the wire request from a generation request.
    ///
    /// The backend documents the structured-JSON response hint as incompatible
    /// with the external-search tool, so the MIME hint is omitted whenever
    /// search is enabled.
    pub fn from_request(req: &GenerateRequest) -> Self {
        let mut parts = vec![Part::Text(req.full_prompt())];
        if let Some(uri) = &req.video_reference {
            parts.push(Part::FileData(FileData {
                file_uri: uri.clone(),
                mime_type: Some("video/*".to_string()),
            }));
        }

        let use_search = req.use_search;
        let response_mime_type = match (req.response_format, use_search) {
            (ResponseFormat::Json, false) => Some("application/json".to_string()),
            (ResponseFormat::Json, true) => {
                warn!("JSON response hint is incompatible with the search tool; dropping the hint");
                None
            }
            (ResponseFormat::Text, _) => None,
        };

        let tools = if use_search {
            vec![serde_json::json!({"googleSearch": {}})]
        } else {
            Vec::new()
        };

        let safety_settings = req
            .safety
            .settings
            .iter()
            .map(|s| SafetySettingDto {
                category: serde_name(&s.category),
                threshold: serde_name(&s.threshold),
            })
            .collect();

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(req.temperature),
                max_output_tokens: req.max_tokens,
                response_mime_type,
            }),
            safety_settings,
            tools,
        }
    }
}

/// The serde rename of a unit enum variant (e.g. `HARM_CATEGORY_HARASSMENT`).
fn serde_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

/// A web citation inside grounding metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WebSource {
    /// Source title
    #[serde(default)]
    pub title: Option<String>,
    /// Source URI
    #[serde(default)]
    pub uri: Option<String>,
}

/// One grounding chunk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroundingChunk {
    /// Web citation, when the chunk points at a page
    #[serde(default)]
    pub web: Option<WebSource>,
}

/// Grounding metadata attached to a candidate that used retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Retrieved sources
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

impl GroundingMetadata {
    /// Title+URI pairs for every chunk that carries a web source.
    pub fn references(&self) -> Vec<GroundingReference> {
        self.grounding_chunks
            .iter()
            .filter_map(|chunk| chunk.web.as_ref())
            .filter_map(|web| {
                web.uri.as_ref().map(|uri| GroundingReference {
                    title: web.title.clone().unwrap_or_default(),
                    uri: uri.clone(),
                })
            })
            .collect()
    }
}

/// One candidate output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped ("STOP", "MAX_TOKENS", "SAFETY", ...)
    #[serde(default)]
    pub finish_reason: Option<String>,
    /// Grounding metadata, when retrieval ran
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

impl Candidate {
    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::Text(text) => Some(text.as_str()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked outright
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Response body (whole for buffered mode, per-chunk for streaming).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Candidate outputs; the first is used
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Prompt-level feedback
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::GenerateRequestBuilder;

    #[test]
    fn video_request_carries_file_part_and_json_hint() {
        let req = GenerateRequestBuilder::default()
            .prompt("spec prompt")
            .video_reference("https://youtu.be/abc")
            .response_format(ResponseFormat::Json)
            .build()
            .unwrap();
        let wire = GeminiRequest::from_request(&req);
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "spec prompt");
        assert_eq!(
            json["contents"][0]["parts"][1]["fileData"]["fileUri"],
            "https://youtu.be/abc"
        );
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(json.get("tools").is_none());
        assert_eq!(
            json["safetySettings"][0]["category"],
            "HARM_CATEGORY_HARASSMENT"
        );
        assert_eq!(
            json["safetySettings"][0]["threshold"],
            "BLOCK_MEDIUM_AND_ABOVE"
        );
    }

    #[test]
    fn search_drops_json_hint() {
        let req = GenerateRequestBuilder::default()
            .prompt("topic prompt")
            .use_search(true)
            .response_format(ResponseFormat::Json)
            .build()
            .unwrap();
        let wire = GeminiRequest::from_request(&req);
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json["generationConfig"].get("responseMimeType").is_none());
        assert_eq!(json["tools"][0]["googleSearch"], serde_json::json!({}));
    }

    #[test]
    fn candidate_text_concatenates_parts() {
        let candidate: Candidate = serde_json::from_str(
            r#"{"content":{"parts":[{"text":"Hello "},{"text":"world"}],"role":"model"},"finishReason":"STOP"}"#,
        )
        .unwrap();
        assert_eq!(candidate.text(), "Hello world");
    }

    #[test]
    fn grounding_references_extracted() {
        let meta: GroundingMetadata = serde_json::from_str(
            r#"{"groundingChunks":[{"web":{"uri":"https://a","title":"A"}},{"web":{"uri":"https://b"}},{}]}"#,
        )
        .unwrap();
        let refs = meta.references();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].title, "A");
        assert_eq!(refs[1].title, "");
    }
}
