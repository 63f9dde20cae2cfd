//! Safety policy forwarded to generation backends.

use serde::{Deserialize, Serialize};

/// Harm categories recognized by the multimodal backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    /// Harassment content
    HarmCategoryHarassment,
    /// Hate speech
    HarmCategoryHateSpeech,
    /// Sexually explicit content
    HarmCategorySexuallyExplicit,
    /// Dangerous content
    HarmCategoryDangerousContent,
}

/// Blocking thresholds for a harm category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    /// Block nothing
    BlockNone,
    /// Block only high-probability harms
    BlockOnlyHigh,
    /// Block medium and high probability harms
    BlockMediumAndAbove,
    /// Block low probability harms and above
    BlockLowAndAbove,
}

/// One category/threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SafetySetting {
    /// The harm category this setting applies to
    pub category: HarmCategory,
    /// The blocking threshold for that category
    pub threshold: HarmBlockThreshold,
}

/// The full safety policy attached to a request.
///
/// The default pins all four harm categories at block-medium-and-above.
///
/// # Examples
///
/// ```
/// use atelier_core::SafetyPolicy;
///
/// let policy = SafetyPolicy::default();
/// assert_eq!(policy.settings.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyPolicy {
    /// Per-category thresholds
    pub settings: Vec<SafetySetting>,
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        use HarmCategory::*;
        let settings = [
            HarmCategoryHarassment,
            HarmCategoryHateSpeech,
            HarmCategorySexuallyExplicit,
            HarmCategoryDangerousContent,
        ]
        .into_iter()
        .map(|category| SafetySetting {
            category,
            threshold: HarmBlockThreshold::BlockMediumAndAbove,
        })
        .collect();
        Self { settings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_serialize_screaming_snake() {
        let json = serde_json::to_string(&HarmCategory::HarmCategoryHateSpeech).unwrap();
        assert_eq!(json, "\"HARM_CATEGORY_HATE_SPEECH\"");
        let json = serde_json::to_string(&HarmBlockThreshold::BlockMediumAndAbove).unwrap();
        assert_eq!(json, "\"BLOCK_MEDIUM_AND_ABOVE\"");
    }
}
