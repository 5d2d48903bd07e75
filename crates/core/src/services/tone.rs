//! Tone annotation.
//!
//! Advisory sentiment labels for disruption descriptions. The annotator is
//! a collaborator behind a trait; the only implementation here is a mock
//! that stands in for a real NLP model.

use async_trait::async_trait;
use campusflow_common::AppResult;
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

/// An advisory tone annotation for a description text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneAnnotation {
    /// Tone label (e.g. `urgent`, `neutral`).
    pub tone: String,

    /// Model confidence in `[0, 1]`.
    pub confidence: f64,

    /// Suggested handling for reports with this tone.
    pub recommendation: String,
}

/// Analyzes description text for tone.
///
/// Callers treat any failure as "no annotation available" and proceed; an
/// implementation must not panic past this boundary.
#[async_trait]
pub trait ToneAnnotator: Send + Sync {
    /// Analyze the tone of the given text.
    async fn analyze(&self, text: &str) -> AppResult<ToneAnnotation>;
}

const TONE_CATEGORIES: [&str; 6] = [
    "urgent",
    "frustrated",
    "neutral",
    "polite",
    "angry",
    "confused",
];

fn recommendation_for(tone: &str) -> &'static str {
    match tone {
        "urgent" => {
            "This disruption appears to be urgent. Consider prioritizing for quick response."
        }
        "frustrated" => {
            "This disruption appears to be frustrated. Consider prioritizing for quick response."
        }
        "neutral" => "This disruption appears to be neutral. Standard handling procedure applies.",
        "polite" => "This disruption appears to be polite. Standard handling procedure applies.",
        "angry" => {
            "This disruption appears to be angry. Consider careful handling with immediate response."
        }
        "confused" => {
            "This disruption appears to be confused. Consider reaching out for clarification."
        }
        _ => "No specific recommendation available.",
    }
}

/// Mock tone annotator.
///
/// Picks a random tone with a random confidence, the way the eventual model
/// integration is expected to shape its output.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockToneAnnotator;

impl MockToneAnnotator {
    /// Create a new mock annotator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToneAnnotator for MockToneAnnotator {
    async fn analyze(&self, _text: &str) -> AppResult<ToneAnnotation> {
        let (tone, confidence) = {
            let mut rng = rand::thread_rng();
            let tone = *TONE_CATEGORIES.choose(&mut rng).unwrap_or(&"neutral");
            let confidence: f64 = rng.gen_range(0.70..=0.95);
            (tone, (confidence * 100.0).round() / 100.0)
        };

        Ok(ToneAnnotation {
            tone: tone.to_string(),
            confidence,
            recommendation: recommendation_for(tone).to_string(),
        })
    }
}
