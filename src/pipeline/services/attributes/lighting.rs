use serde::{Deserialize, Serialize};

use super::DesignAttribute;
use crate::pipeline::types::{round1, FeatureVector};

labeled_enum! {
    pub enum LightingAssessment {
        Poor => "poor_lighting",
        Bright => "bright_lighting",
        Moderate => "moderate_lighting",
    }
}

labeled_enum! {
    pub enum LightingNote {
        FlatLighting => "flat_lighting",
        HarshShadows => "harsh_shadows",
        StrongDirectionalLight => "strong_directional_light",
        EvenDistribution => "even_distribution",
        SoftEvenLighting => "soft_even_lighting",
        MixedLightSources => "mixed_light_sources",
    }
}

const POOR_BELOW: f64 = 60.0;
const BRIGHT_ABOVE: f64 = 180.0;
const MIDPOINT: f64 = 127.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingCondition {
    pub primary_assessment: LightingAssessment,
    pub secondary_notes: Vec<LightingNote>,
    pub confidence: f64,
    pub reasoning: String,
}

impl LightingCondition {
    pub fn from_features(features: &FeatureVector) -> Self {
        let brightness = features.brightness;
        let contrast = features.contrast;

        let (primary_assessment, note, reasoning) = if brightness < POOR_BELOW {
            let note = if contrast < 30.0 {
                LightingNote::FlatLighting
            } else {
                LightingNote::HarshShadows
            };
            (
                LightingAssessment::Poor,
                Some(note),
                format!(
                    "Low brightness level ({}/255) indicates insufficient lighting",
                    brightness
                ),
            )
        } else if brightness > BRIGHT_ABOVE {
            let note = if contrast > 60.0 {
                LightingNote::StrongDirectionalLight
            } else {
                LightingNote::EvenDistribution
            };
            (
                LightingAssessment::Bright,
                Some(note),
                format!(
                    "High brightness level ({}/255) indicates abundant lighting",
                    brightness
                ),
            )
        } else {
            let note = if contrast < 25.0 {
                Some(LightingNote::SoftEvenLighting)
            } else if contrast > 50.0 {
                Some(LightingNote::MixedLightSources)
            } else {
                None
            };
            (
                LightingAssessment::Moderate,
                note,
                format!(
                    "Moderate brightness level ({}/255) indicates balanced lighting",
                    brightness
                ),
            )
        };

        Self {
            primary_assessment,
            secondary_notes: note.into_iter().collect(),
            confidence: Self::confidence_for(brightness, contrast),
            reasoning,
        }
    }

    /// Distance of brightness from mid-gray averaged with contrast.
    pub fn confidence_for(brightness: f64, contrast: f64) -> f64 {
        let brightness_confidence = ((brightness - MIDPOINT).abs() / MIDPOINT * 100.0).min(100.0);
        let contrast_confidence = contrast.clamp(0.0, 100.0);
        round1((brightness_confidence + contrast_confidence) / 2.0)
    }
}

impl DesignAttribute for LightingCondition {
    fn label(&self) -> &'static str {
        "Lighting condition"
    }

    fn classification(&self) -> &'static str {
        self.primary_assessment.as_str()
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn reasoning(&self) -> &str {
        &self.reasoning
    }
}
