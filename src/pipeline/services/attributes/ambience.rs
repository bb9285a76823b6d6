use serde::{Deserialize, Serialize};

use super::DesignAttribute;
use crate::pipeline::types::{round1, ColorName, FeatureVector, TemperatureCategory};

labeled_enum! {
    pub enum AmbienceKind {
        CozyInviting => "cozy_inviting",
        CalmModern => "calm_modern",
        NeutralSubdued => "neutral_subdued",
        BalancedVersatile => "balanced_versatile",
    }
}

labeled_enum! {
    pub enum EnergyLevel {
        ModerateToHigh => "moderate_to_high",
        LowToModerate => "low_to_moderate",
        Low => "low",
        Moderate => "moderate",
    }
}

labeled_enum! {
    pub enum Mood {
        Energetic => "energetic",
        Calming => "calming",
        Natural => "natural",
        Cheerful => "cheerful",
        Earthy => "earthy",
        Sophisticated => "sophisticated",
        Clean => "clean",
        Dramatic => "dramatic",
    }
}

impl Mood {
    pub fn for_color(color: ColorName) -> Option<Self> {
        match color {
            ColorName::Red => Some(Mood::Energetic),
            ColorName::Blue => Some(Mood::Calming),
            ColorName::Green => Some(Mood::Natural),
            ColorName::Yellow => Some(Mood::Cheerful),
            ColorName::Brown => Some(Mood::Earthy),
            ColorName::Gray => Some(Mood::Sophisticated),
            ColorName::White => Some(Mood::Clean),
            ColorName::Black => Some(Mood::Dramatic),
            ColorName::Orange | ColorName::Purple => None,
        }
    }
}

const MOOD_SHARE_THRESHOLD: f64 = 15.0;
const BALANCED_CONFIDENCE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbienceCharacter {
    pub primary_character: AmbienceKind,
    pub energy_level: EnergyLevel,
    pub mood_indicators: Vec<Mood>,
    pub confidence: f64,
    pub reasoning: String,
}

impl AmbienceCharacter {
    pub fn from_features(features: &FeatureVector) -> Self {
        let temperature = features.color_temperature;
        let saturation = features.saturation_level;

        let (primary_character, energy_level, confidence, reasoning) =
            match temperature.category {
                TemperatureCategory::Warm if saturation > 40.0 => (
                    AmbienceKind::CozyInviting,
                    EnergyLevel::ModerateToHigh,
                    round1(((temperature.score + saturation) / 2.0).min(100.0)),
                    format!(
                        "Warm colors ({}% warm bias) with good saturation ({}%) create inviting atmosphere",
                        temperature.score, saturation
                    ),
                ),
                TemperatureCategory::Cool if saturation > 30.0 => (
                    AmbienceKind::CalmModern,
                    EnergyLevel::LowToModerate,
                    round1(((temperature.score + saturation) / 2.0).min(100.0)),
                    format!(
                        "Cool colors ({}% cool bias) with moderate saturation ({}%) create calm atmosphere",
                        temperature.score, saturation
                    ),
                ),
                _ if saturation < 20.0 => (
                    AmbienceKind::NeutralSubdued,
                    EnergyLevel::Low,
                    round1((100.0 - saturation * 2.5).clamp(0.0, 100.0)),
                    format!(
                        "Low saturation ({}%) creates subdued, neutral atmosphere",
                        saturation
                    ),
                ),
                _ => (
                    AmbienceKind::BalancedVersatile,
                    EnergyLevel::Moderate,
                    BALANCED_CONFIDENCE,
                    format!(
                        "Balanced color temperature ({} at {}%) with moderate saturation ({}%) creates versatile atmosphere",
                        temperature.category, temperature.score, saturation
                    ),
                ),
            };

        let mood_indicators = features
            .dominant_colors
            .iter()
            .filter(|c| c.percentage > MOOD_SHARE_THRESHOLD)
            .filter_map(|c| Mood::for_color(c.color))
            .collect();

        Self {
            primary_character,
            energy_level,
            mood_indicators,
            confidence,
            reasoning,
        }
    }
}

impl DesignAttribute for AmbienceCharacter {
    fn label(&self) -> &'static str {
        "Ambience"
    }

    fn classification(&self) -> &'static str {
        self.primary_character.as_str()
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{ColorTemperature, DominantColor};

    fn ambience(category: TemperatureCategory, score: f64, saturation: f64) -> AmbienceCharacter {
        let features = FeatureVector {
            color_temperature: ColorTemperature { category, score },
            saturation_level: saturation,
            ..FeatureVector::fallback()
        };
        AmbienceCharacter::from_features(&features)
    }

    #[test]
    fn warm_and_saturated_is_cozy() {
        let result = ambience(TemperatureCategory::Warm, 80.0, 60.0);
        assert_eq!(result.primary_character, AmbienceKind::CozyInviting);
        assert_eq!(result.energy_level, EnergyLevel::ModerateToHigh);
        assert_eq!(result.confidence, 70.0);
        assert!(result.reasoning.contains("80% warm bias"));
    }

    #[test]
    fn warm_but_dull_falls_through() {
        let result = ambience(TemperatureCategory::Warm, 80.0, 35.0);
        assert_eq!(result.primary_character, AmbienceKind::BalancedVersatile);
        assert_eq!(result.confidence, 50.0);

        let subdued = ambience(TemperatureCategory::Warm, 80.0, 10.0);
        assert_eq!(subdued.primary_character, AmbienceKind::NeutralSubdued);
        assert_eq!(subdued.energy_level, EnergyLevel::Low);
        assert_eq!(subdued.confidence, 75.0);
    }

    #[test]
    fn cool_needs_less_saturation() {
        let result = ambience(TemperatureCategory::Cool, 60.0, 31.0);
        assert_eq!(result.primary_character, AmbienceKind::CalmModern);
        assert_eq!(result.energy_level, EnergyLevel::LowToModerate);
    }

    #[test]
    fn moods_follow_dominant_color_order() {
        let features = FeatureVector {
            dominant_colors: vec![
                DominantColor::new(ColorName::White, 50.0),
                DominantColor::new(ColorName::Orange, 30.0),
                DominantColor::new(ColorName::Blue, 16.0),
            ],
            ..FeatureVector::fallback()
        };
        let result = AmbienceCharacter::from_features(&features);
        assert_eq!(result.mood_indicators, vec![Mood::Clean, Mood::Calming]);

        let features = FeatureVector {
            dominant_colors: vec![DominantColor::new(ColorName::Red, 15.0)],
            ..FeatureVector::fallback()
        };
        assert!(AmbienceCharacter::from_features(&features)
            .mood_indicators
            .is_empty());
    }
}
