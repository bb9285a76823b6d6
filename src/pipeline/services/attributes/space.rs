use serde::{Deserialize, Serialize};

use super::DesignAttribute;
use crate::pipeline::types::{round1, FeatureVector};

labeled_enum! {
    pub enum Spaciousness {
        AppearsSpacious => "appears_spacious",
        AppearsConfined => "appears_confined",
        ModerateSpaceFeel => "moderate_space_feel",
    }
}

labeled_enum! {
    pub enum Openness {
        High => "high",
        Low => "low",
        Moderate => "moderate",
    }
}

labeled_enum! {
    pub enum SpaceRecommendation {
        IncreaseLighting => "increase_lighting",
        AddLightColors => "add_light_colors",
    }
}

const MODERATE_CONFIDENCE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacePerception {
    pub spaciousness: Spaciousness,
    pub openness_factor: Openness,
    pub recommendations: Vec<SpaceRecommendation>,
    pub light_color_share: f64,
    pub confidence: f64,
    pub reasoning: String,
}

impl SpacePerception {
    pub fn from_features(features: &FeatureVector) -> Self {
        let brightness = features.brightness;
        let light = round1(features.light_color_share());
        let brightness_share = (brightness / 255.0 * 100.0).clamp(0.0, 100.0);

        let (spaciousness, openness_factor, recommendations, confidence) =
            if brightness > 150.0 && light > 30.0 {
                (
                    Spaciousness::AppearsSpacious,
                    Openness::High,
                    Vec::new(),
                    (brightness_share + light.min(100.0)) / 2.0,
                )
            } else if brightness < 100.0 || light < 15.0 {
                (
                    Spaciousness::AppearsConfined,
                    Openness::Low,
                    vec![
                        SpaceRecommendation::IncreaseLighting,
                        SpaceRecommendation::AddLightColors,
                    ],
                    ((100.0 - brightness_share) + (100.0 - light).max(0.0)) / 2.0,
                )
            } else {
                (
                    Spaciousness::ModerateSpaceFeel,
                    Openness::Moderate,
                    Vec::new(),
                    MODERATE_CONFIDENCE,
                )
            };

        Self {
            spaciousness,
            openness_factor,
            recommendations,
            light_color_share: light,
            confidence: round1(confidence),
            reasoning: format!("Brightness: {}, Light colors: {}%", brightness, light),
        }
    }
}

impl DesignAttribute for SpacePerception {
    fn label(&self) -> &'static str {
        "Space perception"
    }

    fn classification(&self) -> &'static str {
        self.spaciousness.as_str()
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
    use crate::pipeline::types::{ColorName, DominantColor};

    fn space(brightness: f64, colors: &[(ColorName, f64)]) -> SpacePerception {
        let features = FeatureVector {
            brightness,
            dominant_colors: colors
                .iter()
                .map(|(c, p)| DominantColor::new(*c, *p))
                .collect(),
            ..FeatureVector::fallback()
        };
        SpacePerception::from_features(&features)
    }

    #[test]
    fn bright_and_light_is_spacious() {
        let result = space(204.0, &[(ColorName::White, 50.0), (ColorName::Gray, 10.0)]);
        assert_eq!(result.spaciousness, Spaciousness::AppearsSpacious);
        assert_eq!(result.openness_factor, Openness::High);
        // avg(80, 60)
        assert_eq!(result.confidence, 70.0);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn dark_room_is_confined() {
        let result = space(25.5, &[(ColorName::Black, 100.0)]);
        assert_eq!(result.spaciousness, Spaciousness::AppearsConfined);
        assert_eq!(
            result.recommendations,
            vec![
                SpaceRecommendation::IncreaseLighting,
                SpaceRecommendation::AddLightColors
            ]
        );
        // avg(90, 100)
        assert_eq!(result.confidence, 95.0);
    }

    #[test]
    fn missing_light_colors_is_confined_even_when_bright() {
        let result = space(200.0, &[(ColorName::Orange, 100.0)]);
        assert_eq!(result.spaciousness, Spaciousness::AppearsConfined);
        assert_eq!(result.light_color_share, 0.0);
    }

    #[test]
    fn middle_ground_is_moderate() {
        let result = space(128.0, &[(ColorName::Gray, 100.0)]);
        assert_eq!(result.spaciousness, Spaciousness::ModerateSpaceFeel);
        assert_eq!(result.confidence, 50.0);
        assert_eq!(result.reasoning, "Brightness: 128, Light colors: 100%");
    }
}
