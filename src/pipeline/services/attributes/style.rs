use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::DesignAttribute;
use crate::pipeline::types::{round1, ColorName, FeatureVector, TemperatureCategory};

labeled_enum! {
    pub enum StyleLean {
        ModernMinimalist => "modern_minimalist",
        TraditionalClassic => "traditional_classic",
        RusticNatural => "rustic_natural",
        ContemporaryBold => "contemporary_bold",
        VintageEclectic => "vintage_eclectic",
    }
}

impl StyleLean {
    /// Rubric order; the first of several equal scores wins.
    pub const ALL: [StyleLean; 5] = [
        StyleLean::ModernMinimalist,
        StyleLean::TraditionalClassic,
        StyleLean::RusticNatural,
        StyleLean::ContemporaryBold,
        StyleLean::VintageEclectic,
    ];

    /// Points this style earns from the features.
    fn score(&self, features: &FeatureVector) -> f64 {
        let saturation = features.saturation_level;
        let contrast = features.contrast;
        let warm = features.color_temperature.category == TemperatureCategory::Warm;
        let share_above = |color: ColorName, threshold: f64| {
            features.share_of(color).is_some_and(|share| share > threshold)
        };

        let rules: Vec<(bool, f64)> = match self {
            StyleLean::ModernMinimalist => vec![
                (saturation < 30.0, 20.0),
                (share_above(ColorName::White, 25.0), 25.0),
                (share_above(ColorName::Gray, 20.0), 20.0),
                (contrast < 40.0, 15.0),
            ],
            StyleLean::TraditionalClassic => vec![
                (warm, 20.0),
                (share_above(ColorName::Brown, 15.0), 25.0),
                (saturation > 20.0 && saturation < 60.0, 20.0),
            ],
            StyleLean::RusticNatural => vec![
                (share_above(ColorName::Brown, 20.0), 30.0),
                (share_above(ColorName::Green, 10.0), 20.0),
                (warm, 15.0),
            ],
            StyleLean::ContemporaryBold => vec![
                (saturation > 50.0, 25.0),
                (contrast > 60.0, 20.0),
                (
                    features.has_color(ColorName::Red) || features.has_color(ColorName::Blue),
                    20.0,
                ),
            ],
            StyleLean::VintageEclectic => vec![
                (features.dominant_colors.len() > 3, 20.0),
                (saturation > 30.0 && saturation < 70.0, 15.0),
            ],
        };

        rules
            .into_iter()
            .filter(|(hit, _)| *hit)
            .map(|(_, points)| points)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleIndicators {
    pub primary_style_lean: StyleLean,
    pub style_confidence: f64,
    pub style_scores: IndexMap<StyleLean, f64>,
    pub reasoning: String,
}

impl StyleIndicators {
    pub fn from_features(features: &FeatureVector) -> Self {
        let style_scores: IndexMap<StyleLean, f64> = StyleLean::ALL
            .iter()
            .map(|style| (*style, style.score(features)))
            .collect();

        let (primary_style_lean, best) = style_scores.iter().fold(
            (StyleLean::ModernMinimalist, f64::MIN),
            |(winner, best), (style, score)| {
                if *score > best {
                    (*style, *score)
                } else {
                    (winner, best)
                }
            },
        );

        Self {
            primary_style_lean,
            style_confidence: round1(best.clamp(0.0, 100.0)),
            style_scores,
            reasoning: format!(
                "Based on saturation ({}%), contrast ({}%), and color analysis",
                features.saturation_level, features.contrast
            ),
        }
    }
}

impl DesignAttribute for StyleIndicators {
    fn label(&self) -> &'static str {
        "Style lean"
    }

    fn classification(&self) -> &'static str {
        self.primary_style_lean.as_str()
    }

    fn confidence(&self) -> f64 {
        self.style_confidence
    }

    fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{ColorTemperature, DominantColor};

    #[test]
    fn fallback_vector_leans_modern() {
        // sat 30 misses "<30"; white 35, gray 40, contrast 35
        let result = StyleIndicators::from_features(&FeatureVector::fallback());
        assert_eq!(result.primary_style_lean, StyleLean::ModernMinimalist);
        assert_eq!(result.style_scores[&StyleLean::ModernMinimalist], 60.0);
        assert_eq!(result.style_scores[&StyleLean::TraditionalClassic], 45.0);
        assert_eq!(result.style_confidence, 60.0);
    }

    #[test]
    fn warm_brown_room_is_rustic_or_traditional() {
        let features = FeatureVector {
            dominant_colors: vec![
                DominantColor::new(ColorName::Brown, 50.0),
                DominantColor::new(ColorName::Green, 20.0),
            ],
            color_temperature: ColorTemperature {
                category: TemperatureCategory::Warm,
                score: 60.0,
            },
            saturation_level: 40.0,
            contrast: 50.0,
            ..FeatureVector::fallback()
        };
        let result = StyleIndicators::from_features(&features);
        // rustic 30 + 20 + 15 = 65, traditional 20 + 25 + 20 = 65
        assert_eq!(result.style_scores[&StyleLean::RusticNatural], 65.0);
        assert_eq!(result.style_scores[&StyleLean::TraditionalClassic], 65.0);
        assert_eq!(result.primary_style_lean, StyleLean::TraditionalClassic);
    }

    #[test]
    fn equal_scores_pick_earlier_style() {
        // modern gets sat < 30, traditional gets 20 < sat < 60
        let features = FeatureVector {
            dominant_colors: vec![DominantColor::new(ColorName::Orange, 100.0)],
            saturation_level: 25.0,
            contrast: 50.0,
            ..FeatureVector::fallback()
        };
        let result = StyleIndicators::from_features(&features);
        assert_eq!(result.style_scores[&StyleLean::ModernMinimalist], 20.0);
        assert_eq!(result.style_scores[&StyleLean::TraditionalClassic], 20.0);
        assert_eq!(result.primary_style_lean, StyleLean::ModernMinimalist);
        assert_eq!(result.style_confidence, 20.0);
    }

    #[test]
    fn scores_keep_rubric_order() {
        let result = StyleIndicators::from_features(&FeatureVector::fallback());
        let order: Vec<StyleLean> = result.style_scores.keys().copied().collect();
        assert_eq!(order, StyleLean::ALL.to_vec());
    }
}
