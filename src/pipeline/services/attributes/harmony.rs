use serde::{Deserialize, Serialize};

use super::DesignAttribute;
use crate::pipeline::types::{round1, FeatureVector};

labeled_enum! {
    pub enum HarmonyType {
        MonochromaticSimple => "monochromatic_simple",
        BalancedTriad => "balanced_triad",
        ComplexVaried => "complex_varied",
    }
}

labeled_enum! {
    pub enum ColorDistribution {
        LimitedPalette => "limited_palette",
        WellBalanced => "well_balanced",
        DiversePalette => "diverse_palette",
    }
}

labeled_enum! {
    pub enum HarmonyRecommendation {
        ConsiderAccentColors => "consider_accent_colors",
        MaintainCurrentBalance => "maintain_current_balance",
        ConsiderSimplification => "consider_simplification",
        AddColorVariety => "add_color_variety",
        CreateFocalColor => "create_focal_color",
    }
}

const OVERPOWERING_SHARE: f64 = 60.0;
const FLAT_SPREAD: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorHarmony {
    pub harmony_type: HarmonyType,
    pub color_distribution: ColorDistribution,
    pub recommendations: Vec<HarmonyRecommendation>,
    pub confidence: f64,
    pub reasoning: String,
}

impl ColorHarmony {
    pub fn from_features(features: &FeatureVector) -> Self {
        let color_count = features.dominant_colors.len();

        let (harmony_type, color_distribution, first, reasoning) = match color_count {
            0..=2 => (
                HarmonyType::MonochromaticSimple,
                ColorDistribution::LimitedPalette,
                HarmonyRecommendation::ConsiderAccentColors,
                format!(
                    "Only {} dominant colors detected - simple palette",
                    color_count
                ),
            ),
            3 => (
                HarmonyType::BalancedTriad,
                ColorDistribution::WellBalanced,
                HarmonyRecommendation::MaintainCurrentBalance,
                "Three dominant colors suggest balanced color scheme".to_string(),
            ),
            _ => (
                HarmonyType::ComplexVaried,
                ColorDistribution::DiversePalette,
                HarmonyRecommendation::ConsiderSimplification,
                format!(
                    "Multiple colors ({}) may benefit from simplification",
                    color_count
                ),
            ),
        };

        let mut recommendations = vec![first];
        let shares = features.dominant_colors.iter().map(|c| c.percentage);
        let max = shares.clone().reduce(f64::max);
        let min = shares.reduce(f64::min);
        if let (Some(max), Some(min)) = (max, min) {
            if max > OVERPOWERING_SHARE {
                recommendations.push(HarmonyRecommendation::AddColorVariety);
            } else if max - min < FLAT_SPREAD {
                recommendations.push(HarmonyRecommendation::CreateFocalColor);
            }
        }

        let covered: f64 = features.dominant_colors.iter().map(|c| c.percentage).sum();

        Self {
            harmony_type,
            color_distribution,
            recommendations,
            confidence: round1(covered.clamp(0.0, 100.0)),
            reasoning,
        }
    }
}

impl DesignAttribute for ColorHarmony {
    fn label(&self) -> &'static str {
        "Color harmony"
    }

    fn classification(&self) -> &'static str {
        self.harmony_type.as_str()
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn reasoning(&self) -> &str {
        &self.reasoning
    }
}
