use serde::{Deserialize, Serialize};

use super::DesignAttribute;
use crate::pipeline::types::{round1, FeatureVector};

labeled_enum! {
    pub enum ContrastBalance {
        LowContrast => "low_contrast",
        HighContrast => "high_contrast",
        BalancedContrast => "balanced_contrast",
    }
}

labeled_enum! {
    pub enum TonalBalance {
        DarkDominant => "dark_dominant",
        LightDominant => "light_dominant",
        BalancedTones => "balanced_tones",
    }
}

labeled_enum! {
    pub enum SpatialBalance {
        ElongatedSpace => "elongated_space",
        ProportionedSpace => "proportioned_space",
    }
}

labeled_enum! {
    pub enum BalanceAssessment {
        WellBalanced => "well_balanced",
        PartiallyBalanced => "partially_balanced",
        NeedsBalancing => "needs_balancing",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualBalance {
    pub contrast_balance: ContrastBalance,
    pub tonal_balance: TonalBalance,
    pub spatial_balance: SpatialBalance,
    pub overall_assessment: BalanceAssessment,
    pub balanced_elements: u8,
    pub confidence: f64,
    pub reasoning: String,
}

impl VisualBalance {
    pub fn from_features(features: &FeatureVector) -> Self {
        let contrast = features.contrast;
        let brightness = features.brightness;
        let aspect_ratio = features.aspect_ratio;

        let contrast_balance = if contrast < 20.0 {
            ContrastBalance::LowContrast
        } else if contrast > 70.0 {
            ContrastBalance::HighContrast
        } else {
            ContrastBalance::BalancedContrast
        };

        let tonal_balance = if brightness < 80.0 {
            TonalBalance::DarkDominant
        } else if brightness > 170.0 {
            TonalBalance::LightDominant
        } else {
            TonalBalance::BalancedTones
        };

        let spatial_balance = if !(0.8..=1.5).contains(&aspect_ratio) {
            SpatialBalance::ElongatedSpace
        } else {
            SpatialBalance::ProportionedSpace
        };

        let balanced_elements = [
            contrast_balance == ContrastBalance::BalancedContrast,
            tonal_balance == TonalBalance::BalancedTones,
            spatial_balance == SpatialBalance::ProportionedSpace,
        ]
        .into_iter()
        .filter(|balanced| *balanced)
        .count() as u8;

        let overall_assessment = match balanced_elements {
            0 => BalanceAssessment::NeedsBalancing,
            1 => BalanceAssessment::PartiallyBalanced,
            _ => BalanceAssessment::WellBalanced,
        };

        // agreement of the three checks, either way
        let agreeing = balanced_elements.max(3 - balanced_elements) as f64;

        Self {
            contrast_balance,
            tonal_balance,
            spatial_balance,
            overall_assessment,
            balanced_elements,
            confidence: round1(agreeing / 3.0 * 100.0),
            reasoning: format!(
                "Contrast: {}%, Brightness: {}, Aspect: {} - {}/3 elements balanced",
                contrast, brightness, aspect_ratio, balanced_elements
            ),
        }
    }
}

impl DesignAttribute for VisualBalance {
    fn label(&self) -> &'static str {
        "Visual balance"
    }

    fn classification(&self) -> &'static str {
        self.overall_assessment.as_str()
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn reasoning(&self) -> &str {
        &self.reasoning
    }
}
