pub mod ambience;
pub mod balance;
pub mod harmony;
pub mod lighting;
pub mod space;
pub mod style;

pub use ambience::{AmbienceCharacter, AmbienceKind, EnergyLevel, Mood};
pub use balance::{BalanceAssessment, VisualBalance};
pub use harmony::{ColorHarmony, HarmonyRecommendation, HarmonyType};
pub use lighting::{LightingAssessment, LightingCondition, LightingNote};
pub use space::{SpacePerception, Spaciousness};
pub use style::{StyleIndicators, StyleLean};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pipeline::types::FeatureVector;

/// One qualitative reading of the feature vector
pub trait DesignAttribute {
    fn label(&self) -> &'static str;
    fn classification(&self) -> &'static str;
    fn confidence(&self) -> f64;
    fn reasoning(&self) -> &str;
}

labeled_enum! {
    pub enum AttributeKind {
        Lighting => "lighting",
        Ambience => "ambience",
        Harmony => "harmony",
        Balance => "balance",
        Space => "space",
        Style => "style",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDecision {
    pub classification: String,
    pub confidence: f64,
}

/// Snapshot of what went into the mapping and what came out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingLog {
    pub input_features: FeatureVector,
    pub decisions: IndexMap<AttributeKind, MappingDecision>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignAttributes {
    pub lighting_condition: LightingCondition,
    pub ambience_character: AmbienceCharacter,
    pub color_harmony: ColorHarmony,
    pub visual_balance: VisualBalance,
    pub space_perception: SpacePerception,
    pub style_indicators: StyleIndicators,
    pub mapping_log: MappingLog,
}

impl DesignAttributes {
    pub fn from_features(features: &FeatureVector) -> Self {
        let lighting_condition = LightingCondition::from_features(features);
        let ambience_character = AmbienceCharacter::from_features(features);
        let color_harmony = ColorHarmony::from_features(features);
        let visual_balance = VisualBalance::from_features(features);
        let space_perception = SpacePerception::from_features(features);
        let style_indicators = StyleIndicators::from_features(features);

        let mut attributes = Self {
            lighting_condition,
            ambience_character,
            color_harmony,
            visual_balance,
            space_perception,
            style_indicators,
            mapping_log: MappingLog {
                input_features: features.clone(),
                decisions: IndexMap::new(),
            },
        };

        let decisions: IndexMap<AttributeKind, MappingDecision> = attributes
            .iter()
            .map(|(kind, attribute)| {
                (
                    kind,
                    MappingDecision {
                        classification: attribute.classification().to_string(),
                        confidence: attribute.confidence(),
                    },
                )
            })
            .collect();

        debug!(
            "Mapped attributes: {}",
            decisions
                .iter()
                .map(|(kind, d)| format!("{}={}", kind, d.classification))
                .collect::<Vec<_>>()
                .join(", ")
        );

        attributes.mapping_log.decisions = decisions;
        attributes
    }

    /// Attributes in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeKind, &dyn DesignAttribute)> {
        [
            (AttributeKind::Lighting, &self.lighting_condition as &dyn DesignAttribute),
            (AttributeKind::Ambience, &self.ambience_character as &dyn DesignAttribute),
            (AttributeKind::Harmony, &self.color_harmony as &dyn DesignAttribute),
            (AttributeKind::Balance, &self.visual_balance as &dyn DesignAttribute),
            (AttributeKind::Space, &self.space_perception as &dyn DesignAttribute),
            (AttributeKind::Style, &self.style_indicators as &dyn DesignAttribute),
        ]
        .into_iter()
    }
}

/// Maps a feature vector onto the six design attributes.
pub fn map_design_attributes(features: &FeatureVector) -> DesignAttributes {
    DesignAttributes::from_features(features)
}
