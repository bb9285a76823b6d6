use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::FeatureVector;
use crate::pipeline::services::attributes::{DesignAttributes, StyleLean};
use crate::pipeline::services::image::ExtractionMethod;
use crate::pipeline::services::templates::RoomType;

labeled_enum! {
    /// Which path produced the result, from full fidelity down to template only
    pub enum SystemType {
        VisualRules => "visual_rules",
        HeuristicRules => "heuristic_rules",
        BasicTemplate => "basic_template",
    }
}

impl SystemType {
    pub fn for_method(method: ExtractionMethod) -> Self {
        match method {
            ExtractionMethod::PixelSampling => SystemType::VisualRules,
            ExtractionMethod::FileHeuristic => SystemType::HeuristicRules,
            ExtractionMethod::TemplateDefaults => SystemType::BasicTemplate,
        }
    }

    pub fn is_degraded(&self) -> bool {
        *self != SystemType::VisualRules
    }
}

labeled_enum! {
    pub enum AnalysisStage {
        Start => "start",
        DegradedExtraction => "degraded_extraction",
        AttributeMapping => "attribute_mapping",
        TemplateSelection => "template_selection",
        VisualEnhancement => "visual_enhancement",
        ExternalEnrichment => "external_enrichment",
        RelevanceValidation => "relevance_validation",
        UserNotesCustomization => "user_notes_customization",
        FeatureInfluenceTracking => "feature_influence_tracking",
        BasicTemplateResult => "basic_template_result",
        Complete => "complete",
    }
}

labeled_enum! {
    pub enum InfluenceSource {
        Lighting => "lighting_influence",
        Color => "color_influence",
        Enrichment => "enrichment_influence",
    }
}

labeled_enum! {
    pub enum InfluenceImpact {
        High => "high",
        Medium => "medium",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureInfluence {
    pub impact: InfluenceImpact,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImprovementSuggestions {
    pub lighting: String,
    pub color_ambience: String,
    pub furniture_layout: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRecommendation {
    pub style: String,
    pub detected_lean: StyleLean,
    pub description: String,
    pub key_elements: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    /// Room type exactly as the caller sent it
    pub room_type: String,
    pub resolved_room_type: RoomType,
    pub user_notes: String,
    pub image_dimensions: String,
    pub analysis_timestamp: DateTime<Utc>,
    pub system_type: SystemType,
    pub extraction_method: ExtractionMethod,
    pub enhancement_applied: bool,
    pub stages: Vec<AnalysisStage>,
}

/// What the external enhancement contributed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentSummary {
    pub objects_detected: usize,
    pub object_lighting_insights: usize,
    pub spatial_recommendations_applied: usize,
    pub design_description_applied: bool,
}

/// How well the detected objects and description fit the chosen room
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevanceSummary {
    pub is_relevant: bool,
    pub relevance_score: f64,
    pub details: Vec<String>,
    pub validation_warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub concept_name: String,
    pub room_condition_summary: String,
    pub visual_observations: Vec<String>,
    pub improvement_suggestions: ImprovementSuggestions,
    pub style_recommendation: StyleRecommendation,
    pub visual_reference: String,
    pub analysis_metadata: AnalysisMetadata,
    pub extracted_features: FeatureVector,
    pub design_attributes: DesignAttributes,
    pub feature_influence: IndexMap<InfluenceSource, FeatureInfluence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichmentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<RelevanceSummary>,
}

impl AnalysisResult {
    pub fn system_type(&self) -> SystemType {
        self.analysis_metadata.system_type
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
