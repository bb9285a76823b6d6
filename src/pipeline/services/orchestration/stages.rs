/// Text-merging stages applied after the attributes are mapped.
///
/// Each stage works on a [`RecommendationDraft`] seeded from the room
/// template, so stages only ever prepend or append to template text.
use indexmap::IndexMap;

use crate::config::AnalyzerConfig;
use crate::pipeline::services::attributes::{DesignAttribute, DesignAttributes, LightingAssessment};
use crate::pipeline::services::templates::RoomTemplate;
use crate::pipeline::types::{
    EnhancementInput, EnrichmentSummary, FeatureInfluence, FeatureVector, InfluenceImpact,
    InfluenceSource, TemperatureCategory,
};

const ENRICHMENT_CONFIDENCE: f64 = 85.0;

/// Mutable copy of the template text the stages rewrite
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationDraft {
    pub concept_name: String,
    pub condition_summary: String,
    pub lighting: String,
    pub color: String,
    pub furniture: String,
    pub visual_reference: String,
    pub observations: Vec<String>,
}

impl RecommendationDraft {
    pub fn from_template(template: &RoomTemplate) -> Self {
        Self {
            concept_name: template.concept_name.clone(),
            condition_summary: template.condition_summary.clone(),
            lighting: template.lighting_suggestion.clone(),
            color: template.color_suggestion.clone(),
            furniture: template.furniture_suggestion.clone(),
            visual_reference: template.visual_reference.clone(),
            observations: Vec::new(),
        }
    }
}

pub fn apply_visual_enhancement(
    draft: &mut RecommendationDraft,
    attributes: &DesignAttributes,
    features: &FeatureVector,
    observation_threshold: f64,
) {
    let brightness = features.brightness;
    match attributes.lighting_condition.primary_assessment {
        LightingAssessment::Poor => {
            draft.lighting = format!(
                "Visual analysis reveals insufficient lighting (brightness: {}/255). Priority should be adding multiple light sources. {}",
                brightness, draft.lighting
            );
        }
        LightingAssessment::Bright => {
            draft.lighting = format!(
                "Your room has abundant light (brightness: {}/255). Focus on controlling and diffusing this light. {}",
                brightness, draft.lighting
            );
        }
        LightingAssessment::Moderate => {}
    }

    let temperature = features.color_temperature;
    match temperature.category {
        TemperatureCategory::Warm => {
            draft.color = format!(
                "Your room currently has a warm color palette ({}% warm bias). This creates a naturally cozy atmosphere. {}",
                temperature.score, draft.color
            );
        }
        TemperatureCategory::Cool => {
            draft.color = format!(
                "Your room features a cool color scheme ({}% cool bias). Consider adding warm accents for comfort. {}",
                temperature.score, draft.color
            );
        }
        TemperatureCategory::Neutral => {}
    }

    let colors: Vec<&str> = features
        .dominant_colors
        .iter()
        .map(|c| c.color.as_str())
        .collect();

    draft.observations.push(format!("Brightness level: {}/255", brightness));
    draft.observations.push(format!("Dominant colors: {}", colors.join(", ")));
    draft.observations.push(format!(
        "Color temperature: {} bias ({}%)",
        temperature.category, temperature.score
    ));
    draft
        .observations
        .push(format!("Contrast level: {}%", features.contrast));
    draft
        .observations
        .push(format!("Saturation level: {}%", features.saturation_level));

    for (_, attribute) in attributes.iter() {
        if attribute.confidence() >= observation_threshold {
            draft.observations.push(observation(attribute));
        }
    }
}

fn observation(attribute: &dyn DesignAttribute) -> String {
    format!(
        "{}: {} (confidence: {}%)",
        attribute.label(),
        attribute.classification(),
        attribute.confidence()
    )
}

fn object_lighting_tip(object: &str) -> Option<&'static str> {
    match object {
        "tv" => Some("Consider bias lighting behind the TV to reduce eye strain and improve viewing comfort."),
        "bed" => Some("Add bedside reading lights and consider dimmable overhead lighting for relaxation."),
        "desk" => Some("Ensure adequate task lighting for the workspace area."),
        "dining_table" => Some("A pendant light or chandelier above the dining table creates focused ambiance."),
        "couch" => Some("Add floor lamps or table lamps near seating areas for comfortable reading light."),
        "chair" => Some("Provide adequate lighting for seating areas to create inviting spaces."),
        _ => None,
    }
}

/// `"Dining Table"` and `"dining_table"` name the same object.
pub(super) fn normalize_object_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

pub fn apply_enrichment(
    draft: &mut RecommendationDraft,
    enhancement: &EnhancementInput,
    max_spatial_recommendations: usize,
) -> EnrichmentSummary {
    let mut objects: Vec<String> = Vec::new();
    for name in &enhancement.detected_object_names {
        let name = normalize_object_name(name);
        if !name.is_empty() && !objects.contains(&name) {
            objects.push(name);
        }
    }

    let tips: Vec<&str> = objects
        .iter()
        .filter_map(|object| object_lighting_tip(object))
        .collect();
    if !tips.is_empty() {
        draft.lighting = format!("{} Detected objects suggest: {}", draft.lighting, tips.join(" "));
    }

    let spatial: Vec<&str> = enhancement
        .spatial_recommendations
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .take(max_spatial_recommendations)
        .collect();
    if !spatial.is_empty() {
        draft.furniture = format!(
            "{} Spatial analysis suggests: {}",
            draft.furniture,
            spatial.join(" ")
        );
    }

    let description = enhancement.design_description.trim();
    if !description.is_empty() {
        draft.visual_reference = format!("{} {}", description, draft.visual_reference);
    }

    EnrichmentSummary {
        objects_detected: objects.len(),
        object_lighting_insights: tips.len(),
        spatial_recommendations_applied: spatial.len(),
        design_description_applied: !description.is_empty(),
    }
}

fn acknowledge(clause: &str, suggestion: &str) -> String {
    let mut chars = suggestion.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", clause, first.to_lowercase(), chars.as_str()),
        None => clause.trim_end().to_string(),
    }
}

/// Returns true when the notes were non-blank and the stage ran.
pub fn apply_user_notes(draft: &mut RecommendationDraft, user_notes: &str) -> bool {
    if user_notes.trim().is_empty() {
        return false;
    }
    let notes = user_notes.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| notes.contains(k));

    if mentions(&["dark", "lighting"]) {
        draft.lighting = acknowledge("Based on your notes about lighting, ", &draft.lighting);
    }
    if mentions(&["color", "paint"]) {
        draft.color = acknowledge("Considering your interest in color changes, ", &draft.color);
    }
    if mentions(&["furniture", "space"]) {
        draft.furniture = acknowledge("Taking into account your furniture concerns, ", &draft.furniture);
    }
    true
}

pub fn track_feature_influence(
    attributes: &DesignAttributes,
    enhancement: Option<&EnhancementInput>,
    config: &AnalyzerConfig,
) -> IndexMap<InfluenceSource, FeatureInfluence> {
    let mut influence = IndexMap::new();

    let lighting = &attributes.lighting_condition;
    if lighting.confidence > config.lighting_influence_threshold {
        influence.insert(
            InfluenceSource::Lighting,
            FeatureInfluence {
                impact: InfluenceImpact::High,
                confidence: lighting.confidence,
                reasoning: lighting.reasoning.clone(),
            },
        );
    }

    let ambience = &attributes.ambience_character;
    if ambience.confidence > config.ambience_influence_threshold {
        influence.insert(
            InfluenceSource::Color,
            FeatureInfluence {
                impact: InfluenceImpact::Medium,
                confidence: ambience.confidence,
                reasoning: "Color analysis influenced recommendations".to_string(),
            },
        );
    }

    if enhancement.is_some_and(EnhancementInput::has_detected_objects) {
        influence.insert(
            InfluenceSource::Enrichment,
            FeatureInfluence {
                impact: InfluenceImpact::High,
                confidence: ENRICHMENT_CONFIDENCE,
                reasoning: "Object detection and spatial analysis enhanced recommendations"
                    .to_string(),
            },
        );
    }

    influence
}
