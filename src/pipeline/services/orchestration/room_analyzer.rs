/// Room Analyzer - turns one photo plus context into a recommendation
use super::{
    relevance::assess_relevance,
    request::AnalysisRequest,
    stages::{
        apply_enrichment, apply_user_notes, apply_visual_enhancement, track_feature_influence,
        RecommendationDraft,
    },
};
use crate::{
    config::AnalyzerConfig,
    error::{AppError, ExtractionError},
    pipeline::services::{
        attributes::DesignAttributes,
        image::{
            ExtractionMethod, FeatureExtractor, HeuristicFeatureExtractor, ImageInput,
            PixelFeatureExtractor,
        },
        templates::{RoomTemplate, TemplateCatalog},
    },
    pipeline::types::{
        AnalysisMetadata, AnalysisResult, AnalysisStage, EnhancementInput, FeatureVector,
        ImprovementSuggestions, StyleRecommendation, SystemType,
    },
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const BASIC_STYLE_CONFIDENCE: f64 = 50.0;
const BASIC_OBSERVATION: &str = "Basic room analysis completed";

/// Orchestrates extraction, attribute mapping and the text stages.
///
/// Holds no per-call state, so one instance can serve many threads.
pub struct RoomAnalyzer {
    extractors: Vec<Box<dyn FeatureExtractor>>,
    templates: Arc<TemplateCatalog>,
    config: AnalyzerConfig,
}

impl RoomAnalyzer {
    /// Builds an analyzer, loading custom templates when the config names a file.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AppError> {
        let templates = match &config.templates_path {
            Some(path) => TemplateCatalog::from_file(path)?,
            None => TemplateCatalog::builtin(),
        };
        Self::with_templates(config, Arc::new(templates))
    }

    pub fn with_templates(
        config: AnalyzerConfig,
        templates: Arc<TemplateCatalog>,
    ) -> Result<Self, AppError> {
        config.validate().map_err(AppError::InvalidConfig)?;

        let mut extractors: Vec<Box<dyn FeatureExtractor>> = Vec::new();
        if config.pixel_decoding {
            extractors.push(Box::new(PixelFeatureExtractor::new()));
        }
        extractors.push(Box::new(HeuristicFeatureExtractor::new()));

        Ok(Self {
            extractors,
            templates,
            config,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateCatalog {
        &self.templates
    }

    /// Analyzes one photo, stamped with the current time. Never fails;
    /// degradation shows in `system_type`.
    ///
    /// Two calls differ in `analysis_timestamp`. Callers that need
    /// byte-identical output pin the time with [`AnalysisRequest::at`] and
    /// use [`RoomAnalyzer::analyze_request`].
    pub fn analyze(
        &self,
        room_type: &str,
        user_notes: &str,
        image_bytes: &[u8],
        enhancement: Option<&EnhancementInput>,
    ) -> AnalysisResult {
        self.run(
            room_type,
            user_notes,
            ImageInput::new(image_bytes),
            enhancement,
            Utc::now(),
        )
    }

    pub fn analyze_request(&self, request: &AnalysisRequest) -> AnalysisResult {
        self.run(
            &request.room_type,
            &request.user_notes,
            ImageInput::new(&request.image_bytes).with_file_name(request.file_name.as_deref()),
            request.enhancement.as_ref(),
            request.timestamp,
        )
    }

    #[instrument(skip_all, fields(room_type = %room_type, bytes = input.bytes.len()))]
    fn run(
        &self,
        room_type: &str,
        user_notes: &str,
        input: ImageInput<'_>,
        enhancement: Option<&EnhancementInput>,
        timestamp: DateTime<Utc>,
    ) -> AnalysisResult {
        let mut stages = vec![AnalysisStage::Start];

        let Some((features, method)) = self.extract(&input, &mut stages) else {
            warn!("Every extractor failed, answering from the template alone");
            return self.basic_template_result(room_type, user_notes, timestamp, stages);
        };

        let attributes = DesignAttributes::from_features(&features);
        stages.push(AnalysisStage::AttributeMapping);

        let (resolved_room_type, template) = self.templates.resolve(room_type);
        stages.push(AnalysisStage::TemplateSelection);
        debug!("Using '{}' template", resolved_room_type);

        let mut draft = RecommendationDraft::from_template(template);
        apply_visual_enhancement(
            &mut draft,
            &attributes,
            &features,
            self.config.observation_confidence_threshold,
        );
        stages.push(AnalysisStage::VisualEnhancement);

        let enrichment = enhancement.map(|enhancement| {
            stages.push(AnalysisStage::ExternalEnrichment);
            apply_enrichment(
                &mut draft,
                enhancement,
                self.config.max_spatial_recommendations,
            )
        });

        let relevance = enhancement.map(|enhancement| {
            stages.push(AnalysisStage::RelevanceValidation);
            let summary = assess_relevance(
                resolved_room_type,
                enhancement,
                user_notes,
                self.config.relevance_threshold,
            );
            if !summary.is_relevant {
                warn!(
                    "Detected contents score {} for a {}: {:?}",
                    summary.relevance_score, resolved_room_type, summary.validation_warnings
                );
            }
            summary
        });

        if apply_user_notes(&mut draft, user_notes) {
            stages.push(AnalysisStage::UserNotesCustomization);
        }

        let feature_influence = track_feature_influence(&attributes, enhancement, &self.config);
        stages.push(AnalysisStage::FeatureInfluenceTracking);
        stages.push(AnalysisStage::Complete);

        let system_type = SystemType::for_method(method);
        info!(
            "Analysis complete via {}: lighting {}, ambience {}, style lean {}",
            system_type,
            attributes.lighting_condition.primary_assessment,
            attributes.ambience_character.primary_character,
            attributes.style_indicators.primary_style_lean
        );

        AnalysisResult {
            concept_name: draft.concept_name,
            room_condition_summary: draft.condition_summary,
            visual_observations: draft.observations,
            improvement_suggestions: ImprovementSuggestions {
                lighting: draft.lighting,
                color_ambience: draft.color,
                furniture_layout: draft.furniture,
            },
            style_recommendation: style_recommendation(
                template,
                &attributes,
                template.style_confidence,
            ),
            visual_reference: draft.visual_reference,
            analysis_metadata: AnalysisMetadata {
                room_type: room_type.to_string(),
                resolved_room_type,
                user_notes: user_notes.to_string(),
                image_dimensions: features.dimensions.to_string(),
                analysis_timestamp: timestamp,
                system_type,
                extraction_method: method,
                enhancement_applied: enrichment.is_some(),
                stages,
            },
            extracted_features: features,
            design_attributes: attributes,
            feature_influence,
            enrichment,
            relevance,
        }
    }

    /// First extractor in the chain that succeeds wins.
    fn extract(
        &self,
        input: &ImageInput<'_>,
        stages: &mut Vec<AnalysisStage>,
    ) -> Option<(FeatureVector, ExtractionMethod)> {
        if !self.config.pixel_decoding {
            warn!("{}, estimating features from file metadata", ExtractionError::DecodingDisabled);
        }

        for extractor in &self.extractors {
            match extractor.extract(input) {
                Ok(features) => {
                    if extractor.method() != ExtractionMethod::PixelSampling {
                        stages.push(AnalysisStage::DegradedExtraction);
                    }
                    debug!("{} produced the feature vector", extractor.name());
                    return Some((features, extractor.method()));
                }
                Err(e) => warn!("{} failed: {}", extractor.name(), e),
            }
        }
        None
    }

    fn basic_template_result(
        &self,
        room_type: &str,
        user_notes: &str,
        timestamp: DateTime<Utc>,
        mut stages: Vec<AnalysisStage>,
    ) -> AnalysisResult {
        let (resolved_room_type, template) = self.templates.resolve(room_type);
        let features = FeatureVector::fallback();
        let attributes = DesignAttributes::from_features(&features);
        stages.push(AnalysisStage::TemplateSelection);
        stages.push(AnalysisStage::BasicTemplateResult);

        AnalysisResult {
            concept_name: template.concept_name.clone(),
            room_condition_summary: template.condition_summary.clone(),
            visual_observations: vec![BASIC_OBSERVATION.to_string()],
            improvement_suggestions: ImprovementSuggestions {
                lighting: template.lighting_suggestion.clone(),
                color_ambience: template.color_suggestion.clone(),
                furniture_layout: template.furniture_suggestion.clone(),
            },
            style_recommendation: style_recommendation(
                template,
                &attributes,
                BASIC_STYLE_CONFIDENCE,
            ),
            visual_reference: template.visual_reference.clone(),
            analysis_metadata: AnalysisMetadata {
                room_type: room_type.to_string(),
                resolved_room_type,
                user_notes: user_notes.to_string(),
                image_dimensions: features.dimensions.to_string(),
                analysis_timestamp: timestamp,
                system_type: SystemType::BasicTemplate,
                extraction_method: ExtractionMethod::TemplateDefaults,
                enhancement_applied: false,
                stages,
            },
            extracted_features: features,
            design_attributes: attributes,
            feature_influence: IndexMap::new(),
            enrichment: None,
            relevance: None,
        }
    }
}

fn style_recommendation(
    template: &RoomTemplate,
    attributes: &DesignAttributes,
    confidence: f64,
) -> StyleRecommendation {
    StyleRecommendation {
        style: template.recommended_style.clone(),
        detected_lean: attributes.style_indicators.primary_style_lean,
        description: template.style_description.clone(),
        key_elements: template.key_elements.clone(),
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::services::attributes::{AmbienceKind, LightingAssessment};
    use crate::pipeline::services::templates::RoomType;
    use crate::pipeline::types::{ColorName, InfluenceSource, TemperatureCategory};
    use chrono::TimeZone;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(image: RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        encode(RgbImage::from_pixel(width, height, Rgb(rgb)), ImageFormat::Png)
    }

    fn analyzer() -> RoomAnalyzer {
        RoomAnalyzer::new(AnalyzerConfig::default()).unwrap()
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn mid_gray_living_room() {
        let result = analyzer().analyze("living_room", "", &solid_png(800, 600, [128, 128, 128]), None);

        let features = &result.extracted_features;
        assert!((features.brightness - 128.0).abs() <= 5.0);
        assert!(features.contrast < 25.0);
        assert_eq!(features.dominant_colors[0].color, ColorName::Gray);
        assert_eq!(result.analysis_metadata.image_dimensions, "800x600");

        let attributes = &result.design_attributes;
        assert_eq!(attributes.lighting_condition.primary_assessment, LightingAssessment::Moderate);
        assert!(matches!(
            attributes.ambience_character.primary_character,
            AmbienceKind::NeutralSubdued | AmbienceKind::BalancedVersatile
        ));
        assert_eq!(result.system_type(), SystemType::VisualRules);
        assert_eq!(result.analysis_metadata.extraction_method, ExtractionMethod::PixelSampling);
    }

    #[test]
    fn warm_jpeg_bedroom() {
        let bytes = encode(RgbImage::from_pixel(320, 240, Rgb([230, 120, 20])), ImageFormat::Jpeg);
        let result = analyzer().analyze("bedroom", "", &bytes, None);

        assert_eq!(result.system_type(), SystemType::VisualRules);
        assert_eq!(result.analysis_metadata.extraction_method, ExtractionMethod::PixelSampling);
        assert_eq!(result.analysis_metadata.image_dimensions, "320x240");

        let features = &result.extracted_features;
        assert!((features.brightness - 141.5).abs() <= 4.0);
        assert_eq!(features.color_temperature.category, TemperatureCategory::Warm);
        assert!(features.color_temperature.score >= 95.0);
        assert_eq!(
            result.design_attributes.ambience_character.primary_character,
            AmbienceKind::CozyInviting
        );
    }

    #[test]
    fn near_black_bedroom() {
        let result = analyzer().analyze("bedroom", "", &solid_png(200, 150, [8, 8, 8]), None);

        assert_eq!(
            result.design_attributes.lighting_condition.primary_assessment,
            LightingAssessment::Poor
        );
        assert!(result
            .visual_observations
            .iter()
            .any(|o| o.contains(&format!("{}/255", result.extracted_features.brightness))));
        assert!(result
            .improvement_suggestions
            .lighting
            .starts_with("Visual analysis reveals insufficient lighting"));
        assert_eq!(result.concept_name, "Restful Sleep Sanctuary");
    }

    #[test]
    fn warm_orange_kitchen_with_dark_notes() {
        let result = analyzer().analyze("kitchen", "too dark", &solid_png(300, 200, [230, 120, 20]), None);

        assert_eq!(
            result.design_attributes.ambience_character.primary_character,
            AmbienceKind::CozyInviting
        );
        assert!(result.improvement_suggestions.color_ambience.contains("% warm bias"));
        assert!(result
            .improvement_suggestions
            .lighting
            .starts_with("Based on your notes about lighting, "));
        assert!(result
            .analysis_metadata
            .stages
            .contains(&AnalysisStage::UserNotesCustomization));
    }

    #[test]
    fn unsupported_bytes_fall_back_to_template() {
        let result = analyzer().analyze("kitchen", "", b"definitely not an image", None);

        assert_eq!(result.system_type(), SystemType::BasicTemplate);
        assert!(result.system_type().is_degraded());
        assert_eq!(result.concept_name, "Culinary Workspace");
        assert_eq!(result.visual_observations, vec![BASIC_OBSERVATION.to_string()]);
        assert_eq!(result.style_recommendation.confidence, 50.0);
        assert_eq!(result.extracted_features, FeatureVector::fallback());
        assert!(!result.improvement_suggestions.furniture_layout.is_empty());
    }

    #[test]
    fn unknown_room_type_uses_other() {
        let result = analyzer().analyze("garage", "", &solid_png(64, 64, [120, 120, 120]), None);
        assert_eq!(result.analysis_metadata.room_type, "garage");
        assert_eq!(result.analysis_metadata.resolved_room_type, RoomType::Other);
        assert_eq!(result.concept_name, "Versatile Living Space");
    }

    #[test]
    fn undecodable_pixels_with_readable_header_use_heuristics() {
        // BMP header is readable but the pixel extractor only accepts JPEG/PNG
        let bytes = encode(RgbImage::from_pixel(40, 30, Rgb([90, 90, 90])), ImageFormat::Bmp);
        let request = AnalysisRequest::new("bedroom", "", bytes)
            .with_file_name("uploads/bedroom_photo.bmp")
            .at(fixed_time());

        let analyzer = analyzer();
        let first = analyzer.analyze_request(&request);
        let second = analyzer.analyze_request(&request);

        assert_eq!(first.system_type(), SystemType::HeuristicRules);
        assert_eq!(first.analysis_metadata.extraction_method, ExtractionMethod::FileHeuristic);
        assert!(first.analysis_metadata.stages.contains(&AnalysisStage::DegradedExtraction));
        assert_eq!(first.extracted_features.dominant_colors[0].color, ColorName::White);
        assert_eq!(
            first.to_json_pretty().unwrap(),
            second.to_json_pretty().unwrap()
        );
    }

    #[test]
    fn disabled_pixel_decoding_takes_heuristic_path() {
        let analyzer = RoomAnalyzer::new(AnalyzerConfig::heuristic_only()).unwrap();
        let result = analyzer.analyze("other", "", &solid_png(80, 60, [128, 128, 128]), None);
        assert_eq!(result.system_type(), SystemType::HeuristicRules);
        assert_eq!(result.analysis_metadata.image_dimensions, "80x60");
    }

    #[test]
    fn identical_requests_serialize_identically() {
        let request = AnalysisRequest::new("dining_room", "new paint", solid_png(90, 60, [200, 180, 150]))
            .at(fixed_time());
        let analyzer = analyzer();

        let first = serde_json::to_string(&analyzer.analyze_request(&request)).unwrap();
        let second = serde_json::to_string(&analyzer.analyze_request(&request)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn enrichment_only_touches_documented_fields() {
        let bytes = solid_png(120, 90, [60, 60, 70]);
        let plain = AnalysisRequest::new("living_room", "furniture", bytes).at(fixed_time());
        let enriched = plain.clone().with_enhancement(Some(EnhancementInput::new(
            vec!["couch".into(), "tv".into()],
            vec!["Float the sofa away from the wall.".into()],
            "Warm mid-century lounge.",
        )));

        let analyzer = analyzer();
        let without = analyzer.analyze_request(&plain);
        let with = analyzer.analyze_request(&enriched);

        assert_eq!(with.concept_name, without.concept_name);
        assert_eq!(with.room_condition_summary, without.room_condition_summary);
        assert_eq!(with.visual_observations, without.visual_observations);
        assert_eq!(
            with.improvement_suggestions.color_ambience,
            without.improvement_suggestions.color_ambience
        );
        assert_eq!(with.style_recommendation, without.style_recommendation);
        assert_eq!(with.extracted_features, without.extracted_features);
        assert_eq!(with.design_attributes, without.design_attributes);
        assert_eq!(with.system_type(), without.system_type());

        assert!(with
            .improvement_suggestions
            .lighting
            .contains("Detected objects suggest:"));
        assert!(with
            .improvement_suggestions
            .furniture_layout
            .ends_with("Spatial analysis suggests: Float the sofa away from the wall."));
        assert!(with.visual_reference.starts_with("Warm mid-century lounge. "));
        assert!(with.feature_influence.contains_key(&InfluenceSource::Enrichment));
        assert!(!without.feature_influence.contains_key(&InfluenceSource::Enrichment));
        assert!(with.analysis_metadata.enhancement_applied);
        assert!(without.enrichment.is_none());
        assert!(with.relevance.as_ref().is_some_and(|r| r.is_relevant));
        assert!(without.relevance.is_none());
    }

    #[test]
    fn misplaced_objects_are_flagged_without_changing_text() {
        let bytes = solid_png(120, 90, [200, 200, 200]);
        let plain = AnalysisRequest::new("kitchen", "", bytes).at(fixed_time());
        let enriched = plain.clone().with_enhancement(Some(EnhancementInput::new(
            vec!["bed".into(), "toilet".into()],
            vec![],
            "",
        )));

        let analyzer = analyzer();
        let without = analyzer.analyze_request(&plain);
        let with = analyzer.analyze_request(&enriched);

        let relevance = with.relevance.as_ref().unwrap();
        assert!(!relevance.is_relevant);
        assert_eq!(
            relevance.validation_warnings,
            vec!["Inappropriate objects detected: bed, toilet"]
        );
        assert!(with
            .analysis_metadata
            .stages
            .contains(&AnalysisStage::RelevanceValidation));
        assert_eq!(with.improvement_suggestions.color_ambience, without.improvement_suggestions.color_ambience);
        assert_eq!(with.concept_name, without.concept_name);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AnalyzerConfig {
            max_spatial_recommendations: 0,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            RoomAnalyzer::new(config),
            Err(AppError::InvalidConfig(_))
        ));
    }

    #[test]
    fn values_stay_in_range_for_any_solid_color() {
        let analyzer = analyzer();
        for rgb in [[0, 0, 0], [255, 255, 255], [255, 0, 0], [0, 0, 255], [30, 200, 90]] {
            let result = analyzer.analyze("other", "", &solid_png(50, 50, rgb), None);
            let features = &result.extracted_features;
            assert!((0.0..=255.0).contains(&features.brightness));
            assert!((0.0..=100.0).contains(&features.contrast));
            assert!((0.0..=100.0).contains(&features.saturation_level));
            assert!((0.0..=100.0).contains(&result.design_attributes.style_indicators.style_confidence));
            assert!(features.dominant_colors.iter().all(|c| c.percentage >= 0.0));
        }
    }
}
