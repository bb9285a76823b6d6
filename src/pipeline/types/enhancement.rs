use serde::{Deserialize, Serialize};

/// Findings computed by the external object-detection / spatial-reasoning service.
///
/// The analyzer only consumes this value; when the service is unreachable the
/// caller passes `None` and the enrichment stage is skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementInput {
    pub detected_object_names: Vec<String>,
    pub spatial_recommendations: Vec<String>,
    pub design_description: String,
}

impl EnhancementInput {
    pub fn new(
        detected_object_names: Vec<String>,
        spatial_recommendations: Vec<String>,
        design_description: impl Into<String>,
    ) -> Self {
        Self {
            detected_object_names,
            spatial_recommendations,
            design_description: design_description.into(),
        }
    }

    pub fn has_detected_objects(&self) -> bool {
        self.detected_object_names
            .iter()
            .any(|name| !name.trim().is_empty())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
