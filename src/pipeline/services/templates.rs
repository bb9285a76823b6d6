use std::path::Path;
use std::str::FromStr;

use config::{Config, File};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, TemplateError};

labeled_enum! {
    pub enum RoomType {
        Bedroom => "bedroom",
        LivingRoom => "living_room",
        Kitchen => "kitchen",
        DiningRoom => "dining_room",
        Other => "other",
    }
}

impl RoomType {
    pub const ALL: [RoomType; 5] = [
        RoomType::Bedroom,
        RoomType::LivingRoom,
        RoomType::Kitchen,
        RoomType::DiningRoom,
        RoomType::Other,
    ];
}

impl FromStr for RoomType {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|room| room.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TemplateError::NotFound(s.to_string()))
    }
}

/// Static recommendation text for one kind of room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub concept_name: String,
    pub condition_summary: String,
    pub lighting_suggestion: String,
    pub color_suggestion: String,
    pub furniture_suggestion: String,
    pub recommended_style: String,
    pub style_description: String,
    pub key_elements: Vec<String>,
    pub visual_reference: String,
    pub style_confidence: f64,
}

/// Read-only set of room templates; always has an `other` fallback.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: IndexMap<RoomType, RoomTemplate>,
    fallback: RoomTemplate,
}

#[derive(Deserialize)]
struct TemplateFile {
    templates: IndexMap<RoomType, RoomTemplate>,
}

impl TemplateCatalog {
    pub fn new(mut templates: IndexMap<RoomType, RoomTemplate>) -> Result<Self, TemplateError> {
        let fallback = templates
            .shift_remove(&RoomType::Other)
            .ok_or(TemplateError::MissingFallback)?;
        Ok(Self {
            templates,
            fallback,
        })
    }

    /// Loads a catalog from a TOML/JSON/YAML file with a `templates` table.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let file: TemplateFile = Config::builder()
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;

        debug!(
            "Loaded {} room templates from {}",
            file.templates.len(),
            path.display()
        );
        Ok(Self::new(file.templates)?)
    }

    pub fn lookup(&self, room_type: RoomType) -> Result<&RoomTemplate, TemplateError> {
        if room_type == RoomType::Other {
            return Ok(&self.fallback);
        }
        self.templates
            .get(&room_type)
            .ok_or_else(|| TemplateError::NotFound(room_type.to_string()))
    }

    pub fn fallback(&self) -> &RoomTemplate {
        &self.fallback
    }

    /// Resolves a caller supplied room type, falling back to `other`.
    pub fn resolve(&self, room_type: &str) -> (RoomType, &RoomTemplate) {
        match room_type
            .parse::<RoomType>()
            .and_then(|room| self.lookup(room).map(|template| (room, template)))
        {
            Ok(found) => found,
            Err(e) => {
                warn!("{}, using the 'other' template", e);
                (RoomType::Other, &self.fallback)
            }
        }
    }

    /// Number of templates including the fallback.
    pub fn room_count(&self) -> usize {
        self.templates.len() + 1
    }

    pub fn builtin() -> Self {
        let mut templates = IndexMap::new();
        templates.insert(
            RoomType::Bedroom,
            template(
                "Restful Sleep Sanctuary",
                "Your bedroom shows potential for creating a more restful and organized sleeping environment.",
                [
                    "Consider adding layered lighting with bedside lamps for reading and dimmable overhead lighting for ambiance.",
                    "Soft, calming colors like muted blues, gentle greens, or warm neutrals can promote better sleep.",
                    "Ensure your bed is the focal point, with adequate space for movement and storage solutions for organization.",
                ],
                "Contemporary Comfort",
                "A blend of modern functionality with cozy, personal touches that promote relaxation.",
                &["Comfortable bedding", "Adequate storage", "Soft lighting", "Calming colors"],
                "Imagine a serene retreat with soft textures, organized storage, and gentle lighting that creates a peaceful atmosphere for rest and rejuvenation.",
                75.0,
            ),
        );
        templates.insert(
            RoomType::LivingRoom,
            template(
                "Social Gathering Hub",
                "Your living room has good potential for creating a welcoming space for relaxation and entertainment.",
                [
                    "Layer different light sources including ambient ceiling lights, task lighting for reading, and accent lighting for atmosphere.",
                    "Create visual interest with a cohesive color palette that reflects your personality while maintaining harmony.",
                    "Arrange seating to encourage conversation, ensure clear pathways, and create distinct zones for different activities.",
                ],
                "Modern Comfort",
                "A contemporary approach that balances style with functionality for everyday living.",
                &["Comfortable seating", "Good lighting", "Entertainment area", "Storage solutions"],
                "Envision a welcoming space where family and friends naturally gather, with comfortable seating arranged for conversation and entertainment.",
                70.0,
            ),
        );
        templates.insert(
            RoomType::Kitchen,
            template(
                "Culinary Workspace",
                "Your kitchen shows potential for improved functionality and aesthetic appeal.",
                [
                    "Ensure adequate task lighting for food preparation areas and consider under-cabinet lighting for better visibility.",
                    "Choose colors that are both practical and inviting, considering how they work with your cabinetry and countertops.",
                    "Optimize the work triangle between sink, stove, and refrigerator, and ensure adequate counter space for food preparation.",
                ],
                "Functional Modern",
                "Clean lines and practical design that makes cooking and entertaining enjoyable.",
                &["Efficient layout", "Good lighting", "Adequate storage", "Easy-to-clean surfaces"],
                "Picture a well-organized culinary space where cooking is a pleasure, with everything within easy reach and good lighting for all tasks.",
                65.0,
            ),
        );
        templates.insert(
            RoomType::DiningRoom,
            template(
                "Elegant Dining Experience",
                "Your dining area has potential for creating memorable meal experiences.",
                [
                    "A statement light fixture over the dining table creates ambiance, supplemented by ambient lighting around the room.",
                    "Choose colors that create an inviting atmosphere for meals, considering both natural and artificial lighting.",
                    "Ensure the dining table is appropriately sized for the space with comfortable seating and easy access.",
                ],
                "Classic Elegance",
                "Timeless design that creates an inviting atmosphere for dining and entertaining.",
                &["Appropriate table size", "Comfortable seating", "Ambient lighting", "Storage for dining items"],
                "Imagine an inviting dining space where meals become special occasions, with beautiful lighting and comfortable seating.",
                70.0,
            ),
        );

        let fallback = template(
            "Versatile Living Space",
            "This space shows potential for optimization based on its primary function.",
            [
                "Ensure lighting is appropriate for the room's main activities, with options for different moods and tasks.",
                "Choose colors that support the room's function while creating a pleasant atmosphere.",
                "Arrange furniture to support the room's primary purpose while maintaining good flow and accessibility.",
            ],
            "Adaptive Contemporary",
            "Flexible design that can adapt to various needs while maintaining visual appeal.",
            &["Flexible layout", "Appropriate lighting", "Functional storage", "Comfortable atmosphere"],
            "Envision an adaptable space that serves its purpose beautifully while remaining comfortable and visually appealing.",
            60.0,
        );

        Self {
            templates,
            fallback,
        }
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[allow(clippy::too_many_arguments)]
fn template(
    concept_name: &str,
    condition_summary: &str,
    [lighting, color, furniture]: [&str; 3],
    recommended_style: &str,
    style_description: &str,
    key_elements: &[&str],
    visual_reference: &str,
    style_confidence: f64,
) -> RoomTemplate {
    RoomTemplate {
        concept_name: concept_name.to_string(),
        condition_summary: condition_summary.to_string(),
        lighting_suggestion: lighting.to_string(),
        color_suggestion: color.to_string(),
        furniture_suggestion: furniture.to_string(),
        recommended_style: recommended_style.to_string(),
        style_description: style_description.to_string(),
        key_elements: key_elements.iter().map(|e| e.to_string()).collect(),
        visual_reference: visual_reference.to_string(),
        style_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_room_types_case_insensitively() {
        assert_eq!("Living_Room".parse::<RoomType>().unwrap(), RoomType::LivingRoom);
        assert_eq!(" kitchen ".parse::<RoomType>().unwrap(), RoomType::Kitchen);
        assert!(matches!(
            "garage".parse::<RoomType>(),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn builtin_covers_every_room_type() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.room_count(), RoomType::ALL.len());
        for room in RoomType::ALL {
            assert!(catalog.lookup(room).is_ok());
        }
    }

    #[test]
    fn unknown_room_type_resolves_to_other() {
        let catalog = TemplateCatalog::builtin();
        let (room, template) = catalog.resolve("garage");
        assert_eq!(room, RoomType::Other);
        assert_eq!(template.concept_name, "Versatile Living Space");

        let (room, template) = catalog.resolve("bedroom");
        assert_eq!(room, RoomType::Bedroom);
        assert_eq!(template.style_confidence, 75.0);
    }

    #[test]
    fn custom_catalog_requires_fallback() {
        let mut templates = IndexMap::new();
        templates.insert(
            RoomType::Kitchen,
            TemplateCatalog::builtin().lookup(RoomType::Kitchen).unwrap().clone(),
        );
        assert!(matches!(
            TemplateCatalog::new(templates),
            Err(TemplateError::MissingFallback)
        ));
    }

    #[test]
    fn missing_room_in_custom_catalog_uses_fallback() {
        let mut templates = IndexMap::new();
        templates.insert(RoomType::Other, TemplateCatalog::builtin().fallback().clone());
        let catalog = TemplateCatalog::new(templates).unwrap();

        assert!(catalog.lookup(RoomType::Kitchen).is_err());
        assert_eq!(catalog.resolve("kitchen").0, RoomType::Other);
    }

    #[test]
    fn loads_catalog_from_json_file() {
        let other = TemplateCatalog::builtin().fallback().clone();
        let body = serde_json::json!({ "templates": { "other": other } });
        let path = std::env::temp_dir().join("room_insight_templates_test.json");
        std::fs::write(&path, body.to_string()).unwrap();

        let catalog = TemplateCatalog::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(catalog.room_count(), 1);
        assert_eq!(catalog.fallback(), &other);
    }
}
