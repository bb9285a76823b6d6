pub mod attributes;
pub mod image;
pub mod orchestration;
pub mod templates;

pub use attributes::{map_design_attributes, DesignAttribute, DesignAttributes};
pub use self::image::{extract_features, ExtractionMethod, FeatureExtractor};
pub use orchestration::{AnalysisRequest, AnalysisService, RoomAnalyzer};
pub use templates::{RoomTemplate, RoomType, TemplateCatalog};
