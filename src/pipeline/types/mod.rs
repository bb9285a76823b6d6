mod analysis_result;
mod enhancement;
mod feature_vector;

pub use analysis_result::{
    AnalysisMetadata, AnalysisResult, AnalysisStage, EnrichmentSummary, FeatureInfluence,
    ImprovementSuggestions, InfluenceImpact, InfluenceSource, RelevanceSummary, StyleRecommendation,
    SystemType,
};
pub use enhancement::EnhancementInput;
pub use feature_vector::{
    ColorName, ColorTemperature, DominantColor, FeatureVector, ImageDimensions,
    TemperatureCategory,
};
pub(crate) use feature_vector::round1;
