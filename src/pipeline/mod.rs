pub mod services;
pub mod types;

pub use services::{AnalysisRequest, AnalysisService, RoomAnalyzer};
pub use types::{AnalysisResult, EnhancementInput, FeatureVector};
