#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{AnalyzerConfig, Configuration};
pub use error::{AppError, ExtractionError, TemplateError};
pub use pipeline::services::{extract_features, map_design_attributes};
pub use pipeline::{AnalysisRequest, AnalysisResult, AnalysisService, EnhancementInput, RoomAnalyzer};
