pub mod analysis_service;
pub mod relevance;
pub mod request;
pub mod room_analyzer;
pub mod stages;

pub use analysis_service::AnalysisService;
pub use request::AnalysisRequest;
pub use room_analyzer::RoomAnalyzer;
