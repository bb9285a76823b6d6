use chrono::{DateTime, Utc};

use crate::pipeline::types::EnhancementInput;

/// Everything one analysis needs, owned so it can cross a thread boundary.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub room_type: String,
    pub user_notes: String,
    pub image_bytes: Vec<u8>,
    /// Original upload name; the heuristic extractor reads room keywords from it.
    pub file_name: Option<String>,
    pub enhancement: Option<EnhancementInput>,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisRequest {
    pub fn new(
        room_type: impl Into<String>,
        user_notes: impl Into<String>,
        image_bytes: Vec<u8>,
    ) -> Self {
        Self {
            room_type: room_type.into(),
            user_notes: user_notes.into(),
            image_bytes,
            file_name: None,
            enhancement: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_enhancement(mut self, enhancement: Option<EnhancementInput>) -> Self {
        self.enhancement = enhancement;
        self
    }

    /// Pins the timestamp; identical requests then give identical results.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
