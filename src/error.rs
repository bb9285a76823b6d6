use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Template Error: {0}")]
    Template(#[from] TemplateError),
    #[error("Analysis worker failed: {0}")]
    Worker(String),
    #[error("Analysis timed out after {0}ms")]
    Timeout(u64),
}

// Feature extraction errors. All of them are recovered by the orchestrator.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Image decode failed: {reason}")]
    ImageDecode {
        reason: String,
        #[source]
        source: Option<image::ImageError>,
    },
    #[error("Grid sampling produced no pixels for a {width}x{height} image")]
    ZeroSample { width: u32, height: u32 },
    #[error("Pixel decoding is disabled")]
    DecodingDisabled,
}

impl ExtractionError {
    pub fn decode(reason: impl Into<String>, source: image::ImageError) -> Self {
        Self::ImageDecode {
            reason: reason.into(),
            source: Some(source),
        }
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::ImageDecode {
            reason: reason.into(),
            source: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("No template for room type '{0}'")]
    NotFound(String),
    #[error("Template catalog has no 'other' fallback template")]
    MissingFallback,
}
