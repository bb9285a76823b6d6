pub mod color;
pub mod heuristic_extractor;
pub mod pixel_extractor;
pub mod sampling;

pub use heuristic_extractor::HeuristicFeatureExtractor;
pub use pixel_extractor::PixelFeatureExtractor;
pub use sampling::RasterImage;

use crate::error::ExtractionError;
use crate::pipeline::types::FeatureVector;

labeled_enum! {
    /// How a feature vector was obtained
    pub enum ExtractionMethod {
        PixelSampling => "pixel_sampling",
        FileHeuristic => "file_heuristic",
        TemplateDefaults => "template_defaults",
    }
}

/// Raw upload handed to an extractor
#[derive(Debug, Clone, Copy)]
pub struct ImageInput<'a> {
    pub bytes: &'a [u8],
    pub file_name: Option<&'a str>,
}

impl<'a> ImageInput<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: Option<&'a str>) -> Self {
        self.file_name = file_name;
        self
    }
}

/// Strategy for turning an upload into a feature vector
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, input: &ImageInput<'_>) -> Result<FeatureVector, ExtractionError>;
    fn name(&self) -> &'static str;
    fn method(&self) -> ExtractionMethod;
}

/// Decodes JPEG/PNG bytes and computes the full feature vector.
pub fn extract_features(image_bytes: &[u8]) -> Result<FeatureVector, ExtractionError> {
    PixelFeatureExtractor::new().extract(&ImageInput::new(image_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{ColorName, ImageDimensions, TemperatureCategory};
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(rgb: [u8; 3], format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbImage::from_pixel(160, 120, Rgb(rgb))
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn extracts_from_jpeg() {
        // luma of (230, 120, 20) is 141.5; JPEG shifts solid colors by a few levels
        let features = extract_features(&encode([230, 120, 20], ImageFormat::Jpeg)).unwrap();

        assert!((features.brightness - 141.5).abs() <= 4.0);
        assert!(features.contrast < 5.0);
        assert_eq!(features.color_temperature.category, TemperatureCategory::Warm);
        assert!(features.color_temperature.score >= 95.0);
        assert_eq!(features.dominant_colors[0].color, ColorName::Orange);
        assert_eq!(features.dimensions, ImageDimensions::new(160, 120));
    }

    #[test]
    fn extracts_from_png() {
        let features = extract_features(&encode([128, 128, 128], ImageFormat::Png)).unwrap();
        assert!((features.brightness - 128.0).abs() < 0.5);
        assert_eq!(features.color_temperature.category, TemperatureCategory::Neutral);
    }

    #[test]
    fn rejects_formats_other_than_jpeg_and_png() {
        assert!(matches!(
            extract_features(&encode([128, 128, 128], ImageFormat::Bmp)),
            Err(ExtractionError::ImageDecode { .. })
        ));
        assert!(extract_features(b"").is_err());
    }
}
