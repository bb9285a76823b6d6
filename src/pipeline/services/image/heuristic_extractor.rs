/// File-metadata feature estimation for hosts that cannot decode pixels.
///
/// Every value is a deterministic function of the byte length, the header
/// dimensions and keywords in the original file name. Within each
/// bytes-per-pixel band the estimate is interpolated linearly, so a larger
/// file never yields a lower estimate inside the same band.
use super::{sampling::read_header_dimensions, ExtractionMethod, FeatureExtractor, ImageInput};
use crate::error::ExtractionError;
use crate::pipeline::types::{
    round1, ColorName, ColorTemperature, DominantColor, FeatureVector, ImageDimensions,
};
use std::path::Path;
use tracing::debug;

/// Linear band: inputs in `from` map onto `to`, clamped at both ends
#[derive(Debug, Clone, Copy)]
struct Band {
    from: (f64, f64),
    to: (f64, f64),
}

impl Band {
    const fn new(from: (f64, f64), to: (f64, f64)) -> Self {
        Self { from, to }
    }

    fn estimate(&self, value: f64) -> f64 {
        let span = self.from.1 - self.from.0;
        let t = if span <= 0.0 {
            0.0
        } else {
            ((value - self.from.0) / span).clamp(0.0, 1.0)
        };
        round1(self.to.0 + t * (self.to.1 - self.to.0))
    }
}

const BRIGHT_BAND: Band = Band::new((3.0, 6.0), (140.0, 180.0));
const MODERATE_BRIGHTNESS_BAND: Band = Band::new((1.5, 3.0), (100.0, 140.0));
const DARK_BAND: Band = Band::new((0.0, 1.5), (60.0, 100.0));

const HIGH_CONTRAST_BAND: Band = Band::new((2.5, 5.0), (45.0, 70.0));
const MODERATE_CONTRAST_BAND: Band = Band::new((1.0, 2.5), (25.0, 45.0));
const LOW_CONTRAST_BAND: Band = Band::new((0.0, 1.0), (10.0, 25.0));

const LARGE_FILE_BYTES: f64 = 2_000_000.0;
const MEDIUM_FILE_BYTES: f64 = 500_000.0;
const LARGE_FILE_SATURATION: Band = Band::new((2_000_000.0, 8_000_000.0), (40.0, 70.0));
const MEDIUM_FILE_SATURATION: Band = Band::new((500_000.0, 2_000_000.0), (25.0, 45.0));
const SMALL_FILE_SATURATION: Band = Band::new((0.0, 500_000.0), (15.0, 35.0));

const WARM_COLORS: [ColorName; 4] = [
    ColorName::Red,
    ColorName::Orange,
    ColorName::Yellow,
    ColorName::Brown,
];
const COOL_COLORS: [ColorName; 2] = [ColorName::Blue, ColorName::Purple];

pub struct HeuristicFeatureExtractor;

impl HeuristicFeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Estimates features from metadata alone.
    pub fn estimate(
        &self,
        file_size: usize,
        dimensions: ImageDimensions,
        file_name: Option<&str>,
    ) -> FeatureVector {
        let pixels = dimensions.width as f64 * dimensions.height as f64;
        let bytes_per_pixel = if pixels > 0.0 {
            file_size as f64 / pixels
        } else {
            1.0
        };

        let dominant_colors = self.palette_for(file_name);
        let color_temperature = self.temperature_for(&dominant_colors);

        FeatureVector {
            brightness: self.brightness(bytes_per_pixel),
            contrast: self.contrast(bytes_per_pixel),
            dominant_colors,
            color_temperature,
            saturation_level: self.saturation(file_size as f64),
            dimensions,
            aspect_ratio: dimensions.aspect_ratio(),
        }
    }

    fn brightness(&self, bytes_per_pixel: f64) -> f64 {
        if bytes_per_pixel > 3.0 {
            BRIGHT_BAND.estimate(bytes_per_pixel)
        } else if bytes_per_pixel > 1.5 {
            MODERATE_BRIGHTNESS_BAND.estimate(bytes_per_pixel)
        } else {
            DARK_BAND.estimate(bytes_per_pixel)
        }
    }

    fn contrast(&self, bytes_per_pixel: f64) -> f64 {
        if bytes_per_pixel > 2.5 {
            HIGH_CONTRAST_BAND.estimate(bytes_per_pixel)
        } else if bytes_per_pixel > 1.0 {
            MODERATE_CONTRAST_BAND.estimate(bytes_per_pixel)
        } else {
            LOW_CONTRAST_BAND.estimate(bytes_per_pixel)
        }
    }

    fn saturation(&self, file_size: f64) -> f64 {
        if file_size > LARGE_FILE_BYTES {
            LARGE_FILE_SATURATION.estimate(file_size)
        } else if file_size > MEDIUM_FILE_BYTES {
            MEDIUM_FILE_SATURATION.estimate(file_size)
        } else {
            SMALL_FILE_SATURATION.estimate(file_size)
        }
    }

    /// Typical palette for the room named in the file, if any.
    fn palette_for(&self, file_name: Option<&str>) -> Vec<DominantColor> {
        let name = file_name
            .and_then(|n| Path::new(n).file_name())
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let palette: [(ColorName, f64); 3] = if name.contains("bedroom") || name.contains("bed") {
            [
                (ColorName::White, 35.0),
                (ColorName::Gray, 30.0),
                (ColorName::Brown, 25.0),
            ]
        } else if name.contains("kitchen") {
            [
                (ColorName::White, 45.0),
                (ColorName::Gray, 25.0),
                (ColorName::Brown, 20.0),
            ]
        } else if name.contains("living") {
            [
                (ColorName::Brown, 35.0),
                (ColorName::White, 25.0),
                (ColorName::Gray, 25.0),
            ]
        } else {
            [
                (ColorName::Gray, 35.0),
                (ColorName::White, 30.0),
                (ColorName::Brown, 25.0),
            ]
        };

        palette
            .into_iter()
            .map(|(color, share)| DominantColor::new(color, share))
            .collect()
    }

    /// Warm and cool votes come from the estimated palette shares.
    fn temperature_for(&self, palette: &[DominantColor]) -> ColorTemperature {
        let share = |group: &[ColorName]| -> f64 {
            palette
                .iter()
                .filter(|c| group.contains(&c.color))
                .map(|c| c.percentage)
                .sum()
        };
        ColorTemperature::from_shares(share(&WARM_COLORS), share(&COOL_COLORS))
    }
}

impl Default for HeuristicFeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for HeuristicFeatureExtractor {
    fn extract(&self, input: &ImageInput<'_>) -> Result<FeatureVector, ExtractionError> {
        let dimensions = read_header_dimensions(input.bytes)?;
        let features = self.estimate(input.bytes.len(), dimensions, input.file_name);

        debug!(
            "Heuristic features for {} bytes at {}: brightness {}, contrast {}",
            input.bytes.len(),
            dimensions,
            features.brightness,
            features.contrast
        );
        Ok(features)
    }

    fn name(&self) -> &'static str {
        "HeuristicFeatureExtractor"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::FileHeuristic
    }
}
