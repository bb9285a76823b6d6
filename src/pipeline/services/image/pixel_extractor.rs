/// Grid-sampling feature extractor over decoded JPEG/PNG pixels
use super::{
    color::{luminance, Hsv},
    sampling::{
        RasterImage, HISTOGRAM_GRID_DIVISOR, TEMPERATURE_GRID_DIVISOR, TONAL_GRID_DIVISOR,
    },
    ExtractionMethod, FeatureExtractor, ImageInput,
};
use crate::error::ExtractionError;
use crate::pipeline::types::{
    round1, ColorName, ColorTemperature, DominantColor, FeatureVector,
};
use tracing::{debug, warn};

const DEFAULT_BRIGHTNESS: f64 = 128.0;
const DEFAULT_CONTRAST: f64 = 25.0;
const DEFAULT_SATURATION: f64 = 30.0;
const MAX_DOMINANT_COLORS: usize = 3;
const TEMPERATURE_MARGIN: i16 = 20;

pub struct PixelFeatureExtractor;

impl PixelFeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Computes every feature from an already decoded raster.
    pub fn extract_from_raster(&self, raster: &RasterImage) -> FeatureVector {
        let dimensions = raster.dimensions();
        FeatureVector {
            brightness: self.brightness(raster),
            contrast: self.contrast(raster),
            dominant_colors: self.dominant_colors(raster),
            color_temperature: self.color_temperature(raster),
            saturation_level: self.saturation(raster),
            dimensions,
            aspect_ratio: dimensions.aspect_ratio(),
        }
    }

    fn luminances(&self, raster: &RasterImage) -> Result<Vec<f64>, ExtractionError> {
        Ok(raster
            .sample_grid(TONAL_GRID_DIVISOR)?
            .into_iter()
            .map(|(r, g, b)| luminance(r, g, b))
            .collect())
    }

    fn brightness(&self, raster: &RasterImage) -> f64 {
        match self.luminances(raster) {
            Ok(values) => round1(values.iter().sum::<f64>() / values.len() as f64),
            Err(e) => {
                warn!("Brightness fell back to default: {}", e);
                DEFAULT_BRIGHTNESS
            }
        }
    }

    /// Population std-dev of luminance, 128 maps to 100.
    fn contrast(&self, raster: &RasterImage) -> f64 {
        let values = match self.luminances(raster) {
            Ok(values) if values.len() >= 2 => values,
            Ok(_) => return DEFAULT_CONTRAST,
            Err(e) => {
                warn!("Contrast fell back to default: {}", e);
                return DEFAULT_CONTRAST;
            }
        };

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        round1((variance.sqrt() / 128.0 * 100.0).min(100.0))
    }

    fn dominant_colors(&self, raster: &RasterImage) -> Vec<DominantColor> {
        let samples = match raster.sample_grid(HISTOGRAM_GRID_DIVISOR) {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Dominant colors fell back to default: {}", e);
                return vec![
                    DominantColor::new(ColorName::Gray, 50.0),
                    DominantColor::new(ColorName::White, 30.0),
                    DominantColor::new(ColorName::Black, 20.0),
                ];
            }
        };

        let mut buckets = [0usize; ColorName::ALL.len()];
        for (r, g, b) in &samples {
            buckets[Hsv::from_rgb(*r, *g, *b).color_name().index()] += 1;
        }

        let total = samples.len() as f64;
        let mut colors: Vec<DominantColor> = ColorName::ALL
            .iter()
            .zip(buckets)
            .filter(|(_, count)| *count > 0)
            .map(|(color, count)| DominantColor::new(*color, round1(count as f64 / total * 100.0)))
            .collect();

        // stable: equal shares keep histogram order
        colors.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        colors.truncate(MAX_DOMINANT_COLORS);
        colors
    }

    fn color_temperature(&self, raster: &RasterImage) -> ColorTemperature {
        let samples = match raster.sample_grid(TEMPERATURE_GRID_DIVISOR) {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Color temperature fell back to neutral: {}", e);
                return ColorTemperature::neutral();
            }
        };

        let (mut warm, mut cool) = (0usize, 0usize);
        for (r, _, b) in &samples {
            let (r, b) = (*r as i16, *b as i16);
            if r > b + TEMPERATURE_MARGIN {
                warm += 1;
            }
            if b > r + TEMPERATURE_MARGIN {
                cool += 1;
            }
        }

        let total = samples.len() as f64;
        ColorTemperature::from_shares(warm as f64 / total * 100.0, cool as f64 / total * 100.0)
    }

    fn saturation(&self, raster: &RasterImage) -> f64 {
        match raster.sample_grid(TONAL_GRID_DIVISOR) {
            Ok(samples) => {
                let total: f64 = samples
                    .iter()
                    .map(|(r, g, b)| Hsv::from_rgb(*r, *g, *b).s)
                    .sum();
                round1(total / samples.len() as f64 * 100.0)
            }
            Err(e) => {
                warn!("Saturation fell back to default: {}", e);
                DEFAULT_SATURATION
            }
        }
    }
}

impl Default for PixelFeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor for PixelFeatureExtractor {
    fn extract(&self, input: &ImageInput<'_>) -> Result<FeatureVector, ExtractionError> {
        let raster = RasterImage::decode(input.bytes)?;
        let features = self.extract_from_raster(&raster);
        drop(raster);

        debug!(
            "Pixel features: brightness {}, contrast {}, saturation {}, {} color buckets",
            features.brightness,
            features.contrast,
            features.saturation_level,
            features.dominant_colors.len()
        );
        Ok(features)
    }

    fn name(&self) -> &'static str {
        "PixelFeatureExtractor"
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PixelSampling
    }
}
