use std::io::Cursor;

use image::{ImageFormat, ImageReader, RgbImage};

use crate::error::ExtractionError;
use crate::pipeline::types::ImageDimensions;

/// Grid divisor for brightness, contrast and saturation
pub const TONAL_GRID_DIVISOR: f64 = 50.0;
/// Grid divisor for the color histogram
pub const HISTOGRAM_GRID_DIVISOR: f64 = 30.0;
/// Grid divisor for the warm/cool vote
pub const TEMPERATURE_GRID_DIVISOR: f64 = 40.0;

/// Decoded RGB raster, owned by a single extraction call.
pub struct RasterImage {
    pixels: RgbImage,
}

impl RasterImage {
    /// Decodes JPEG or PNG bytes; every other format is rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, ExtractionError> {
        let format = image::guess_format(bytes)
            .map_err(|e| ExtractionError::decode("unrecognized image format", e))?;

        if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
            return Err(ExtractionError::unsupported(format!(
                "unsupported image format {:?}",
                format
            )));
        }

        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| ExtractionError::decode(format!("corrupt {:?} data", format), e))?;

        Ok(Self {
            pixels: decoded.to_rgb8(),
        })
    }

    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width(), self.height())
    }

    pub fn rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        self.pixels
            .get_pixel_checked(x, y)
            .map(|p| (p[0], p[1], p[2]))
    }

    /// Samples a regular grid with `step = max(1, min(w, h) / divisor)`.
    ///
    /// The step is fractional; coordinates are truncated when read.
    pub fn sample_grid(&self, divisor: f64) -> Result<Vec<(u8, u8, u8)>, ExtractionError> {
        let (width, height) = (self.width(), self.height());
        let step = (width.min(height) as f64 / divisor).max(1.0);

        let mut samples = Vec::new();
        let mut x = 0.0;
        while x < width as f64 {
            let mut y = 0.0;
            while y < height as f64 {
                if let Some(rgb) = self.rgb(x as u32, y as u32) {
                    samples.push(rgb);
                }
                y += step;
            }
            x += step;
        }

        if samples.is_empty() {
            return Err(ExtractionError::ZeroSample { width, height });
        }
        Ok(samples)
    }
}

/// Reads width and height from the header without decoding pixels.
pub fn read_header_dimensions(bytes: &[u8]) -> Result<ImageDimensions, ExtractionError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ExtractionError::unsupported(format!("unreadable header: {}", e)))?;

    if reader.format().is_none() {
        return Err(ExtractionError::unsupported("unrecognized image header"));
    }

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ExtractionError::decode("unreadable image dimensions", e))?;
    Ok(ImageDimensions::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb};

    fn encode(img: RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn grid_step_scales_with_short_side() {
        let raster = RasterImage::from_rgb(RgbImage::from_pixel(100, 100, Rgb([1, 2, 3])));
        // step = 2.0 -> 50 x 50 samples
        assert_eq!(raster.sample_grid(50.0).unwrap().len(), 2500);

        let small = RasterImage::from_rgb(RgbImage::from_pixel(10, 4, Rgb([1, 2, 3])));
        // step clamps to 1 -> every pixel
        assert_eq!(small.sample_grid(50.0).unwrap().len(), 40);
    }

    #[test]
    fn empty_raster_reports_zero_samples() {
        let raster = RasterImage::from_rgb(RgbImage::new(0, 0));
        assert!(matches!(
            raster.sample_grid(30.0),
            Err(ExtractionError::ZeroSample { width: 0, height: 0 })
        ));
    }

    #[test]
    fn decodes_png_and_rejects_bmp() {
        let png = encode(RgbImage::from_pixel(8, 6, Rgb([9, 9, 9])), ImageFormat::Png);
        let raster = RasterImage::decode(&png).unwrap();
        assert_eq!(raster.dimensions(), ImageDimensions::new(8, 6));
        assert_eq!(raster.rgb(0, 0), Some((9, 9, 9)));
        assert_eq!(raster.rgb(8, 0), None);

        let bmp = encode(RgbImage::from_pixel(8, 6, Rgb([9, 9, 9])), ImageFormat::Bmp);
        assert!(matches!(
            RasterImage::decode(&bmp),
            Err(ExtractionError::ImageDecode { .. })
        ));
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let png = encode(RgbImage::from_pixel(64, 64, Rgb([200, 10, 10])), ImageFormat::Png);
        let truncated = &png[..png.len() / 2];
        assert!(RasterImage::decode(truncated).is_err());
    }

    #[test]
    fn header_dimensions_without_decoding() {
        let bmp = encode(RgbImage::from_pixel(40, 30, Rgb([9, 9, 9])), ImageFormat::Bmp);
        assert_eq!(
            read_header_dimensions(&bmp).unwrap(),
            ImageDimensions::new(40, 30)
        );
        assert!(read_header_dimensions(b"definitely not an image").is_err());
    }
}
