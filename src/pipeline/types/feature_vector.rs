use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Named color bucket a sampled pixel falls into
    pub enum ColorName {
        Red => "red",
        Green => "green",
        Blue => "blue",
        Yellow => "yellow",
        Orange => "orange",
        Purple => "purple",
        Brown => "brown",
        Gray => "gray",
        White => "white",
        Black => "black",
    }
}

impl ColorName {
    /// Histogram order; equal shares are reported in this order.
    pub const ALL: [ColorName; 10] = [
        ColorName::Red,
        ColorName::Green,
        ColorName::Blue,
        ColorName::Yellow,
        ColorName::Orange,
        ColorName::Purple,
        ColorName::Brown,
        ColorName::Gray,
        ColorName::White,
        ColorName::Black,
    ];

    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or_default()
    }
}

labeled_enum! {
    pub enum TemperatureCategory {
        Warm => "warm",
        Cool => "cool",
        Neutral => "neutral",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorTemperature {
    pub category: TemperatureCategory,
    /// Winning vote percentage, or the warm/cool imbalance when neutral.
    pub score: f64,
}

impl ColorTemperature {
    pub fn neutral() -> Self {
        Self {
            category: TemperatureCategory::Neutral,
            score: 0.0,
        }
    }

    /// Applies the 10 point hysteresis band to warm and cool vote shares.
    pub fn from_shares(warm_percentage: f64, cool_percentage: f64) -> Self {
        if warm_percentage > cool_percentage + 10.0 {
            Self {
                category: TemperatureCategory::Warm,
                score: round1(warm_percentage),
            }
        } else if cool_percentage > warm_percentage + 10.0 {
            Self {
                category: TemperatureCategory::Cool,
                score: round1(cool_percentage),
            }
        } else {
            Self {
                category: TemperatureCategory::Neutral,
                score: round1((warm_percentage - cool_percentage).abs()),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    pub color: ColorName,
    pub percentage: f64,
}

impl DominantColor {
    pub fn new(color: ColorName, percentage: f64) -> Self {
        Self { color, percentage }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        round2(self.width as f64 / self.height as f64)
    }
}

impl std::fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Numeric and categorical summary of one room photograph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub brightness: f64,
    pub contrast: f64,
    pub dominant_colors: Vec<DominantColor>,
    pub color_temperature: ColorTemperature,
    pub saturation_level: f64,
    pub dimensions: ImageDimensions,
    pub aspect_ratio: f64,
}

impl FeatureVector {
    /// Values used when no image information could be read at all.
    pub fn fallback() -> Self {
        let dimensions = ImageDimensions::new(800, 600);
        Self {
            brightness: 128.0,
            contrast: 35.0,
            dominant_colors: vec![
                DominantColor::new(ColorName::Gray, 40.0),
                DominantColor::new(ColorName::White, 35.0),
                DominantColor::new(ColorName::Brown, 25.0),
            ],
            color_temperature: ColorTemperature::neutral(),
            saturation_level: 30.0,
            dimensions,
            aspect_ratio: dimensions.aspect_ratio(),
        }
    }

    pub fn share_of(&self, color: ColorName) -> Option<f64> {
        self.dominant_colors
            .iter()
            .find(|c| c.color == color)
            .map(|c| c.percentage)
    }

    pub fn has_color(&self, color: ColorName) -> bool {
        self.share_of(color).is_some()
    }

    /// Combined share of the white and gray buckets.
    pub fn light_color_share(&self) -> f64 {
        [ColorName::White, ColorName::Gray]
            .iter()
            .filter_map(|c| self.share_of(*c))
            .sum()
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_hysteresis_band() {
        let warm = ColorTemperature::from_shares(40.0, 25.0);
        assert_eq!(warm.category, TemperatureCategory::Warm);
        assert_eq!(warm.score, 40.0);

        let neutral = ColorTemperature::from_shares(30.0, 25.0);
        assert_eq!(neutral.category, TemperatureCategory::Neutral);
        assert_eq!(neutral.score, 5.0);

        let cool = ColorTemperature::from_shares(0.0, 62.34);
        assert_eq!(cool.category, TemperatureCategory::Cool);
        assert_eq!(cool.score, 62.3);
    }

    #[test]
    fn aspect_ratio_rounds_to_two_decimals() {
        assert_eq!(ImageDimensions::new(800, 600).aspect_ratio(), 1.33);
        assert_eq!(ImageDimensions::new(600, 800).aspect_ratio(), 0.75);
        assert_eq!(ImageDimensions::new(10, 0).aspect_ratio(), 1.0);
    }

    #[test]
    fn light_share_sums_white_and_gray() {
        let features = FeatureVector::fallback();
        assert_eq!(features.light_color_share(), 75.0);
        assert!(features.has_color(ColorName::Brown));
        assert!(!features.has_color(ColorName::Blue));
    }

    #[test]
    fn color_labels_serialize_lowercase() {
        let json = serde_json::to_string(&ColorName::Brown).unwrap();
        assert_eq!(json, "\"brown\"");
        assert_eq!(ColorName::Gray.to_string(), "gray");
        assert_eq!(ColorName::Black.index(), 9);
    }
}
