use crate::pipeline::types::ColorName;

/// Hue in degrees [0, 360), saturation and value in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r = r as f64 / 255.0;
        let g = g as f64 / 255.0;
        let b = b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = max - min;

        let s = if max == 0.0 { 0.0 } else { diff / max };

        let mut h = if diff == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / diff)
        } else if max == g {
            60.0 * (2.0 + (b - r) / diff)
        } else {
            60.0 * (4.0 + (r - g) / diff)
        };
        if h < 0.0 {
            h += 360.0;
        }

        Self { h, s, v: max }
    }

    /// Buckets the color into one of the named histogram bins.
    pub fn color_name(&self) -> ColorName {
        if self.s < 0.15 {
            return if self.v < 0.2 {
                ColorName::Black
            } else if self.v > 0.8 {
                ColorName::White
            } else {
                ColorName::Gray
            };
        }

        let in_red_orange = self.h < 45.0 || self.h >= 345.0;
        if in_red_orange && self.s < 0.6 && self.v < 0.6 {
            return ColorName::Brown;
        }

        match self.h {
            h if h < 15.0 || h >= 345.0 => ColorName::Red,
            h if h < 45.0 => ColorName::Orange,
            h if h < 75.0 => ColorName::Yellow,
            h if h < 150.0 => ColorName::Green,
            h if h < 210.0 => ColorName::Blue,
            _ => ColorName::Purple,
        }
    }
}

/// Rec. 601 luma
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}
