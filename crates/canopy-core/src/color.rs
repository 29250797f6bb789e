//! Color representation and the scales used to tint hierarchy nodes.

use serde::{Deserialize, Serialize};

/// RGBA color with values in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

impl Color {
    /// Create a new color, clamping values to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB values.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub fn from_rgb_u32(rgb: u32) -> Self {
        let r = ((rgb >> 16) & 0xff) as u8;
        let g = ((rgb >> 8) & 0xff) as u8;
        let b = (rgb & 0xff) as u8;
        Self::rgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Convert to hex string (RGB only).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Neutral grey used for nodes outside any branch.
    pub const NEUTRAL: Self = Self {
        r: 0.8,
        g: 0.8,
        b: 0.8,
        a: 1.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Piecewise-linear color ramp over a numeric domain.
///
/// The domain may be inverted (`start > end`), which flips the ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialScale {
    stops: Vec<Color>,
    start: f64,
    end: f64,
}

/// Magma control points, dark to light.
const MAGMA: [u32; 9] = [
    0x000004, 0x1c1044, 0x4f127b, 0x812581, 0xb5367a, 0xe55064, 0xfb8761, 0xfec287, 0xfcfdbf,
];

impl SequentialScale {
    /// Build a scale from explicit stops. Fewer than two stops yields a constant scale.
    #[must_use]
    pub fn new(stops: Vec<Color>, start: f64, end: f64) -> Self {
        Self { stops, start, end }
    }

    /// Magma ramp over `[start, end]`.
    #[must_use]
    pub fn magma(start: f64, end: f64) -> Self {
        Self::new(
            MAGMA.iter().map(|&c| Color::from_rgb_u32(c)).collect(),
            start,
            end,
        )
    }

    /// Map a value to a color. Values outside the domain clamp to the ends.
    #[must_use]
    pub fn color(&self, value: f64) -> Color {
        match self.stops.len() {
            0 => Color::NEUTRAL,
            1 => self.stops[0],
            n => {
                let span = self.end - self.start;
                let t = if span == 0.0 {
                    0.0
                } else {
                    ((value - self.start) / span).clamp(0.0, 1.0)
                };
                let scaled = t * (n - 1) as f64;
                let i = (scaled.floor() as usize).min(n - 2);
                let local = (scaled - i as f64) as f32;
                self.stops[i].lerp(&self.stops[i + 1], local)
            }
        }
    }
}

/// Categorical palette that hands out colors by key in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale {
    palette: Vec<Color>,
    assigned: Vec<String>,
}

const CATEGORY10: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];

impl OrdinalScale {
    /// Ten-hue categorical palette.
    #[must_use]
    pub fn category10() -> Self {
        Self {
            palette: CATEGORY10.iter().map(|&c| Color::from_rgb_u32(c)).collect(),
            assigned: Vec::new(),
        }
    }

    /// Color for `key`, assigning the next palette entry on first sight.
    pub fn color(&mut self, key: &str) -> Color {
        if self.palette.is_empty() {
            return Color::NEUTRAL;
        }
        let slot = match self.assigned.iter().position(|k| k == key) {
            Some(slot) => slot,
            None => {
                self.assigned.push(key.to_string());
                self.assigned.len() - 1
            }
        };
        self.palette[slot % self.palette.len()]
    }
}
