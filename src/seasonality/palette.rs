//! Chart colors
//!
//! Colors are kept as CSS-style values so the same spec can be printed or
//! handed to a browser, and converted to RGB for terminal rendering.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartColor {
    Rgba { r: u8, g: u8, b: u8, a: f64 },
    /// Hue in degrees, saturation and lightness in percent
    Hsla { h: f64, s: f64, l: f64, a: f64 },
}

/// Positive significant impact
pub const POSITIVE: ChartColor = ChartColor::Rgba { r: 54, g: 162, b: 235, a: 0.7 };
/// Negative significant impact
pub const NEGATIVE: ChartColor = ChartColor::Rgba { r: 255, g: 99, b: 132, a: 0.7 };
/// Entries outside the significance set
pub const MUTED: ChartColor = ChartColor::Rgba { r: 201, g: 203, b: 207, a: 0.3 };

pub const ACTUAL_LINE: ChartColor = ChartColor::Rgba { r: 75, g: 192, b: 192, a: 1.0 };
pub const FORECAST_LINE: ChartColor = ChartColor::Rgba { r: 255, g: 99, b: 132, a: 1.0 };
pub const BOUND_LINE: ChartColor = ChartColor::Rgba { r: 255, g: 99, b: 132, a: 0.2 };
pub const TREND_LINE: ChartColor = ChartColor::Rgba { r: 255, g: 205, b: 86, a: 1.0 };

impl ChartColor {
    /// Evenly spaced hue for slot `i` of `n`
    pub fn wheel(i: usize, n: usize, lightness: f64) -> Self {
        let hue = if n == 0 {
            0.0
        } else {
            (i as f64 * 360.0 / n as f64) % 360.0
        };
        ChartColor::Hsla {
            h: hue,
            s: 70.0,
            l: lightness,
            a: 0.7,
        }
    }

    /// Same color at full opacity (used for borders)
    pub fn opaque(self) -> Self {
        match self {
            ChartColor::Rgba { r, g, b, .. } => ChartColor::Rgba { r, g, b, a: 1.0 },
            ChartColor::Hsla { h, s, l, .. } => ChartColor::Hsla { h, s, l, a: 1.0 },
        }
    }

    pub fn alpha(self) -> f64 {
        match self {
            ChartColor::Rgba { a, .. } | ChartColor::Hsla { a, .. } => a,
        }
    }

    /// RGB triple, ignoring alpha
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            ChartColor::Rgba { r, g, b, .. } => (r, g, b),
            ChartColor::Hsla { h, s, l, .. } => hsl_to_rgb(h, s / 100.0, l / 100.0),
        }
    }
}

impl fmt::Display for ChartColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartColor::Rgba { r, g, b, a } => write!(f, "rgba({}, {}, {}, {})", r, g, b, a),
            ChartColor::Hsla { h, s, l, a } => write!(f, "hsla({}, {}%, {}%, {})", h, s, l, a),
        }
    }
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h_prime = (h.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r1), to_byte(g1), to_byte(b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_strings() {
        assert_eq!(POSITIVE.to_string(), "rgba(54, 162, 235, 0.7)");
        assert_eq!(POSITIVE.opaque().to_string(), "rgba(54, 162, 235, 1)");
        assert_eq!(ChartColor::wheel(1, 6, 60.0).to_string(), "hsla(60, 70%, 60%, 0.7)");
    }

    #[test]
    fn test_wheel_spacing() {
        let hues: Vec<f64> = (0..4)
            .map(|i| match ChartColor::wheel(i, 4, 60.0) {
                ChartColor::Hsla { h, .. } => h,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(hues, vec![0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn test_hsl_conversion() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), (255, 255, 255));
    }
}
