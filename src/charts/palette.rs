//! Qualitative color palettes for chart series.

use serde::{Serialize, Serializer};

/// An sRGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A fixed, ordered set of colors.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub name: &'static str,
    colors: &'static [Rgb],
}

impl Palette {
    /// Default series colors for histograms and scatter plots.
    pub const PLOTLY: Palette = Palette {
        name: "Plotly",
        colors: &[
            Rgb(99, 110, 250),
            Rgb(239, 85, 59),
            Rgb(0, 204, 150),
            Rgb(171, 99, 250),
            Rgb(255, 161, 90),
            Rgb(25, 211, 243),
            Rgb(255, 102, 146),
            Rgb(182, 232, 128),
            Rgb(255, 151, 255),
            Rgb(254, 203, 82),
        ],
    };

    /// Model colors in the parallel-coordinates legend.
    pub const PASTEL: Palette = Palette {
        name: "Pastel",
        colors: &[
            Rgb(102, 197, 204),
            Rgb(246, 207, 113),
            Rgb(248, 156, 116),
            Rgb(220, 176, 242),
            Rgb(135, 197, 95),
            Rgb(158, 185, 243),
            Rgb(254, 136, 177),
            Rgb(201, 219, 116),
            Rgb(139, 224, 164),
            Rgb(180, 151, 231),
            Rgb(179, 179, 179),
        ],
    };

    /// Continuous scale stops for the parallel-coordinates color axis.
    pub const SET3: Palette = Palette {
        name: "Set3",
        colors: &[
            Rgb(141, 211, 199),
            Rgb(255, 255, 179),
            Rgb(190, 186, 218),
            Rgb(251, 128, 114),
            Rgb(128, 177, 211),
            Rgb(253, 180, 98),
            Rgb(179, 222, 105),
            Rgb(252, 205, 229),
            Rgb(217, 217, 217),
            Rgb(188, 128, 189),
            Rgb(204, 235, 197),
            Rgb(255, 237, 111),
        ],
    };

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &'static [Rgb] {
        self.colors
    }

    /// Color for the `index`-th category, wrapping around past the end.
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }

    /// Treat the palette as a continuous scale and sample it at `t` in [0, 1].
    pub fn sample(&self, t: f64) -> Rgb {
        let last = self.colors.len() - 1;
        if last == 0 || !t.is_finite() {
            return self.colors[0];
        }
        let pos = t.clamp(0.0, 1.0) * last as f64;
        let lo = pos.floor() as usize;
        if lo >= last {
            return self.colors[last];
        }
        self.colors[lo].lerp(self.colors[lo + 1], pos - lo as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_format() {
        assert_eq!(Rgb(99, 110, 250).to_hex(), "#636efa");
        assert_eq!(serde_json::to_string(&Rgb(0, 204, 150)).unwrap(), "\"#00cc96\"");
    }

    #[test]
    fn test_color_wraps_around() {
        let pastel = Palette::PASTEL;
        assert_eq!(pastel.color(0), pastel.color(pastel.len()));
        assert_eq!(pastel.color(3), pastel.color(pastel.len() * 2 + 3));
    }

    #[test]
    fn test_sample_endpoints_and_midpoint() {
        let set3 = Palette::SET3;
        assert_eq!(set3.sample(0.0), set3.colors()[0]);
        assert_eq!(set3.sample(1.0), set3.colors()[set3.len() - 1]);
        assert_eq!(set3.sample(-3.0), set3.colors()[0]);

        let two = Palette {
            name: "test",
            colors: &[Rgb(0, 0, 0), Rgb(200, 100, 50)],
        };
        assert_eq!(two.sample(0.5), Rgb(100, 50, 25));
    }
}
