//! Lengths and page geometry
//!
//! Everything is stored in PDF points (1/72 inch).

use super::DocumentError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Points per centimetre
pub const CM: f32 = 72.0 / 2.54;
/// Points per millimetre
pub const MM: f32 = CM / 10.0;
/// Points per inch
pub const INCH: f32 = 72.0;

/// A distance in points, written in documents as `"2cm"`, `"0.5in"`, `"10pt"` or a bare number
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(try_from = "LengthRepr")]
pub struct Length(pub f32);

#[derive(Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Points(f64),
    Text(String),
}

impl Length {
    /// Length from a number of points
    #[must_use]
    pub const fn pt(points: f32) -> Self {
        Self(points)
    }

    /// Length from centimetres
    #[must_use]
    pub fn cm(value: f32) -> Self {
        Self(value * CM)
    }

    /// Length from inches
    #[must_use]
    pub fn inch(value: f32) -> Self {
        Self(value * INCH)
    }

    /// Value in points
    #[must_use]
    pub const fn points(self) -> f32 {
        self.0
    }

    /// Value in millimetres
    #[must_use]
    pub fn millimetres(self) -> f32 {
        self.0 / MM
    }
}

impl FromStr for Length {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);
        let value: f32 = number
            .trim()
            .parse()
            .map_err(|_| DocumentError::Length(s.to_string()))?;
        let factor = match unit.trim().to_ascii_lowercase().as_str() {
            "" | "pt" => 1.0,
            "cm" => CM,
            "mm" => MM,
            "in" | "inch" => INCH,
            _ => return Err(DocumentError::Length(s.to_string())),
        };
        if !value.is_finite() || value < 0.0 {
            return Err(DocumentError::Length(s.to_string()));
        }
        Ok(Self(value * factor))
    }
}

impl TryFrom<LengthRepr> for Length {
    type Error = DocumentError;

    #[allow(clippy::cast_possible_truncation)]
    fn try_from(repr: LengthRepr) -> Result<Self, Self::Error> {
        match repr {
            LengthRepr::Points(p) if p.is_finite() && p >= 0.0 => Ok(Self(p as f32)),
            LengthRepr::Points(p) => Err(DocumentError::Length(p.to_string())),
            LengthRepr::Text(text) => text.parse(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}pt", self.0)
    }
}

/// Paper sizes known to the layout engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PaperSize {
    /// ISO A4, 210 x 297 mm
    #[default]
    A4,
    /// US Letter, 8.5 x 11 in
    Letter,
}

impl PaperSize {
    /// Portrait width and height in points
    #[must_use]
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0 * MM, 297.0 * MM),
            Self::Letter => (8.5 * INCH, 11.0 * INCH),
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide
    #[default]
    Portrait,
    /// Wider than tall
    Landscape,
}

/// Page margins
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Margins {
    /// Top margin
    #[serde(default = "default_margin")]
    pub top: Length,
    /// Right margin
    #[serde(default = "default_margin")]
    pub right: Length,
    /// Bottom margin
    #[serde(default = "default_margin")]
    pub bottom: Length,
    /// Left margin
    #[serde(default = "default_margin")]
    pub left: Length,
}

const fn default_margin() -> Length {
    Length::pt(INCH)
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: default_margin(),
            right: default_margin(),
            bottom: default_margin(),
            left: default_margin(),
        }
    }
}

/// Paper, orientation and margins of every page in a document
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct PageSetup {
    /// Paper size
    #[serde(default)]
    pub size: PaperSize,
    /// Orientation
    #[serde(default)]
    pub orientation: Orientation,
    /// Margins
    #[serde(default)]
    pub margins: Margins,
}

impl PageSetup {
    /// Width and height of the page in points after applying orientation
    #[must_use]
    pub fn page_size(&self) -> (f32, f32) {
        let (w, h) = self.size.dimensions();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Width of the text frame
    #[must_use]
    pub fn frame_width(&self) -> f32 {
        self.page_size().0 - self.margins.left.points() - self.margins.right.points()
    }

    /// Height of the text frame
    #[must_use]
    pub fn frame_height(&self) -> f32 {
        self.page_size().1 - self.margins.top.points() - self.margins.bottom.points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_length_units() {
        assert!(close("2cm".parse::<Length>().unwrap().points(), 56.69));
        assert!(close("0.5in".parse::<Length>().unwrap().points(), 36.0));
        assert!(close("15mm".parse::<Length>().unwrap().points(), 42.52));
        assert!(close("12".parse::<Length>().unwrap().points(), 12.0));
        assert!(close(" 3.5 cm ".parse::<Length>().unwrap().points(), 99.21));
    }

    #[test]
    fn test_length_rejects_garbage() {
        assert!("2furlongs".parse::<Length>().is_err());
        assert!("cm".parse::<Length>().is_err());
        assert!("-1cm".parse::<Length>().is_err());
    }

    #[test]
    fn test_length_deserializes_number_or_string() {
        #[derive(Deserialize)]
        struct Holder {
            a: Length,
            b: Length,
        }
        let h: Holder = toml::from_str("a = 20\nb = \"1in\"").unwrap();
        assert!(close(h.a.points(), 20.0));
        assert!(close(h.b.points(), 72.0));
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let setup = PageSetup {
            orientation: Orientation::Landscape,
            ..PageSetup::default()
        };
        let (w, h) = setup.page_size();
        assert!(w > h);
        assert!(close(w, 841.89));
    }
}
