//! Built-in PDF fonts and their glyph widths
//!
//! Only the base-14 Helvetica and Courier faces are used, so documents never
//! embed font files. Widths are the standard AFM advance widths in 1/1000 em
//! for the printable ASCII range.

use super::DocumentError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// One of the built-in PDF font faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum FontName {
    /// Helvetica
    #[default]
    Helvetica,
    /// Helvetica-Bold
    HelveticaBold,
    /// Helvetica-Oblique
    HelveticaOblique,
    /// Helvetica-BoldOblique
    HelveticaBoldOblique,
    /// Courier
    Courier,
    /// Courier-Bold
    CourierBold,
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const COURIER_WIDTH: u16 = 600;
const FALLBACK_WIDTH: u16 = 556;

impl FontName {
    /// The `PostScript` name used in documents and PDF files
    #[must_use]
    pub const fn postscript_name(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
        }
    }

    /// Whether every glyph has the same advance
    #[must_use]
    pub const fn is_monospace(self) -> bool {
        matches!(self, Self::Courier | Self::CourierBold)
    }

    /// Whether this face is a bold weight
    #[must_use]
    pub const fn is_bold(self) -> bool {
        matches!(
            self,
            Self::HelveticaBold | Self::HelveticaBoldOblique | Self::CourierBold
        )
    }

    /// Whether this face is slanted
    #[must_use]
    pub const fn is_italic(self) -> bool {
        matches!(self, Self::HelveticaOblique | Self::HelveticaBoldOblique)
    }

    /// Same family with the requested weight and slant.
    ///
    /// Courier has no oblique face in this set, so italic Courier stays upright.
    #[must_use]
    pub const fn with_style(self, bold: bool, italic: bool) -> Self {
        if self.is_monospace() {
            return if bold { Self::CourierBold } else { Self::Courier };
        }
        match (bold, italic) {
            (false, false) => Self::Helvetica,
            (true, false) => Self::HelveticaBold,
            (false, true) => Self::HelveticaOblique,
            (true, true) => Self::HelveticaBoldOblique,
        }
    }

    /// Advance width of one character in 1/1000 em
    #[must_use]
    pub fn char_width(self, c: char) -> u16 {
        if self.is_monospace() {
            return COURIER_WIDTH;
        }
        let table = if self.is_bold() {
            &HELVETICA_BOLD
        } else {
            &HELVETICA
        };
        let code = c as u32;
        if (32..127).contains(&code) {
            table[(code - 32) as usize]
        } else {
            FALLBACK_WIDTH
        }
    }

    /// Width of `text` at `size` points
    #[must_use]
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        #[allow(clippy::cast_precision_loss)]
        let units = units as f32;
        units * size / 1000.0
    }
}

impl FromStr for FontName {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Helvetica" => Ok(Self::Helvetica),
            "Helvetica-Bold" => Ok(Self::HelveticaBold),
            "Helvetica-Oblique" => Ok(Self::HelveticaOblique),
            "Helvetica-BoldOblique" => Ok(Self::HelveticaBoldOblique),
            "Courier" => Ok(Self::Courier),
            "Courier-Bold" => Ok(Self::CourierBold),
            other => Err(DocumentError::Font(other.to_string())),
        }
    }
}

impl TryFrom<String> for FontName {
    type Error = DocumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.postscript_name())
    }
}

/// Fold text into the characters the built-in fonts can show.
///
/// Latin letters with diacritics lose the accent, typographic quotes and
/// dashes become their ASCII forms, and anything else outside ASCII is dropped.
#[must_use]
pub fn fold_to_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        let folded = match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
            'ç' | 'ć' | 'č' => "c",
            'Ç' | 'Ć' | 'Č' => "C",
            'è' | 'é' | 'ê' | 'ë' => "e",
            'È' | 'É' | 'Ê' | 'Ë' => "E",
            'ì' | 'í' | 'î' | 'ï' => "i",
            'Ì' | 'Í' | 'Î' | 'Ï' => "I",
            'ñ' => "n",
            'Ñ' => "N",
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
            'ù' | 'ú' | 'û' | 'ü' => "u",
            'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
            'ý' | 'ÿ' => "y",
            'š' => "s",
            'Š' => "S",
            'ž' => "z",
            'Ž' => "Z",
            'ß' => "ss",
            '‘' | '’' | '′' => "'",
            '“' | '”' | '″' => "\"",
            '–' | '—' | '−' => "-",
            '…' => "...",
            '→' => "->",
            '←' => "<-",
            '•' | '·' => "*",
            '✓' | '✔' => "v",
            '\u{a0}' => " ",
            _ => "",
        };
        out.push_str(folded);
    }
    out
}
