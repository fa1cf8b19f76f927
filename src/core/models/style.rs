//! Paragraph styles and the stylesheet documents extend

use super::{Color, DocumentError, FontName};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Horizontal placement of paragraph lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Ragged right
    #[default]
    Left,
    /// Centered
    Center,
    /// Ragged left
    Right,
    /// Both edges flush except for the last line
    Justify,
}

/// A fully resolved paragraph style
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    /// Base font face; inline `<b>` and `<i>` switch within its family
    pub font: FontName,
    /// Font size in points
    pub font_size: f32,
    /// Baseline-to-baseline distance in points
    pub leading: f32,
    /// Space above the paragraph, dropped at the top of a page
    pub space_before: f32,
    /// Space below the paragraph
    pub space_after: f32,
    /// Line alignment
    pub align: Alignment,
    /// Default text color
    pub color: Color,
}

impl ParagraphStyle {
    const fn base(font: FontName, font_size: f32, leading: f32) -> Self {
        Self {
            font,
            font_size,
            leading,
            space_before: 0.0,
            space_after: 0.0,
            align: Alignment::Left,
            color: Color::BLACK,
        }
    }

    const fn spaced(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }
}

/// Partial style as written in a document; unset fields come from `parent`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleSpec {
    /// Style to inherit from (defaults to `normal`)
    pub parent: Option<String>,
    /// Font face
    pub font: Option<FontName>,
    /// Font size
    pub font_size: Option<f32>,
    /// Leading
    pub leading: Option<f32>,
    /// Space before
    pub space_before: Option<f32>,
    /// Space after
    pub space_after: Option<f32>,
    /// Alignment
    pub align: Option<Alignment>,
    /// Text color
    pub color: Option<Color>,
}

impl StyleSpec {
    fn apply(&self, parent: &ParagraphStyle) -> ParagraphStyle {
        let font_size = self.font_size.unwrap_or(parent.font_size);
        // A larger size without an explicit leading must not overlap its own lines.
        let leading = self
            .leading
            .unwrap_or_else(|| parent.leading.max(font_size * 1.2));
        ParagraphStyle {
            font: self.font.unwrap_or(parent.font),
            font_size,
            leading,
            space_before: self.space_before.unwrap_or(parent.space_before),
            space_after: self.space_after.unwrap_or(parent.space_after),
            align: self.align.unwrap_or(parent.align),
            color: self.color.unwrap_or(parent.color),
        }
    }
}

/// Named paragraph styles
#[derive(Debug, Clone)]
pub struct StyleSheet {
    styles: HashMap<String, ParagraphStyle>,
    levels: HashMap<String, u8>,
}

impl StyleSheet {
    /// The built-in styles every document starts from
    #[must_use]
    pub fn standard() -> Self {
        let mut styles = HashMap::new();
        let normal = ParagraphStyle::base(FontName::Helvetica, 10.0, 12.0);
        styles.insert("normal".to_string(), normal.clone());
        styles.insert(
            "italic".to_string(),
            ParagraphStyle {
                font: FontName::HelveticaOblique,
                ..normal
            },
        );
        styles.insert(
            "heading1".to_string(),
            ParagraphStyle::base(FontName::HelveticaBold, 18.0, 22.0).spaced(0.0, 6.0),
        );
        styles.insert(
            "heading2".to_string(),
            ParagraphStyle::base(FontName::HelveticaBold, 14.0, 18.0).spaced(12.0, 6.0),
        );
        styles.insert(
            "heading3".to_string(),
            ParagraphStyle::base(FontName::HelveticaBoldOblique, 12.0, 14.4).spaced(12.0, 6.0),
        );
        styles.insert(
            "code".to_string(),
            ParagraphStyle::base(FontName::Courier, 8.0, 8.8),
        );
        let levels = ["heading1", "heading2", "heading3"]
            .into_iter()
            .filter_map(|name| builtin_level(name).map(|level| (name.to_string(), level)))
            .collect();
        Self { styles, levels }
    }

    /// The standard sheet extended with a document's own styles.
    ///
    /// Specs may inherit from built-in styles or from each other in any order.
    ///
    /// # Errors
    /// Returns an error when a parent is unknown or parents form a cycle.
    pub fn with_specs(specs: &BTreeMap<String, StyleSpec>) -> Result<Self, DocumentError> {
        let mut sheet = Self::standard();
        for name in specs.keys() {
            sheet.resolve(name, specs, &mut Vec::new())?;
        }
        Ok(sheet)
    }

    fn resolve(
        &mut self,
        name: &str,
        specs: &BTreeMap<String, StyleSpec>,
        visiting: &mut Vec<String>,
    ) -> Result<ParagraphStyle, DocumentError> {
        let Some(spec) = specs.get(name) else {
            return self
                .styles
                .get(name)
                .cloned()
                .ok_or_else(|| DocumentError::UnknownStyle(name.to_string()));
        };
        if visiting.iter().any(|v| v == name) {
            return Err(DocumentError::StyleCycle(name.to_string()));
        }
        visiting.push(name.to_string());
        let parent_name = spec.parent.as_deref().unwrap_or("normal");
        // A document style may shadow a built-in of the same name and still extend it.
        let (parent, level) = if parent_name == name {
            (self.builtin(name)?, builtin_level(name))
        } else {
            let parent = self.resolve(parent_name, specs, visiting)?;
            let level = self.levels.get(parent_name).copied();
            (parent, level.or_else(|| builtin_level(name)))
        };
        visiting.pop();
        if let Some(level) = level {
            self.levels.insert(name.to_string(), level);
        }
        let style = spec.apply(&parent);
        self.styles.insert(name.to_string(), style.clone());
        Ok(style)
    }

    fn builtin(&self, name: &str) -> Result<ParagraphStyle, DocumentError> {
        Self::standard()
            .styles
            .remove(name)
            .or_else(|| self.styles.get(name).cloned())
            .ok_or_else(|| DocumentError::StyleCycle(name.to_string()))
    }

    /// Look up a style by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParagraphStyle> {
        self.styles.get(name)
    }

    /// Outline level of a heading style (1 to 3), inherited from the
    /// built-in heading a style derives from
    #[must_use]
    pub fn heading_level(&self, name: &str) -> Option<u8> {
        self.levels.get(name).copied()
    }

    /// Whether the sheet defines `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }
}

fn builtin_level(name: &str) -> Option<u8> {
    match name {
        "heading1" => Some(1),
        "heading2" => Some(2),
        "heading3" => Some(3),
        _ => None,
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::standard()
    }
}
