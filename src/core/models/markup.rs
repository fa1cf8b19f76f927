//! Inline paragraph markup
//!
//! Paragraph text may contain `<b>`, `<i>`, `<font face=".." color="..">` and
//! `<br/>`, plus the entities `&amp;`, `&lt;`, `&gt;` and `&quot;`. Tags nest
//! and must be balanced.

use super::{Color, DocumentError, FontName};

/// Formatting carried by a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanStyle {
    /// Inside `<b>`
    pub bold: bool,
    /// Inside `<i>`
    pub italic: bool,
    /// Face from the innermost `<font face>`
    pub face: Option<FontName>,
    /// Color from the innermost `<font color>`
    pub color: Option<Color>,
}

impl SpanStyle {
    /// Concrete face for this span given the paragraph's base font
    #[must_use]
    pub fn font(&self, base: FontName) -> FontName {
        let family = self.face.unwrap_or(base);
        family.with_style(self.bold || family.is_bold(), self.italic || family.is_italic())
    }
}

/// A piece of parsed paragraph content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Text with its formatting; whitespace is preserved as written
    Text(String, SpanStyle),
    /// Forced line break
    Break,
}

enum Tag {
    Bold,
    Italic,
    Font,
}

fn markup_error(text: &str, reason: impl Into<String>) -> DocumentError {
    let shown: String = text.chars().take(60).collect();
    DocumentError::Markup {
        text: shown,
        reason: reason.into(),
    }
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Parse the attributes of a `<font ...>` tag
fn parse_font_attrs(text: &str, attrs: &str, style: &mut SpanStyle) -> Result<(), DocumentError> {
    let mut rest = attrs.trim();
    while !rest.is_empty() {
        let eq = rest
            .find('=')
            .ok_or_else(|| markup_error(text, format!("malformed font attributes '{attrs}'")))?;
        let name = rest[..eq].trim().to_ascii_lowercase();
        let after = rest[eq + 1..].trim_start();
        let quote = after
            .chars()
            .next()
            .filter(|c| *c == '"' || *c == '\'')
            .ok_or_else(|| markup_error(text, format!("unquoted value for '{name}'")))?;
        let close = after[1..]
            .find(quote)
            .ok_or_else(|| markup_error(text, format!("unterminated value for '{name}'")))?;
        let value = &after[1..=close];
        match name.as_str() {
            "face" | "name" => style.face = Some(value.parse()?),
            "color" => style.color = Some(value.parse()?),
            "size" => {}
            other => return Err(markup_error(text, format!("unknown font attribute '{other}'"))),
        }
        rest = after[close + 2..].trim_start();
    }
    Ok(())
}

/// Parse paragraph text into styled runs.
///
/// # Errors
/// Returns [`DocumentError::Markup`] for unknown tags, unbalanced tags or
/// malformed `<font>` attributes, and the color/font errors for bad values.
pub fn parse(text: &str) -> Result<Vec<Inline>, DocumentError> {
    let mut out = Vec::new();
    let mut stack: Vec<(Tag, SpanStyle)> = Vec::new();
    let mut current = SpanStyle::default();
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        if open > 0 {
            out.push(Inline::Text(decode_entities(&rest[..open]), current));
        }
        let close = rest[open..]
            .find('>')
            .ok_or_else(|| markup_error(text, "unterminated tag"))?;
        let tag = rest[open + 1..open + close].trim();
        rest = &rest[open + close + 1..];

        let lower = tag.to_ascii_lowercase();
        match lower.as_str() {
            "b" | "strong" => {
                stack.push((Tag::Bold, current));
                current.bold = true;
            }
            "i" | "em" => {
                stack.push((Tag::Italic, current));
                current.italic = true;
            }
            "br" | "br/" | "br /" => out.push(Inline::Break),
            "/b" | "/strong" | "/i" | "/em" | "/font" => {
                let (opened, saved) = stack
                    .pop()
                    .ok_or_else(|| markup_error(text, format!("unexpected <{tag}>")))?;
                let matches = matches!(
                    (&opened, lower.as_str()),
                    (Tag::Bold, "/b" | "/strong")
                        | (Tag::Italic, "/i" | "/em")
                        | (Tag::Font, "/font")
                );
                if !matches {
                    return Err(markup_error(text, format!("mismatched <{tag}>")));
                }
                current = saved;
            }
            _ if lower.starts_with("font") => {
                stack.push((Tag::Font, current));
                parse_font_attrs(text, &tag[4..], &mut current)?;
            }
            _ => return Err(markup_error(text, format!("unknown tag <{tag}>"))),
        }
    }
    if !rest.is_empty() {
        out.push(Inline::Text(decode_entities(rest), current));
    }
    if !stack.is_empty() {
        return Err(markup_error(text, "unclosed tag"));
    }
    Ok(out)
}

/// Text content with all markup removed
#[must_use]
pub fn plain_text(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(text, _) => text.as_str(),
            Inline::Break => "\n",
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_run() {
        let parsed = parse("Hello world").unwrap();
        assert_eq!(parsed, vec![Inline::Text("Hello world".into(), SpanStyle::default())]);
    }

    #[test]
    fn test_bold_prefix() {
        let parsed = parse("<b>Cfare eshte?</b> Singleton").unwrap();
        assert_eq!(parsed.len(), 2);
        let Inline::Text(label, style) = &parsed[0] else {
            panic!("expected text");
        };
        assert_eq!(label, "Cfare eshte?");
        assert!(style.bold);
        let Inline::Text(_, tail) = &parsed[1] else {
            panic!("expected text");
        };
        assert!(!tail.bold);
    }

    #[test]
    fn test_font_tag_sets_face_and_color() {
        let parsed =
            parse(r##"Open <font face="Courier" color="#1565C0">index.html</font> now"##).unwrap();
        let Inline::Text(text, style) = &parsed[1] else {
            panic!("expected text");
        };
        assert_eq!(text, "index.html");
        assert_eq!(style.face, Some(FontName::Courier));
        assert_eq!(style.color, Some(Color::rgb(0x15, 0x65, 0xC0)));
        assert_eq!(style.font(FontName::Helvetica), FontName::Courier);
    }

    #[test]
    fn test_nested_tags_and_entities() {
        let parsed = parse("<b>a <i>b &amp; c</i></b><br/>d").unwrap();
        assert_eq!(plain_text(&parsed), "a b & c\nd");
        let Inline::Text(_, style) = &parsed[1] else {
            panic!("expected text");
        };
        assert!(style.bold && style.italic);
        assert_eq!(style.font(FontName::Helvetica), FontName::HelveticaBoldOblique);
    }

    #[test]
    fn test_malformed_markup_is_rejected() {
        assert!(parse("<b>open").is_err());
        assert!(parse("close</b>").is_err());
        assert!(parse("<b><i>x</b></i>").is_err());
        assert!(parse("<u>x</u>").is_err());
        assert!(parse("<font color=red>x</font>").is_err());
        assert!(parse("a < b").is_err());
    }
}
