//! Line breaking for styled paragraphs and plain cell text

use crate::core::models::{fold_to_ascii, Alignment, Color, FontName, Inline, ParagraphStyle};

/// A run of text in one font and color, no spaces inside unless glued by markup
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Text to draw
    pub text: String,
    /// Face
    pub font: FontName,
    /// Color
    pub color: Color,
    /// Advance width at the paragraph's size
    pub width: f32,
}

/// A breakable unit: fragments that touch without whitespace between them
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Fragments in order
    pub fragments: Vec<Fragment>,
    /// Whether whitespace preceded this word in the source
    pub space_before: bool,
    /// Width of a space in the word's leading font
    pub space_width: f32,
}

impl Word {
    /// Advance width of the whole word
    #[must_use]
    pub fn width(&self) -> f32 {
        self.fragments.iter().map(|f| f.width).sum()
    }
}

/// A broken line ready for placement
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Words on the line
    pub words: Vec<Word>,
    /// True for the last line of a paragraph or before a `<br/>`
    pub ends_block: bool,
}

impl Line {
    /// Width of the words plus the spaces between them
    #[must_use]
    pub fn natural_width(&self) -> f32 {
        self.words
            .iter()
            .enumerate()
            .map(|(i, w)| w.width() + if i > 0 && w.space_before { w.space_width } else { 0.0 })
            .sum()
    }

    fn gaps(&self) -> usize {
        self.words
            .iter()
            .skip(1)
            .filter(|w| w.space_before)
            .count()
    }
}

/// A fragment with its final horizontal offset from the frame's left edge
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedFragment {
    /// Offset from the left of the available width
    pub x: f32,
    /// The fragment
    pub fragment: Fragment,
}

fn tokenize(inlines: &[Inline], style: &ParagraphStyle) -> Vec<Vec<Word>> {
    let size = style.font_size;
    let mut segments: Vec<Vec<Word>> = vec![Vec::new()];
    let mut pending_space = false;
    let mut glue_open = false;

    for inline in inlines {
        let (text, span) = match inline {
            Inline::Break => {
                segments.push(Vec::new());
                pending_space = false;
                glue_open = false;
                continue;
            }
            Inline::Text(text, span) => (fold_to_ascii(text), span),
        };
        let font = span.font(style.font);
        let color = span.color.unwrap_or(style.color);
        let Some(words) = segments.last_mut() else {
            continue;
        };

        let mut rest = text.as_str();
        while !rest.is_empty() {
            let lead = rest.len() - rest.trim_start().len();
            if lead > 0 {
                pending_space = true;
                glue_open = false;
                rest = &rest[lead..];
                continue;
            }
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let piece = &rest[..end];
            rest = &rest[end..];
            let fragment = Fragment {
                text: piece.to_string(),
                font,
                color,
                width: font.text_width(piece, size),
            };
            match words.last_mut() {
                Some(word) if glue_open && !pending_space => word.fragments.push(fragment),
                _ => words.push(Word {
                    fragments: vec![fragment],
                    space_before: pending_space,
                    space_width: font.text_width(" ", size),
                }),
            }
            pending_space = false;
            glue_open = true;
        }
    }
    segments
}

/// Split a word wider than `max` into pieces that fit, character by character
fn split_long_word(word: Word, max: f32, size: f32) -> Vec<Word> {
    let mut pieces = Vec::new();
    let mut current = Word {
        fragments: Vec::new(),
        space_before: word.space_before,
        space_width: word.space_width,
    };
    let mut width = 0.0;
    for fragment in word.fragments {
        let mut buffer = String::new();
        for c in fragment.text.chars() {
            let cw = f32::from(fragment.font.char_width(c)) * size / 1000.0;
            if width + cw > max && (width > 0.0) {
                if !buffer.is_empty() {
                    current.fragments.push(Fragment {
                        width: fragment.font.text_width(&buffer, size),
                        text: std::mem::take(&mut buffer),
                        ..fragment.clone()
                    });
                }
                pieces.push(std::mem::replace(
                    &mut current,
                    Word {
                        fragments: Vec::new(),
                        space_before: false,
                        space_width: word.space_width,
                    },
                ));
                width = 0.0;
            }
            buffer.push(c);
            width += cw;
        }
        if !buffer.is_empty() {
            current.fragments.push(Fragment {
                width: fragment.font.text_width(&buffer, size),
                text: buffer,
                ..fragment
            });
        }
    }
    if !current.fragments.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Break parsed paragraph content into lines no wider than `max_width`
#[must_use]
pub fn break_lines(inlines: &[Inline], style: &ParagraphStyle, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    for segment in tokenize(inlines, style) {
        let mut current: Vec<Word> = Vec::new();
        let mut width = 0.0;
        let words = segment.into_iter().flat_map(|word| {
            if word.width() > max_width {
                split_long_word(word, max_width, style.font_size)
            } else {
                vec![word]
            }
        });
        for word in words {
            let gap = if current.is_empty() || !word.space_before {
                0.0
            } else {
                word.space_width
            };
            let advance = word.width() + gap;
            if !current.is_empty() && width + advance > max_width + 0.01 {
                lines.push(Line {
                    words: std::mem::take(&mut current),
                    ends_block: false,
                });
                width = word.width();
            } else {
                width += advance;
            }
            current.push(word);
        }
        lines.push(Line {
            words: current,
            ends_block: true,
        });
    }
    lines
}

/// Place the fragments of a line within `width` according to `align`.
///
/// Adjacent fragments that share a font and color are merged unless the line
/// is justified, so callers emit as few text runs as possible.
#[must_use]
pub fn place_line(line: &Line, align: Alignment, width: f32) -> Vec<PlacedFragment> {
    let natural = line.natural_width();
    let slack = (width - natural).max(0.0);
    let gaps = line.gaps();
    let (start, extra) = match align {
        Alignment::Left => (0.0, 0.0),
        Alignment::Center => (slack / 2.0, 0.0),
        Alignment::Right => (slack, 0.0),
        #[allow(clippy::cast_precision_loss)]
        Alignment::Justify if !line.ends_block && gaps > 0 => (0.0, slack / gaps as f32),
        Alignment::Justify => (0.0, 0.0),
    };
    let mut placed: Vec<PlacedFragment> = Vec::new();
    let mut x = start;
    for (i, word) in line.words.iter().enumerate() {
        let spaced = i > 0 && word.space_before;
        if spaced {
            x += word.space_width + extra;
        }
        for (j, fragment) in word.fragments.iter().enumerate() {
            let joinable = extra.abs() < f32::EPSILON
                && placed.last().is_some_and(|prev| {
                    prev.fragment.font == fragment.font && prev.fragment.color == fragment.color
                });
            if joinable {
                if let Some(prev) = placed.last_mut() {
                    if spaced && j == 0 {
                        prev.fragment.text.push(' ');
                        prev.fragment.width += word.space_width;
                    }
                    prev.fragment.text.push_str(&fragment.text);
                    prev.fragment.width += fragment.width;
                }
            } else {
                placed.push(PlacedFragment {
                    x,
                    fragment: fragment.clone(),
                });
            }
            x += fragment.width;
        }
    }
    placed
}

/// Wrap plain cell text: `\n` forces a break and words wrap at `max_width`
#[must_use]
pub fn wrap_plain(text: &str, font: FontName, size: f32, max_width: f32) -> Vec<String> {
    let folded = fold_to_ascii(text);
    let space = font.text_width(" ", size);
    let mut lines = Vec::new();
    for raw in folded.split('\n') {
        let mut current = String::new();
        let mut width = 0.0;
        for word in raw.split_whitespace() {
            let w = font.text_width(word, size);
            if !current.is_empty() && width + space + w > max_width + 0.01 {
                lines.push(std::mem::take(&mut current));
                width = 0.0;
            }
            if !current.is_empty() {
                current.push(' ');
                width += space;
            }
            current.push_str(word);
            width += w;
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{markup, StyleSheet};

    fn normal() -> ParagraphStyle {
        StyleSheet::standard().get("normal").cloned().unwrap()
    }

    fn line_text(line: &Line) -> String {
        line.words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let text: String = w.fragments.iter().map(|f| f.text.as_str()).collect();
                if i > 0 && w.space_before {
                    format!(" {text}")
                } else {
                    text
                }
            })
            .collect()
    }

    #[test]
    fn test_short_text_is_one_line() {
        let inlines = markup::parse("Hello   world").unwrap();
        let lines = break_lines(&inlines, &normal(), 500.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "Hello world");
        assert!(lines[0].ends_block);
    }

    #[test]
    fn test_wraps_at_width() {
        let inlines = markup::parse("aaa bbb ccc ddd").unwrap();
        // "aaa bbb" at 10pt Helvetica = 3*5.56 + 2.78 + 3*5.56 = 36.14
        let lines = break_lines(&inlines, &normal(), 37.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), "aaa bbb");
        assert_eq!(line_text(&lines[1]), "ccc ddd");
        assert!(!lines[0].ends_block);
        for line in &lines {
            assert!(line.natural_width() <= 37.0);
        }
    }

    #[test]
    fn test_markup_glues_without_space() {
        let inlines = markup::parse("<b>Step</b>: go").unwrap();
        let lines = break_lines(&inlines, &normal(), 500.0);
        assert_eq!(lines[0].words.len(), 2);
        assert_eq!(lines[0].words[0].fragments.len(), 2);
        assert_eq!(lines[0].words[0].fragments[0].font, FontName::HelveticaBold);
        assert_eq!(lines[0].words[0].fragments[1].font, FontName::Helvetica);
    }

    #[test]
    fn test_break_tag_forces_new_line() {
        let inlines = markup::parse("one<br/>two").unwrap();
        let lines = break_lines(&inlines, &normal(), 500.0);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_block && lines[1].ends_block);
    }

    #[test]
    fn test_overlong_word_is_split() {
        let inlines = markup::parse("abcdefghijklmnop").unwrap();
        let lines = break_lines(&inlines, &normal(), 20.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.natural_width() <= 20.0 + 0.01);
        }
        let joined: String = lines.iter().map(line_text).collect();
        assert_eq!(joined, "abcdefghijklmnop");
    }

    #[test]
    fn test_justify_fills_width_except_last_line() {
        let inlines = markup::parse("aaa bbb ccc ddd eee").unwrap();
        let lines = break_lines(&inlines, &normal(), 60.0);
        assert!(lines.len() >= 2);
        let first = place_line(&lines[0], Alignment::Justify, 60.0);
        let last_word = first.last().unwrap();
        assert!((last_word.x + last_word.fragment.width - 60.0).abs() < 0.01);

        let tail = place_line(lines.last().unwrap(), Alignment::Justify, 60.0);
        assert!(tail[0].x.abs() < f32::EPSILON);
        assert_eq!(tail.len(), 1);
    }

    #[test]
    fn test_center_and_merge() {
        let inlines = markup::parse("ab cd").unwrap();
        let lines = break_lines(&inlines, &normal(), 100.0);
        let placed = place_line(&lines[0], Alignment::Center, 100.0);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].fragment.text, "ab cd");
        let expected = (100.0 - lines[0].natural_width()) / 2.0;
        assert!((placed[0].x - expected).abs() < 0.01);
    }

    #[test]
    fn test_wrap_plain_honours_newlines() {
        let lines = wrap_plain("Line one\nLine two", FontName::Helvetica, 10.0, 500.0);
        assert_eq!(lines, vec!["Line one", "Line two"]);
        let narrow = wrap_plain("alpha beta gamma", FontName::Helvetica, 10.0, 40.0);
        assert_eq!(narrow, vec!["alpha", "beta", "gamma"]);
    }
}
