//! HTML-like labels
//!
//! Graphviz accepts a restricted HTML dialect inside `<...>` labels. This
//! module builds the `TABLE`/`TR`/`TD` subset used for entity boxes, legends
//! and layered node captions.

use super::graph::Attrs;

/// A formatted run of text inside a cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlText {
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
    point_size: Option<String>,
    color: Option<String>,
}

impl HtmlText {
    /// Plain text
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            ..Self::default()
        }
    }

    /// Wrap in `<B>`
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Wrap in `<I>`
    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Wrap in `<U>`
    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Set `POINT-SIZE`
    #[must_use]
    pub fn size(mut self, points: u32) -> Self {
        self.point_size = Some(points.to_string());
        self
    }

    /// Set the font `COLOR`
    #[must_use]
    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_owned());
        self
    }

    fn to_html(&self) -> String {
        let mut inner = escape(&self.text);
        if self.underline {
            inner = format!("<U>{inner}</U>");
        }
        if self.italic {
            inner = format!("<I>{inner}</I>");
        }
        if self.bold {
            inner = format!("<B>{inner}</B>");
        }
        if self.point_size.is_some() || self.color.is_some() {
            let mut open = String::from("<FONT");
            if let Some(size) = &self.point_size {
                open.push_str(&format!(" POINT-SIZE=\"{size}\""));
            }
            if let Some(color) = &self.color {
                open.push_str(&format!(" COLOR=\"{}\"", escape(color)));
            }
            inner = format!("{open}>{inner}</FONT>");
        }
        inner
    }
}

/// One `TD`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlCell {
    attrs: Attrs,
    content: Vec<HtmlText>,
}

impl HtmlCell {
    /// A cell holding `text`
    #[must_use]
    pub fn new(text: HtmlText) -> Self {
        Self {
            attrs: Attrs::default(),
            content: vec![text],
        }
    }

    /// A cell holding plain `text`
    #[must_use]
    pub fn plain(text: &str) -> Self {
        Self::new(HtmlText::new(text))
    }

    /// Set `COLSPAN`
    #[must_use]
    pub fn colspan(mut self, span: u32) -> Self {
        self.attrs.set("COLSPAN", &span.to_string());
        self
    }

    /// Set `ALIGN` (`LEFT`, `CENTER`, `RIGHT`)
    #[must_use]
    pub fn align(mut self, align: &str) -> Self {
        self.attrs.set("ALIGN", align);
        self
    }

    /// Set `BGCOLOR`
    #[must_use]
    pub fn bgcolor(mut self, color: &str) -> Self {
        self.attrs.set("BGCOLOR", color);
        self
    }

    fn to_html(&self) -> String {
        let mut out = String::from("<TD");
        write_attrs(&mut out, &self.attrs);
        out.push('>');
        for text in &self.content {
            out.push_str(&text.to_html());
        }
        out.push_str("</TD>");
        out
    }
}

/// A `TABLE` label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    attrs: Attrs,
    rows: Vec<Vec<HtmlCell>>,
}

impl HtmlTable {
    /// Empty table with no attributes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `BORDER`
    #[must_use]
    pub fn border(self, width: u32) -> Self {
        self.attr("BORDER", &width.to_string())
    }

    /// Set `CELLBORDER`
    #[must_use]
    pub fn cellborder(self, width: u32) -> Self {
        self.attr("CELLBORDER", &width.to_string())
    }

    /// Set `CELLSPACING`
    #[must_use]
    pub fn cellspacing(self, space: u32) -> Self {
        self.attr("CELLSPACING", &space.to_string())
    }

    /// Set `CELLPADDING`
    #[must_use]
    pub fn cellpadding(self, pad: u32) -> Self {
        self.attr("CELLPADDING", &pad.to_string())
    }

    /// Set `BGCOLOR`
    #[must_use]
    pub fn bgcolor(self, color: &str) -> Self {
        self.attr("BGCOLOR", color)
    }

    /// Set any table attribute
    #[must_use]
    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.set(key, value);
        self
    }

    /// Append a row of cells
    #[must_use]
    pub fn row(mut self, cells: Vec<HtmlCell>) -> Self {
        self.rows.push(cells);
        self
    }

    /// Append a single-cell row
    #[must_use]
    pub fn line(self, cell: HtmlCell) -> Self {
        self.row(vec![cell])
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The label markup, without the enclosing `<` `>`
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::from("<TABLE");
        write_attrs(&mut out, &self.attrs);
        out.push('>');
        for row in &self.rows {
            out.push_str("<TR>");
            for cell in row {
                out.push_str(&cell.to_html());
            }
            out.push_str("</TR>");
        }
        out.push_str("</TABLE>");
        out
    }
}

fn write_attrs(out: &mut String, attrs: &Attrs) {
    for (key, value) in attrs.iter() {
        out.push_str(&format!(" {key}=\"{}\"", escape(value)));
    }
}

/// Escape text for an HTML-like label
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_row_markup() {
        let table = HtmlTable::new()
            .border(1)
            .cellborder(0)
            .cellspacing(0)
            .bgcolor("#E8F4FD")
            .line(
                HtmlCell::new(HtmlText::new("User").bold().color("white"))
                    .colspan(2)
                    .bgcolor("#2196F3"),
            );
        assert_eq!(
            table.to_html(),
            "<TABLE BORDER=\"1\" CELLBORDER=\"0\" CELLSPACING=\"0\" BGCOLOR=\"#E8F4FD\">\
             <TR><TD COLSPAN=\"2\" BGCOLOR=\"#2196F3\"><FONT COLOR=\"white\"><B>User</B></FONT></TD></TR>\
             </TABLE>"
        );
    }

    #[test]
    fn test_text_nesting_order() {
        let html = HtmlText::new("id").bold().underline().to_html();
        assert_eq!(html, "<B><U>id</U></B>");
        let html = HtmlText::new("Dashboard").size(10).to_html();
        assert_eq!(html, "<FONT POINT-SIZE=\"10\">Dashboard</FONT>");
    }

    #[test]
    fn test_text_is_entity_escaped() {
        let cell = HtmlCell::plain("Route <Handlers> & \"more\"").align("LEFT");
        assert_eq!(
            cell.to_html(),
            "<TD ALIGN=\"LEFT\">Route &lt;Handlers&gt; &amp; &quot;more&quot;</TD>"
        );
    }
}
