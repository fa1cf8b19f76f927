//! PDF renderer
//!
//! Lays the document out with the flow engine and paints the resulting draw
//! operations with `printpdf`. Only the built-in Helvetica and Courier faces
//! are used, so no font file is embedded. Diagram images are decoded from
//! the PNG files rendered for this run.

use crate::core::layout::{DrawOp, LaidOutDocument, Stroke};
use crate::core::models::units::MM;
use crate::core::models::{Color, FontName};
use crate::core::report::{DocumentRenderer, RenderContext, RenderedDocument};
use image::{DynamicImage, Rgb, RgbImage};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon,
};
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

/// Resolution images are placed at before scaling
const IMAGE_DPI: f32 = 300.0;

const FACES: [FontName; 6] = [
    FontName::Helvetica,
    FontName::HelveticaBold,
    FontName::HelveticaOblique,
    FontName::HelveticaBoldOblique,
    FontName::Courier,
    FontName::CourierBold,
];

/// PDF renderer backed by the flow layout engine
#[derive(Debug, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    /// Create a new PDF renderer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, ctx: &RenderContext) -> Result<RenderedDocument, Box<dyn Error>> {
        let has_image = |id: &str| ctx.assets.image_path(id).is_some_and(Path::is_file);
        let laid = LaidOutDocument::new(ctx.document, &has_image);

        let mut painter = Painter::new(&ctx.document.title, laid.width, laid.height)?;
        for (index, page) in laid.pages.iter().enumerate() {
            let layer = if index == 0 {
                painter.first_layer()
            } else {
                painter.add_page()
            };
            for op in &page.ops {
                painter.paint(&layer, op, ctx)?;
            }
        }

        let bytes = painter.doc.save_to_bytes()?;
        Ok(RenderedDocument {
            bytes,
            pages: laid.pages.len(),
            summary: Some(laid.summary),
        })
    }
}

fn mm(points: f32) -> Mm {
    Mm(points / MM)
}

fn pdf_color(color: Color) -> printpdf::Color {
    let (r, g, b) = color.unit_rgb();
    printpdf::Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

const fn builtin(face: FontName) -> BuiltinFont {
    match face {
        FontName::Helvetica => BuiltinFont::Helvetica,
        FontName::HelveticaBold => BuiltinFont::HelveticaBold,
        FontName::HelveticaOblique => BuiltinFont::HelveticaOblique,
        FontName::HelveticaBoldOblique => BuiltinFont::HelveticaBoldOblique,
        FontName::Courier => BuiltinFont::Courier,
        FontName::CourierBold => BuiltinFont::CourierBold,
    }
}

/// Decode a PNG and composite any transparency onto white
fn load_opaque(path: &Path) -> Result<DynamicImage, Box<dyn Error>> {
    let rgba = image::open(path)?.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        let blend = |c: u8| -> u8 {
            let value = (u16::from(c) * alpha + 255 * (255 - alpha)) / 255;
            u8::try_from(value).unwrap_or(u8::MAX)
        };
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    Ok(DynamicImage::ImageRgb8(rgb))
}

struct Painter {
    doc: PdfDocumentReference,
    first: PdfLayerReference,
    fonts: HashMap<FontName, IndirectFontRef>,
    images: HashMap<String, DynamicImage>,
    width: Mm,
    height: Mm,
}

impl Painter {
    fn new(title: &str, width: f32, height: f32) -> Result<Self, Box<dyn Error>> {
        let (doc, page, layer) = PdfDocument::new(title, mm(width), mm(height), "Layer 1");
        let first = doc.get_page(page).get_layer(layer);
        let mut fonts = HashMap::new();
        for face in FACES {
            fonts.insert(face, doc.add_builtin_font(builtin(face))?);
        }
        Ok(Self {
            doc,
            first,
            fonts,
            images: HashMap::new(),
            width: mm(width),
            height: mm(height),
        })
    }

    fn first_layer(&self) -> PdfLayerReference {
        self.first.clone()
    }

    fn add_page(&self) -> PdfLayerReference {
        let (page, layer) = self.doc.add_page(self.width, self.height, "Layer 1");
        self.doc.get_page(page).get_layer(layer)
    }

    fn paint(
        &mut self,
        layer: &PdfLayerReference,
        op: &DrawOp,
        ctx: &RenderContext,
    ) -> Result<(), Box<dyn Error>> {
        match op {
            DrawOp::Text {
                x,
                y,
                font,
                size,
                color,
                text,
            } => {
                let Some(face) = self.fonts.get(font) else {
                    return Err(
                        format!("font {} was not registered", font.postscript_name()).into()
                    );
                };
                layer.set_fill_color(pdf_color(*color));
                layer.use_text(text.as_str(), *size, mm(*x), mm(*y), face);
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => paint_rect(layer, (*x, *y, *width, *height), *fill, *stroke),
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
            } => {
                apply_stroke(layer, *stroke);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(mm(*x1), mm(*y1)), false),
                        (Point::new(mm(*x2), mm(*y2)), false),
                    ],
                    is_closed: false,
                });
            }
            DrawOp::Image {
                diagram,
                x,
                y,
                width,
                height,
            } => self.paint_image(layer, diagram, (*x, *y, *width, *height), ctx)?,
        }
        Ok(())
    }

    fn paint_image(
        &mut self,
        layer: &PdfLayerReference,
        diagram: &str,
        (x, y, width, height): (f32, f32, f32, f32),
        ctx: &RenderContext,
    ) -> Result<(), Box<dyn Error>> {
        if !self.images.contains_key(diagram) {
            let Some(path) = ctx.assets.image_path(diagram) else {
                logger::warn!("No image rendered for diagram '{diagram}', skipping");
                return Ok(());
            };
            self.images.insert(diagram.to_owned(), load_opaque(path)?);
        }
        let Some(decoded) = self.images.get(diagram) else {
            return Ok(());
        };

        #[allow(clippy::cast_precision_loss)]
        let (natural_w, natural_h) = (
            decoded.width() as f32 / IMAGE_DPI * 72.0,
            decoded.height() as f32 / IMAGE_DPI * 72.0,
        );
        if natural_w <= 0.0 || natural_h <= 0.0 {
            logger::warn!("Diagram '{diagram}' has an empty image, skipping");
            return Ok(());
        }
        Image::from_dynamic_image(decoded).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(mm(x)),
                translate_y: Some(mm(y)),
                scale_x: Some(width / natural_w),
                scale_y: Some(height / natural_h),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        Ok(())
    }
}

fn apply_stroke(layer: &PdfLayerReference, stroke: Stroke) {
    layer.set_outline_color(pdf_color(stroke.color));
    layer.set_outline_thickness(stroke.width);
}

fn paint_rect(
    layer: &PdfLayerReference,
    (x, y, width, height): (f32, f32, f32, f32),
    fill: Option<Color>,
    stroke: Option<Stroke>,
) {
    let mode = match (fill, stroke) {
        (Some(_), Some(_)) => PaintMode::FillStroke,
        (Some(_), None) => PaintMode::Fill,
        (None, Some(_)) => PaintMode::Stroke,
        (None, None) => return,
    };
    if let Some(color) = fill {
        layer.set_fill_color(pdf_color(color));
    }
    if let Some(stroke) = stroke {
        apply_stroke(layer, stroke);
    }
    let corners = [(x, y), (x + width, y), (x + width, y + height), (x, y + height)];
    layer.add_polygon(Polygon {
        rings: vec![corners
            .iter()
            .map(|&(px, py)| (Point::new(mm(px), mm(py)), false))
            .collect()],
        mode,
        winding_order: WindingOrder::NonZero,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Document;
    use crate::core::report::{DiagramAsset, DiagramAssets};

    fn doc(blocks: &str) -> Document {
        let src = format!("id = \"t\"\ntitle = \"T\"\noutput = \"t.pdf\"\n{blocks}");
        Document::from_toml(&src).unwrap()
    }

    #[test]
    fn test_renders_pdf_bytes() {
        let document = doc(
            r##"
[[blocks]]
type = "paragraph"
style = "heading1"
text = "Arkitektura e Sistemit"

[[blocks]]
type = "table"
col_widths = ["4cm", "6cm"]
rows = [["Shtresa", "Teknologji"], ["Frontend", "Next.js"]]
style = [{ cmd = "grid", cells = [0, 0, -1, -1], color = "#BDBDBD" }]
"##,
        );
        let assets = DiagramAssets::default();
        let rendered = PdfRenderer::new()
            .render(&RenderContext::new(&document, &assets))
            .unwrap();
        assert!(rendered.bytes.starts_with(b"%PDF"));
        assert_eq!(rendered.pages, 1);
        let summary = rendered.summary.unwrap();
        assert_eq!(summary.tables.len(), 1);
        assert_eq!(summary.tables[0].rows, 2);
    }

    #[test]
    fn test_embeds_png_and_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("git_diagram.png");
        let mut img = image::RgbaImage::new(40, 20);
        img.put_pixel(0, 0, image::Rgba([10, 20, 30, 0]));
        img.save(&png).unwrap();

        let document = doc(
            r#"
[[blocks]]
type = "diagram"
diagram = "git_workflow"
width = "10cm"
height = "5cm"

[[blocks]]
type = "diagram"
diagram = "architecture"
width = "10cm"
height = "5cm"
"#,
        );
        let mut assets = DiagramAssets::default();
        assets.insert("git_workflow", DiagramAsset::Image(png));
        assets.insert(
            "architecture",
            DiagramAsset::Image(dir.path().join("architecture_diagram.png")),
        );
        let rendered = PdfRenderer::new()
            .render(&RenderContext::new(&document, &assets))
            .unwrap();
        let summary = rendered.summary.unwrap();
        assert_eq!(summary.images_placed, vec!["git_workflow".to_string()]);
        assert_eq!(summary.images_skipped, vec!["architecture".to_string()]);
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("clear.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 0]))
            .save(&png)
            .unwrap();
        let opaque = load_opaque(&png).unwrap().to_rgb8();
        assert_eq!(opaque.get_pixel(1, 1).0, [255, 255, 255]);
    }
}
