//! Vector canvas shared by the figure renderers
//!
//! Shapes are recorded in data units (y pointing up) and serialised into a
//! single-page PDF whose media box is cropped to everything drawn.

use std::collections::BTreeSet;
use std::io::Write;

use super::font::{sanitize_char, Font};
use super::{DiagramError, Point};

/// Bezier control distance for a quarter circle
const KAPPA: f64 = 0.552_284_749_8;

/// Line height as a multiple of the font size
const LINE_HEIGHT: f64 = 1.2;

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const LIGHT_BLUE: Color = Color::rgb(173, 216, 230);
    pub const LIGHT_GRAY: Color = Color::rgb(211, 211, 211);
    pub const LIGHT_GREEN: Color = Color::rgb(144, 238, 144);
    pub const LIGHT_CORAL: Color = Color::rgb(240, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn components(&self) -> String {
        format!(
            "{} {} {}",
            num(f64::from(self.r) / 255.0),
            num(f64::from(self.g) / 255.0),
            num(f64::from(self.b) / 255.0)
        )
    }
}

/// Outline settings for strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line width in points
    pub width: f64,
    pub color: Color,
    pub dashed: bool,
}

impl Stroke {
    pub fn solid(width: f64) -> Self {
        Self {
            width,
            color: Color::BLACK,
            dashed: false,
        }
    }

    pub fn dashed(width: f64) -> Self {
        Self {
            width,
            color: Color::BLACK,
            dashed: true,
        }
    }
}

/// Axis-aligned bounding box in data units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    fn around(center: Point, half_w: f64, half_h: f64) -> Self {
        Self {
            min: Point::new(center.x - half_w, center.y - half_h),
            max: Point::new(center.x + half_w, center.y + half_h),
        }
    }

    fn union(self, other: Bounds) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

#[derive(Debug, Clone)]
enum Shape {
    Circle {
        center: Point,
        radius: f64,
        fill: Color,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
    RoundedBox {
        bounds: Bounds,
        radius: f64,
        fill: Color,
        opacity: f64,
    },
    Text {
        center: Point,
        lines: Vec<String>,
        size: f64,
        font: Font,
    },
}

/// Vector canvas recording shapes for PDF output
#[derive(Debug, Clone)]
pub struct VectorCanvas {
    /// Points per data unit
    pub scale: f64,
    /// Padding around the drawn area, in points
    pub padding: f64,
    title: Option<String>,
    shapes: Vec<Shape>,
    bounds: Option<Bounds>,
}

impl VectorCanvas {
    /// Create an empty canvas with the given scale in points per data unit
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            padding: 6.0,
            title: None,
            shapes: Vec::new(),
            bounds: None,
        }
    }

    /// Set the document title stored in the PDF info dictionary
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number of recorded shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Tight bounding box of everything drawn so far
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    fn extend_bounds(&mut self, b: Bounds) {
        self.bounds = Some(match self.bounds {
            Some(current) => current.union(b),
            None => b,
        });
    }

    /// Filled circle with an outline
    pub fn draw_circle(&mut self, center: Point, radius: f64, fill: Color, stroke: Stroke) {
        let half_stroke = stroke.width / 2.0 / self.scale;
        self.extend_bounds(Bounds::around(
            center,
            radius + half_stroke,
            radius + half_stroke,
        ));
        self.shapes.push(Shape::Circle {
            center,
            radius,
            fill,
            stroke,
        });
    }

    /// Straight line segment
    pub fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.draw_polyline(vec![from, to], stroke);
    }

    /// Open polyline through the given points
    pub fn draw_polyline(&mut self, points: Vec<Point>, stroke: Stroke) {
        for p in &points {
            self.extend_bounds(Bounds::around(*p, 0.0, 0.0));
        }
        self.shapes.push(Shape::Polyline { points, stroke });
    }

    /// Open arrow head (`->`) with its tip at `tip`, pointing along `direction`
    ///
    /// `direction` need not be normalised; a zero vector draws nothing.
    pub fn draw_arrow_head(
        &mut self,
        tip: Point,
        direction: Point,
        length: f64,
        half_angle: f64,
        stroke: Stroke,
    ) {
        let norm = direction.x.hypot(direction.y);
        if norm == 0.0 {
            return;
        }
        let (ux, uy) = (direction.x / norm, direction.y / norm);
        let (sin, cos) = half_angle.sin_cos();
        let wing = |sign: f64| {
            let bx = -ux * cos - sign * -uy * sin;
            let by = -uy * cos - sign * ux * sin;
            Point::new(tip.x + bx * length, tip.y + by * length)
        };
        let head = Stroke {
            dashed: false,
            ..stroke
        };
        self.draw_polyline(vec![wing(1.0), tip, wing(-1.0)], head);
    }

    /// Filled rounded rectangle, optionally translucent
    pub fn draw_rounded_box(
        &mut self,
        center: Point,
        width: f64,
        height: f64,
        radius: f64,
        fill: Color,
        opacity: f64,
    ) {
        let bounds = Bounds::around(center, width / 2.0, height / 2.0);
        self.extend_bounds(bounds);
        self.shapes.push(Shape::RoundedBox {
            bounds,
            radius: radius.min(width / 2.0).min(height / 2.0),
            fill,
            opacity: opacity.clamp(0.0, 1.0),
        });
    }

    /// Size of a text block in data units: (width, height)
    pub fn text_extent(&self, text: &str, size: f64, font: Font) -> (f64, f64) {
        let lines: Vec<&str> = text.lines().collect();
        let width = lines
            .iter()
            .map(|line| font.text_width(line, size))
            .fold(0.0, f64::max);
        let height = lines.len().max(1) as f64 * size * LINE_HEIGHT;
        (width / self.scale, height / self.scale)
    }

    /// Text block centred horizontally and vertically on `center`
    pub fn draw_text_centered(&mut self, center: Point, text: &str, size: f64, font: Font) {
        if text.is_empty() {
            return;
        }
        let (w, h) = self.text_extent(text, size, font);
        self.extend_bounds(Bounds::around(center, w / 2.0, h / 2.0));
        self.shapes.push(Shape::Text {
            center,
            lines: text.lines().map(str::to_string).collect(),
            size,
            font,
        });
    }

    /// Serialise the canvas to a single-page PDF document
    pub fn to_pdf(&self) -> Result<Vec<u8>, DiagramError> {
        let bounds = self
            .bounds
            .ok_or_else(|| DiagramError::render_error("nothing drawn on canvas"))?;

        let page_w = bounds.width() * self.scale + 2.0 * self.padding;
        let page_h = bounds.height() * self.scale + 2.0 * self.padding;
        let to_page = |p: Point| {
            (
                (p.x - bounds.min.x) * self.scale + self.padding,
                (p.y - bounds.min.y) * self.scale + self.padding,
            )
        };

        let opacities: BTreeSet<u16> = self
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::RoundedBox { opacity, .. } if *opacity < 1.0 => {
                    Some((opacity * 1000.0).round() as u16)
                }
                _ => None,
            })
            .collect();
        let opacities: Vec<u16> = opacities.into_iter().collect();

        let mut content = String::new();
        for shape in &self.shapes {
            match shape {
                Shape::Circle {
                    center,
                    radius,
                    fill,
                    stroke,
                } => {
                    let (cx, cy) = to_page(*center);
                    content.push_str("q\n");
                    push_stroke_state(&mut content, stroke);
                    content.push_str(&format!("{} rg\n", fill.components()));
                    push_circle_path(&mut content, cx, cy, radius * self.scale);
                    content.push_str("B\nQ\n");
                }
                Shape::Polyline { points, stroke } => {
                    content.push_str("q\n");
                    push_stroke_state(&mut content, stroke);
                    for (i, p) in points.iter().enumerate() {
                        let (x, y) = to_page(*p);
                        let op = if i == 0 { "m" } else { "l" };
                        content.push_str(&format!("{} {} {}\n", num(x), num(y), op));
                    }
                    content.push_str("S\nQ\n");
                }
                Shape::RoundedBox {
                    bounds,
                    radius,
                    fill,
                    opacity,
                } => {
                    let (x0, y0) = to_page(bounds.min);
                    let (x1, y1) = to_page(bounds.max);
                    content.push_str("q\n");
                    let key = (opacity * 1000.0).round() as u16;
                    if let Some(idx) = opacities.iter().position(|o| *o == key) {
                        content.push_str(&format!("/GS{} gs\n", idx));
                    }
                    content.push_str(&format!("{} rg\n", fill.components()));
                    push_rounded_rect_path(&mut content, x0, y0, x1, y1, radius * self.scale);
                    content.push_str("f\nQ\n");
                }
                Shape::Text {
                    center,
                    lines,
                    size,
                    font,
                } => {
                    let (cx, cy) = to_page(*center);
                    let line_height = size * LINE_HEIGHT;
                    let first_baseline =
                        cy + (lines.len() as f64 - 1.0) * line_height / 2.0 - 0.35 * size;
                    content.push_str("0 g\n");
                    for (i, line) in lines.iter().enumerate() {
                        let x = cx - font.text_width(line, *size) / 2.0;
                        let y = first_baseline - i as f64 * line_height;
                        content.push_str(&format!(
                            "BT /{} {} Tf {} {} Td ({}) Tj ET\n",
                            font.resource_name(),
                            num(*size),
                            num(x),
                            num(y),
                            escape_text(line)
                        ));
                    }
                }
            }
        }

        let ext_gstates: String = opacities
            .iter()
            .enumerate()
            .map(|(i, _)| format!("/GS{} {} 0 R ", i, 8 + i))
            .collect();

        let mut objects: Vec<Vec<u8>> = vec![
            b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
            b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 5 0 R /F2 6 0 R >> /ExtGState << {}>> >> \
                 /Contents 4 0 R >>",
                num(page_w),
                num(page_h),
                ext_gstates
            )
            .into_bytes(),
        ];

        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(content.as_bytes());
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);

        for font in [Font::Helvetica, Font::HelveticaBold] {
            objects.push(
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.base_name()
                )
                .into_bytes(),
            );
        }

        let title = self
            .title
            .as_deref()
            .map(|t| format!(" /Title ({})", escape_text(t)))
            .unwrap_or_default();
        objects.push(format!("<< /Producer (fsmfig){} >>", title).into_bytes());

        for opacity in &opacities {
            let alpha = num(f64::from(*opacity) / 1000.0);
            objects.push(
                format!("<< /Type /ExtGState /ca {} /CA {} >>", alpha, alpha).into_bytes(),
            );
        }

        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            writeln!(out, "{} 0 obj", i + 1)?;
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        writeln!(out, "xref\n0 {}\n0000000000 65535 f ", objects.len() + 1)?;
        for offset in offsets {
            writeln!(out, "{:010} 00000 n ", offset)?;
        }
        writeln!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R /Info 7 0 R >>\nstartxref\n{}\n%%EOF",
            objects.len() + 1,
            xref_offset
        )?;

        Ok(out)
    }
}

fn push_stroke_state(content: &mut String, stroke: &Stroke) {
    content.push_str(&format!(
        "{} w {} RG\n",
        num(stroke.width),
        stroke.color.components()
    ));
    if stroke.dashed {
        let on = 3.7 * stroke.width;
        let off = 1.6 * stroke.width;
        content.push_str(&format!("[{} {}] 0 d\n", num(on), num(off)));
    }
}

fn push_circle_path(content: &mut String, cx: f64, cy: f64, r: f64) {
    let k = KAPPA * r;
    content.push_str(&format!("{} {} m\n", num(cx + r), num(cy)));
    let quarters = [
        (cx + r, cy + k, cx + k, cy + r, cx, cy + r),
        (cx - k, cy + r, cx - r, cy + k, cx - r, cy),
        (cx - r, cy - k, cx - k, cy - r, cx, cy - r),
        (cx + k, cy - r, cx + r, cy - k, cx + r, cy),
    ];
    for (x1, y1, x2, y2, x3, y3) in quarters {
        content.push_str(&format!(
            "{} {} {} {} {} {} c\n",
            num(x1),
            num(y1),
            num(x2),
            num(y2),
            num(x3),
            num(y3)
        ));
    }
    content.push_str("h\n");
}

fn push_rounded_rect_path(content: &mut String, x0: f64, y0: f64, x1: f64, y1: f64, r: f64) {
    let k = KAPPA * r;
    content.push_str(&format!("{} {} m\n", num(x0 + r), num(y0)));
    content.push_str(&format!("{} {} l\n", num(x1 - r), num(y0)));
    content.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        num(x1 - r + k),
        num(y0),
        num(x1),
        num(y0 + r - k),
        num(x1),
        num(y0 + r)
    ));
    content.push_str(&format!("{} {} l\n", num(x1), num(y1 - r)));
    content.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        num(x1),
        num(y1 - r + k),
        num(x1 - r + k),
        num(y1),
        num(x1 - r),
        num(y1)
    ));
    content.push_str(&format!("{} {} l\n", num(x0 + r), num(y1)));
    content.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        num(x0 + r - k),
        num(y1),
        num(x0),
        num(y1 - r + k),
        num(x0),
        num(y1 - r)
    ));
    content.push_str(&format!("{} {} l\n", num(x0), num(y0 + r)));
    content.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        num(x0),
        num(y0 + r - k),
        num(x0 + r - k),
        num(y0),
        num(x0 + r),
        num(y0)
    ));
    content.push_str("h\n");
}

/// Format a number for a content stream: three decimals, no trailing zeros
fn num(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape a string for a PDF literal
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().map(sanitize_char) {
        if matches!(c, '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
