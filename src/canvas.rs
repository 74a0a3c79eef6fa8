//! Scoped SVG drawing surface.
//!
//! Every chart owns its own [`Canvas`]: it is created by value, filled with
//! primitives in paint order, and consumed by [`Canvas::save`]. No drawing
//! state outlives the artifact it produced.
//!
//! Geometry comes from `kurbo`, colors from `peniko`.
//!
//! ```
//! use kurbo::Rect;
//! use u_explore::canvas::{Canvas, TextStyle, BAR_FILL};
//!
//! let mut canvas = Canvas::new(200.0, 100.0);
//! canvas.fill_rect(Rect::new(10.0, 10.0, 50.0, 90.0), BAR_FILL);
//! canvas.text((100.0, 20.0), "a < b", &TextStyle::new(12.0));
//!
//! let svg = canvas.to_svg_string();
//! assert!(svg.starts_with("<svg"));
//! assert!(svg.contains("a &lt; b"));
//! ```

use std::fmt::Write as _;
use std::path::Path;

use kurbo::{BezPath, Point, Rect};
use peniko::Color;

use crate::error::ExploreError;

// ── Palette ─────────────────────────────────────────────────────────

/// Histogram bar fill.
pub const BAR_FILL: Color = Color::from_rgba8(76, 114, 176, 255);
/// Semi-transparent bar fill used under a density curve.
pub const BAR_FILL_SOFT: Color = Color::from_rgba8(76, 114, 176, 153);
/// Density curve stroke.
pub const CURVE_STROKE: Color = Color::from_rgba8(49, 79, 140, 255);
/// Scatter marker fill.
pub const MARKER_FILL: Color = Color::from_rgba8(76, 114, 176, 179);
/// Axis lines, tick marks and labels.
pub const INK: Color = Color::from_rgba8(38, 38, 38, 255);
/// Light gridline color.
pub const GRID: Color = Color::from_rgba8(221, 221, 221, 255);
/// Surface background.
pub const BACKGROUND: Color = Color::from_rgba8(255, 255, 255, 255);
/// Black text.
pub const BLACK: Color = Color::from_rgba8(0, 0, 0, 255);
/// White text.
pub const WHITE: Color = Color::from_rgba8(255, 255, 255, 255);

/// Anchor stops of the `coolwarm` diverging map, low to high.
const COOLWARM: [(u8, u8, u8); 5] = [
    (59, 76, 192),
    (141, 176, 254),
    (221, 220, 220),
    (244, 152, 122),
    (180, 4, 38),
];

/// Maps `t` in `[0, 1]` onto the `coolwarm` diverging map.
///
/// Values outside the unit interval are clamped. `NaN` maps to the neutral
/// midpoint.
pub fn coolwarm(t: f64) -> Color {
    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
    let segments = (COOLWARM.len() - 1) as f64;
    let pos = t * segments;
    let i = (pos.floor() as usize).min(COOLWARM.len() - 2);
    let f = pos - i as f64;
    let (r0, g0, b0) = COOLWARM[i];
    let (r1, g1, b1) = COOLWARM[i + 1];
    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as u8;
    Color::from_rgba8(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1), 255)
}

/// WCAG relative luminance of an opaque color.
pub fn relative_luminance(color: Color) -> f64 {
    let rgba = color.to_rgba8();
    let channel = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(rgba.r) + 0.7152 * channel(rgba.g) + 0.0722 * channel(rgba.b)
}

/// Text color readable on top of `background`.
pub fn contrasting_text(background: Color) -> Color {
    if relative_luminance(background) > 0.408 {
        BLACK
    } else {
        WHITE
    }
}

// ── Text ────────────────────────────────────────────────────────────

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// Vertical text baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Middle,
    Hanging,
}

/// Text attributes.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub font_size: f64,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
    pub color: Color,
    /// Clockwise rotation in degrees around the anchor point.
    pub angle: f64,
    pub bold: bool,
}

impl TextStyle {
    /// Start-anchored, alphabetic-baseline text in [`INK`].
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            color: INK,
            angle: 0.0,
            bold: false,
        }
    }

    /// Sets the horizontal anchor (default: start).
    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the vertical baseline (default: alphabetic).
    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the fill color (default: [`INK`]).
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Rotates by `degrees` about the anchor point (default: 0).
    pub fn rotate(mut self, degrees: f64) -> Self {
        self.angle = degrees;
        self
    }

    /// Uses a bold weight (default: normal).
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Centered on both axes.
    pub fn centered(self) -> Self {
        self.anchor(TextAnchor::Middle).baseline(TextBaseline::Middle)
    }
}

/// Rough rendered width of `text`, assuming ~0.6em per glyph.
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    0.6 * font_size * text.chars().count() as f64
}

/// Shortens `text` with a trailing ellipsis so it fits in `max_width`.
pub fn fit_text(text: &str, font_size: f64, max_width: f64) -> String {
    if estimate_text_width(text, font_size) <= max_width {
        return text.to_string();
    }
    let glyph = 0.6 * font_size;
    let keep = ((max_width / glyph).floor() as usize).saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('…');
    out
}

// ── Surface ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Element {
    Rect {
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<(Color, f64)>,
    },
    Path {
        path: BezPath,
        stroke: Color,
        width: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Color,
    },
    Text {
        pos: Point,
        text: String,
        style: TextStyle,
    },
}

/// An in-memory SVG surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: f64,
    height: f64,
    elements: Vec<Element>,
}

impl Canvas {
    /// Creates a `width × height` surface with a white background.
    pub fn new(width: f64, height: f64) -> Self {
        let mut canvas = Self {
            width,
            height,
            elements: Vec::new(),
        };
        canvas.fill_rect(canvas.bounds(), BACKGROUND);
        canvas
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The full surface rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Number of primitives drawn so far, background included.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn fill_rect(&mut self, rect: Rect, fill: Color) {
        self.elements.push(Element::Rect {
            rect,
            fill: Some(fill),
            stroke: None,
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, stroke: Color, width: f64) {
        self.elements.push(Element::Rect {
            rect,
            fill: None,
            stroke: Some((stroke, width)),
        });
    }

    /// Straight line segment.
    pub fn line(&mut self, from: impl Into<Point>, to: impl Into<Point>, stroke: Color, width: f64) {
        let mut path = BezPath::new();
        path.move_to(from.into());
        path.line_to(to.into());
        self.stroke_path(path, stroke, width);
    }

    /// Open polyline through `points`. Fewer than two points draw nothing.
    pub fn polyline(&mut self, points: &[Point], stroke: Color, width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        self.stroke_path(path, stroke, width);
    }

    pub fn stroke_path(&mut self, path: BezPath, stroke: Color, width: f64) {
        self.elements.push(Element::Path {
            path,
            stroke,
            width,
        });
    }

    pub fn circle(&mut self, center: impl Into<Point>, radius: f64, fill: Color) {
        self.elements.push(Element::Circle {
            center: center.into(),
            radius,
            fill,
        });
    }

    pub fn text(&mut self, pos: impl Into<Point>, text: &str, style: &TextStyle) {
        self.elements.push(Element::Text {
            pos: pos.into(),
            text: text.to_string(),
            style: *style,
        });
    }

    /// Serializes the surface as a standalone SVG document.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        let (w, h) = (num(self.width), num(self.height));
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        let _ = write!(
            out,
            r#"viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="DejaVu Sans, Arial, sans-serif">"#
        );
        out.push('\n');

        for element in &self.elements {
            match element {
                Element::Rect { rect, fill, stroke } => {
                    let _ = write!(
                        out,
                        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                        num(rect.x0),
                        num(rect.y0),
                        num(rect.width()),
                        num(rect.height()),
                    );
                    match fill {
                        Some(c) => write_paint_attr(&mut out, "fill", *c),
                        None => out.push_str(r#" fill="none""#),
                    }
                    if let Some((c, width)) = stroke {
                        write_paint_attr(&mut out, "stroke", *c);
                        let _ = write!(out, r#" stroke-width="{}""#, num(*width));
                    }
                    out.push_str("/>\n");
                }
                Element::Path {
                    path,
                    stroke,
                    width,
                } => {
                    let _ = write!(out, r#"<path d="{}" fill="none""#, path.to_svg());
                    write_paint_attr(&mut out, "stroke", *stroke);
                    let _ = write!(
                        out,
                        r#" stroke-width="{}" stroke-linejoin="round"/>"#,
                        num(*width)
                    );
                    out.push('\n');
                }
                Element::Circle {
                    center,
                    radius,
                    fill,
                } => {
                    let _ = write!(
                        out,
                        r#"<circle cx="{}" cy="{}" r="{}""#,
                        num(center.x),
                        num(center.y),
                        num(*radius)
                    );
                    write_paint_attr(&mut out, "fill", *fill);
                    out.push_str("/>\n");
                }
                Element::Text { pos, text, style } => {
                    let baseline = match style.baseline {
                        TextBaseline::Alphabetic => "alphabetic",
                        TextBaseline::Middle => "middle",
                        TextBaseline::Hanging => "hanging",
                    };
                    let (x, y) = (num(pos.x), num(pos.y));
                    let _ = write!(
                        out,
                        r#"<text x="{x}" y="{y}" font-size="{}" dominant-baseline="{baseline}""#,
                        num(style.font_size)
                    );
                    out.push_str(match style.anchor {
                        TextAnchor::Start => r#" text-anchor="start""#,
                        TextAnchor::Middle => r#" text-anchor="middle""#,
                        TextAnchor::End => r#" text-anchor="end""#,
                    });
                    if style.angle != 0.0 {
                        let _ = write!(out, r#" transform="rotate({} {x} {y})""#, num(style.angle));
                    }
                    if style.bold {
                        out.push_str(r#" font-weight="bold""#);
                    }
                    write_paint_attr(&mut out, "fill", style.color);
                    out.push('>');
                    out.push_str(&escape_xml(text));
                    out.push_str("</text>\n");
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }

    /// Writes the surface to `path`, replacing any existing file, and
    /// releases it.
    pub fn save(self, path: &Path) -> Result<(), ExploreError> {
        std::fs::write(path, self.to_svg_string()).map_err(|source| ExploreError::ArtifactWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Coordinates rounded to 1/100 px keep documents small and stable.
fn num(v: f64) -> f64 {
    let r = (v * 100.0).round() / 100.0;
    // Avoid "-0" in the output.
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let rgba = color.to_rgba8();
    let _ = write!(
        out,
        r##" {name}="#{:02x}{:02x}{:02x}""##,
        rgba.r, rgba.g, rgba.b
    );
    if rgba.a != 255 {
        let _ = write!(out, r#" {name}-opacity="{}""#, num(f64::from(rgba.a) / 255.0));
    }
}

/// Escapes the five XML special characters.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
