//! Shape definitions for screen annotations.

use super::color::Color;
use super::font::FontDescriptor;
use crate::util::{self, Rect};

/// Sequence number assigned at commit time; doubles as the z-order key.
pub type ShapeId = u64;

/// Geometry of a drawable annotation.
///
/// Each variant represents a different drawing tool/primitive with its
/// specific parameters. Style attributes shared by every annotation (color,
/// thickness, highlight) live on [`Shape`] instead.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    /// Freehand drawing - polyline connecting pointer drag points
    Freehand {
        /// Sequence of (x, y) coordinates traced by the pointer
        points: Vec<(i32, i32)>,
    },
    /// Straight line between two anchor points
    Line { x1: i32, y1: i32, x2: i32, y2: i32 },
    /// Rectangle from a normalized drag box
    Rect {
        /// Top-left X coordinate
        x: i32,
        /// Top-left Y coordinate
        y: i32,
        /// Width in pixels (non-negative)
        w: i32,
        /// Height in pixels (non-negative)
        h: i32,
        /// Whether the interior is filled before the outline is stroked
        fill: bool,
    },
    /// Ellipse described by center and radii
    Ellipse {
        cx: i32,
        cy: i32,
        rx: i32,
        ry: i32,
        /// Whether the interior is filled before the outline is stroked
        fill: bool,
    },
    /// Arrow with directional head at (x1, y1)
    Arrow {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        /// Arrowhead length in pixels
        arrow_length: f64,
        /// Arrowhead angle in degrees
        arrow_angle: f64,
    },
    /// Text annotation anchored at a baseline point
    Text {
        /// Baseline X coordinate
        x: i32,
        /// Baseline Y coordinate (first line)
        y: i32,
        /// Text content, may contain '\n' for multiple lines
        text: String,
        /// Font size in points
        size: f64,
        /// Font descriptor (family, weight, style)
        font: FontDescriptor,
    },
}

/// One committed annotation: geometry plus the style it was drawn with.
///
/// The `seq` field is the creation sequence number assigned by
/// [`Frame::add`](super::frame::Frame::add); later numbers render on top.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    /// Creation sequence number (z-order key). 0 until the frame assigns one.
    pub seq: ShapeId,
    /// Stroke/fill color
    pub color: Color,
    /// Stroke thickness in pixels
    pub thick: f64,
    /// Render at reduced opacity (highlighter)
    pub highlight: bool,
    /// The geometry of this annotation
    pub kind: ShapeKind,
}

impl Shape {
    /// Creates an uncommitted shape; the frame assigns `seq` on add.
    pub fn new(kind: ShapeKind, color: Color, thick: f64, highlight: bool) -> Self {
        Self {
            seq: 0,
            color,
            thick,
            highlight,
            kind,
        }
    }

    /// Returns true when the shape has no visible extent and should be
    /// discarded instead of committed (accidental click, empty text).
    pub fn is_degenerate(&self) -> bool {
        match &self.kind {
            ShapeKind::Freehand { points } => points.len() < 2,
            ShapeKind::Line { x1, y1, x2, y2 } | ShapeKind::Arrow { x1, y1, x2, y2, .. } => {
                x1 == x2 && y1 == y2
            }
            ShapeKind::Rect { w, h, .. } => *w == 0 && *h == 0,
            ShapeKind::Ellipse { rx, ry, .. } => *rx == 0 && *ry == 0,
            ShapeKind::Text { text, .. } => text.is_empty(),
        }
    }

    /// Returns the axis-aligned bounding box for this shape, expanded to cover
    /// stroke width.
    ///
    /// Used by the eraser's text hit test. Returns `None` only when the shape
    /// has no drawable area (e.g., degenerate data).
    pub fn bounding_box(&self) -> Option<Rect> {
        match &self.kind {
            ShapeKind::Freehand { points } => bounding_box_for_points(points, self.thick),
            ShapeKind::Line { x1, y1, x2, y2 } => {
                bounding_box_for_line(*x1, *y1, *x2, *y2, self.thick)
            }
            ShapeKind::Rect { x, y, w, h, .. } => {
                bounding_box_for_rect(*x, *y, *w, *h, self.thick)
            }
            ShapeKind::Ellipse { cx, cy, rx, ry, .. } => {
                bounding_box_for_ellipse(*cx, *cy, *rx, *ry, self.thick)
            }
            ShapeKind::Arrow {
                x1,
                y1,
                x2,
                y2,
                arrow_length,
                arrow_angle,
            } => bounding_box_for_arrow(
                *x1,
                *y1,
                *x2,
                *y2,
                self.thick,
                *arrow_length,
                *arrow_angle,
            ),
            ShapeKind::Text {
                x,
                y,
                text,
                size,
                font,
            } => bounding_box_for_text(*x, *y, text, *size, font),
        }
    }
}

fn stroke_padding(thick: f64) -> i32 {
    let padding = (thick / 2.0).ceil() as i32;
    padding.max(1)
}

pub(crate) fn bounding_box_for_points(points: &[(i32, i32)], thick: f64) -> Option<Rect> {
    if points.is_empty() {
        return None;
    }
    let mut min_x = points[0].0;
    let mut max_x = points[0].0;
    let mut min_y = points[0].1;
    let mut max_y = points[0].1;

    for &(x, y) in &points[1..] {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let padding = stroke_padding(thick);
    min_x -= padding;
    max_x += padding;
    min_y -= padding;
    max_y += padding;

    ensure_positive_rect(min_x, min_y, max_x, max_y)
}

pub(crate) fn bounding_box_for_line(
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    thick: f64,
) -> Option<Rect> {
    let padding = stroke_padding(thick);

    let min_x = x1.min(x2) - padding;
    let max_x = x1.max(x2) + padding;
    let min_y = y1.min(y2) - padding;
    let max_y = y1.max(y2) + padding;

    ensure_positive_rect(min_x, min_y, max_x, max_y)
}

pub(crate) fn bounding_box_for_rect(x: i32, y: i32, w: i32, h: i32, thick: f64) -> Option<Rect> {
    let padding = stroke_padding(thick);

    let x2 = x + w;
    let y2 = y + h;

    let min_x = x.min(x2) - padding;
    let max_x = x.max(x2) + padding;
    let min_y = y.min(y2) - padding;
    let max_y = y.max(y2) + padding;

    ensure_positive_rect(min_x, min_y, max_x, max_y)
}

pub(crate) fn bounding_box_for_ellipse(
    cx: i32,
    cy: i32,
    rx: i32,
    ry: i32,
    thick: f64,
) -> Option<Rect> {
    let padding = stroke_padding(thick);
    let min_x = (cx - rx) - padding;
    let max_x = (cx + rx) + padding;
    let min_y = (cy - ry) - padding;
    let max_y = (cy + ry) + padding;

    ensure_positive_rect(min_x, min_y, max_x, max_y)
}

pub(crate) fn bounding_box_for_arrow(
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    thick: f64,
    arrow_length: f64,
    arrow_angle: f64,
) -> Option<Rect> {
    let arrow_points = util::calculate_arrowhead_custom(x1, y1, x2, y2, arrow_length, arrow_angle);

    let mut min_x = x1.min(x2) as f64;
    let mut max_x = x1.max(x2) as f64;
    let mut min_y = y1.min(y2) as f64;
    let mut max_y = y1.max(y2) as f64;

    for &(px, py) in &arrow_points {
        min_x = min_x.min(px);
        max_x = max_x.max(px);
        min_y = min_y.min(py);
        max_y = max_y.max(py);
    }

    let padding = stroke_padding(thick) as f64;

    ensure_positive_rect_f64(
        min_x - padding,
        min_y - padding,
        max_x + padding,
        max_y + padding,
    )
}

pub(crate) fn bounding_box_for_text(
    x: i32,
    y: i32,
    text: &str,
    size: f64,
    font: &FontDescriptor,
) -> Option<Rect> {
    if text.is_empty() {
        return None;
    }

    // Use a tiny image surface for measurement; the layout is all we need.
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1).ok()?;
    let ctx = cairo::Context::new(&surface).ok()?;

    ctx.set_antialias(cairo::Antialias::Best);

    let layout = pangocairo::functions::create_layout(&ctx);

    let font_desc_str = font.to_pango_string(size);
    let font_desc = pango::FontDescription::from_string(&font_desc_str);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);

    let (ink_rect, _logical_rect) = layout.extents();

    // Convert Pango units to floats
    let scale = pango::SCALE as f64;
    let ink_x = ink_rect.x() as f64 / scale;
    let ink_y = ink_rect.y() as f64 / scale;
    let ink_width = ink_rect.width() as f64 / scale;
    let ink_height = ink_rect.height() as f64 / scale;
    let baseline = layout.baseline() as f64 / scale;

    let base_x = x as f64;
    let base_y = y as f64 - baseline;

    ensure_positive_rect_f64(
        base_x + ink_x,
        base_y + ink_y,
        base_x + ink_x + ink_width,
        base_y + ink_y + ink_height,
    )
}

fn ensure_positive_rect(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Rect> {
    let (min_x, max_x) = if min_x == max_x {
        (min_x, max_x + 1)
    } else {
        (min_x, max_x)
    };
    let (min_y, max_y) = if min_y == max_y {
        (min_y, max_y + 1)
    } else {
        (min_y, max_y)
    };
    Rect::from_min_max(min_x, min_y, max_x, max_y)
}

fn ensure_positive_rect_f64(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<Rect> {
    let min_x = min_x.floor() as i32;
    let min_y = min_y.floor() as i32;
    let max_x = max_x.ceil() as i32;
    let max_y = max_y.ceil() as i32;
    ensure_positive_rect(min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::WHITE;
    use crate::util;

    #[test]
    fn freehand_bounding_box_expands_with_thickness() {
        let shape = Shape::new(
            ShapeKind::Freehand {
                points: vec![(10, 20), (30, 40)],
            },
            WHITE,
            6.0,
            false,
        );

        let rect = shape.bounding_box().expect("freehand should have bounds");
        assert_eq!(rect.x, 7);
        assert_eq!(rect.y, 17);
        assert_eq!(rect.width, 26);
        assert_eq!(rect.height, 26);
    }

    #[test]
    fn line_bounding_box_covers_stroke() {
        let shape = Shape::new(
            ShapeKind::Line {
                x1: 50,
                y1: 40,
                x2: 70,
                y2: 90,
            },
            WHITE,
            4.0,
            false,
        );

        let rect = shape.bounding_box().expect("line should have bounds");
        assert_eq!(rect.x, 48);
        assert_eq!(rect.y, 38);
        assert_eq!(rect.width, 24);
        assert_eq!(rect.height, 54);
    }

    #[test]
    fn arrow_bounding_box_includes_head() {
        let shape = Shape::new(
            ShapeKind::Arrow {
                x1: 100,
                y1: 100,
                x2: 50,
                y2: 120,
                arrow_length: 20.0,
                arrow_angle: 30.0,
            },
            WHITE,
            3.0,
            false,
        );

        let rect = shape.bounding_box().expect("arrow should have bounds");
        let x_min = rect.x;
        let x_max = rect.x + rect.width;
        let y_min = rect.y;
        let y_max = rect.y + rect.height;

        assert!(x_min <= 50 && x_max >= 100);
        assert!(y_min <= 100 && y_max >= 120);

        let arrow_points = util::calculate_arrowhead_custom(100, 100, 50, 120, 20.0, 30.0);
        for &(px, py) in &arrow_points {
            assert!(px >= x_min as f64 && px <= x_max as f64);
            assert!(py >= y_min as f64 && py <= y_max as f64);
        }
    }

    #[test]
    fn ellipse_bounding_box_handles_radii_and_stroke() {
        let shape = Shape::new(
            ShapeKind::Ellipse {
                cx: 200,
                cy: 150,
                rx: 40,
                ry: 20,
                fill: false,
            },
            WHITE,
            2.0,
            false,
        );

        let rect = shape.bounding_box().expect("ellipse should have bounds");
        assert_eq!(rect.x, 159);
        assert_eq!(rect.y, 129);
        assert_eq!(rect.width, 82);
        assert_eq!(rect.height, 42);
    }

    #[test]
    fn text_bounding_box_is_non_zero() {
        let shape = Shape::new(
            ShapeKind::Text {
                x: 10,
                y: 20,
                text: "Hello".to_string(),
                size: 24.0,
                font: FontDescriptor::default(),
            },
            WHITE,
            3.0,
            false,
        );

        let rect = shape.bounding_box().expect("text should have bounds");
        assert!(rect.width > 0);
        assert!(rect.height > 0);
        assert!(rect.y <= 20);
    }

    #[test]
    fn degenerate_detection_per_kind() {
        let click_stroke = Shape::new(ShapeKind::Freehand { points: vec![(5, 5)] }, WHITE, 3.0, false);
        assert!(click_stroke.is_degenerate());

        let zero_line = Shape::new(
            ShapeKind::Line {
                x1: 7,
                y1: 7,
                x2: 7,
                y2: 7,
            },
            WHITE,
            3.0,
            false,
        );
        assert!(zero_line.is_degenerate());

        // A flat rectangle still strokes a visible edge
        let flat_rect = Shape::new(
            ShapeKind::Rect {
                x: 0,
                y: 0,
                w: 0,
                h: 40,
                fill: false,
            },
            WHITE,
            3.0,
            false,
        );
        assert!(!flat_rect.is_degenerate());

        let point_rect = Shape::new(
            ShapeKind::Rect {
                x: 0,
                y: 0,
                w: 0,
                h: 0,
                fill: true,
            },
            WHITE,
            3.0,
            false,
        );
        assert!(point_rect.is_degenerate());

        let empty_text = Shape::new(
            ShapeKind::Text {
                x: 0,
                y: 0,
                text: String::new(),
                size: 24.0,
                font: FontDescriptor::default(),
            },
            WHITE,
            3.0,
            false,
        );
        assert!(empty_text.is_degenerate());
    }
}
