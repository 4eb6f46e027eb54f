//! Cairo-based rendering functions for shapes.

use super::color::Color;
use super::shape::{Shape, ShapeKind};
use crate::util;

/// Opacity factor applied to highlight-flagged shapes, independent of the
/// shape's own alpha channel.
pub const HIGHLIGHT_ALPHA: f64 = 0.4;

/// Returns the color a shape actually paints with, after the highlight
/// opacity reduction.
pub fn effective_color(shape: &Shape) -> Color {
    if shape.highlight {
        shape.color.scaled_alpha(HIGHLIGHT_ALPHA)
    } else {
        shape.color
    }
}

/// Renders all shapes in a collection to a Cairo context.
///
/// Iterates through the shapes slice and renders each one in order.
/// Shapes are drawn in the order they appear, which the frame keeps in
/// ascending sequence-number order (first shape = bottom layer).
pub fn render_shapes(ctx: &cairo::Context, shapes: &[Shape]) {
    for shape in shapes {
        render_shape(ctx, shape);
    }
}

/// Renders a single shape to a Cairo context.
///
/// Dispatches to the appropriate internal rendering function based on shape
/// geometry. Handles all variants: Freehand, Line, Rect, Ellipse, Arrow, Text.
pub fn render_shape(ctx: &cairo::Context, shape: &Shape) {
    let color = effective_color(shape);
    match &shape.kind {
        ShapeKind::Freehand { points } => {
            render_freehand_borrowed(ctx, points, color, shape.thick);
        }
        ShapeKind::Line { x1, y1, x2, y2 } => {
            render_line(ctx, *x1, *y1, *x2, *y2, color, shape.thick);
        }
        ShapeKind::Rect { x, y, w, h, fill } => {
            render_rect(ctx, *x, *y, *w, *h, color, shape.thick, *fill);
        }
        ShapeKind::Ellipse {
            cx,
            cy,
            rx,
            ry,
            fill,
        } => {
            render_ellipse(ctx, *cx, *cy, *rx, *ry, color, shape.thick, *fill);
        }
        ShapeKind::Arrow {
            x1,
            y1,
            x2,
            y2,
            arrow_length,
            arrow_angle,
        } => {
            render_arrow(
                ctx,
                *x1,
                *y1,
                *x2,
                *y2,
                color,
                shape.thick,
                *arrow_length,
                *arrow_angle,
            );
        }
        ShapeKind::Text {
            x,
            y,
            text,
            size,
            font,
        } => {
            render_text(ctx, *x, *y, text, color, *size, font);
        }
    }
}

/// Renders all shapes onto a fresh transparent ARGB32 surface.
///
/// The background stays fully transparent (alpha = 0) wherever no shape
/// covers. This is the export path: it knows nothing about in-progress
/// preview state.
pub fn render_to_surface(
    shapes: &[Shape],
    width: i32,
    height: i32,
) -> Result<cairo::ImageSurface, cairo::Error> {
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width.max(1), height.max(1))?;
    {
        let ctx = cairo::Context::new(&surface)?;
        ctx.set_antialias(cairo::Antialias::Best);
        render_shapes(&ctx, shapes);
    }
    surface.flush();
    Ok(surface)
}

/// Render freehand stroke (polyline through points)
///
/// This function accepts a borrowed slice, avoiding clones for better performance.
/// Use this for rendering provisional strokes during drawing to prevent quadratic behavior.
pub fn render_freehand_borrowed(
    ctx: &cairo::Context,
    points: &[(i32, i32)],
    color: Color,
    thick: f64,
) {
    if points.is_empty() {
        return;
    }

    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(thick);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    // Start at first point
    let (x0, y0) = points[0];
    ctx.move_to(x0 as f64, y0 as f64);

    // Draw lines through all points
    for &(x, y) in &points[1..] {
        ctx.line_to(x as f64, y as f64);
    }

    let _ = ctx.stroke();
}

/// Render a straight line
fn render_line(ctx: &cairo::Context, x1: i32, y1: i32, x2: i32, y2: i32, color: Color, thick: f64) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(thick);
    ctx.set_line_cap(cairo::LineCap::Round);

    ctx.move_to(x1 as f64, y1 as f64);
    ctx.line_to(x2 as f64, y2 as f64);
    let _ = ctx.stroke();
}

/// Render a rectangle, filling the interior first when requested so the
/// outline always sits on top of the fill.
#[allow(clippy::too_many_arguments)]
fn render_rect(
    ctx: &cairo::Context,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: Color,
    thick: f64,
    fill: bool,
) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(thick);
    ctx.set_line_join(cairo::LineJoin::Miter);

    // Normalize to handle any legacy data with negative dimensions
    // (the input pipeline already normalizes, but this keeps rendering consistent)
    let (norm_x, norm_w) = if w >= 0 {
        (x as f64, w as f64)
    } else {
        ((x + w) as f64, (-w) as f64)
    };
    let (norm_y, norm_h) = if h >= 0 {
        (y as f64, h as f64)
    } else {
        ((y + h) as f64, (-h) as f64)
    };

    ctx.rectangle(norm_x, norm_y, norm_w, norm_h);
    if fill {
        let _ = ctx.fill_preserve();
    }
    let _ = ctx.stroke();
}

/// Render an ellipse using Cairo's arc with scaling
#[allow(clippy::too_many_arguments)]
fn render_ellipse(
    ctx: &cairo::Context,
    cx: i32,
    cy: i32,
    rx: i32,
    ry: i32,
    color: Color,
    thick: f64,
    fill: bool,
) {
    if rx == 0 || ry == 0 {
        return;
    }

    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(thick);

    ctx.save().ok();
    ctx.translate(cx as f64, cy as f64);
    ctx.scale(rx as f64, ry as f64);
    ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
    ctx.restore().ok();

    if fill {
        let _ = ctx.fill_preserve();
    }
    let _ = ctx.stroke();
}

/// Render an arrow (line with arrowhead pointing towards start)
#[allow(clippy::too_many_arguments)]
fn render_arrow(
    ctx: &cairo::Context,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    color: Color,
    thick: f64,
    arrow_length: f64,
    arrow_angle: f64,
) {
    // Draw the main line
    render_line(ctx, x1, y1, x2, y2, color, thick);

    // Draw arrowhead at (x1, y1) pointing towards start
    // Returns [left_point, right_point]
    let arrow_points = util::calculate_arrowhead_custom(x1, y1, x2, y2, arrow_length, arrow_angle);

    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(thick);
    ctx.set_line_cap(cairo::LineCap::Round);

    // Draw left line of arrowhead (from start to left point)
    ctx.move_to(x1 as f64, y1 as f64);
    ctx.line_to(arrow_points[0].0, arrow_points[0].1);
    let _ = ctx.stroke();

    // Draw right line of arrowhead (from start to right point)
    ctx.move_to(x1 as f64, y1 as f64);
    ctx.line_to(arrow_points[1].0, arrow_points[1].1);
    let _ = ctx.stroke();
}

/// Renders text at a specified position with multi-line support using Pango.
///
/// The position (x, y) is the text baseline starting point for the first
/// line. Text containing newline characters ('\n') renders across multiple
/// lines with line spacing from the font metrics.
pub fn render_text(
    ctx: &cairo::Context,
    x: i32,
    y: i32,
    text: &str,
    color: Color,
    size: f64,
    font: &super::FontDescriptor,
) {
    // Save context state to prevent settings from leaking to other drawing operations
    ctx.save().ok();

    // Use Best antialiasing (gray) instead of Subpixel for ARGB overlay
    // Subpixel can cause color fringing on transparent/composited surfaces
    ctx.set_antialias(cairo::Antialias::Best);

    let layout = pangocairo::functions::create_layout(ctx);

    let font_desc_str = font.to_pango_string(size);
    let font_desc = pango::FontDescription::from_string(&font_desc_str);
    layout.set_font_description(Some(&font_desc));

    // Pango handles newlines automatically
    layout.set_text(text);

    // Adjust y position (Pango measures from top-left, we want baseline)
    let baseline = layout.baseline() as f64 / pango::SCALE as f64;
    let adjusted_y = y as f64 - baseline;

    ctx.move_to(x as f64, adjusted_y);
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    pangocairo::functions::show_layout(ctx, &layout);

    ctx.restore().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{RED, WHITE};
    use crate::draw::shape::Shape;

    fn pixel_alpha(surface: &mut cairo::ImageSurface, x: usize, y: usize) -> u8 {
        let stride = surface.stride() as usize;
        let data = surface.data().expect("surface data");
        // ARGB32 is native-endian; alpha is the high byte of the u32
        let offset = y * stride + x * 4;
        let px = u32::from_ne_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);
        (px >> 24) as u8
    }

    #[test]
    fn empty_frame_exports_fully_transparent_surface() {
        let mut surface = render_to_surface(&[], 16, 16).expect("surface");
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(pixel_alpha(&mut surface, x, y), 0);
            }
        }
    }

    #[test]
    fn highlight_shape_renders_at_reduced_opacity() {
        let shape = Shape::new(
            ShapeKind::Rect {
                x: 2,
                y: 2,
                w: 12,
                h: 12,
                fill: true,
            },
            WHITE,
            1.0,
            true,
        );

        let mut surface = render_to_surface(&[shape], 16, 16).expect("surface");
        let alpha = pixel_alpha(&mut surface, 8, 8);
        // 0.4 of full coverage lands near 102
        assert!((95..=110).contains(&alpha), "alpha was {alpha}");
    }

    #[test]
    fn opaque_fill_covers_interior_of_drag_box() {
        let shape = Shape::new(
            ShapeKind::Rect {
                x: 10,
                y: 10,
                w: 40,
                h: 40,
                fill: true,
            },
            RED,
            2.0,
            false,
        );

        let mut surface = render_to_surface(&[shape], 64, 64).expect("surface");
        assert_eq!(pixel_alpha(&mut surface, 30, 30), 255);
        assert_eq!(pixel_alpha(&mut surface, 5, 5), 0);
        assert_eq!(pixel_alpha(&mut surface, 60, 60), 0);
    }

    #[test]
    fn outline_rect_leaves_interior_transparent() {
        let shape = Shape::new(
            ShapeKind::Rect {
                x: 10,
                y: 10,
                w: 40,
                h: 40,
                fill: false,
            },
            RED,
            2.0,
            false,
        );

        let mut surface = render_to_surface(&[shape], 64, 64).expect("surface");
        assert_eq!(pixel_alpha(&mut surface, 30, 30), 0);
        assert!(pixel_alpha(&mut surface, 30, 10) > 0);
    }

    #[test]
    fn effective_color_only_touches_highlighted_shapes() {
        let plain = Shape::new(
            ShapeKind::Line {
                x1: 0,
                y1: 0,
                x2: 5,
                y2: 5,
            },
            RED,
            2.0,
            false,
        );
        assert_eq!(effective_color(&plain).a, 1.0);

        let mut marked = plain.clone();
        marked.highlight = true;
        assert!((effective_color(&marked).a - HIGHLIGHT_ALPHA).abs() < f64::EPSILON);
    }
}
