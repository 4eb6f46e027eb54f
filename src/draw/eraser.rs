//! Eraser hit-testing against committed shapes.
//!
//! The eraser sweeps a disc of the configured brush width along the pointer
//! path. Shapes whose visible geometry intersects the swept disc are removed
//! from the frame in one batch so a continuous erase gesture stays a single
//! undoable operation.

use log::debug;
use std::collections::BTreeSet;

use super::frame::Frame;
use super::shape::{Shape, ShapeKind};

/// Smallest accepted brush width; narrower requests are clamped, not refused.
pub const MIN_BRUSH_WIDTH: f64 = 1.0;

/// Removes every shape the erase path touches, returning the removed shapes
/// in ascending sequence order.
///
/// `path` is the sampled pointer positions of the gesture segment being
/// processed (a single point for a click). A shape matches when any path
/// point falls within `brush_width / 2` of its visible geometry: the segments
/// of polyline shapes (freehand, line, arrow), the boundary of rectangles and
/// ellipses (or their interior when filled), or the bounding box of text.
pub fn erase_along(frame: &mut Frame, path: &[(i32, i32)], brush_width: f64) -> Vec<Shape> {
    if path.is_empty() {
        return Vec::new();
    }

    if brush_width < MIN_BRUSH_WIDTH {
        debug!("Eraser brush width {brush_width:.1} below minimum, clamping");
    }
    let radius = brush_width.max(MIN_BRUSH_WIDTH) / 2.0;

    let hits: BTreeSet<_> = frame
        .shapes()
        .iter()
        .filter(|shape| shape_hit(shape, path, radius))
        .map(|shape| shape.seq)
        .collect();

    frame.remove(&hits)
}

fn shape_hit(shape: &Shape, path: &[(i32, i32)], radius: f64) -> bool {
    match &shape.kind {
        ShapeKind::Freehand { points } => polyline_hit(points, path, radius),
        ShapeKind::Line { x1, y1, x2, y2 } | ShapeKind::Arrow { x1, y1, x2, y2, .. } => {
            polyline_hit(&[(*x1, *y1), (*x2, *y2)], path, radius)
        }
        ShapeKind::Rect { x, y, w, h, fill } => rect_hit(*x, *y, *w, *h, *fill, path, radius),
        ShapeKind::Ellipse {
            cx,
            cy,
            rx,
            ry,
            fill,
        } => ellipse_hit(*cx, *cy, *rx, *ry, *fill, path, radius),
        ShapeKind::Text { .. } => match shape.bounding_box() {
            Some(bounds) => {
                let inflated = bounds.inflated(radius.ceil() as i32);
                path.iter().any(|&(px, py)| inflated.contains(px, py))
            }
            None => false,
        },
    }
}

/// Any path point within `radius` of any segment of the polyline.
fn polyline_hit(points: &[(i32, i32)], path: &[(i32, i32)], radius: f64) -> bool {
    match points {
        [] => false,
        [single] => path.iter().any(|&(px, py)| {
            point_distance(px as f64, py as f64, single.0 as f64, single.1 as f64) <= radius
        }),
        _ => points.windows(2).any(|segment| {
            let (ax, ay) = segment[0];
            let (bx, by) = segment[1];
            path.iter().any(|&(px, py)| {
                point_segment_distance(
                    px as f64, py as f64, ax as f64, ay as f64, bx as f64, by as f64,
                ) <= radius
            })
        }),
    }
}

fn rect_hit(x: i32, y: i32, w: i32, h: i32, fill: bool, path: &[(i32, i32)], radius: f64) -> bool {
    let (x2, y2) = (x + w, y + h);
    if fill {
        // Filled shapes are solid targets
        let inside = path.iter().any(|&(px, py)| {
            px as f64 >= x as f64 - radius
                && px as f64 <= x2 as f64 + radius
                && py as f64 >= y as f64 - radius
                && py as f64 <= y2 as f64 + radius
        });
        if inside {
            return true;
        }
    }
    // Outline: the four edge segments
    let edges = [
        ((x, y), (x2, y)),
        ((x2, y), (x2, y2)),
        ((x2, y2), (x, y2)),
        ((x, y2), (x, y)),
    ];
    edges.iter().any(|&((ax, ay), (bx, by))| {
        path.iter().any(|&(px, py)| {
            point_segment_distance(px as f64, py as f64, ax as f64, ay as f64, bx as f64, by as f64)
                <= radius
        })
    })
}

fn ellipse_hit(
    cx: i32,
    cy: i32,
    rx: i32,
    ry: i32,
    fill: bool,
    path: &[(i32, i32)],
    radius: f64,
) -> bool {
    if rx == 0 || ry == 0 {
        // Collapsed to a segment (or a point)
        let half_w = rx.max(0);
        let half_h = ry.max(0);
        return polyline_hit(
            &[(cx - half_w, cy - half_h), (cx + half_w, cy + half_h)],
            path,
            radius,
        );
    }

    let rx = rx as f64;
    let ry = ry as f64;
    path.iter().any(|&(px, py)| {
        let u = (px as f64 - cx as f64) / rx;
        let v = (py as f64 - cy as f64) / ry;
        let d = (u * u + v * v).sqrt();
        if fill && d <= 1.0 {
            return true;
        }
        // Approximate distance from the boundary by scaling the normalized
        // radial offset with the smaller radius
        (d - 1.0).abs() * rx.min(ry) <= radius
    })
}

fn point_distance(px: f64, py: f64, qx: f64, qy: f64) -> f64 {
    ((px - qx).powi(2) + (py - qy).powi(2)).sqrt()
}

/// Distance from point P to the closed segment AB.
fn point_segment_distance(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let abx = bx - ax;
    let aby = by - ay;
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return point_distance(px, py, ax, ay);
    }
    let t = (((px - ax) * abx + (py - ay) * aby) / len_sq).clamp(0.0, 1.0);
    point_distance(px, py, ax + t * abx, ay + t * aby)
}
