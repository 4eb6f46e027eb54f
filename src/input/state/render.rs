//! Live rendering and export for the session.

use crate::draw::{
    Shape, ShapeKind, render_freehand_borrowed, render_shape, render_shapes, render_to_surface,
};
use crate::input::Tool;
use crate::util;

use super::{DrawingState, InputState};

impl InputState {
    /// Returns the shape currently being drawn for live preview.
    ///
    /// # Returns
    /// - `Some(Shape)` while a drag tool gesture is in progress
    /// - `None` while idle, erasing, or editing text
    ///
    /// # Note
    /// For the pen (freehand) this clones the points vector. For long
    /// strokes prefer `render_provisional_shape`, which borrows instead.
    pub fn provisional_shape(&self) -> Option<Shape> {
        let DrawingState::Drawing {
            tool,
            start_x,
            start_y,
            cur_x,
            cur_y,
            points,
        } = &self.state
        else {
            return None;
        };

        let kind = match tool {
            Tool::Pen => ShapeKind::Freehand {
                points: points.clone(),
            },
            Tool::Line => ShapeKind::Line {
                x1: *start_x,
                y1: *start_y,
                x2: *cur_x,
                y2: *cur_y,
            },
            Tool::Rect => {
                let (x, y, w, h) = util::normalize_drag(*start_x, *start_y, *cur_x, *cur_y);
                ShapeKind::Rect {
                    x,
                    y,
                    w,
                    h,
                    fill: self.style.fill,
                }
            }
            Tool::Ellipse => {
                let (cx, cy, rx, ry) = util::ellipse_bounds(*start_x, *start_y, *cur_x, *cur_y);
                ShapeKind::Ellipse {
                    cx,
                    cy,
                    rx,
                    ry,
                    fill: self.style.fill,
                }
            }
            Tool::Arrow => ShapeKind::Arrow {
                x1: *start_x,
                y1: *start_y,
                x2: *cur_x,
                y2: *cur_y,
                arrow_length: self.arrow_length,
                arrow_angle: self.arrow_angle,
            },
            Tool::Text | Tool::Eraser => return None,
        };

        Some(Shape::new(
            kind,
            self.style.color,
            self.style.thickness,
            self.style.highlight,
        ))
    }

    /// Renders the provisional shape directly to a Cairo context without
    /// cloning.
    ///
    /// Optimized for freehand drawing: borrows the points vector instead of
    /// cloning it on every frame, preventing quadratic behavior on long
    /// strokes.
    ///
    /// # Returns
    /// `true` if a provisional shape was rendered, `false` otherwise
    pub fn render_provisional_shape(&self, ctx: &cairo::Context) -> bool {
        if let DrawingState::Drawing {
            tool: Tool::Pen,
            points,
            ..
        } = &self.state
        {
            let color = if self.style.highlight {
                self.style
                    .color
                    .scaled_alpha(crate::draw::HIGHLIGHT_ALPHA)
            } else {
                self.style.color
            };
            render_freehand_borrowed(ctx, points, color, self.style.thickness);
            return true;
        }

        if let Some(shape) = self.provisional_shape() {
            render_shape(ctx, &shape);
            return true;
        }
        false
    }

    /// Returns the pending text preview with a trailing caret, if editing.
    pub fn text_preview_shape(&self) -> Option<Shape> {
        let DrawingState::TextInput { x, y, buffer } = &self.state else {
            return None;
        };
        let mut preview = buffer.clone();
        preview.push('_');
        Some(Shape::new(
            ShapeKind::Text {
                x: *x,
                y: *y,
                text: preview,
                size: self.style.font_size,
                font: self.style.font.clone(),
            },
            self.style.color,
            self.style.thickness,
            self.style.highlight,
        ))
    }

    /// Renders the live view: committed shapes plus any in-progress shape
    /// and the pending-text preview.
    pub fn render_live(&self, ctx: &cairo::Context) {
        render_shapes(ctx, self.frame.shapes());
        self.render_provisional_shape(ctx);
        if let Some(preview) = self.text_preview_shape() {
            render_shape(ctx, &preview);
        }
    }

    /// Renders committed shapes only onto a fresh transparent surface.
    ///
    /// Live-preview-only state (in-progress shape, pending text) is
    /// excluded; this is the export path.
    pub fn export_surface(
        &self,
        width: i32,
        height: i32,
    ) -> Result<cairo::ImageSurface, cairo::Error> {
        render_to_surface(self.frame.shapes(), width, height)
    }

    /// Convenience export at the configured screen dimensions.
    pub fn export_screen_surface(&self) -> Result<cairo::ImageSurface, cairo::Error> {
        self.export_surface(self.screen_width as i32, self.screen_height as i32)
    }
}
