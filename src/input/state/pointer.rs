//! Pointer event handling: gesture start, extent updates, and commit.

use log::debug;

use crate::draw::{Shape, ShapeKind, eraser};
use crate::input::Tool;
use crate::input::history::UndoEntry;
use crate::util;

use super::{DrawingState, InputState};

impl InputState {
    /// Processes a pointer-down event.
    ///
    /// # Behavior
    /// - While editing text: commits the pending text (clicking elsewhere
    ///   finalizes the region)
    /// - While idle with the text tool: opens an editable region at the
    ///   click point
    /// - While idle with the eraser: starts an erase gesture and erases at
    ///   the press point immediately
    /// - While idle with a drag tool: records the anchor and enters the
    ///   drawing state
    pub fn on_pointer_down(&mut self, x: i32, y: i32) {
        if matches!(self.state, DrawingState::TextInput { .. }) {
            self.commit_pending_text();
            return;
        }
        if !matches!(self.state, DrawingState::Idle) {
            return;
        }

        let tool = self.tools.active();
        match tool {
            Tool::Text => {
                self.state = DrawingState::TextInput {
                    x,
                    y,
                    buffer: String::new(),
                };
                self.needs_redraw = true;
            }
            Tool::Eraser => {
                self.erase_batch.clear();
                let removed = eraser::erase_along(&mut self.frame, &[(x, y)], self.style.thickness);
                self.erase_batch.extend(removed);
                self.state = DrawingState::Drawing {
                    tool,
                    start_x: x,
                    start_y: y,
                    cur_x: x,
                    cur_y: y,
                    points: vec![(x, y)],
                };
                self.needs_redraw = true;
            }
            tool if tool.is_drag_tool() => {
                self.state = DrawingState::Drawing {
                    tool,
                    start_x: x,
                    start_y: y,
                    cur_x: x,
                    cur_y: y,
                    points: vec![(x, y)],
                };
                self.needs_redraw = true;
            }
            _ => {}
        }
    }

    /// Processes pointer motion events.
    ///
    /// Updates the in-progress shape's extent: the pen appends a sampled
    /// point, two-anchor tools move their second anchor, and the eraser
    /// sweeps the segment from the previous to the current position.
    pub fn on_pointer_move(&mut self, x: i32, y: i32) {
        let erase_from = match &mut self.state {
            DrawingState::Drawing {
                tool,
                cur_x,
                cur_y,
                points,
                ..
            } => {
                let prev = (*cur_x, *cur_y);
                *cur_x = x;
                *cur_y = y;
                match tool {
                    Tool::Pen => {
                        points.push((x, y));
                        None
                    }
                    Tool::Eraser => {
                        points.push((x, y));
                        Some(prev)
                    }
                    _ => None,
                }
            }
            _ => return,
        };

        if let Some((px, py)) = erase_from {
            let removed = eraser::erase_along(
                &mut self.frame,
                &[(px, py), (x, y)],
                self.style.thickness,
            );
            self.erase_batch.extend(removed);
        }
        self.needs_redraw = true;
    }

    /// Processes a pointer-up event.
    ///
    /// Finalizes the gesture: an eraser gesture commits its accumulated
    /// batch as one undo entry; a drag tool builds its shape, discarding it
    /// if degenerate, otherwise adding it to the frame and recording the
    /// undo entry.
    pub fn on_pointer_up(&mut self, x: i32, y: i32) {
        let state = std::mem::replace(&mut self.state, DrawingState::Idle);
        let DrawingState::Drawing {
            tool,
            start_x,
            start_y,
            mut points,
            ..
        } = state
        else {
            // Pointer-up is meaningless while idle or editing text
            self.state = state;
            return;
        };

        self.needs_redraw = true;

        if tool == Tool::Eraser {
            let removed = eraser::erase_along(&mut self.frame, &[(x, y)], self.style.thickness);
            self.erase_batch.extend(removed);
            self.finish_erase_gesture();
            return;
        }

        let shape = match tool {
            Tool::Pen => {
                if points.last() != Some(&(x, y)) {
                    points.push((x, y));
                }
                Shape::new(
                    ShapeKind::Freehand { points },
                    self.style.color,
                    self.style.thickness,
                    self.style.highlight,
                )
            }
            Tool::Line => Shape::new(
                ShapeKind::Line {
                    x1: start_x,
                    y1: start_y,
                    x2: x,
                    y2: y,
                },
                self.style.color,
                self.style.thickness,
                self.style.highlight,
            ),
            Tool::Rect => {
                let (rx, ry, w, h) = util::normalize_drag(start_x, start_y, x, y);
                Shape::new(
                    ShapeKind::Rect {
                        x: rx,
                        y: ry,
                        w,
                        h,
                        fill: self.style.fill,
                    },
                    self.style.color,
                    self.style.thickness,
                    self.style.highlight,
                )
            }
            Tool::Ellipse => {
                let (cx, cy, rx, ry) = util::ellipse_bounds(start_x, start_y, x, y);
                Shape::new(
                    ShapeKind::Ellipse {
                        cx,
                        cy,
                        rx,
                        ry,
                        fill: self.style.fill,
                    },
                    self.style.color,
                    self.style.thickness,
                    self.style.highlight,
                )
            }
            Tool::Arrow => Shape::new(
                ShapeKind::Arrow {
                    x1: start_x,
                    y1: start_y,
                    x2: x,
                    y2: y,
                    arrow_length: self.arrow_length,
                    arrow_angle: self.arrow_angle,
                },
                self.style.color,
                self.style.thickness,
                self.style.highlight,
            ),
            Tool::Text | Tool::Eraser => return,
        };

        self.commit_shape(shape);
    }

    /// Adds a finished shape to the frame unless it is degenerate.
    ///
    /// Degenerate shapes (accidental clicks) are discarded without touching
    /// the model or the undo history.
    pub(super) fn commit_shape(&mut self, shape: Shape) {
        if shape.is_degenerate() {
            debug!("Discarding degenerate shape commit");
            return;
        }
        let seq = self.frame.add(shape);
        self.history.push(UndoEntry::ShapeAdded { seq });
    }

    /// Commits the accumulated erase batch as a single undo entry.
    ///
    /// A gesture that touched nothing leaves no trace in history.
    pub(super) fn finish_erase_gesture(&mut self) {
        if self.erase_batch.is_empty() {
            return;
        }
        let mut shapes = std::mem::take(&mut self.erase_batch);
        shapes.sort_by_key(|shape| shape.seq);
        debug!("Erase gesture removed {} shapes", shapes.len());
        self.history.push(UndoEntry::ShapesErased { shapes });
    }
}
