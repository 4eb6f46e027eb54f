//! Keyboard event handling: modifier overrides, text editing, shortcuts.

use log::debug;

use crate::draw::{Shape, ShapeKind};
use crate::input::Tool;
use crate::input::events::Key;

use super::{DrawingState, InputState, OverrideSource};

/// Upper bound on the pending text buffer; further characters are dropped.
const MAX_TEXT_LEN: usize = 10_000;

impl InputState {
    /// Processes a key press event.
    ///
    /// Modifier keys install transient tool overrides (Ctrl = eraser, any
    /// tool; Shift = straight line, only while the pen is idle). While a
    /// text region is being edited, all other keystrokes are consumed by the
    /// pending buffer. Outside editing, Escape cancels an in-progress
    /// gesture, Ctrl+Z undoes, and `c` clears the canvas.
    pub fn on_key_down(&mut self, key: Key) {
        let editing = matches!(self.state, DrawingState::TextInput { .. });

        match key {
            Key::Shift => {
                self.modifiers.shift = true;
                if !editing
                    && matches!(self.state, DrawingState::Idle)
                    && self.tools.active() == Tool::Pen
                {
                    self.tools.push_override(Tool::Line, OverrideSource::LineKey);
                    self.needs_redraw = true;
                }
                return;
            }
            Key::Ctrl => {
                self.modifiers.ctrl = true;
                if !editing {
                    self.tools
                        .push_override(Tool::Eraser, OverrideSource::EraserKey);
                    self.needs_redraw = true;
                }
                return;
            }
            _ => {}
        }

        if editing {
            self.handle_text_key(key);
            return;
        }

        match key {
            Key::Escape => self.cancel_gesture(),
            Key::Char(c) if self.modifiers.ctrl && c.eq_ignore_ascii_case(&'z') => {
                self.undo();
            }
            Key::Char(c) if !self.modifiers.ctrl && c.eq_ignore_ascii_case(&'c') => {
                self.clear_all();
            }
            _ => {}
        }
    }

    /// Processes a key release event.
    ///
    /// Releasing the key that installed the current override restores the
    /// primary tool; releasing any other key is a no-op for tool selection.
    pub fn on_key_up(&mut self, key: Key) {
        match key {
            Key::Shift => {
                self.modifiers.shift = false;
                if self.tools.release_override(OverrideSource::LineKey) {
                    self.needs_redraw = true;
                }
            }
            Key::Ctrl => {
                self.modifiers.ctrl = false;
                if self.tools.release_override(OverrideSource::EraserKey) {
                    self.needs_redraw = true;
                }
            }
            _ => {}
        }
    }

    /// Consumes a keystroke while a text region is being edited.
    fn handle_text_key(&mut self, key: Key) {
        match key {
            Key::Return if self.modifiers.shift => self.push_text_char('\n'),
            Key::Return => self.commit_pending_text(),
            Key::Escape => {
                // Discard the pending text without touching the model
                self.state = DrawingState::Idle;
                self.needs_redraw = true;
            }
            Key::Backspace => {
                if let DrawingState::TextInput { buffer, .. } = &mut self.state {
                    buffer.pop();
                    self.needs_redraw = true;
                }
            }
            Key::Space => self.push_text_char(' '),
            Key::Char(c) => self.push_text_char(c),
            _ => {}
        }
    }

    fn push_text_char(&mut self, c: char) {
        if let DrawingState::TextInput { buffer, .. } = &mut self.state {
            if buffer.len() + c.len_utf8() > MAX_TEXT_LEN {
                return;
            }
            buffer.push(c);
            self.needs_redraw = true;
        }
    }

    /// Commits the pending text region as a Text shape.
    ///
    /// Trims surrounding whitespace; an empty result cancels the region
    /// without mutating the model or history.
    pub(super) fn commit_pending_text(&mut self) {
        let state = std::mem::replace(&mut self.state, DrawingState::Idle);
        let DrawingState::TextInput { x, y, buffer } = state else {
            self.state = state;
            return;
        };

        self.needs_redraw = true;

        let text = buffer.trim();
        if text.is_empty() {
            debug!("Pending text empty after trim, cancelling");
            return;
        }

        let shape = Shape::new(
            ShapeKind::Text {
                x,
                y,
                text: text.to_string(),
                size: self.style.font_size,
                font: self.style.font.clone(),
            },
            self.style.color,
            self.style.thickness,
            self.style.highlight,
        );
        self.commit_shape(shape);
    }

    /// Cancels an in-progress drawing gesture.
    ///
    /// A draw gesture is discarded outright. An eraser gesture has already
    /// mutated the model, so its batch is finalized instead of lost - the
    /// erasure stays undoable.
    fn cancel_gesture(&mut self) {
        if let DrawingState::Drawing { tool, .. } = &self.state {
            if *tool == Tool::Eraser {
                self.finish_erase_gesture();
            } else {
                self.erase_batch.clear();
            }
            self.state = DrawingState::Idle;
            self.needs_redraw = true;
        }
    }
}
