//! Drawing tool selection.

use serde::{Deserialize, Serialize};

/// Drawing tool selection.
///
/// The active tool determines what happens when the user drags the pointer.
/// Tools are selected explicitly (toolbar command) or substituted temporarily
/// through a modifier-key override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand drawing - follows the pointer path (default)
    Pen,
    /// Straight line between start and end points
    Line,
    /// Rectangle from corner to corner
    Rect,
    /// Ellipse inscribed in the drag box
    Ellipse,
    /// Arrow with directional head at the start point
    Arrow,
    /// Text placement - click to open an editable region
    Text,
    /// Eraser - removes shapes the pointer sweeps over
    Eraser,
}

impl Tool {
    /// Tools that draw a shape by dragging between pointer-down and
    /// pointer-up.
    pub fn is_drag_tool(&self) -> bool {
        matches!(
            self,
            Tool::Pen | Tool::Line | Tool::Rect | Tool::Ellipse | Tool::Arrow
        )
    }
}

impl Default for Tool {
    fn default() -> Self {
        Tool::Pen
    }
}
