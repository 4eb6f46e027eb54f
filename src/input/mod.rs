//! Input handling and tool state machine.
//!
//! This module translates abstract pointer and keyboard events into drawing
//! actions. It maintains the current tool selection (primary + transient
//! override), drawing style, undo history, and the state machine for the
//! different drawing modes (idle, drawing, text input).

pub mod events;
pub mod history;
pub mod state;
pub mod tool;

// Re-export commonly used types at module level
pub use events::{InputEvent, Key};
pub use history::{MAX_UNDO_ENTRIES, UndoEntry, UndoHistory};
pub use state::{DrawingState, InputState, Style, ToolSelection};
pub use tool::Tool;
