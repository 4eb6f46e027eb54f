mod core;
mod keys;
mod pointer;
mod render;

pub use core::{
    DEFAULT_ARROW_ANGLE, DEFAULT_ARROW_LENGTH, DrawingState, InputState, Modifiers,
    OverrideSource, Style, ToolSelection,
};
