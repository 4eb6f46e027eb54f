//! Vector annotation engine for transparent screen overlays.
//!
//! The host application owns the overlay window, toolbar, and raw event
//! capture; this crate owns everything between an abstract input event and a
//! transparent pixel surface: the shape model, tool/modifier state machine,
//! bounded undo history, eraser hit-testing, and Cairo compositing. See
//! [`input::InputState`] for the session entry point.

pub mod draw;
pub mod export;
pub mod input;
pub mod settings;
pub mod util;

pub use input::InputState;
pub use settings::Settings;
