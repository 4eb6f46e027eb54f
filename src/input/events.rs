//! Generic input event types for cross-backend compatibility.

/// Generic key representation for cross-backend compatibility.
///
/// The host input-capture layer maps its native key codes to these generic
/// key values before handing them to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    /// Escape key
    Escape,
    /// Return/Enter key
    Return,
    /// Backspace key
    Backspace,
    /// Space bar
    Space,
    /// Shift modifier (straight-line override while Pen is idle)
    Shift,
    /// Ctrl modifier (eraser override)
    Ctrl,
    /// Unmapped or unrecognized key
    Unknown,
}

/// One abstract input event delivered to the engine.
///
/// The engine never reads hardware or windowing-system events directly; the
/// host translates them into this envelope and feeds them one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Primary pointer button pressed at (x, y)
    PointerDown { x: i32, y: i32 },
    /// Pointer moved to (x, y) (delivered regardless of button state)
    PointerMove { x: i32, y: i32 },
    /// Primary pointer button released at (x, y)
    PointerUp { x: i32, y: i32 },
    /// Key pressed
    KeyDown(Key),
    /// Key released
    KeyUp(Key),
}
