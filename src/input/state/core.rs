//! Drawing state machine and session state management.

use log::debug;

use crate::draw::{Color, FontDescriptor, Frame, Shape, color};
use crate::input::history::{UndoEntry, UndoHistory};
use crate::input::{InputEvent, Tool};
use crate::settings::Settings;

/// Default arrowhead length in pixels.
pub const DEFAULT_ARROW_LENGTH: f64 = 20.0;
/// Default arrowhead angle in degrees.
pub const DEFAULT_ARROW_ANGLE: f64 = 30.0;

/// Current drawing mode state machine.
///
/// Tracks whether the user is idle, actively drawing a shape, or entering
/// text. State transitions occur based on pointer and keyboard events.
#[derive(Debug)]
pub enum DrawingState {
    /// Not actively drawing - waiting for user input
    Idle,
    /// Actively drawing a shape (pointer held down)
    Drawing {
        /// Which tool is being used for this gesture (snapshotted at
        /// pointer-down; tool changes mid-gesture do not affect it)
        tool: Tool,
        /// Starting X coordinate (where the pointer went down)
        start_x: i32,
        /// Starting Y coordinate (where the pointer went down)
        start_y: i32,
        /// Latest pointer X coordinate (second anchor for two-point shapes)
        cur_x: i32,
        /// Latest pointer Y coordinate
        cur_y: i32,
        /// Accumulated points for freehand drawing and the eraser path
        points: Vec<(i32, i32)>,
    },
    /// Text input mode - keystrokes go to the pending buffer until
    /// confirmed or cancelled
    TextInput {
        /// X coordinate where text will be placed
        x: i32,
        /// Y coordinate where text will be placed
        y: i32,
        /// Accumulated text buffer
        buffer: String,
    },
}

/// Which held key produced the current transient override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideSource {
    /// The eraser modifier key (Ctrl)
    EraserKey,
    /// The straight-line modifier key (Shift)
    LineKey,
}

/// Primary tool plus at most one transient override.
///
/// Selecting a tool only ever changes the primary; a held modifier key
/// substitutes the override tool until release, which restores whatever
/// primary is current at that moment.
#[derive(Debug)]
pub struct ToolSelection {
    primary: Tool,
    transient: Option<(Tool, OverrideSource)>,
}

impl ToolSelection {
    /// Creates a selection with the given primary tool and no override.
    pub fn new(primary: Tool) -> Self {
        Self {
            primary,
            transient: None,
        }
    }

    /// The tool pointer gestures will use right now.
    pub fn active(&self) -> Tool {
        match self.transient {
            Some((tool, _)) => tool,
            None => self.primary,
        }
    }

    /// The explicitly selected tool, ignoring any override.
    pub fn primary(&self) -> Tool {
        self.primary
    }

    /// Sets the primary tool. An active override keeps precedence; release
    /// restores the new primary.
    pub fn select(&mut self, tool: Tool) {
        self.primary = tool;
    }

    /// Installs a transient override. The eraser key always wins: it replaces
    /// a line override, while a line override never displaces an eraser one.
    pub fn push_override(&mut self, tool: Tool, source: OverrideSource) {
        if let Some((_, existing)) = self.transient {
            if existing == OverrideSource::EraserKey && source == OverrideSource::LineKey {
                return;
            }
        }
        self.transient = Some((tool, source));
    }

    /// Drops the override if `source` installed it; releasing a key that was
    /// never the source of the current override is a no-op.
    ///
    /// Returns true when an override was actually released.
    pub fn release_override(&mut self, source: OverrideSource) -> bool {
        match self.transient {
            Some((_, active)) if active == source => {
                self.transient = None;
                true
            }
            _ => false,
        }
    }

    /// Returns true while a transient override is installed.
    pub fn override_active(&self) -> bool {
        self.transient.is_some()
    }
}

/// Current drawing style applied to newly committed shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Stroke/fill color
    pub color: Color,
    /// Stroke thickness in pixels; also the eraser brush width
    pub thickness: f64,
    /// Fill closed shapes (rectangle/ellipse) before stroking the outline
    pub fill: bool,
    /// Render new shapes at highlighter opacity
    pub highlight: bool,
    /// Font for text annotations
    pub font: FontDescriptor,
    /// Font size in points for text annotations
    pub font_size: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: color::RED,
            thickness: 3.0,
            fill: false,
            highlight: false,
            font: FontDescriptor::default(),
            font_size: 32.0,
        }
    }
}

impl Style {
    /// Clamps all fields to their valid ranges.
    ///
    /// Thickness 1.0-20.0, font size 8.0-72.0, color components 0.0-1.0.
    pub fn clamped(mut self) -> Self {
        self.thickness = self.thickness.clamp(1.0, 20.0);
        self.font_size = self.font_size.clamp(8.0, 72.0);
        self.color = self.color.clamped();
        self
    }
}

/// Keyboard modifier bookkeeping.
///
/// Tracked continuously (including during text editing, where Shift+Return
/// inserts a line break) even though overrides only engage outside editing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key held
    pub shift: bool,
    /// Ctrl key held
    pub ctrl: bool,
}

/// The annotation session context.
///
/// Owns the shape model, undo history, tool selection, and the drawing state
/// machine. Constructed once at startup (optionally from persisted settings),
/// handed every input event, and snapshotted back into [`Settings`] at
/// shutdown. All mutation runs on the caller's single event-processing
/// thread; each event is handled to completion before the next.
pub struct InputState {
    /// Committed shapes in paint order
    pub frame: Frame,
    /// Bounded undo history over frame mutations
    pub history: UndoHistory,
    /// Primary tool + transient override
    pub tools: ToolSelection,
    /// Style applied to newly committed shapes
    pub style: Style,
    /// Current drawing mode state machine
    pub state: DrawingState,
    /// Current modifier key state
    pub modifiers: Modifiers,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
    /// Arrowhead length in pixels for the arrow tool
    pub arrow_length: f64,
    /// Arrowhead angle in degrees for the arrow tool
    pub arrow_angle: f64,
    /// Screen width in pixels (set by the host after surface configuration)
    pub screen_width: u32,
    /// Screen height in pixels (set by the host after surface configuration)
    pub screen_height: u32,
    /// Shapes removed by the in-progress eraser gesture
    pub(crate) erase_batch: Vec<Shape>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(Tool::Pen, Style::default())
    }
}

impl InputState {
    /// Creates a session with the given initial tool and style.
    ///
    /// Screen dimensions default to 0 and should be updated by the host
    /// after surface configuration (see `update_screen_dimensions`).
    pub fn new(tool: Tool, style: Style) -> Self {
        Self {
            frame: Frame::new(),
            history: UndoHistory::new(),
            tools: ToolSelection::new(tool),
            style: style.clamped(),
            state: DrawingState::Idle,
            modifiers: Modifiers::default(),
            needs_redraw: true,
            arrow_length: DEFAULT_ARROW_LENGTH,
            arrow_angle: DEFAULT_ARROW_ANGLE,
            screen_width: 0,
            screen_height: 0,
            erase_batch: Vec::new(),
        }
    }

    /// Creates a session from a persisted settings snapshot.
    pub fn with_settings(settings: &Settings) -> Self {
        Self::new(settings.tool, settings.to_style())
    }

    /// Captures the persistable subset of the session (tool and style, never
    /// shape data) for the shutdown write.
    pub fn settings_snapshot(&self) -> Settings {
        Settings::capture(self.tools.primary(), &self.style)
    }

    /// Updates screen dimensions after host surface configuration.
    pub fn update_screen_dimensions(&mut self, width: u32, height: u32) {
        self.screen_width = width;
        self.screen_height = height;
    }

    /// Routes one abstract input event through the pipeline.
    ///
    /// Events are processed one at a time; every committed action runs to
    /// completion before this returns.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.on_pointer_down(x, y),
            InputEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            InputEvent::PointerUp { x, y } => self.on_pointer_up(x, y),
            InputEvent::KeyDown(key) => self.on_key_down(key),
            InputEvent::KeyUp(key) => self.on_key_up(key),
        }
    }

    /// Selects the primary tool (toolbar command).
    ///
    /// Has no visible effect while a transient override is held; the
    /// override is restored to the new primary on release.
    pub fn select_tool(&mut self, tool: Tool) {
        self.tools.select(tool);
        self.needs_redraw = true;
        debug!("Primary tool set to {tool:?}");
    }

    /// Replaces the current style (toolbar command), clamping out-of-range
    /// values instead of rejecting them.
    pub fn set_style(&mut self, style: Style) {
        self.style = style.clamped();
        self.needs_redraw = true;
    }

    /// Undoes the most recent committed operation.
    ///
    /// Returns false (a no-op) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.frame);
        if undone {
            self.needs_redraw = true;
        }
        undone
    }

    /// Removes every committed shape as a single undoable operation.
    pub fn clear_all(&mut self) {
        let drained = self.frame.clear();
        if drained.is_empty() {
            return;
        }
        debug!("Clear-all removed {} shapes", drained.len());
        self.history.push(UndoEntry::ShapesErased { shapes: drained });
        self.needs_redraw = true;
    }

    /// The tool pointer gestures will use right now.
    pub fn active_tool(&self) -> Tool {
        if let DrawingState::Drawing { tool, .. } = &self.state {
            *tool
        } else {
            self.tools.active()
        }
    }
}
