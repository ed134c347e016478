//! Input events relayed into the viewport.
//!
//! The host page normalizes its native mouse/touch/keyboard events into
//! these records; the shell only routes them. No cross-browser
//! normalization happens here.

use serde::{Deserialize, Serialize};

use dwg_core::Event;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button or finger down.
    Down,
    /// Pointer moved.
    Move,
    /// Button or finger up.
    Up,
    /// Wheel scrolled.
    Wheel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position in client coordinates.
    pub x: f32,
    /// Y position in client coordinates.
    pub y: f32,
}

/// A pointer event, covering mouse and touch input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position in client coordinates.
    pub x: f32,
    /// Y position in client coordinates.
    pub y: f32,
    /// Mouse button, if any.
    pub button: Option<u8>,
    /// Wheel delta along the scroll axis (wheel phase only).
    pub delta_y: f32,
    /// Active touch points, if this came from a touch device.
    pub touches: Vec<TouchPoint>,
}

impl PointerEvent {
    /// Create a pointer event at a client position.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            button: None,
            delta_y: 0.0,
            touches: Vec::new(),
        }
    }

    /// Create a wheel event with a scroll delta.
    #[must_use]
    pub fn wheel(x: f32, y: f32, delta_y: f32) -> Self {
        Self {
            delta_y,
            ..Self::new(PointerPhase::Wheel, x, y)
        }
    }

    /// The client point of this event: the first touch point when
    /// touches are present, the pointer position otherwise.
    #[must_use]
    pub fn client_point(&self) -> (f32, f32) {
        match self.touches.first() {
            Some(touch) => (touch.x, touch.y),
            None => (self.x, self.y),
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name, as reported by the host.
    pub key: String,
    /// `true` on key down, `false` on key up.
    pub pressed: bool,
}

/// Events dispatched by the viewport shell and its overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewEvent {
    /// Pointer input relayed into the viewport.
    Pointer(PointerEvent),
    /// Keyboard input relayed into the viewport.
    Key(KeyEvent),
    /// A frame was rendered.
    Render,
    /// The viewport changed size.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}

impl Event for ViewEvent {
    fn event_type(&self) -> &str {
        match self {
            ViewEvent::Pointer(pointer) => match pointer.phase {
                PointerPhase::Down => "mousedown",
                PointerPhase::Move => "mousemove",
                PointerPhase::Up => "mouseup",
                PointerPhase::Wheel => "wheel",
            },
            ViewEvent::Key(key) => {
                if key.pressed {
                    "keydown"
                } else {
                    "keyup"
                }
            }
            ViewEvent::Render => "render",
            ViewEvent::Resize { .. } => "resize",
        }
    }
}
