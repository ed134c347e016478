//! # dwg-view
//!
//! The viewport shell for dwg-viewer: thin orchestration around wrapped
//! rendering engines, communicating exclusively through `dwg-core`
//! triggers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  Manager                    │
//! ├──────────────┬───────────────┬──────────────┤
//! │  View        │  Markup       │  Control     │
//! │  - model     │  - zoom       │  - pointer   │
//! │  - render    │  - overlay    │    fan-out   │
//! ├──────────────┴───────────────┴──────────────┤
//! │  SceneBackend   │   OverlayBackend          │
//! │  (wrapped 3D/2D engine seams)               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The shell contains no rendering of its own: every draw call crosses a
//! backend trait, and every state change surfaces as an event.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod control;
pub mod error;
pub mod input;
pub mod manager;
pub mod markup;
pub mod view;

pub use backend::{
    CallLog, CameraConfig, NullOverlayBackend, NullSceneBackend, OverlayBackend, SceneBackend,
};
pub use control::{Control, ControlOptions};
pub use error::{ViewError, ViewResult};
pub use input::{KeyEvent, PointerEvent, PointerPhase, TouchPoint, ViewEvent};
pub use manager::{Manager, ManagerOptions, PluginOptions};
pub use markup::{Markup, MarkupOptions, MAX_ZOOM, MIN_ZOOM};
pub use view::{View, ViewMode, ViewOptions};

/// View crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
