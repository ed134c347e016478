//! Rendering backend seams.
//!
//! The viewer delegates all drawing to wrapped engines: a scene-graph
//! engine for the viewport and a 2D vector engine for the markup
//! overlay. These traits are the only surface the shell talks to; the
//! crate ships null implementations for tests and headless hosts.

use std::sync::{Arc, Mutex, PoisonError};

use crate::ViewResult;

/// Camera configuration handed to a scene backend on init.
///
/// Plain data only: the camera math belongs to the wrapped engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view, in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Initial camera position.
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 20_000.0,
            position: [0.0, 150.0, 400.0],
        }
    }
}

/// Seam to the wrapped scene-graph engine.
pub trait SceneBackend: Send {
    /// Set up the engine for a viewport of the given size.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be initialized.
    fn init(&mut self, width: u32, height: u32, camera: &CameraConfig) -> ViewResult<()>;

    /// Render one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self) -> ViewResult<()>;

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> ViewResult<()>;
}

/// Seam to the wrapped 2D vector engine backing the markup overlay.
pub trait OverlayBackend: Send {
    /// Attach the overlay surface at the given size.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be created.
    fn attach(&mut self, width: u32, height: u32) -> ViewResult<()>;

    /// Apply a zoom factor to the overlay.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the zoom.
    fn set_zoom(&mut self, zoom: f32) -> ViewResult<()>;

    /// Render the overlay.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self) -> ViewResult<()>;

    /// Resize the overlay surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> ViewResult<()>;

    /// Remove all overlay content.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails to clear.
    fn clear(&mut self) -> ViewResult<()>;
}

/// Shared call log used by the null backends.
pub type CallLog = Arc<Mutex<Vec<String>>>;

fn push(log: &CallLog, call: String) {
    log.lock().unwrap_or_else(PoisonError::into_inner).push(call);
}

/// Scene backend that renders nothing and records the calls it receives.
#[derive(Debug, Default)]
pub struct NullSceneBackend {
    log: CallLog,
}

impl NullSceneBackend {
    /// Create a backend with its own call log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend recording into `log`.
    #[must_use]
    pub fn with_log(log: CallLog) -> Self {
        Self { log }
    }

    /// Handle to the call log.
    #[must_use]
    pub fn log(&self) -> CallLog {
        Arc::clone(&self.log)
    }
}

impl SceneBackend for NullSceneBackend {
    fn init(&mut self, width: u32, height: u32, camera: &CameraConfig) -> ViewResult<()> {
        push(
            &self.log,
            format!("init {width}x{height} fov={}", camera.fov_degrees),
        );
        Ok(())
    }

    fn render(&mut self) -> ViewResult<()> {
        push(&self.log, "render".to_owned());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> ViewResult<()> {
        push(&self.log, format!("resize {width}x{height}"));
        Ok(())
    }
}

/// Overlay backend that draws nothing and records the calls it receives.
#[derive(Debug, Default)]
pub struct NullOverlayBackend {
    log: CallLog,
}

impl NullOverlayBackend {
    /// Create a backend with its own call log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend recording into `log`.
    #[must_use]
    pub fn with_log(log: CallLog) -> Self {
        Self { log }
    }

    /// Handle to the call log.
    #[must_use]
    pub fn log(&self) -> CallLog {
        Arc::clone(&self.log)
    }
}

impl OverlayBackend for NullOverlayBackend {
    fn attach(&mut self, width: u32, height: u32) -> ViewResult<()> {
        push(&self.log, format!("attach {width}x{height}"));
        Ok(())
    }

    fn set_zoom(&mut self, zoom: f32) -> ViewResult<()> {
        push(&self.log, format!("zoom {zoom}"));
        Ok(())
    }

    fn render(&mut self) -> ViewResult<()> {
        push(&self.log, "render".to_owned());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> ViewResult<()> {
        push(&self.log, format!("resize {width}x{height}"));
        Ok(())
    }

    fn clear(&mut self) -> ViewResult<()> {
        push(&self.log, "clear".to_owned());
        Ok(())
    }
}
