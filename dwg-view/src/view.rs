//! The viewport shell.
//!
//! A [`View`] mounts one drawing viewport: it owns the data [`Model`],
//! the seam to the wrapped scene engine and a trigger consumers observe.
//! Scene construction and camera math stay behind the backend.

use serde::{Deserialize, Serialize};

use dwg_core::{Model, Subscribable, Trigger};

use crate::{CameraConfig, KeyEvent, PointerEvent, SceneBackend, ViewEvent, ViewResult};

/// Which wrapped engine drives the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    /// 2D drawing engine.
    #[serde(rename = "2d")]
    TwoD,
    /// 3D scene-graph engine.
    #[serde(rename = "3d")]
    ThreeD,
}

/// Viewport configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Camera defaults handed to the backend.
    pub camera: CameraConfig,
    /// Emit verbose lifecycle logging.
    pub debug: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            camera: CameraConfig::default(),
            debug: false,
        }
    }
}

/// A mounted viewport.
///
/// Both modes share one shell; the mode only tells the host which engine
/// it plugged in. Consumers subscribe to `"render"`, `"resize"` and the
/// relayed pointer/key events; drawing content lives in the [`Model`].
pub struct View {
    mode: ViewMode,
    options: ViewOptions,
    backend: Box<dyn SceneBackend>,
    model: Model,
    trigger: Trigger<ViewEvent>,
}

impl View {
    /// Mount a 2D viewport over `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to initialize.
    pub fn two_d(options: ViewOptions, backend: Box<dyn SceneBackend>) -> ViewResult<Self> {
        Self::mount(ViewMode::TwoD, options, backend)
    }

    /// Mount a 3D viewport over `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to initialize.
    pub fn three_d(options: ViewOptions, backend: Box<dyn SceneBackend>) -> ViewResult<Self> {
        Self::mount(ViewMode::ThreeD, options, backend)
    }

    fn mount(
        mode: ViewMode,
        options: ViewOptions,
        mut backend: Box<dyn SceneBackend>,
    ) -> ViewResult<Self> {
        backend.init(options.width, options.height, &options.camera)?;
        if options.debug {
            tracing::debug!(?mode, width = options.width, height = options.height, "view mounted");
        }
        Ok(Self {
            mode,
            options,
            backend,
            model: Model::new(),
            trigger: Trigger::new(),
        })
    }

    /// Which engine mode this viewport was mounted with.
    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Current viewport size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.options.width, self.options.height)
    }

    /// The drawing content of this viewport.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Render one frame and notify `"render"` observers.
    ///
    /// # Errors
    ///
    /// Propagates backend and listener failures.
    pub fn render(&mut self) -> ViewResult<()> {
        self.backend.render()?;
        self.trigger.emit(&ViewEvent::Render)?;
        Ok(())
    }

    /// Resize the viewport and notify `"resize"` observers.
    ///
    /// # Errors
    ///
    /// Propagates backend and listener failures.
    pub fn resize(&mut self, width: u32, height: u32) -> ViewResult<()> {
        self.options.width = width;
        self.options.height = height;
        self.backend.resize(width, height)?;
        self.trigger.emit(&ViewEvent::Resize { width, height })?;
        Ok(())
    }

    /// Relay a pointer event to this viewport's observers.
    ///
    /// # Errors
    ///
    /// Propagates listener failures.
    pub fn handle_pointer(&self, event: &PointerEvent) -> ViewResult<()> {
        if self.options.debug {
            tracing::trace!(phase = ?event.phase, x = event.x, y = event.y, "view pointer");
        }
        self.trigger.emit(&ViewEvent::Pointer(event.clone()))?;
        Ok(())
    }

    /// Relay a keyboard event to this viewport's observers.
    ///
    /// # Errors
    ///
    /// Propagates listener failures.
    pub fn handle_key(&self, event: &KeyEvent) -> ViewResult<()> {
        self.trigger.emit(&ViewEvent::Key(event.clone()))?;
        Ok(())
    }
}

impl Subscribable for View {
    type Event = ViewEvent;

    fn trigger(&self) -> &Trigger<ViewEvent> {
        &self.trigger
    }
}
