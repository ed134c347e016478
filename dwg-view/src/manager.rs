//! The viewer assembly.
//!
//! A [`Manager`] is the host page's single entry point: it mounts the
//! viewport in the requested mode, optionally the markup overlay and the
//! interaction control, and exposes dispatch and lifecycle calls that
//! fan out to all of them.

use dwg_core::{Subscribable, Trigger};

use crate::{
    Control, ControlOptions, KeyEvent, Markup, MarkupOptions, NullOverlayBackend, OverlayBackend,
    PointerEvent, SceneBackend, View, ViewEvent, ViewMode, ViewOptions, ViewResult,
};

/// Which optional plugins the manager mounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PluginOptions {
    /// Mount the markup overlay and interaction control.
    pub markup: bool,
    /// Mount the measure plugin. Accepted for forward compatibility;
    /// no measure implementation ships yet.
    pub measure: bool,
}

/// Viewer configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerOptions {
    /// Which engine mode to mount. 2D unless the host asks for 3D.
    pub mode: Option<ViewMode>,
    /// Optional plugins.
    pub plugins: PluginOptions,
    /// Viewport configuration.
    pub view: ViewOptions,
    /// Markup overlay configuration.
    pub markup: MarkupOptions,
    /// Emit verbose lifecycle logging across all mounted components.
    pub debug: bool,
}

/// An assembled viewer.
pub struct Manager {
    options: ManagerOptions,
    view: View,
    markup: Option<Markup>,
    control: Control,
    trigger: Trigger<ViewEvent>,
}

impl Manager {
    /// Mount a viewer from explicit options and backends.
    ///
    /// `overlay_backend` is used only when `options.plugins.markup` is
    /// set; a markup request without a backend gets a null overlay and a
    /// warning rather than an error, matching the shell's permissive
    /// options policy.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend fails to initialize.
    pub fn new(
        mut options: ManagerOptions,
        scene_backend: Box<dyn SceneBackend>,
        overlay_backend: Option<Box<dyn OverlayBackend>>,
    ) -> ViewResult<Self> {
        if options.debug {
            options.view.debug = true;
            options.markup.debug = true;
        }
        let mode = options.mode.unwrap_or(ViewMode::TwoD);
        let view = match mode {
            ViewMode::TwoD => View::two_d(options.view.clone(), scene_backend)?,
            ViewMode::ThreeD => View::three_d(options.view.clone(), scene_backend)?,
        };

        let markup = if options.plugins.markup {
            let backend = overlay_backend.unwrap_or_else(|| {
                tracing::warn!("markup requested without an overlay backend, drawing nothing");
                Box::new(NullOverlayBackend::new())
            });
            Some(Markup::new(options.markup.clone(), backend)?)
        } else {
            None
        };

        if options.plugins.measure {
            tracing::warn!("measure plugin is not available");
        }

        let control = Control::new(ControlOptions {
            debug: options.debug,
        });

        Ok(Self {
            options,
            view,
            markup,
            control,
            trigger: Trigger::new(),
        })
    }

    /// The viewer configuration it was mounted with.
    #[must_use]
    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    /// The mounted viewport.
    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// The mounted viewport, mutably.
    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// The markup overlay, when mounted.
    #[must_use]
    pub fn markup(&self) -> Option<&Markup> {
        self.markup.as_ref()
    }

    /// The markup overlay, mutably, when mounted.
    pub fn markup_mut(&mut self) -> Option<&mut Markup> {
        self.markup.as_mut()
    }

    /// The interaction control.
    #[must_use]
    pub fn control(&self) -> &Control {
        &self.control
    }

    /// Relay a host pointer event into the viewport and overlay, then
    /// surface it on the manager's own trigger.
    ///
    /// # Errors
    ///
    /// Fail-fast: the first backend or listener failure stops the
    /// dispatch.
    pub fn dispatch_pointer(&mut self, event: &PointerEvent) -> ViewResult<()> {
        self.control
            .dispatch_pointer(&self.view, self.markup.as_mut(), event)?;
        self.trigger.emit(&ViewEvent::Pointer(event.clone()))?;
        Ok(())
    }

    /// Relay a host keyboard event into the viewport, then surface it on
    /// the manager's own trigger.
    ///
    /// # Errors
    ///
    /// Propagates listener failures.
    pub fn dispatch_key(&mut self, event: &KeyEvent) -> ViewResult<()> {
        self.view.handle_key(event)?;
        self.trigger.emit(&ViewEvent::Key(event.clone()))?;
        Ok(())
    }

    /// Render the viewport and, when mounted, the overlay.
    ///
    /// # Errors
    ///
    /// Propagates backend and listener failures.
    pub fn render(&mut self) -> ViewResult<()> {
        self.view.render()?;
        if let Some(markup) = self.markup.as_mut() {
            markup.render()?;
        }
        Ok(())
    }

    /// Resize every mounted surface.
    ///
    /// # Errors
    ///
    /// Propagates backend and listener failures.
    pub fn resize(&mut self, width: u32, height: u32) -> ViewResult<()> {
        self.view.resize(width, height)?;
        if let Some(markup) = self.markup.as_mut() {
            markup.resize(width, height)?;
        }
        Ok(())
    }
}

impl Subscribable for Manager {
    type Event = ViewEvent;

    fn trigger(&self) -> &Trigger<ViewEvent> {
        &self.trigger
    }
}
