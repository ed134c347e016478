//! The vector markup overlay.
//!
//! A [`Markup`] floats above the viewport and lets the host draw
//! annotations through the wrapped 2D engine. The shell's own logic is
//! limited to wheel-zoom bookkeeping; shape rendering is the backend's
//! problem.

use dwg_core::{Subscribable, Trigger};

use crate::{OverlayBackend, PointerEvent, ViewEvent, ViewResult};

/// Smallest zoom factor the overlay accepts.
pub const MIN_ZOOM: f32 = 0.01;

/// Largest zoom factor the overlay accepts.
pub const MAX_ZOOM: f32 = 20.0;

/// Wheel-delta-to-zoom conversion divisor.
const ZOOM_STEP_DIVISOR: f32 = 200.0;

/// Overlay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupOptions {
    /// Overlay width in pixels.
    pub width: u32,
    /// Overlay height in pixels.
    pub height: u32,
    /// Background color as a CSS color string. Transparent by default; a
    /// host debugging overlay placement can pass something visible.
    pub background: String,
    /// Emit verbose lifecycle logging.
    pub debug: bool,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: "rgba(0,0,0,0)".to_owned(),
            debug: false,
        }
    }
}

/// A mounted markup overlay.
pub struct Markup {
    options: MarkupOptions,
    backend: Box<dyn OverlayBackend>,
    zoom: f32,
    trigger: Trigger<ViewEvent>,
}

impl Markup {
    /// Attach an overlay over `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to attach its surface.
    pub fn new(options: MarkupOptions, mut backend: Box<dyn OverlayBackend>) -> ViewResult<Self> {
        backend.attach(options.width, options.height)?;
        if options.debug {
            tracing::debug!(
                width = options.width,
                height = options.height,
                background = %options.background,
                "markup attached"
            );
        }
        Ok(Self {
            options,
            backend,
            zoom: 1.0,
            trigger: Trigger::new(),
        })
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Overlay configuration.
    #[must_use]
    pub fn options(&self) -> &MarkupOptions {
        &self.options
    }

    /// Apply a wheel event: step the zoom by `delta_y / 200`, clamped to
    /// `[0.01, 20]`, push it to the backend, then relay the event.
    ///
    /// # Errors
    ///
    /// Propagates backend and listener failures.
    pub fn handle_wheel(&mut self, event: &PointerEvent) -> ViewResult<()> {
        let zoom = (self.zoom + event.delta_y / ZOOM_STEP_DIVISOR).clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = zoom;
        self.backend.set_zoom(zoom)?;
        self.trigger.emit(&ViewEvent::Pointer(event.clone()))?;
        Ok(())
    }

    /// Relay a pointer event to this overlay's observers.
    ///
    /// # Errors
    ///
    /// Propagates listener failures.
    pub fn handle_pointer(&self, event: &PointerEvent) -> ViewResult<()> {
        if self.options.debug {
            tracing::trace!(phase = ?event.phase, x = event.x, y = event.y, "markup pointer");
        }
        self.trigger.emit(&ViewEvent::Pointer(event.clone()))?;
        Ok(())
    }

    /// Render the overlay and notify `"render"` observers.
    ///
    /// # Errors
    ///
    /// Propagates backend and listener failures.
    pub fn render(&mut self) -> ViewResult<()> {
        self.backend.render()?;
        self.trigger.emit(&ViewEvent::Render)?;
        Ok(())
    }

    /// Resize the overlay surface and notify `"resize"` observers.
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

    /// Remove all overlay content.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub fn clear(&mut self) -> ViewResult<()> {
        self.backend.clear()
    }
}

impl Subscribable for Markup {
    type Event = ViewEvent;

    fn trigger(&self) -> &Trigger<ViewEvent> {
        &self.trigger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullOverlayBackend;

    fn markup() -> Markup {
        Markup::new(MarkupOptions::default(), Box::new(NullOverlayBackend::new()))
            .expect("backend accepts attach")
    }

    #[test]
    fn wheel_steps_the_zoom() {
        let mut markup = markup();
        markup
            .handle_wheel(&PointerEvent::wheel(0.0, 0.0, 100.0))
            .expect("backend accepts zoom");
        assert!((markup.zoom() - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn zoom_is_clamped_to_its_range() {
        let mut markup = markup();
        markup
            .handle_wheel(&PointerEvent::wheel(0.0, 0.0, 100_000.0))
            .expect("backend accepts zoom");
        assert!((markup.zoom() - MAX_ZOOM).abs() < f32::EPSILON);

        markup
            .handle_wheel(&PointerEvent::wheel(0.0, 0.0, -100_000.0))
            .expect("backend accepts zoom");
        assert!((markup.zoom() - MIN_ZOOM).abs() < f32::EPSILON);
    }
}
