//! Interaction wiring between the viewport and the markup overlay.

use dwg_core::{Subscribable, Trigger};

use crate::{Markup, PointerEvent, PointerPhase, View, ViewEvent, ViewResult};

/// Interaction configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlOptions {
    /// Log each dispatched event.
    pub debug: bool,
}

/// Relays host input into the viewport and the overlay.
///
/// The host wires its native event listeners to one dispatch call; the
/// control fans each event out — viewport first, then overlay — and
/// re-emits it on its own trigger for observers that want the combined
/// stream.
pub struct Control {
    options: ControlOptions,
    trigger: Trigger<ViewEvent>,
}

impl Control {
    /// Create a control with the given options.
    #[must_use]
    pub fn new(options: ControlOptions) -> Self {
        Self {
            options,
            trigger: Trigger::new(),
        }
    }

    /// Fan a pointer event out to the viewport, then the overlay.
    ///
    /// Wheel events reach the overlay through its zoom handling; all
    /// other phases are relayed as-is.
    ///
    /// # Errors
    ///
    /// Fail-fast: the first backend or listener failure stops the
    /// dispatch.
    pub fn dispatch_pointer(
        &self,
        view: &View,
        markup: Option<&mut Markup>,
        event: &PointerEvent,
    ) -> ViewResult<()> {
        if self.options.debug {
            tracing::debug!(phase = ?event.phase, x = event.x, y = event.y, "dispatch pointer");
        }
        view.handle_pointer(event)?;
        if let Some(markup) = markup {
            match event.phase {
                PointerPhase::Wheel => markup.handle_wheel(event)?,
                _ => markup.handle_pointer(event)?,
            }
        }
        self.trigger.emit(&ViewEvent::Pointer(event.clone()))?;
        Ok(())
    }
}

impl Subscribable for Control {
    type Event = ViewEvent;

    fn trigger(&self) -> &Trigger<ViewEvent> {
        &self.trigger
    }
}
