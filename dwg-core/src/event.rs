//! Event contract shared by every notifying component.

/// Reserved wildcard subscription tag.
///
/// A listener registered under `"all"` is invoked for every emission,
/// after the type-specific listeners of that emission. Emitters never
/// declare `"all"` as an event's own type.
pub const ALL: &str = "all";

/// A value that can be dispatched through a [`Trigger`](crate::Trigger).
///
/// Events are routed by a string tag. Components define their own event
/// enums and map each variant to its tag:
///
/// ```
/// use dwg_core::Event;
///
/// #[derive(Clone)]
/// enum SelectionEvent {
///     Picked { id: u32 },
///     Cleared,
/// }
///
/// impl Event for SelectionEvent {
///     fn event_type(&self) -> &str {
///         match self {
///             SelectionEvent::Picked { .. } => "picked",
///             SelectionEvent::Cleared => "cleared",
///         }
///     }
/// }
/// ```
pub trait Event {
    /// The string tag classifying this event.
    fn event_type(&self) -> &str;
}
