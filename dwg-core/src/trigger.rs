//! `Trigger<E>` — the synchronous event-notification mechanism.
//!
//! Every component in the viewer communicates through a `Trigger`: named
//! listeners, a catch-all `"all"` channel, one-shot registrations and
//! removal by listener identity.
//!
//! Snapshot-on-emit semantics:
//!   - A listener removed *during* emission is still called in that pass.
//!   - A listener added *during* emission is NOT called until the next emit.
//!   - A one-shot listener is removed from the live registry before its
//!     callback runs, so a reentrant emission of the same type inside the
//!     callback cannot invoke it a second time.
//!
//! All methods take `&self` (interior mutability via `std::sync::RwLock`),
//! and the lock is never held while a callback runs, so listeners may call
//! `on()`/`off()`/`emit()` freely during dispatch.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{DwgResult, Event, ALL};

/// Closure type for event listeners.
///
/// The [`Context`] the listener was registered with is passed as the first
/// argument. Errors abort the remaining dispatch of the current emission.
pub type ListenerFn<E> = dyn Fn(&Context, &E) -> DwgResult<()> + Send + Sync;

/// Shared handle to a listener callback.
///
/// Identity — used for deduplication and for removal via
/// [`Trigger::off`] — is the underlying allocation: clones of one
/// `Callback` are the same listener, two separate `Callback::new` calls
/// are distinct listeners even when built from identical closures.
pub struct Callback<E>(Arc<ListenerFn<E>>);

impl<E> Callback<E> {
    /// Wrap a closure as a shared callback handle.
    pub fn new(f: impl Fn(&Context, &E) -> DwgResult<()> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the callback with its registered context.
    ///
    /// # Errors
    ///
    /// Propagates whatever the underlying closure returns.
    pub fn call(&self, context: &Context, event: &E) -> DwgResult<()> {
        (self.0)(context, event)
    }

    /// Whether `self` and `other` are handles to the same callback.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0).cast::<()>(),
            Arc::as_ptr(&other.0).cast::<()>(),
        )
    }
}

impl<E> Clone for Callback<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> fmt::Debug for Callback<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// The binding-context half of a listener's identity.
///
/// Plays the role of a subscription receiver: registering one callback
/// with two different contexts yields two independent listeners. The
/// context is handed back to the callback on every invocation and can be
/// recovered with [`Context::downcast_ref`].
#[derive(Clone, Default)]
pub struct Context(Option<Arc<dyn Any + Send + Sync>>);

impl Context {
    /// The empty context. All empty contexts share one identity.
    #[must_use]
    pub fn none() -> Self {
        Self(None)
    }

    /// Wrap a value as a context. Each call produces a fresh identity;
    /// clone the `Context` to register several listeners against it.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// Borrow the wrapped value, if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|any| any.downcast_ref::<T>())
    }

    /// Whether this is the empty context.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Whether `self` and `other` share one identity.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::eq(
                Arc::as_ptr(a).cast::<()>(),
                Arc::as_ptr(b).cast::<()>(),
            ),
            _ => false,
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("Context(none)"),
            Some(a) => f
                .debug_tuple("Context")
                .field(&Arc::as_ptr(a).cast::<()>())
                .finish(),
        }
    }
}

/// One registration. `once` entries are removed from the live registry by
/// the dispatcher before their callback runs; identity for deduplication
/// and removal is always `(callback, context)`, one-shot or not.
struct Entry<E> {
    callback: Callback<E>,
    context: Context,
    once: bool,
}

impl<E> Entry<E> {
    fn matches(&self, callback: &Callback<E>, context: &Context) -> bool {
        self.callback.same(callback) && self.context.same(context)
    }
}

impl<E> Clone for Entry<E> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
            context: self.context.clone(),
            once: self.once,
        }
    }
}

/// Per-type listener storage. The single-entry form avoids allocating a
/// vector for the common one-subscriber case; the second distinct
/// registration for a type promotes it to `Many`.
enum Listeners<E> {
    Single(Entry<E>),
    Many(Vec<Entry<E>>),
}

impl<E> Listeners<E> {
    fn len(&self) -> usize {
        match self {
            Listeners::Single(_) => 1,
            Listeners::Many(entries) => entries.len(),
        }
    }

    fn snapshot_into(&self, out: &mut Vec<(Entry<E>, bool)>, wildcard: bool) {
        match self {
            Listeners::Single(entry) => out.push((entry.clone(), wildcard)),
            Listeners::Many(entries) => {
                out.extend(entries.iter().map(|e| (e.clone(), wildcard)));
            }
        }
    }
}

/// Synchronous event notifier with named channels.
///
/// `E` is the event type dispatched by the owning component; routing uses
/// [`Event::event_type`]. See the module docs for the reentrancy rules.
///
/// # Example
///
/// ```
/// use dwg_core::{Callback, Context, Data, DataEvent, Trigger};
///
/// let trigger: Trigger<DataEvent> = Trigger::new();
/// let seen = Callback::new(|_ctx, event: &DataEvent| {
///     if let DataEvent::Add { data } = event {
///         println!("added {}", data.id());
///     }
///     Ok(())
/// });
/// trigger.on("add", seen.clone(), Context::none());
/// trigger
///     .emit(&DataEvent::Add { data: Data::new("wall") })
///     .expect("listeners succeed");
/// trigger.off("add", &seen, &Context::none());
/// ```
pub struct Trigger<E> {
    listeners: RwLock<HashMap<String, Listeners<E>>>,
}

impl<E: Event> Trigger<E> {
    /// Create a notifier with no registered listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Register `callback` under `event_type`, bound to `context`.
    ///
    /// Registering an identical `(callback, context)` pair a second time
    /// under the same type is a no-op, as is an empty `event_type` (the
    /// permissive contract for optional-options call sites). Listeners
    /// registered under [`ALL`] receive every emission.
    pub fn on(&self, event_type: &str, callback: Callback<E>, context: Context) -> &Self {
        self.register(event_type, callback, context, false)
    }

    /// Register a one-shot listener.
    ///
    /// The registration is removed when it first fires, before its
    /// callback runs, so a reentrant emission of the same type cannot
    /// invoke it twice. Until then it behaves exactly like [`Trigger::on`]:
    /// same deduplication, and [`Trigger::off`] with the original
    /// `(callback, context)` pair cancels it.
    pub fn once(&self, event_type: &str, callback: Callback<E>, context: Context) -> &Self {
        self.register(event_type, callback, context, true)
    }

    fn register(&self, event_type: &str, callback: Callback<E>, context: Context, once: bool) -> &Self {
        if event_type.is_empty() {
            return self;
        }
        let entry = Entry {
            callback,
            context,
            once,
        };
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match listeners.get_mut(event_type) {
            None => {
                listeners.insert(event_type.to_owned(), Listeners::Single(entry));
            }
            Some(slot) => match slot {
                Listeners::Single(existing) => {
                    if !existing.matches(&entry.callback, &entry.context) {
                        let first = existing.clone();
                        *slot = Listeners::Many(vec![first, entry]);
                    }
                }
                Listeners::Many(entries) => {
                    if !entries
                        .iter()
                        .any(|e| e.matches(&entry.callback, &entry.context))
                    {
                        entries.push(entry);
                    }
                }
            },
        }
        self
    }

    /// Remove the first entry under `event_type` matching the
    /// `(callback, context)` pair. No-op when nothing matches.
    pub fn off(&self, event_type: &str, callback: &Callback<E>, context: &Context) -> &Self {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let remove_type = match listeners.get_mut(event_type) {
            None => false,
            Some(Listeners::Single(entry)) => entry.matches(callback, context),
            Some(Listeners::Many(entries)) => {
                if let Some(index) = entries.iter().position(|e| e.matches(callback, context)) {
                    entries.remove(index);
                }
                entries.is_empty()
            }
        };
        if remove_type {
            listeners.remove(event_type);
        }
        self
    }

    /// Dispatch `event` synchronously to every matching listener.
    ///
    /// Listeners registered under the event's own type run first, in
    /// registration order, then the [`ALL`] listeners. The set of
    /// listeners is snapshotted before the first callback runs:
    /// registrations and removals performed by listeners affect future
    /// emissions only. One-shot entries are deregistered from the live
    /// registry as they are reached, before their callback is invoked.
    ///
    /// # Errors
    ///
    /// Fail-fast: the first listener error aborts the remaining dispatch
    /// of this emission and is returned to the caller. Listeners are not
    /// isolated from each other.
    pub fn emit(&self, event: &E) -> DwgResult<()> {
        let event_type = event.event_type();
        let snapshot = {
            let listeners = self
                .listeners
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            let mut snapshot = Vec::new();
            if let Some(slot) = listeners.get(event_type) {
                slot.snapshot_into(&mut snapshot, false);
            }
            if event_type != ALL {
                if let Some(slot) = listeners.get(ALL) {
                    slot.snapshot_into(&mut snapshot, true);
                }
            }
            snapshot
        };
        if snapshot.is_empty() {
            return Ok(());
        }
        tracing::trace!(
            event_type,
            listeners = snapshot.len(),
            "dispatching event"
        );
        for (entry, wildcard) in snapshot {
            if entry.once {
                let channel = if wildcard { ALL } else { event_type };
                self.off(channel, &entry.callback, &entry.context);
            }
            entry.callback.call(&entry.context, event)?;
        }
        Ok(())
    }

    /// Number of listeners currently registered under `event_type`.
    #[must_use]
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .map_or(0, Listeners::len)
    }

    /// Whether no listener is registered under any type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl<E: Event> Default for Trigger<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Trigger<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut map = f.debug_map();
        for (event_type, slot) in listeners.iter() {
            map.entry(event_type, &slot.len());
        }
        map.finish()
    }
}

/// Capability contract for components that notify through an embedded
/// [`Trigger`]. Implementors expose their trigger; subscription and
/// emission forward to it, so `component.on(...)` reads the same on every
/// entity in the viewer.
pub trait Subscribable {
    /// The event type this component dispatches.
    type Event: Event;

    /// The embedded notifier.
    fn trigger(&self) -> &Trigger<Self::Event>;

    /// Register a listener. See [`Trigger::on`].
    fn on(&self, event_type: &str, callback: Callback<Self::Event>, context: Context) -> &Self {
        self.trigger().on(event_type, callback, context);
        self
    }

    /// Register a one-shot listener. See [`Trigger::once`].
    fn once(&self, event_type: &str, callback: Callback<Self::Event>, context: Context) -> &Self {
        self.trigger().once(event_type, callback, context);
        self
    }

    /// Remove a listener by identity. See [`Trigger::off`].
    fn off(&self, event_type: &str, callback: &Callback<Self::Event>, context: &Context) -> &Self {
        self.trigger().off(event_type, callback, context);
        self
    }

    /// Dispatch an event through the embedded notifier.
    ///
    /// # Errors
    ///
    /// Propagates the first listener error, as [`Trigger::emit`] does.
    fn emit(&self, event: &Self::Event) -> DwgResult<()> {
        self.trigger().emit(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Ping(&'static str);

    impl Event for Ping {
        fn event_type(&self) -> &str {
            self.0
        }
    }

    fn noop() -> Callback<Ping> {
        Callback::new(|_, _| Ok(()))
    }

    #[test]
    fn callback_identity_follows_the_allocation() {
        let a = noop();
        let b = a.clone();
        let c = noop();
        assert!(a.same(&b));
        assert!(!a.same(&c));
    }

    #[test]
    fn context_identity() {
        let none_a = Context::none();
        let none_b = Context::none();
        assert!(none_a.same(&none_b));

        let ctx = Context::new(7_u32);
        assert!(ctx.same(&ctx.clone()));
        assert!(!ctx.same(&Context::new(7_u32)));
        assert!(!ctx.same(&none_a));
        assert_eq!(ctx.downcast_ref::<u32>(), Some(&7));
        assert!(ctx.downcast_ref::<String>().is_none());
    }

    #[test]
    fn second_registration_promotes_single_to_many() {
        let trigger: Trigger<Ping> = Trigger::new();
        trigger.on("x", noop(), Context::none());
        assert_eq!(trigger.listener_count("x"), 1);
        trigger.on("x", noop(), Context::none());
        assert_eq!(trigger.listener_count("x"), 2);
    }

    #[test]
    fn duplicate_pair_is_not_registered_twice() {
        let trigger: Trigger<Ping> = Trigger::new();
        let cb = noop();
        trigger.on("x", cb.clone(), Context::none());
        trigger.on("x", cb.clone(), Context::none());
        assert_eq!(trigger.listener_count("x"), 1);

        // Same callback under a different context is a distinct listener.
        trigger.on("x", cb, Context::new(1_u8));
        assert_eq!(trigger.listener_count("x"), 2);
    }

    #[test]
    fn empty_type_is_ignored() {
        let trigger: Trigger<Ping> = Trigger::new();
        trigger.on("", noop(), Context::none());
        assert!(trigger.is_empty());
    }

    #[test]
    fn off_removes_at_most_one_entry_and_drops_empty_types() {
        let trigger: Trigger<Ping> = Trigger::new();
        let cb = noop();
        trigger.on("x", cb.clone(), Context::none());
        trigger.on("x", noop(), Context::none());

        trigger.off("x", &cb, &Context::none());
        assert_eq!(trigger.listener_count("x"), 1);

        // No match left for this identity.
        trigger.off("x", &cb, &Context::none());
        assert_eq!(trigger.listener_count("x"), 1);
    }

    #[test]
    fn off_on_the_single_form_removes_the_type() {
        let trigger: Trigger<Ping> = Trigger::new();
        let cb = noop();
        trigger.on("x", cb.clone(), Context::none());
        trigger.off("x", &cb, &Context::none());
        assert!(trigger.is_empty());
    }
}
