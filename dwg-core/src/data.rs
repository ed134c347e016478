//! Drawing data items.
//!
//! A [`Data`] is one unit of drawing content: a shared handle with a
//! stable id, reactive properties, optional children and its own
//! [`Trigger`]. Geometry and styling beyond the properties here live in
//! the rendering backends, not in this crate.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::{DwgResult, Event, Property, PropertyChange, Subscribable, Trigger};

/// Events dispatched by data items and by the [`Model`](crate::Model)
/// collection that contains them.
#[derive(Debug, Clone)]
pub enum DataEvent {
    /// An item was added to a collection.
    Add {
        /// The added item.
        data: Data,
    },
    /// An item was removed from a collection.
    Remove {
        /// The removed item.
        data: Data,
    },
    /// A collection dropped all of its items at once.
    Clear {
        /// The items that were contained, in their former order.
        items: Vec<Data>,
    },
    /// A property of an item changed value.
    Change {
        /// The item whose property changed.
        data: Data,
        /// What changed, with old and new values.
        change: PropertyChange,
    },
}

impl Event for DataEvent {
    fn event_type(&self) -> &str {
        match self {
            DataEvent::Add { .. } => "add",
            DataEvent::Remove { .. } => "remove",
            DataEvent::Clear { .. } => "clear",
            DataEvent::Change { .. } => "change",
        }
    }
}

struct DataState {
    name: Property<String>,
    visible: Property<bool>,
    color: Property<String>,
    children: Vec<Data>,
}

struct DataInner {
    id: Uuid,
    trigger: Trigger<DataEvent>,
    state: RwLock<DataState>,
}

/// A shared drawing data item.
///
/// Cloning is cheap and yields another handle to the same item. Property
/// setters fire a `"change"` event on the item's own trigger; a
/// containing [`Model`](crate::Model) forwards those events upward via
/// its catch-all subscription.
#[derive(Clone)]
pub struct Data {
    inner: Arc<DataInner>,
}

impl Data {
    /// Create a visible, black item with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            inner: Arc::new(DataInner {
                id: Uuid::new_v4(),
                trigger: Trigger::new(),
                state: RwLock::new(DataState {
                    name: Property::new("name", name.to_owned()),
                    visible: Property::new("visible", true),
                    color: Property::new("color", "#000000".to_owned()),
                    children: Vec::new(),
                }),
            }),
        }
    }

    /// Stable identifier of this item.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Current name.
    #[must_use]
    pub fn name(&self) -> String {
        self.read_state(|state| state.name.get().clone())
    }

    /// Whether the item is visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.read_state(|state| *state.visible.get())
    }

    /// Current color, as a `#rrggbb` string.
    #[must_use]
    pub fn color(&self) -> String {
        self.read_state(|state| state.color.get().clone())
    }

    /// Rename the item, notifying `"change"` observers.
    ///
    /// # Errors
    ///
    /// Propagates listener failures and change-record serialization
    /// errors.
    pub fn set_name(&self, name: impl Into<String>) -> DwgResult<()> {
        let change = self.write_state(|state| state.name.set(name.into()))?;
        self.fire_change(change)
    }

    /// Show or hide the item, notifying `"change"` observers.
    ///
    /// # Errors
    ///
    /// Propagates listener failures and change-record serialization
    /// errors.
    pub fn set_visible(&self, visible: bool) -> DwgResult<()> {
        let change = self.write_state(|state| state.visible.set(visible))?;
        self.fire_change(change)
    }

    /// Recolor the item, notifying `"change"` observers.
    ///
    /// # Errors
    ///
    /// Propagates listener failures and change-record serialization
    /// errors.
    pub fn set_color(&self, color: impl Into<String>) -> DwgResult<()> {
        let change = self.write_state(|state| state.color.set(color.into()))?;
        self.fire_change(change)
    }

    /// Attach a child item. Children added to an item already held by a
    /// [`Model`](crate::Model) are picked up the next time the item is
    /// re-added; adding the item to a model adds its children with it.
    pub fn add_child(&self, child: Data) {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .children
            .push(child);
    }

    /// Snapshot of the current children.
    #[must_use]
    pub fn children(&self) -> Vec<Data> {
        self.read_state(|state| state.children.clone())
    }

    fn read_state<R>(&self, f: impl FnOnce(&DataState) -> R) -> R {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Run `f` under the state lock, releasing it before any event fires.
    fn write_state<R>(&self, f: impl FnOnce(&mut DataState) -> R) -> R {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn fire_change(&self, change: Option<PropertyChange>) -> DwgResult<()> {
        match change {
            Some(change) => self.inner.trigger.emit(&DataEvent::Change {
                data: self.clone(),
                change,
            }),
            None => Ok(()),
        }
    }
}

impl Subscribable for Data {
    type Event = DataEvent;

    fn trigger(&self) -> &Trigger<DataEvent> {
        &self.inner.trigger
    }
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Data {}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("id", &self.inner.id)
            .field("name", &self.name())
            .finish()
    }
}
