//! The data collection.
//!
//! A [`Model`] owns an ordered set of [`Data`] items and is the top-level
//! notification surface for drawing content: consumers subscribe once to
//! the model instead of chasing individual items. Besides its own
//! `"add"`/`"remove"`/`"clear"` events it re-emits every event fired by a
//! contained item, so a property change deep in a composed structure
//! surfaces at the collection.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::{Callback, Context, Data, DataEvent, DwgResult, Subscribable, Trigger, ALL};

struct ModelItems {
    order: Vec<Data>,
    by_id: HashMap<Uuid, Data>,
}

/// Ordered collection of drawing data with id lookup and upward event
/// forwarding.
pub struct Model {
    trigger: Arc<Trigger<DataEvent>>,
    items: RwLock<ModelItems>,
    /// One shared forwarder subscribed to each contained item's [`ALL`]
    /// channel; its stable identity is what makes detaching work.
    forward: Callback<DataEvent>,
}

impl Model {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        let trigger = Arc::new(Trigger::new());
        let forward = {
            let trigger = Arc::clone(&trigger);
            Callback::new(move |_ctx: &Context, event: &DataEvent| trigger.emit(event))
        };
        Self {
            trigger,
            items: RwLock::new(ModelItems {
                order: Vec::new(),
                by_id: HashMap::new(),
            }),
            forward,
        }
    }

    /// Add an item, then its children recursively.
    ///
    /// Fires `"add"` for each item actually inserted and subscribes the
    /// model to the item's events. Returns `false` (and does nothing)
    /// when the item is already contained.
    ///
    /// # Errors
    ///
    /// Propagates the first `"add"` listener failure.
    pub fn add(&self, data: &Data) -> DwgResult<bool> {
        {
            let mut items = self.lock_items();
            if items.by_id.contains_key(&data.id()) {
                return Ok(false);
            }
            items.order.push(data.clone());
            items.by_id.insert(data.id(), data.clone());
        }
        data.trigger().on(ALL, self.forward.clone(), Context::none());
        tracing::debug!(id = %data.id(), name = %data.name(), "data added to model");
        self.trigger.emit(&DataEvent::Add { data: data.clone() })?;
        for child in data.children() {
            self.add(&child)?;
        }
        Ok(true)
    }

    /// Remove an item, then its children recursively (children in reverse
    /// order, so the deepest additions unwind first).
    ///
    /// Fires `"remove"` for each item actually removed and detaches the
    /// model from the item's events. Returns `false` when the item was
    /// not contained.
    ///
    /// # Errors
    ///
    /// Propagates the first `"remove"` listener failure.
    pub fn remove(&self, data: &Data) -> DwgResult<bool> {
        let present = {
            let mut items = self.lock_items();
            if items.by_id.remove(&data.id()).is_none() {
                false
            } else {
                items.order.retain(|item| item.id() != data.id());
                true
            }
        };
        if !present {
            return Ok(false);
        }
        data.trigger().off(ALL, &self.forward, &Context::none());
        tracing::debug!(id = %data.id(), "data removed from model");
        self.trigger.emit(&DataEvent::Remove { data: data.clone() })?;
        for child in data.children().iter().rev() {
            self.remove(child)?;
        }
        Ok(true)
    }

    /// Drop every item at once, firing a single `"clear"` event carrying
    /// the removed items. Forwarding subscriptions are detached.
    ///
    /// # Errors
    ///
    /// Propagates the first `"clear"` listener failure.
    pub fn clear(&self) -> DwgResult<()> {
        let items = {
            let mut lock = self.lock_items();
            lock.by_id.clear();
            std::mem::take(&mut lock.order)
        };
        for data in &items {
            data.trigger().off(ALL, &self.forward, &Context::none());
        }
        tracing::debug!(count = items.len(), "model cleared");
        self.trigger.emit(&DataEvent::Clear { items })
    }

    /// Whether the item is contained, by id.
    #[must_use]
    pub fn contains(&self, data: &Data) -> bool {
        self.lock_items().by_id.contains_key(&data.id())
    }

    /// Item at `index` in insertion order, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Data> {
        self.lock_items().order.get(index).cloned()
    }

    /// Look an item up by id.
    #[must_use]
    pub fn get_by_id(&self, id: Uuid) -> Option<Data> {
        self.lock_items().by_id.get(&id).cloned()
    }

    /// Number of contained items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_items().order.len()
    }

    /// Whether the collection holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_items().order.is_empty()
    }

    /// Snapshot of the items in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<Data> {
        self.lock_items().order.clone()
    }

    /// Visit each item in insertion order. The collection lock is not
    /// held during the calls, so `f` may mutate the model.
    pub fn for_each(&self, mut f: impl FnMut(&Data)) {
        for data in self.items() {
            f(&data);
        }
    }

    fn lock_items(&self) -> std::sync::RwLockWriteGuard<'_, ModelItems> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Subscribable for Model {
    type Event = DataEvent;

    fn trigger(&self) -> &Trigger<DataEvent> {
        &self.trigger
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Event;
    use std::sync::Mutex;

    fn event_log(model: &Model) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        model.on(
            ALL,
            Callback::new(move |_ctx, event: &DataEvent| {
                sink.lock().unwrap().push(event.event_type().to_owned());
                Ok(())
            }),
            Context::none(),
        );
        log
    }

    #[test]
    fn add_is_idempotent_by_id() {
        let model = Model::new();
        let data = Data::new("wall");
        assert!(model.add(&data).expect("listeners succeed"));
        assert!(!model.add(&data).expect("listeners succeed"));
        assert_eq!(model.len(), 1);
        assert!(model.contains(&data));
        assert_eq!(model.get_by_id(data.id()), Some(data));
    }

    #[test]
    fn add_recurses_into_children() {
        let model = Model::new();
        let parent = Data::new("floor");
        parent.add_child(Data::new("room"));
        parent.add_child(Data::new("stairs"));
        model.add(&parent).expect("listeners succeed");
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn remove_detaches_forwarding() {
        let model = Model::new();
        let data = Data::new("wall");
        model.add(&data).expect("listeners succeed");
        let log = event_log(&model);

        data.set_color("#ff0000").expect("listeners succeed");
        model.remove(&data).expect("listeners succeed");
        data.set_color("#00ff00").expect("listeners succeed");

        // The second color change happens after removal and must not
        // surface at the model.
        assert_eq!(*log.lock().unwrap(), vec!["change", "remove"]);
        assert!(model.is_empty());
    }

    #[test]
    fn clear_fires_once_with_all_items() {
        let model = Model::new();
        let a = Data::new("a");
        let b = Data::new("b");
        model.add(&a).expect("listeners succeed");
        model.add(&b).expect("listeners succeed");

        let cleared = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&cleared);
        model.on(
            "clear",
            Callback::new(move |_ctx, event: &DataEvent| {
                if let DataEvent::Clear { items } = event {
                    sink.lock().unwrap().push(items.len());
                }
                Ok(())
            }),
            Context::none(),
        );

        model.clear().expect("listeners succeed");
        assert_eq!(*cleared.lock().unwrap(), vec![2]);
        assert!(model.is_empty());

        // Forwarding was detached by clear as well.
        let log = event_log(&model);
        a.set_visible(false).expect("listeners succeed");
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn item_events_surface_at_the_model() {
        let model = Model::new();
        let data = Data::new("wall");
        model.add(&data).expect("listeners succeed");
        let log = event_log(&model);

        data.set_name("door").expect("listeners succeed");

        assert_eq!(*log.lock().unwrap(), vec!["change"]);
    }
}
