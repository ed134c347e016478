//! Reactive property helper.
//!
//! A [`Property`] is a named value whose setter reports changes as
//! [`PropertyChange`] records. The owning entity fires the record through
//! its trigger as a `"change"` event, which gives observers fine-grained
//! change notification without polling.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DwgResult;

/// A change produced by a property setter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyChange {
    /// Name of the property that changed.
    pub property: String,
    /// Value before the assignment.
    pub old_value: Value,
    /// Value after the assignment.
    pub new_value: Value,
}

/// A named value with change detection.
///
/// `set` returns `Some(change)` only when the incoming value differs from
/// the stored one, so assigning a value the property already holds fires
/// nothing. An optional converter normalizes values before storage and
/// comparison.
#[derive(Debug, Clone)]
pub struct Property<T> {
    name: &'static str,
    value: T,
    converter: Option<fn(T) -> T>,
}

impl<T> Property<T>
where
    T: Clone + PartialEq + Serialize,
{
    /// Create a property with an initial value.
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            value,
            converter: None,
        }
    }

    /// Attach a converter applied to every incoming value before it is
    /// compared and stored.
    #[must_use]
    pub fn with_converter(mut self, converter: fn(T) -> T) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Property name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Assign a value, reporting the change when it differs from the
    /// stored one.
    ///
    /// # Errors
    ///
    /// Returns [`DwgError::Serialization`](crate::DwgError::Serialization)
    /// if either value cannot be captured as JSON for the change record.
    pub fn set(&mut self, value: T) -> DwgResult<Option<PropertyChange>> {
        let value = match self.converter {
            Some(convert) => convert(value),
            None => value,
        };
        if value == self.value {
            return Ok(None);
        }
        let old_value = serde_json::to_value(&self.value)?;
        let new_value = serde_json::to_value(&value)?;
        self.value = value;
        Ok(Some(PropertyChange {
            property: self.name.to_owned(),
            old_value,
            new_value,
        }))
    }
}
