//! # dwg-core
//!
//! Event notification and the reactive data layer for dwg-viewer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 dwg-core                    │
//! ├──────────────────────┬──────────────────────┤
//! │  Trigger             │  Data layer          │
//! │  - named channels    │  - Data items        │
//! │  - "all" wildcard    │  - reactive props    │
//! │  - one-shot entries  │  - Model collection  │
//! │  - snapshot dispatch │  - event forwarding  │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! The [`Trigger`] is the sole cross-component communication channel:
//! producers of state changes fire events, consumers subscribe by name
//! (or to the [`ALL`] wildcard) and are invoked synchronously, in
//! registration order. The data layer is its first consumer: [`Data`]
//! items fire `"change"` for every property assignment and a [`Model`]
//! collection forwards contained items' events upward.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod data;
pub mod error;
pub mod event;
pub mod model;
pub mod property;
pub mod trigger;

pub use data::{Data, DataEvent};
pub use error::{DwgError, DwgResult};
pub use event::{Event, ALL};
pub use model::Model;
pub use property::{Property, PropertyChange};
pub use trigger::{Callback, Context, ListenerFn, Subscribable, Trigger};

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
