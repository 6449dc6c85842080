//! Hydroxyl gives persistable objects optional scalar fields.
//!
//! Core concepts:
//! - **Scalar**: one of `i8`, `i16`, `i32`, `i64`, `f32`, `f64`, `bool`, each
//!   bridged losslessly to a tagged [`StorageValue`]
//! - **OptionalScalar**: a field holding zero or one scalar, in memory until
//!   the engine attaches it to a slot
//! - **Slot**: engine-owned storage for one field of one object
//! - **Realm**: a minimal engine attaching objects to slots in a [`Store`]
//!
//! # Example
//!
//! ```
//! use hydroxyl_core::{MemoryStore, Object, OptionalScalar, Realm};
//!
//! #[derive(Object)]
//! struct Sensor {
//!     label: String,
//!     reading: OptionalScalar<f64>,
//! }
//!
//! let mut sensor = Sensor {
//!     label: "boiler".to_string(),
//!     reading: OptionalScalar::new(Some(71.5)),
//! };
//! assert_eq!(sensor.reading.get().unwrap(), Some(71.5));
//!
//! // Once added, the field reads and writes the realm's storage.
//! let realm = Realm::new(MemoryStore::new());
//! {
//!     let _write = realm.write();
//!     realm.add("boiler", &mut sensor).unwrap();
//!     sensor.reading.set(None).unwrap();
//! }
//! assert_eq!(sensor.reading.get().unwrap(), None);
//! assert_eq!(sensor.label, "boiler");
//! ```
//!
//! Engines attach fields through the [`Attach`] trait; client code never
//! needs to import it.

mod key;
mod object;
mod optional;
mod realm;
mod scalar;
mod scope;
mod slot;
mod store;

pub use key::Key;
pub use object::{Object, OptionalVisitor};
pub use optional::OptionalScalar;
pub use realm::Realm;
pub use scalar::{BridgeError, Scalar, ScalarType, StorageValue};
pub use scope::{WriteGuard, WriteScope};
pub use slot::{Attach, MemorySlot, Slot, SlotError};
pub use store::{MemoryStore, Store, StoreSlot};

#[cfg(feature = "derive")]
pub use hydroxyl_derive::Object;
