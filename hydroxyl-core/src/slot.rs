use std::sync::{Arc, RwLock};

use crate::scalar::{ScalarType, StorageValue};
use crate::scope::WriteScope;

/// Error type for slot operations.
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("cannot modify a managed value outside of a write scope")]
    WriteOutsideScope,
    #[error("corrupt slot contents: {0}")]
    Corrupt(String),
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// One field of one persisted object, as seen by an attached optional.
///
/// `None` means the slot is empty. Slots are owned by the persistence engine;
/// they decide where values live and when writes are allowed.
pub trait Slot: Send + Sync {
    /// Reads the raw stored value, or `None` if the slot is empty.
    fn read_raw(&self) -> Result<Option<StorageValue>, SlotError>;

    /// Replaces the stored value; `None` empties the slot.
    fn write_raw(&self, value: Option<StorageValue>) -> Result<(), SlotError>;
}

/// Engine-facing lifecycle hook of an optional field.
///
/// Ordinary client code never calls this; the engine does when the owning
/// object becomes managed.
pub trait Attach {
    /// The scalar type the field is declared with.
    fn scalar_type(&self) -> ScalarType;

    /// Returns the value held while unattached, already bridged.
    ///
    /// `None` if the field is empty or already attached. Engines call this to
    /// seed a slot before attaching, so a failed write loses nothing.
    fn pending(&self) -> Option<StorageValue>;

    /// Redirects all future reads and writes to `slot`.
    ///
    /// Returns the value held while unattached, if any. The field itself
    /// forgets that value; it is up to the engine to write it to the slot.
    fn attach(&mut self, slot: Arc<dyn Slot>) -> Option<StorageValue>;
}

/// An in-memory slot.
///
/// Useful for testing and for stubbing out an engine. A scoped slot rejects
/// writes unless its [`WriteScope`] is active.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: RwLock<Option<StorageValue>>,
    scope: Option<Arc<WriteScope>>,
}

impl MemorySlot {
    /// Creates an empty, unscoped slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unscoped slot holding `value`.
    pub fn with_value(value: StorageValue) -> Self {
        MemorySlot {
            value: RwLock::new(Some(value)),
            scope: None,
        }
    }

    /// Creates an empty slot whose writes require `scope` to be active.
    pub fn scoped(scope: Arc<WriteScope>) -> Self {
        MemorySlot {
            value: RwLock::new(None),
            scope: Some(scope),
        }
    }
}

impl Slot for MemorySlot {
    fn read_raw(&self) -> Result<Option<StorageValue>, SlotError> {
        Ok(*self.value.read().unwrap())
    }

    fn write_raw(&self, value: Option<StorageValue>) -> Result<(), SlotError> {
        if let Some(scope) = &self.scope {
            scope.check()?;
        }
        *self.value.write().unwrap() = value;
        Ok(())
    }
}
