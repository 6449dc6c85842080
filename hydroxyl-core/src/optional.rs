use std::fmt;
use std::sync::Arc;

use crate::scalar::{Scalar, ScalarType, StorageValue};
use crate::slot::{Attach, Slot, SlotError};

/// An optional scalar field of a persistable object.
///
/// An optional starts out **unattached** and keeps its value in memory. Once
/// the engine attaches it to a [`Slot`], every read and write goes to that
/// slot instead. There is no way back to the unattached state.
///
/// ```
/// use hydroxyl_core::OptionalScalar;
///
/// let mut age = OptionalScalar::<i32>::default();
/// assert_eq!(age.get().unwrap(), None);
///
/// age.set(Some(42)).unwrap();
/// assert_eq!(age.get().unwrap(), Some(42));
/// ```
pub struct OptionalScalar<T: Scalar> {
    state: State<T>,
}

enum State<T> {
    Unattached(Option<T>),
    Attached(Arc<dyn Slot>),
}

impl<T: Scalar> OptionalScalar<T> {
    /// Creates an unattached optional holding `value`.
    pub fn new(value: Option<T>) -> Self {
        OptionalScalar {
            state: State::Unattached(value),
        }
    }

    /// Returns the current value.
    ///
    /// Reads from the slot when attached; a slot holding a value of another
    /// scalar type is a broken schema and panics.
    pub fn get(&self) -> Result<Option<T>, SlotError> {
        match &self.state {
            State::Unattached(value) => Ok(*value),
            State::Attached(slot) => Ok(slot.read_raw()?.map(T::from_storage)),
        }
    }

    /// Replaces the current value.
    ///
    /// When attached, errors from the slot (such as
    /// [`SlotError::WriteOutsideScope`]) are returned as-is.
    pub fn set(&mut self, value: Option<T>) -> Result<(), SlotError> {
        match &mut self.state {
            State::Unattached(current) => {
                *current = value;
                Ok(())
            }
            State::Attached(slot) => {
                log::trace!("writing {:?} to attached {} optional", value, T::SCALAR_TYPE);
                slot.write_raw(value.map(Scalar::to_storage))
            }
        }
    }

    /// Returns true once the engine has attached this optional to a slot.
    pub fn is_attached(&self) -> bool {
        matches!(self.state, State::Attached(_))
    }
}

impl<T: Scalar> Default for OptionalScalar<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T: Scalar> From<Option<T>> for OptionalScalar<T> {
    fn from(value: Option<T>) -> Self {
        Self::new(value)
    }
}

impl<T: Scalar> From<T> for OptionalScalar<T> {
    fn from(value: T) -> Self {
        Self::new(Some(value))
    }
}

impl<T: Scalar> Attach for OptionalScalar<T> {
    fn scalar_type(&self) -> ScalarType {
        T::SCALAR_TYPE
    }

    fn pending(&self) -> Option<StorageValue> {
        match &self.state {
            State::Unattached(value) => value.map(Scalar::to_storage),
            State::Attached(_) => None,
        }
    }

    fn attach(&mut self, slot: Arc<dyn Slot>) -> Option<StorageValue> {
        match std::mem::replace(&mut self.state, State::Attached(slot)) {
            State::Unattached(value) => value.map(Scalar::to_storage),
            State::Attached(_) => {
                log::debug!("rebinding attached {} optional to a new slot", T::SCALAR_TYPE);
                None
            }
        }
    }
}

impl<T: Scalar> fmt::Debug for OptionalScalar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Unattached(value) => f
                .debug_struct("OptionalScalar")
                .field("type", &T::SCALAR_TYPE)
                .field("value", value)
                .finish(),
            State::Attached(_) => f
                .debug_struct("OptionalScalar")
                .field("type", &T::SCALAR_TYPE)
                .field("attached", &true)
                .finish(),
        }
    }
}
