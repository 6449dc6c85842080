use std::sync::Arc;

use crate::key::Key;
use crate::object::{Object, OptionalVisitor};
use crate::scope::{WriteGuard, WriteScope};
use crate::slot::{Attach, Slot, SlotError};
use crate::store::{Store, StoreSlot};

/// Attaches objects to slots in a backing store.
///
/// A realm is the smallest engine the optional fields need: it gives every
/// field of every managed object a [`StoreSlot`] keyed by object id and field
/// name, and guards writes with a shared [`WriteScope`].
///
/// ```
/// use hydroxyl_core::{MemoryStore, Object, OptionalScalar, Realm};
///
/// #[derive(Object)]
/// struct Dog {
///     age: OptionalScalar<i32>,
/// }
///
/// let realm = Realm::new(MemoryStore::new());
/// let mut dog = Dog { age: OptionalScalar::new(Some(3)) };
///
/// {
///     let _write = realm.write();
///     realm.add("rex", &mut dog).unwrap();
///     dog.age.set(Some(4)).unwrap();
/// }
///
/// assert_eq!(dog.age.get().unwrap(), Some(4));
/// assert!(dog.age.set(None).is_err());
/// ```
pub struct Realm<S: Store> {
    store: Arc<S>,
    scope: Arc<WriteScope>,
}

impl<S: Store + 'static> Realm<S> {
    /// Creates a realm over `store` with its own write scope.
    pub fn new(store: S) -> Self {
        Self::with_scope(Arc::new(store), Arc::new(WriteScope::new()))
    }

    /// Creates a realm sharing an existing store and write scope.
    pub fn with_scope(store: Arc<S>, scope: Arc<WriteScope>) -> Self {
        Realm { store, scope }
    }

    /// Opens a write scope until the returned guard is dropped.
    pub fn write(&self) -> WriteGuard<'_> {
        self.scope.begin()
    }

    /// Returns true while a write scope is open.
    pub fn in_write(&self) -> bool {
        self.scope.is_active()
    }

    /// Returns the slot backing `field` of object `object_id`.
    pub fn slot(&self, object_id: &str, field: &str) -> StoreSlot<S> {
        StoreSlot::new(
            Arc::clone(&self.store),
            Arc::clone(&self.scope),
            Key::for_field(object_id, field),
        )
    }

    /// Returns the backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Adds a new object, attaching its optional fields.
    ///
    /// Each field's slot is first overwritten with the value the field holds,
    /// so this must run inside a write scope. A field is attached only once
    /// that write succeeded; fields whose write fails stay unattached with
    /// their value intact. The first error is returned.
    pub fn add<O: Object + ?Sized>(&self, object_id: &str, object: &mut O) -> Result<(), SlotError> {
        self.scope.check()?;
        log::debug!("adding object {}", object_id);
        let mut binder = Binder {
            realm: self,
            object_id,
            seed: true,
            error: None,
        };
        object.visit_optionals(&mut binder);
        binder.error.map_or(Ok(()), Err)
    }

    /// Attaches an object that is already stored.
    ///
    /// Fields read whatever their slots hold; values set before attaching are
    /// discarded. No writes happen, so no write scope is needed.
    pub fn bind<O: Object + ?Sized>(&self, object_id: &str, object: &mut O) {
        log::debug!("binding object {}", object_id);
        let mut binder = Binder {
            realm: self,
            object_id,
            seed: false,
            error: None,
        };
        object.visit_optionals(&mut binder);
    }
}

/// Visitor that attaches each field to its store slot.
struct Binder<'a, S: Store> {
    realm: &'a Realm<S>,
    object_id: &'a str,
    seed: bool,
    error: Option<SlotError>,
}

impl<S: Store + 'static> OptionalVisitor for Binder<'_, S> {
    fn visit(&mut self, field: &str, optional: &mut dyn Attach) {
        let slot: Arc<dyn Slot> = Arc::new(self.realm.slot(self.object_id, field));
        if self.seed {
            let pending = optional.pending();
            log::debug!(
                "seeding {}.{} ({}) with {:?}",
                self.object_id,
                field,
                optional.scalar_type(),
                pending
            );
            if let Err(err) = slot.write_raw(pending) {
                log::debug!("leaving {}.{} unattached: {}", self.object_id, field, err);
                self.error.get_or_insert(err);
                return;
            }
        }
        optional.attach(slot);
    }
}
