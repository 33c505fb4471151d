//! Injection slots.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// A field that receives another component after the owner has been allocated.
///
/// Components are allocated first and wired afterwards, which is what lets two
/// components refer to each other. The container fills every declared slot
/// during injection; component code reads it with [`Inject::get`].
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Inject;
///
/// trait PersonDao: Send + Sync {}
///
/// #[derive(Default)]
/// struct PersonService {
///     dao: Inject<dyn PersonDao>,
/// }
///
/// let service = PersonService::default();
/// assert!(!service.dao.is_injected());
/// assert!(service.dao.get().is_none());
/// ```
pub struct Inject<T: ?Sized> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> Inject<T> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Returns the injected component, if the slot has been filled.
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.read().clone()
    }

    /// Whether the container has filled this slot.
    pub fn is_injected(&self) -> bool {
        self.slot.read().is_some()
    }

    // Re-injection of an aliased raw instance overwrites with the same singleton
    pub(crate) fn set(&self, value: Arc<T>) {
        *self.slot.write() = Some(value);
    }

    /// Empties the slot, dropping the reference it held.
    pub(crate) fn clear(&self) {
        self.slot.write().take();
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("target", &std::any::type_name::<T>())
            .field("injected", &self.is_injected())
            .finish()
    }
}
