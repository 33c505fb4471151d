//! Component descriptors.

use crate::key::TypeKey;

/// Declarative record naming one managed instance and its implementation type.
///
/// Descriptors are produced by a [`DescriptorSource`](crate::DescriptorSource)
/// or added by hand to a [`ComponentCollection`](crate::ComponentCollection).
/// They are immutable once built; the builder methods consume and return the
/// descriptor.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ComponentDescriptor, key_of_type};
///
/// struct PersonDao;
///
/// let eager = ComponentDescriptor::new("personDao", key_of_type::<PersonDao>());
/// assert!(eager.singleton);
/// assert!(!eager.lazy);
///
/// let lazy = ComponentDescriptor::of::<PersonDao>("archiveDao").lazy(true);
/// assert!(lazy.lazy);
/// assert_eq!(lazy.impl_type, eager.impl_type);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    /// Logical name, unique within a registry
    pub name: String,
    /// Implementation type backing the component
    pub impl_type: TypeKey,
    /// Whether early references may be exposed while the component is built
    pub singleton: bool,
    /// Lazy components are skipped by the startup eager load
    pub lazy: bool,
}

impl ComponentDescriptor {
    /// Creates an eager singleton descriptor.
    pub fn new(name: impl Into<String>, impl_type: TypeKey) -> Self {
        Self {
            name: name.into(),
            impl_type,
            singleton: true,
            lazy: false,
        }
    }

    /// Creates an eager singleton descriptor for implementation type `T`.
    pub fn of<T: 'static>(name: impl Into<String>) -> Self {
        Self::new(name, TypeKey::of::<T>())
    }

    /// Sets the singleton flag.
    pub fn singleton(mut self, singleton: bool) -> Self {
        self.singleton = singleton;
        self
    }

    /// Sets the lazy flag.
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Name of the implementation type.
    pub fn type_name(&self) -> &'static str {
        self.impl_type.name()
    }
}
