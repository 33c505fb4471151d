//! Descriptor and component-type registries.

use std::any::TypeId;
use std::sync::Arc;

use crate::component::ComponentType;
use crate::descriptors::ComponentDescriptor;
use crate::error::{IocError, IocResult};
use crate::internal::Map;
use crate::key::TypeKey;

/// Name-keyed descriptor registry.
///
/// Iterates in registration order, which is the order the startup eager load
/// walks. Names are unique: registering an existing name fails with
/// [`IocError::DuplicateDescriptor`].
#[derive(Debug, Default)]
pub(crate) struct DescriptorRegistry {
    entries: Vec<ComponentDescriptor>,
    index: Map<String, usize>,
}

impl DescriptorRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers one descriptor.
    pub(crate) fn register(&mut self, descriptor: ComponentDescriptor) -> IocResult<()> {
        if self.index.contains_key(&descriptor.name) {
            return Err(IocError::DuplicateDescriptor(descriptor.name));
        }
        self.index.insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(descriptor);
        Ok(())
    }

    /// Registers a batch; nothing is inserted if any name collides.
    pub(crate) fn register_all(&mut self, descriptors: Vec<ComponentDescriptor>) -> IocResult<()> {
        let mut seen = Map::default();
        for descriptor in &descriptors {
            if self.index.contains_key(&descriptor.name)
                || seen.insert(descriptor.name.as_str(), ()).is_some()
            {
                return Err(IocError::DuplicateDescriptor(descriptor.name.clone()));
            }
        }
        for descriptor in descriptors {
            self.register(descriptor)?;
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn get(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    #[inline]
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Descriptors in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.entries.iter()
    }

    /// Names of every descriptor implemented by `key`.
    pub(crate) fn names_of_type(&self, key: TypeKey) -> Vec<String> {
        self.entries
            .iter()
            .filter(|d| d.impl_type == key)
            .map(|d| d.name.clone())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Component metadata keyed by implementation type.
#[derive(Debug, Default)]
pub(crate) struct TypeTable {
    types: Map<TypeId, Arc<ComponentType>>,
}

impl TypeTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the metadata for a type.
    pub(crate) fn insert(&mut self, ty: Arc<ComponentType>) {
        self.types.insert(ty.key().id(), ty);
    }

    pub(crate) fn get(&self, key: TypeKey) -> Option<&Arc<ComponentType>> {
        self.types.get(&key.id())
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn len(&self) -> usize {
        self.types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn register_rejects_duplicate_names() {
        let mut registry = DescriptorRegistry::new();
        registry.register(ComponentDescriptor::of::<A>("a")).unwrap();
        let err = registry.register(ComponentDescriptor::of::<B>("a")).unwrap_err();
        assert_eq!(err, IocError::DuplicateDescriptor("a".to_string()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().impl_type, TypeKey::of::<A>());
    }

    #[test]
    fn register_all_is_atomic() {
        let mut registry = DescriptorRegistry::new();
        let batch = vec![
            ComponentDescriptor::of::<A>("a"),
            ComponentDescriptor::of::<B>("b"),
            ComponentDescriptor::of::<B>("a"),
        ];
        assert!(registry.register_all(batch).is_err());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn iteration_keeps_registration_order() {
        let mut registry = DescriptorRegistry::new();
        for name in ["z", "a", "m"] {
            registry.register(ComponentDescriptor::of::<A>(name)).unwrap();
        }
        let names: Vec<_> = registry.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["z", "a", "m"]);
        assert_eq!(registry.names_of_type(TypeKey::of::<A>()).len(), 3);
        assert!(registry.names_of_type(TypeKey::of::<B>()).is_empty());
    }
}
