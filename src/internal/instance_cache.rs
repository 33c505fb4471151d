//! Construction-time raw instance dedup.

use crate::component::Instance;
use crate::internal::Map;

/// Raw instances keyed by every alias they can be reached through.
///
/// Allocating a component records the object under its declared name, its
/// concrete type name and each interface name, so a later allocation for any
/// of those keys re-uses the object instead of creating a second one.
#[derive(Default)]
pub(crate) struct InstanceCache {
    by_alias: Map<String, Instance>,
}

impl InstanceCache {
    pub(crate) fn get(&self, alias: &str) -> Option<&Instance> {
        self.by_alias.get(alias)
    }

    /// Records `instance` under `name`, its type name and its interface names.
    pub(crate) fn insert(&mut self, name: &str, instance: &Instance) {
        let component = instance.component_type();
        self.by_alias.insert(name.to_string(), instance.clone());
        self.by_alias
            .insert(component.key().name().to_string(), instance.clone());
        for interface in component.interfaces() {
            self.by_alias
                .insert(interface.name().to_string(), instance.clone());
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.by_alias.len()
    }

    /// Empties the cache, returning every recorded instance.
    pub(crate) fn drain(&mut self) -> Vec<Instance> {
        self.by_alias.drain().map(|(_, instance)| instance).collect()
    }
}
