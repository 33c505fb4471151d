//! Container module.
//!
//! The [`Container`] owns the descriptor registry, the component-type table
//! and the tiered singleton cache, and resolves components by name or by
//! implementation type.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::component::{ComponentType, Instance};
use crate::config::load_scan_root;
use crate::descriptors::ComponentDescriptor;
use crate::error::{IocError, IocResult};
use crate::hook::EarlyReferenceHook;
use crate::injector::Injector;
use crate::internal::{CacheSnapshot, Lookup, SingletonCache};
use crate::key::TypeKey;
use crate::observer::Observers;
use crate::registration::{DescriptorRegistry, TypeTable};
use crate::scan::{ComponentScanner, TypeCatalog};
use crate::traits::ResolverCore;
use crate::ComponentCollection;

/// Singleton component container.
///
/// Components are built once per name and shared. A component's slots are
/// filled after it has been allocated, so components may depend on each other
/// in cycles: while `A` is being injected, a request for `A` coming from one
/// of its dependencies receives `A`'s early reference, and once construction
/// finishes every holder refers to the same object.
///
/// # Thread Safety
///
/// `Container` is cheap to clone and can be shared across threads. Ready
/// components are read without taking the construction lock; constructions
/// are serialized by one reentrant lock, so concurrent first requests for a
/// name build it once.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{ComponentCollection, ComponentType, Inject, Resolver, Stereotype};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Husband {
///     wife: Inject<Wife>,
/// }
///
/// #[derive(Default)]
/// struct Wife {
///     husband: Inject<Husband>,
/// }
///
/// let mut components = ComponentCollection::new();
/// components
///     .add_component(
///         ComponentType::builder::<Husband>()
///             .stereotype(Stereotype::Service)
///             .inject_named("wife", "wife", |h| &h.wife)
///             .build(),
///     )
///     .add_component(
///         ComponentType::builder::<Wife>()
///             .stereotype(Stereotype::Service)
///             .inject_named("husband", "husband", |w| &w.husband)
///             .build(),
///     );
///
/// let container = components.build().unwrap();
/// let husband = container.get_named::<Husband>("husband").unwrap();
/// let wife = husband.wife.get().unwrap();
/// assert!(Arc::ptr_eq(&wife.husband.get().unwrap(), &husband));
///
/// // Injected cycles keep each other alive; shutdown releases them
/// container.shutdown();
/// ```
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    registry: DescriptorRegistry,
    types: TypeTable,
    cache: SingletonCache,
    observers: Arc<Observers>,
    hook: Arc<dyn EarlyReferenceHook>,
}

impl Container {
    pub(crate) fn new(
        registry: DescriptorRegistry,
        types: TypeTable,
        observers: Observers,
        hook: Arc<dyn EarlyReferenceHook>,
    ) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry,
                types,
                cache: SingletonCache::new(),
                observers: Arc::new(observers),
                hook,
            }),
        }
    }

    /// Starts a container from configuration.
    ///
    /// Reads the scan root from the properties file named by the first of
    /// `locations`, scans `catalog` below that root, registers the catalog's
    /// types and the scanned descriptors, and eagerly resolves every
    /// non-lazy component.
    pub fn from_config(locations: &[&str], catalog: &TypeCatalog) -> IocResult<Self> {
        let root = load_scan_root(locations)?;
        info!(root = %root, "scanning components");
        let scanner = ComponentScanner::new(catalog, &root);

        let mut components = ComponentCollection::new();
        components.add_catalog(catalog).add_source(&scanner)?;
        components.build()
    }

    /// Resolves every non-lazy descriptor in registration order, stopping at the first error.
    pub(crate) fn eager_load(&self) -> IocResult<()> {
        let start = Instant::now();
        let mut loaded = 0usize;
        for descriptor in self.inner.registry.iter().filter(|d| !d.lazy) {
            self.resolve_by_name(&descriptor.name)?;
            loaded += 1;
        }
        info!(loaded, elapsed = ?start.elapsed(), "eager load finished");
        Ok(())
    }

    /// Descriptor registered under `name`.
    pub fn descriptor(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.inner.registry.get(name)
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.inner.registry.iter()
    }

    /// Whether a descriptor named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.registry.contains(name)
    }

    /// Which cache tiers currently hold `name`.
    pub fn cache_snapshot(&self, name: &str) -> CacheSnapshot {
        self.inner.cache.snapshot(name)
    }

    /// Number of fully constructed components.
    pub fn ready_count(&self) -> usize {
        self.inner.cache.ready_count()
    }

    /// Clears every cache tier and empties the slots of every built component.
    ///
    /// Descriptors stay registered; a later resolution builds a fresh instance.
    pub fn shutdown(&self) {
        self.inner.cache.clear();
        info!("container shut down");
    }

    fn create(&self, descriptor: &ComponentDescriptor, component: &Arc<ComponentType>) -> IocResult<Instance> {
        let name = descriptor.name.as_str();
        let start = Instant::now();
        self.inner.observers.creating(name, descriptor.type_name());

        let result = self.construct(descriptor, component);
        match &result {
            Ok(_) => self.inner.observers.created(name, start.elapsed()),
            Err(error) => {
                warn!(component = name, %error, "construction failed");
                self.inner.observers.failed(name, error);
            }
        }
        result
    }

    // Allocate, expose the deferred constructor, then inject
    fn construct(&self, descriptor: &ComponentDescriptor, component: &Arc<ComponentType>) -> IocResult<Instance> {
        let raw = self.inner.cache.instantiate(descriptor, component);

        if descriptor.singleton {
            let hook = self.inner.hook.clone();
            let observers = self.inner.observers.clone();
            let early_descriptor = descriptor.clone();
            let early_raw = raw.clone();
            self.inner.cache.add_factory(
                &descriptor.name,
                Box::new(move || {
                    observers.early_reference(&early_descriptor.name);
                    hook.early_reference(&early_descriptor, early_raw)
                }),
            );
        }

        Injector::new(self).inject(&descriptor.name, &raw)?;
        Ok(raw)
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str("Descriptors:\n");
        for descriptor in self.inner.registry.iter() {
            let snapshot = self.inner.cache.snapshot(&descriptor.name);
            s.push_str(&format!(
                "  {} -> {} (singleton: {}, lazy: {}) {:?}\n",
                descriptor.name,
                descriptor.type_name(),
                descriptor.singleton,
                descriptor.lazy,
                snapshot
            ));
        }
        s.push_str(&format!("Component types: {}\n", self.inner.types.len()));
        let mut ready = self.inner.cache.ready_names();
        ready.sort();
        s.push_str(&format!("Ready: {}\n", ready.join(", ")));
        s
    }
}

impl ResolverCore for Container {
    fn resolve_by_name(&self, name: &str) -> IocResult<Instance> {
        let descriptor = self
            .inner
            .registry
            .get(name)
            .ok_or_else(|| IocError::NotFound(name.to_string()))?;

        match self.inner.cache.lookup(name)? {
            Lookup::Ready(instance) | Lookup::EarlyReference(instance) => return Ok(instance),
            Lookup::Miss => {}
        }

        let component = self
            .inner
            .types
            .get(descriptor.impl_type)
            .ok_or_else(|| IocError::NotFound(descriptor.type_name().to_string()))?;
        self.inner
            .cache
            .get_or_create(name, || self.create(descriptor, component))
    }

    fn resolve_by_type(&self, key: TypeKey) -> IocResult<Instance> {
        let names = self.inner.registry.names_of_type(key);
        match names.len() {
            0 => Err(IocError::NotFound(key.name().to_string())),
            1 => {
                debug!(implementation = key.name(), component = %names[0], "resolved type to name");
                self.resolve_by_name(&names[0])
            }
            _ => Err(IocError::AmbiguousType {
                type_name: key.name(),
                candidates: names,
            }),
        }
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("descriptors", &self.inner.registry.len())
            .field("ready", &self.inner.cache.ready_count())
            .finish()
    }
}
