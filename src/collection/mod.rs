//! Component collection module.
//!
//! This module contains the [`ComponentCollection`] builder, which gathers
//! component types, descriptors, observers and the early-reference hook and
//! turns them into a started [`Container`].

use std::sync::Arc;

use crate::component::ComponentType;
use crate::container::Container;
use crate::descriptors::ComponentDescriptor;
use crate::error::{IocError, IocResult};
use crate::hook::{EarlyReferenceHook, IdentityHook};
use crate::observer::{ContainerObserver, Observers};
use crate::registration::{DescriptorRegistry, TypeTable};
use crate::scan::{DescriptorSource, TypeCatalog};

pub mod module_system;
pub use module_system::*;

/// Builder for a [`Container`].
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ComponentCollection, ComponentDescriptor, ComponentType, Inject, Resolver, Stereotype};
///
/// #[derive(Default)]
/// struct Repository;
///
/// #[derive(Default)]
/// struct Service {
///     repository: Inject<Repository>,
/// }
///
/// let mut components = ComponentCollection::new();
/// components
///     .add_type(ComponentType::builder::<Repository>().stereotype(Stereotype::Repository).build())
///     .add_descriptor(ComponentDescriptor::of::<Repository>("repo"))
///     .add_component(
///         ComponentType::builder::<Service>()
///             .stereotype(Stereotype::Service)
///             .inject_named("repository", "repo", |s| &s.repository)
///             .build(),
///     );
///
/// let container = components.build().unwrap();
/// let service = container.get_named::<Service>("service").unwrap();
/// assert!(service.repository.is_injected());
/// ```
pub struct ComponentCollection {
    descriptors: Vec<ComponentDescriptor>,
    types: TypeTable,
    observers: Observers,
    hook: Arc<dyn EarlyReferenceHook>,
}

impl ComponentCollection {
    /// Creates a new empty collection.
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            types: TypeTable::new(),
            observers: Observers::new(),
            hook: Arc::new(IdentityHook),
        }
    }

    /// Registers the metadata of a component type without naming a component.
    pub fn add_type(&mut self, ty: ComponentType) -> &mut Self {
        self.types.insert(Arc::new(ty));
        self
    }

    /// Registers every type of a catalog.
    pub fn add_catalog(&mut self, catalog: &TypeCatalog) -> &mut Self {
        for ty in catalog.iter() {
            self.types.insert(ty.clone());
        }
        self
    }

    /// Registers a component type together with an eager singleton descriptor
    /// named after the type (see [`ComponentType::default_name`]).
    pub fn add_component(&mut self, ty: ComponentType) -> &mut Self {
        let descriptor = ComponentDescriptor::new(ty.default_name(), ty.key());
        self.add_type(ty).add_descriptor(descriptor)
    }

    /// Adds one descriptor. Duplicate names are reported by [`ComponentCollection::build`].
    pub fn add_descriptor(&mut self, descriptor: ComponentDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn add_descriptors<I>(&mut self, descriptors: I) -> &mut Self
    where
        I: IntoIterator<Item = ComponentDescriptor>,
    {
        self.descriptors.extend(descriptors);
        self
    }

    /// Adds every descriptor a source lists.
    pub fn add_source(&mut self, source: &dyn DescriptorSource) -> IocResult<&mut Self> {
        let descriptors = source.list_descriptors()?;
        Ok(self.add_descriptors(descriptors))
    }

    /// Adds a construction observer.
    pub fn add_observer(&mut self, observer: Arc<dyn ContainerObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Replaces the [`IdentityHook`] used for early references.
    pub fn with_early_reference_hook(&mut self, hook: Arc<dyn EarlyReferenceHook>) -> &mut Self {
        self.hook = hook;
        self
    }

    /// Builds the container and eagerly resolves every non-lazy descriptor.
    ///
    /// Fails fast: the first duplicate name, unknown implementation type or
    /// construction error aborts startup.
    pub fn build(self) -> IocResult<Container> {
        let container = self.build_lazy()?;
        container.eager_load()?;
        Ok(container)
    }

    /// Builds the container without constructing anything.
    pub fn build_lazy(self) -> IocResult<Container> {
        let mut registry = DescriptorRegistry::new();
        registry.register_all(self.descriptors)?;
        if let Some(orphan) = registry.iter().find(|d| self.types.get(d.impl_type).is_none()) {
            return Err(IocError::NotFound(orphan.type_name().to_string()));
        }
        Ok(Container::new(registry, self.types, self.observers, self.hook))
    }
}

impl Default for ComponentCollection {
    fn default() -> Self {
        Self::new()
    }
}
