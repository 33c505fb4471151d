//! Component scanning.
//!
//! A [`TypeCatalog`] lists the component types an application knows about.
//! [`ComponentScanner`] walks the catalog below a root module path and turns
//! every type marked with a [`Stereotype`](crate::Stereotype) into component
//! descriptors.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::component::ComponentType;
use crate::descriptors::ComponentDescriptor;
use crate::error::IocResult;

/// Anything that can list the descriptors a container should register.
pub trait DescriptorSource {
    /// Descriptors in registration order.
    fn list_descriptors(&self) -> IocResult<Vec<ComponentDescriptor>>;
}

/// Ordered set of component types, keyed by implementation type.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ComponentType, Stereotype, TypeCatalog};
///
/// #[derive(Default)]
/// struct Clock;
///
/// let mut catalog = TypeCatalog::new();
/// catalog
///     .register(ComponentType::builder::<Clock>().stereotype(Stereotype::Component).build())
///     .register(ComponentType::builder::<Clock>().build());
/// assert_eq!(catalog.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct TypeCatalog {
    types: Vec<Arc<ComponentType>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Adds a type, replacing an earlier entry for the same implementation type in place.
    pub fn register(&mut self, ty: ComponentType) -> &mut Self {
        let ty = Arc::new(ty);
        match self.types.iter_mut().find(|t| t.key() == ty.key()) {
            Some(slot) => *slot = ty,
            None => self.types.push(ty),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ComponentType>> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Descriptor source scanning a [`TypeCatalog`] below a module path.
///
/// For each marked type whose module path is `root` or lies under it, the
/// scanner emits a descriptor named after the component (its explicit name
/// or its lower-camel simple name), followed by one descriptor per implemented
/// interface named by the interface's full type name. All of them point at
/// the same implementation type.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ComponentScanner, ComponentType, DescriptorSource, Stereotype, TypeCatalog};
///
/// #[derive(Default)]
/// struct PersonController;
///
/// let mut catalog = TypeCatalog::new();
/// catalog.register(
///     ComponentType::builder::<PersonController>()
///         .stereotype(Stereotype::Controller)
///         .module_path("app::web")
///         .build(),
/// );
///
/// let descriptors = ComponentScanner::new(&catalog, "app").list_descriptors().unwrap();
/// assert_eq!(descriptors[0].name, "personController");
/// assert!(ComponentScanner::new(&catalog, "other").list_descriptors().unwrap().is_empty());
/// ```
pub struct ComponentScanner<'a> {
    catalog: &'a TypeCatalog,
    root: String,
}

impl<'a> ComponentScanner<'a> {
    /// `root` may be written with `::` or `.` separators.
    pub fn new(catalog: &'a TypeCatalog, root: &str) -> Self {
        Self {
            catalog,
            root: root.trim().replace('.', "::"),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    fn in_scope(&self, module_path: &str) -> bool {
        if self.root.is_empty() {
            return true;
        }
        match module_path.strip_prefix(self.root.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with("::"),
            None => false,
        }
    }
}

impl DescriptorSource for ComponentScanner<'_> {
    fn list_descriptors(&self) -> IocResult<Vec<ComponentDescriptor>> {
        let mut descriptors = Vec::new();
        for ty in self.catalog.iter() {
            if !self.in_scope(ty.module_path()) {
                continue;
            }
            if ty.stereotype().is_none() {
                trace!(implementation = ty.key().name(), "unmarked type skipped");
                continue;
            }
            descriptors.push(ComponentDescriptor::new(ty.default_name(), ty.key()));
            for interface in ty.interfaces() {
                descriptors.push(ComponentDescriptor::new(interface.name(), ty.key()));
            }
        }
        debug!(root = %self.root, found = descriptors.len(), "component scan finished");
        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Stereotype;

    trait Store: Send + Sync {}

    #[derive(Default)]
    struct MemoryStore;
    impl Store for MemoryStore {}

    #[derive(Default)]
    struct Plain;

    #[derive(Default)]
    struct Outside;

    fn catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog
            .register(
                ComponentType::builder::<MemoryStore>()
                    .stereotype(Stereotype::Repository)
                    .module_path("app::data")
                    .implements::<dyn Store>(|s| s)
                    .build(),
            )
            .register(ComponentType::builder::<Plain>().module_path("app").build())
            .register(
                ComponentType::builder::<Outside>()
                    .stereotype(Stereotype::Service)
                    .module_path("application")
                    .build(),
            );
        catalog
    }

    #[test]
    fn marked_types_yield_name_and_interface_descriptors() {
        let catalog = catalog();
        let descriptors = ComponentScanner::new(&catalog, "app").list_descriptors().unwrap();

        let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["memoryStore", std::any::type_name::<dyn Store>()]);
        assert!(descriptors.iter().all(|d| d.impl_type.name().ends_with("MemoryStore")));
        assert!(descriptors.iter().all(|d| d.singleton && !d.lazy));
    }

    #[test]
    fn root_matches_whole_segments() {
        let catalog = catalog();
        let scanner = ComponentScanner::new(&catalog, "app.data");
        assert_eq!(scanner.root(), "app::data");
        assert_eq!(scanner.list_descriptors().unwrap().len(), 2);

        let everything = ComponentScanner::new(&catalog, "").list_descriptors().unwrap();
        assert_eq!(everything.len(), 3);
    }
}
