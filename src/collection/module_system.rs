//! Component module system for grouped registration.

use crate::collection::ComponentCollection;
use crate::error::IocResult;

/// A module that registers a group of component types and descriptors.
///
/// # Example
///
/// ```rust
/// use ferrous_ioc::{
///     ComponentCollection, ComponentCollectionExt, ComponentModule, ComponentType, IocResult,
///     Resolver, Stereotype,
/// };
///
/// #[derive(Default)]
/// struct AuditLog;
///
/// struct AuditModule;
///
/// impl ComponentModule for AuditModule {
///     fn register_components(self, components: &mut ComponentCollection) -> IocResult<()> {
///         components.add_component(
///             ComponentType::builder::<AuditLog>()
///                 .stereotype(Stereotype::Repository)
///                 .build(),
///         );
///         Ok(())
///     }
/// }
///
/// # fn main() -> IocResult<()> {
/// let mut components = ComponentCollection::new();
/// components.add_module(AuditModule)?;
/// let container = components.build()?;
/// assert!(container.get::<AuditLog>().is_ok());
/// # Ok(())
/// # }
/// ```
pub trait ComponentModule {
    /// Register this module's components with the collection.
    fn register_components(self, components: &mut ComponentCollection) -> IocResult<()>;
}

/// Extension trait adding module registration to [`ComponentCollection`].
pub trait ComponentCollectionExt {
    /// Adds a module in place, returning the collection for chaining.
    fn add_module<M: ComponentModule>(&mut self, module: M) -> IocResult<&mut Self>;
}

impl ComponentCollectionExt for ComponentCollection {
    fn add_module<M: ComponentModule>(&mut self, module: M) -> IocResult<&mut Self> {
        module.register_components(self)?;
        Ok(self)
    }
}
