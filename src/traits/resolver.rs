//! Resolver traits for component resolution.

use std::sync::Arc;

use crate::component::Instance;
use crate::error::{IocError, IocResult};
use crate::key::TypeKey;

/// Core resolver trait for object-safe component resolution.
///
/// This is the seam the injector resolves dependencies through. Most users
/// should use the [`Resolver`] trait instead, which adds typed generic
/// methods on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves a component by its logical name.
    ///
    /// # Returns
    ///
    /// * `Ok(Instance)` - The ready (or, inside a cycle, early) instance
    /// * `Err(IocError)` - `NotFound`, a construction error, or a cycle that
    ///   cannot be broken
    fn resolve_by_name(&self, name: &str) -> IocResult<Instance>;

    /// Resolves the single component whose implementation type is `key`.
    ///
    /// Fails with `NotFound` for zero matches and `AmbiguousType` for more
    /// than one.
    fn resolve_by_type(&self, key: TypeKey) -> IocResult<Instance>;
}

/// High-level resolver interface with generic methods for typed resolution.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{ComponentCollection, ComponentType, Resolver, Stereotype};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// let mut components = ComponentCollection::new();
/// components.add_component(
///     ComponentType::builder::<English>()
///         .stereotype(Stereotype::Component)
///         .implements::<dyn Greeter>(|e| e)
///         .build(),
/// );
/// let container = components.build().unwrap();
///
/// // By implementation type
/// let english = container.get::<English>().unwrap();
///
/// // By name, viewed through an interface
/// let greeter = container.get_named::<dyn Greeter>("english").unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves the component implemented by `T`.
    fn get<T: Send + Sync + 'static>(&self) -> IocResult<Arc<T>> {
        let instance = self.resolve_by_type(TypeKey::of::<T>())?;
        instance.downcast::<T>().ok_or_else(|| IocError::TypeMismatch {
            name: instance.type_name().to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// Resolves the component called `name` and views it as `T`.
    ///
    /// `T` may be the implementation type or any interface it was registered with.
    fn get_named<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> IocResult<Arc<T>> {
        let instance = self.resolve_by_name(name)?;
        instance.downcast::<T>().ok_or_else(|| IocError::TypeMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
