//! Component type metadata and instance handles.
//!
//! A [`ComponentType`] is the per-type table the container consults instead of
//! reflecting over fields at runtime: how to allocate the type, which
//! interfaces it can be viewed as, its stereotype marker, and its ordered
//! injection points. It is built once with [`ComponentType::builder`].

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::key::TypeKey;

mod slot;

pub use slot::Inject;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

// Produces a boxed `Arc<U>` view of an erased object, or None if the object is not the expected type
type Caster = Arc<dyn Fn(&AnyArc) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;
type Assigner = Arc<dyn Fn(&AnyArc, &Instance) -> Result<(), String> + Send + Sync>;
type Releaser = Arc<dyn Fn(&AnyArc) + Send + Sync>;

/// Structural role marker of a component type.
///
/// Component scans only pick up marked types. Only `Controller` and `Service`
/// components receive injection; `Component` and `Repository` components are
/// treated as leaves and their slots are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stereotype {
    Component,
    Controller,
    Service,
    Repository,
}

impl Stereotype {
    /// Whether components with this marker get their slots injected.
    pub fn is_injectable(self) -> bool {
        matches!(self, Stereotype::Controller | Stereotype::Service)
    }
}

struct Interface {
    key: TypeKey,
    cast: Caster,
}

/// One declared dependency slot of a component type.
pub struct InjectionPoint {
    field: &'static str,
    target: TypeKey,
    qualifier: Option<String>,
    assign: Assigner,
    release: Releaser,
}

impl InjectionPoint {
    /// Field name, for diagnostics.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Name resolved for this slot: the qualifier, else the declared type name.
    pub fn target_name(&self) -> &str {
        self.qualifier.as_deref().unwrap_or(self.target.name())
    }

    pub(crate) fn assign(&self, object: &AnyArc, value: &Instance) -> Result<(), String> {
        (self.assign)(object, value)
    }

    pub(crate) fn release(&self, object: &AnyArc) {
        (self.release)(object)
    }
}

impl fmt::Debug for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionPoint")
            .field("field", &self.field)
            .field("target", &self.target_name())
            .finish()
    }
}

/// Metadata table for one component implementation type.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ComponentType, Inject, Stereotype};
///
/// trait PersonDao: Send + Sync {}
///
/// #[derive(Default)]
/// struct SqlPersonDao;
/// impl PersonDao for SqlPersonDao {}
///
/// #[derive(Default)]
/// struct PersonService {
///     dao: Inject<dyn PersonDao>,
/// }
///
/// let dao = ComponentType::builder::<SqlPersonDao>()
///     .stereotype(Stereotype::Repository)
///     .implements::<dyn PersonDao>(|dao| dao)
///     .build();
/// assert_eq!(dao.interfaces().count(), 1);
///
/// let service = ComponentType::builder::<PersonService>()
///     .stereotype(Stereotype::Service)
///     .inject("dao", |s| &s.dao)
///     .build();
/// assert!(service.is_injectable());
/// assert!(service.injection_points()[0].target_name().ends_with("PersonDao"));
/// ```
pub struct ComponentType {
    key: TypeKey,
    module_path: &'static str,
    stereotype: Option<Stereotype>,
    name: Option<String>,
    interfaces: Vec<Interface>,
    injection_points: Vec<InjectionPoint>,
    constructor: Arc<dyn Fn() -> AnyArc + Send + Sync>,
    cast: Caster,
}

impl ComponentType {
    /// Starts a metadata table for a type allocated with `Default`.
    pub fn builder<T: Default + Send + Sync + 'static>() -> ComponentTypeBuilder<T> {
        Self::with_constructor(T::default)
    }

    /// Starts a metadata table for a type allocated by `constructor`.
    pub fn with_constructor<T, F>(constructor: F) -> ComponentTypeBuilder<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        ComponentTypeBuilder {
            ty: ComponentType {
                key,
                module_path: module_path_of(key.name()),
                stereotype: None,
                name: None,
                interfaces: Vec::new(),
                injection_points: Vec::new(),
                constructor: Arc::new(move || Arc::new(constructor()) as AnyArc),
                cast: Arc::new(|object: &AnyArc| {
                    object
                        .clone()
                        .downcast::<T>()
                        .ok()
                        .map(|concrete| Box::new(concrete) as Box<dyn Any + Send + Sync>)
                }),
            },
            _marker: PhantomData,
        }
    }

    /// Identity of the implementation type.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Module the implementation type is declared in.
    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    pub fn stereotype(&self) -> Option<Stereotype> {
        self.stereotype
    }

    /// Name a component of this type gets when none is given: the explicit
    /// name, else the simple type name with its first letter lowercased.
    ///
    /// ```rust
    /// use ferrous_ioc::ComponentType;
    ///
    /// #[derive(Default)]
    /// struct PersonController;
    ///
    /// let ty = ComponentType::builder::<PersonController>().build();
    /// assert_eq!(ty.default_name(), "personController");
    ///
    /// let named = ComponentType::builder::<PersonController>().named("people").build();
    /// assert_eq!(named.default_name(), "people");
    /// ```
    pub fn default_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let mut chars = self.key.simple_name().chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Whether instances of this type get their slots injected.
    pub fn is_injectable(&self) -> bool {
        self.stereotype.map_or(false, Stereotype::is_injectable)
    }

    /// Interfaces this type can be viewed as.
    pub fn interfaces(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.interfaces.iter().map(|i| i.key)
    }

    /// Injection points in declaration order.
    pub fn injection_points(&self) -> &[InjectionPoint] {
        &self.injection_points
    }

    pub(crate) fn allocate(&self) -> AnyArc {
        (self.constructor)()
    }

    pub(crate) fn cast_to<U: ?Sized + 'static>(&self, object: &AnyArc) -> Option<Arc<U>> {
        let wanted = TypeId::of::<U>();
        let cast = if wanted == self.key.id() {
            &self.cast
        } else {
            &self.interfaces.iter().find(|i| i.key.id() == wanted)?.cast
        };
        cast(object)?.downcast::<Arc<U>>().ok().map(|view| *view)
    }

    /// Empties every slot of `object` so injected reference cycles can be dropped.
    pub(crate) fn release(&self, object: &AnyArc) {
        for point in &self.injection_points {
            point.release(object);
        }
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentType")
            .field("type", &self.key.name())
            .field("stereotype", &self.stereotype)
            .field("interfaces", &self.interfaces().map(|k| k.name()).collect::<Vec<_>>())
            .field("injection_points", &self.injection_points)
            .finish()
    }
}

/// Builder for [`ComponentType`].
pub struct ComponentTypeBuilder<T> {
    ty: ComponentType,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ComponentTypeBuilder<T> {
    /// Marks the type with a stereotype.
    pub fn stereotype(mut self, stereotype: Stereotype) -> Self {
        self.ty.stereotype = Some(stereotype);
        self
    }

    /// Gives the component an explicit name for component scans.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.ty.name = Some(name.into());
        self
    }

    /// Overrides the module path used by component scans.
    pub fn module_path(mut self, module_path: &'static str) -> Self {
        self.ty.module_path = module_path;
        self
    }

    /// Declares that the type can be viewed as interface `I`.
    ///
    /// `upcast` is usually the identity closure `|c| c`, which lets the
    /// compiler perform the unsizing coercion to `Arc<I>`.
    pub fn implements<I>(mut self, upcast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let cast: Caster = Arc::new(move |object: &AnyArc| {
            object
                .clone()
                .downcast::<T>()
                .ok()
                .map(|concrete| Box::new(upcast(concrete)) as Box<dyn Any + Send + Sync>)
        });
        self.ty.interfaces.push(Interface {
            key: TypeKey::of::<I>(),
            cast,
        });
        self
    }

    /// Declares an injection point resolved by the slot's declared type name.
    pub fn inject<D>(self, field: &'static str, slot: fn(&T) -> &Inject<D>) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
    {
        self.push_point(field, None, slot)
    }

    /// Declares an injection point resolved by an explicit component name.
    pub fn inject_named<D>(
        self,
        field: &'static str,
        qualifier: impl Into<String>,
        slot: fn(&T) -> &Inject<D>,
    ) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
    {
        self.push_point(field, Some(qualifier.into()), slot)
    }

    fn push_point<D>(mut self, field: &'static str, qualifier: Option<String>, slot: fn(&T) -> &Inject<D>) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
    {
        let assign: Assigner = Arc::new(move |object: &AnyArc, value: &Instance| {
            let owner = (**object)
                .downcast_ref::<T>()
                .ok_or_else(|| format!("instance is not a {}", std::any::type_name::<T>()))?;
            let dependency = value.downcast::<D>().ok_or_else(|| {
                format!(
                    "{} cannot be assigned to {}",
                    value.type_name(),
                    std::any::type_name::<D>()
                )
            })?;
            slot(owner).set(dependency);
            Ok(())
        });
        let release: Releaser = Arc::new(move |object: &AnyArc| {
            if let Some(owner) = (**object).downcast_ref::<T>() {
                slot(owner).clear();
            }
        });
        self.ty.injection_points.push(InjectionPoint {
            field,
            target: TypeKey::of::<D>(),
            qualifier,
            assign,
            release,
        });
        self
    }

    pub fn build(self) -> ComponentType {
        self.ty
    }
}

/// Handle to a component object.
///
/// Cloning the handle shares the object. Two handles are the same component
/// when [`Instance::ptr_eq`] holds.
#[derive(Clone)]
pub struct Instance {
    object: AnyArc,
    component: Arc<ComponentType>,
}

impl Instance {
    /// Wraps an object described by `component`.
    ///
    /// Early-reference hooks use this to hand out a replacement object.
    pub fn new<T: Send + Sync + 'static>(object: Arc<T>, component: Arc<ComponentType>) -> Self {
        Self::from_any(object, component)
    }

    pub(crate) fn from_any(object: AnyArc, component: Arc<ComponentType>) -> Self {
        Self { object, component }
    }

    /// Identity of the implementation type.
    pub fn type_key(&self) -> TypeKey {
        self.component.key()
    }

    pub fn type_name(&self) -> &'static str {
        self.component.key().name()
    }

    /// Metadata of the implementation type.
    pub fn component_type(&self) -> &Arc<ComponentType> {
        &self.component
    }

    /// Views the object as `T`: the concrete type or one of its interfaces.
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.component.cast_to::<T>(&self.object)
    }

    /// Whether both handles refer to the same object.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.object) as *const (),
            Arc::as_ptr(&other.object) as *const (),
        )
    }

    pub(crate) fn object(&self) -> &AnyArc {
        &self.object
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_name())
            .field("ptr", &(Arc::as_ptr(&self.object) as *const ()))
            .finish()
    }
}

// `a::b::Type<c::D>` -> `a::b`
fn module_path_of(type_name: &'static str) -> &'static str {
    let base = match type_name.find('<') {
        Some(pos) => &type_name[..pos],
        None => type_name,
    };
    match base.rfind("::") {
        Some(pos) => &base[..pos],
        None => "",
    }
}
