//! Type identity for component lookup.

use std::any::TypeId;
use std::fmt;

/// Identity of a component implementation type or an interface.
///
/// Pairs the `TypeId` used for comparisons with the `std::any::type_name`
/// used as a lookup name. Injection points without an explicit qualifier
/// resolve their target by this name, and component scans name interface
/// descriptors after it.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{key_of_type, TypeKey};
///
/// trait Greeter: Send + Sync {}
///
/// let key = key_of_type::<String>();
/// assert_eq!(key.name(), "alloc::string::String");
/// assert_eq!(key, TypeKey::of::<String>());
///
/// // Unsized interface types have an identity too
/// let iface = key_of_type::<dyn Greeter>();
/// assert!(iface.name().starts_with("dyn "));
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Identity of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` of the identified type.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full type name, used as the lookup name for the type.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The last path segment of the type name, with generic arguments removed.
    ///
    /// ```rust
    /// use ferrous_ioc::TypeKey;
    ///
    /// assert_eq!(TypeKey::of::<String>().simple_name(), "String");
    /// assert_eq!(TypeKey::of::<Vec<u8>>().simple_name(), "Vec");
    /// ```
    pub fn simple_name(&self) -> &'static str {
        let base = match self.name.find('<') {
            Some(pos) => &self.name[..pos],
            None => self.name,
        };
        match base.rfind("::") {
            Some(pos) => &base[pos + 2..],
            None => base.trim_start_matches("dyn "),
        }
    }
}

// Equality and hashing use the TypeId only; the name is for lookups and diagnostics
impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Helper function for creating type keys
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> TypeKey {
    TypeKey::of::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod nested {
        pub struct Widget<T>(pub T);
    }

    #[test]
    fn simple_name_strips_path_and_generics() {
        assert_eq!(TypeKey::of::<nested::Widget<u8>>().simple_name(), "Widget");
        assert_eq!(TypeKey::of::<u32>().simple_name(), "u32");
    }

    #[test]
    fn equality_ignores_name() {
        let a = TypeKey::of::<u32>();
        let b = TypeKey::of::<u32>();
        assert_eq!(a, b);
        assert_ne!(a, TypeKey::of::<u64>());
    }
}
