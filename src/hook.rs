//! Early-reference exposure hook.

use crate::component::Instance;
use crate::descriptors::ComponentDescriptor;
use crate::error::IocResult;

/// Decides what a cycle partner receives while a component is still in construction.
///
/// The hook runs at most once per construction, the first time a dependency
/// cycle asks for the component. Whatever it returns becomes the component's
/// early reference and, once construction finishes, the committed instance,
/// so every caller ends up holding the same object. This is the place to wrap
/// an instance in a proxy; the default [`IdentityHook`] hands out the raw
/// instance unchanged.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ComponentDescriptor, EarlyReferenceHook, Instance, IocResult};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct CountingHook {
///     exposed: AtomicUsize,
/// }
///
/// impl EarlyReferenceHook for CountingHook {
///     fn early_reference(&self, _descriptor: &ComponentDescriptor, raw: Instance) -> IocResult<Instance> {
///         self.exposed.fetch_add(1, Ordering::SeqCst);
///         Ok(raw)
///     }
/// }
/// ```
pub trait EarlyReferenceHook: Send + Sync {
    /// Produces the early reference for `descriptor` from its raw instance.
    fn early_reference(&self, descriptor: &ComponentDescriptor, raw: Instance) -> IocResult<Instance>;
}

/// Hook that exposes the raw instance itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityHook;

impl EarlyReferenceHook for IdentityHook {
    #[inline]
    fn early_reference(&self, _descriptor: &ComponentDescriptor, raw: Instance) -> IocResult<Instance> {
        Ok(raw)
    }
}
