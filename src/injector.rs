//! Slot injection.

use tracing::trace;

use crate::component::Instance;
use crate::error::{IocError, IocResult};
use crate::traits::ResolverCore;

/// Wires a raw instance's declared slots.
///
/// Only `Controller` and `Service` components are injected; instances of any
/// other stereotype are returned untouched even if they declare slots. Each
/// slot resolves its qualifier, or else its declared type name, through the
/// resolver. Resolving re-enters the container, which is how a cycle reaches
/// the early reference of a component that is still being injected.
pub(crate) struct Injector<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> Injector<'a> {
    pub(crate) fn new(resolver: &'a dyn ResolverCore) -> Self {
        Self { resolver }
    }

    /// Fills every slot of `raw`, the instance being built under `name`.
    pub(crate) fn inject(&self, name: &str, raw: &Instance) -> IocResult<()> {
        let component = raw.component_type();
        if !component.is_injectable() {
            trace!(component = name, "stereotype not injectable, skipping slots");
            return Ok(());
        }

        for point in component.injection_points() {
            let target = point.target_name();
            trace!(component = name, field = point.field(), target, "injecting");
            let dependency = self.resolver.resolve_by_name(target)?;
            point
                .assign(raw.object(), &dependency)
                .map_err(|reason| IocError::InjectionFailure {
                    component: name.to_string(),
                    field: point.field(),
                    reason,
                })?;
        }
        Ok(())
    }
}
