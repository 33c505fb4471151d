//! Tiered singleton cache.
//!
//! Three tiers hold a component on its way to being fully built:
//!
//! - **ready**: constructed and injected, terminal
//! - **early**: allocated but not yet injected, handed out to break a cycle
//! - **factories**: deferred constructors that produce the early reference
//!
//! plus the set of names currently in construction. A request for a name that
//! is in construction is a cycle; it is answered from the early or factory
//! tier instead of starting a second construction.
//!
//! Everything except the ready fast path runs under one reentrant lock, so the
//! thread that is building a component can re-enter while other threads wait.
//! State behind the lock lives in a `RefCell`; borrows never span a call out
//! to a constructor, hook or injector.

use std::cell::RefCell;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};
use tracing::{debug, trace};

use crate::component::{ComponentType, Instance};
use crate::descriptors::ComponentDescriptor;
use crate::error::{IocError, IocResult};
use crate::internal::instance_cache::InstanceCache;
use crate::internal::{Map, Set};

/// Invoke-once capability producing the early reference for one name.
pub(crate) type DeferredConstructor = Box<dyn FnOnce() -> IocResult<Instance> + Send>;

/// Outcome of a cache lookup.
pub(crate) enum Lookup {
    Ready(Instance),
    EarlyReference(Instance),
    Miss,
}

/// Which tiers hold an entry for a name.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ComponentCollection, ComponentType, ComponentDescriptor, Stereotype};
///
/// #[derive(Default)]
/// struct Clock;
///
/// let mut components = ComponentCollection::new();
/// components.add_component(ComponentType::builder::<Clock>().stereotype(Stereotype::Component).build());
/// let container = components.build().unwrap();
///
/// let snapshot = container.cache_snapshot("clock");
/// assert!(snapshot.ready);
/// assert!(!snapshot.early_reference && !snapshot.factory && !snapshot.in_progress);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub ready: bool,
    pub early_reference: bool,
    pub factory: bool,
    pub in_progress: bool,
}

#[derive(Default)]
struct Tiers {
    early: Map<String, Instance>,
    factories: Map<String, DeferredConstructor>,
    in_progress: Set<String>,
    raw: InstanceCache,
}

pub(crate) struct SingletonCache {
    ready: RwLock<Map<String, Instance>>,
    tiers: ReentrantMutex<RefCell<Tiers>>,
}

/// Clears a name's in-progress marker, deferred constructor and early
/// reference when construction ends, however it ends.
struct InProgressGuard<'a> {
    tiers: &'a RefCell<Tiers>,
    name: String,
}

impl<'a> InProgressGuard<'a> {
    fn enter(tiers: &'a RefCell<Tiers>, name: &str) -> Self {
        tiers.borrow_mut().in_progress.insert(name.to_string());
        Self {
            tiers,
            name: name.to_string(),
        }
    }
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        // try_borrow_mut: a panic may unwind through a live borrow
        if let Ok(mut tiers) = self.tiers.try_borrow_mut() {
            tiers.in_progress.remove(&self.name);
            tiers.factories.remove(&self.name);
            tiers.early.remove(&self.name);
        }
    }
}

impl SingletonCache {
    pub(crate) fn new() -> Self {
        Self {
            ready: RwLock::new(Map::default()),
            tiers: ReentrantMutex::new(RefCell::new(Tiers::default())),
        }
    }

    /// Ready instance for `name`, if committed.
    #[inline]
    pub(crate) fn ready(&self, name: &str) -> Option<Instance> {
        self.ready.read().get(name).cloned()
    }

    /// Read path: ready tier, then (for names in construction) early and factory tiers.
    pub(crate) fn lookup(&self, name: &str) -> IocResult<Lookup> {
        if let Some(instance) = self.ready(name) {
            trace!(component = name, "ready cache hit");
            return Ok(Lookup::Ready(instance));
        }

        let guard = self.tiers.lock();
        if !guard.borrow().in_progress.contains(name) {
            return Ok(Lookup::Miss);
        }
        if let Some(early) = guard.borrow().early.get(name) {
            trace!(component = name, "early reference hit");
            return Ok(Lookup::EarlyReference(early.clone()));
        }

        let factory = guard.borrow_mut().factories.remove(name);
        let Some(factory) = factory else {
            return Ok(Lookup::Miss);
        };
        match factory() {
            Ok(early) => {
                debug!(component = name, "exposing early reference");
                guard
                    .borrow_mut()
                    .early
                    .insert(name.to_string(), early.clone());
                Ok(Lookup::EarlyReference(early))
            }
            Err(err) => match self.ready(name) {
                Some(instance) => Ok(Lookup::Ready(instance)),
                None => Err(err),
            },
        }
    }

    /// Write path: builds `name` with `create` unless another caller already has.
    ///
    /// `create` runs with `name` marked in progress and may re-enter the cache
    /// through [`SingletonCache::lookup`] and this method for other names.
    pub(crate) fn get_or_create<F>(&self, name: &str, create: F) -> IocResult<Instance>
    where
        F: FnOnce() -> IocResult<Instance>,
    {
        let guard = self.tiers.lock();
        if let Some(instance) = self.ready(name) {
            return Ok(instance);
        }
        if guard.borrow().in_progress.contains(name) {
            return Err(IocError::ConcurrentConstructionConflict(name.to_string()));
        }

        let in_progress = InProgressGuard::enter(&guard, name);
        debug!(component = name, "constructing");
        let result = match create() {
            Ok(created) => Ok(self.commit(&guard, name, created)),
            Err(err) => match self.ready(name) {
                Some(instance) => Ok(instance),
                None => Err(err),
            },
        };
        drop(in_progress);
        result
    }

    // An exposed early reference wins over the created instance so every caller sees one object
    fn commit(&self, tiers: &RefCell<Tiers>, name: &str, created: Instance) -> Instance {
        let mut tiers = tiers.borrow_mut();
        let exposed = tiers.early.remove(name);
        tiers.factories.remove(name);
        let committed = exposed.unwrap_or(created);
        self.ready
            .write()
            .insert(name.to_string(), committed.clone());
        debug!(component = name, "committed");
        committed
    }

    /// Registers the deferred constructor for `name` unless it is already ready.
    pub(crate) fn add_factory(&self, name: &str, factory: DeferredConstructor) {
        let guard = self.tiers.lock();
        if self.ready.read().contains_key(name) {
            return;
        }
        let mut tiers = guard.borrow_mut();
        tiers.factories.insert(name.to_string(), factory);
        tiers.early.remove(name);
    }

    /// Returns the raw instance for `descriptor`, allocating it on first use.
    ///
    /// Singletons re-use any raw object already recorded under the declared name.
    pub(crate) fn instantiate(
        &self,
        descriptor: &ComponentDescriptor,
        component: &Arc<ComponentType>,
    ) -> Instance {
        let guard = self.tiers.lock();
        if descriptor.singleton {
            if let Some(raw) = guard.borrow().raw.get(&descriptor.name) {
                trace!(component = %descriptor.name, "re-using raw instance");
                return raw.clone();
            }
        }
        let raw = Instance::from_any(component.allocate(), component.clone());
        guard.borrow_mut().raw.insert(&descriptor.name, &raw);
        raw
    }

    pub(crate) fn snapshot(&self, name: &str) -> CacheSnapshot {
        let guard = self.tiers.lock();
        let tiers = guard.borrow();
        CacheSnapshot {
            ready: self.ready.read().contains_key(name),
            early_reference: tiers.early.contains_key(name),
            factory: tiers.factories.contains_key(name),
            in_progress: tiers.in_progress.contains(name),
        }
    }

    pub(crate) fn ready_count(&self) -> usize {
        self.ready.read().len()
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn ready_names(&self) -> Vec<String> {
        self.ready.read().keys().cloned().collect()
    }

    /// Empties every tier and releases the slots of every known instance.
    pub(crate) fn clear(&self) {
        let guard = self.tiers.lock();
        let mut released: Vec<Instance> = self.ready.write().drain().map(|(_, i)| i).collect();
        {
            let mut tiers = guard.borrow_mut();
            released.extend(tiers.early.drain().map(|(_, i)| i));
            released.extend(tiers.raw.drain());
            tiers.factories.clear();
            tiers.in_progress.clear();
        }
        for instance in &released {
            instance.component_type().release(instance.object());
        }
        debug!(released = released.len(), "singleton cache cleared");
    }
}
