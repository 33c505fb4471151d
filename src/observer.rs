//! Diagnostic observers for component construction.
//!
//! Observers receive construction events from the container: a component
//! starting construction, finishing it, being exposed early to break a cycle,
//! or failing. The built-in [`LoggingObserver`] forwards them to `tracing`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::IocError;

/// Observer trait for component construction events.
///
/// Observer calls are made synchronously while the container holds its
/// construction lock. Keep implementations lightweight and never resolve
/// components from inside an observer.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{ComponentCollection, ContainerObserver, IocError};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     events: Mutex<Vec<String>>,
/// }
///
/// impl ContainerObserver for Recorder {
///     fn creating(&self, name: &str, _type_name: &'static str) {
///         self.events.lock().unwrap().push(format!("creating {}", name));
///     }
///
///     fn created(&self, name: &str, _duration: Duration) {
///         self.events.lock().unwrap().push(format!("created {}", name));
///     }
///
///     fn failed(&self, name: &str, error: &IocError) {
///         self.events.lock().unwrap().push(format!("failed {}: {}", name, error));
///     }
/// }
///
/// let mut components = ComponentCollection::new();
/// components.add_observer(Arc::new(Recorder::default()));
/// let container = components.build().unwrap();
/// ```
pub trait ContainerObserver: Send + Sync {
    /// Called before a component's raw instance is allocated.
    fn creating(&self, name: &str, type_name: &'static str);

    /// Called after a component is constructed and injected, just before it
    /// is committed to the ready tier.
    fn created(&self, name: &str, duration: Duration);

    /// Called when a component in construction is handed out to a cycle partner.
    fn early_reference(&self, _name: &str) {}

    /// Called when construction of a component fails.
    fn failed(&self, name: &str, error: &IocError);
}

/// Collection of observers
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ContainerObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ContainerObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn creating(&self, name: &str, type_name: &'static str) {
        for observer in &self.observers {
            observer.creating(name, type_name);
        }
    }

    #[inline]
    pub(crate) fn created(&self, name: &str, duration: Duration) {
        for observer in &self.observers {
            observer.created(name, duration);
        }
    }

    #[inline]
    pub(crate) fn early_reference(&self, name: &str) {
        for observer in &self.observers {
            observer.early_reference(name);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, name: &str, error: &IocError) {
        for observer in &self.observers {
            observer.failed(name, error);
        }
    }
}

/// Built-in observer that logs events through `tracing`.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{ComponentCollection, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut components = ComponentCollection::new();
/// components.add_observer(Arc::new(LoggingObserver::with_prefix("[app]")));
/// let container = components.build().unwrap();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-ioc]".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerObserver for LoggingObserver {
    fn creating(&self, name: &str, type_name: &'static str) {
        info!(component = name, implementation = type_name, "{} Creating", self.prefix);
    }

    fn created(&self, name: &str, duration: Duration) {
        info!(component = name, ?duration, "{} Created", self.prefix);
    }

    fn early_reference(&self, name: &str) {
        info!(component = name, "{} Early reference exposed", self.prefix);
    }

    fn failed(&self, name: &str, error: &IocError) {
        warn!(component = name, %error, "{} Construction failed", self.prefix);
    }
}
