//! # ferrous-ioc
//!
//! Singleton component container with field injection and cycle-tolerant construction.
//!
//! ## Features
//!
//! - **Named singletons**: every component is registered under a logical name
//!   and built at most once
//! - **Field injection**: components declare [`Inject`] slots that the
//!   container fills after allocation
//! - **Circular dependencies**: `A -> B -> A` resolves to one shared `A`,
//!   exposed early to its cycle partners through a tiered cache
//! - **Component scan**: descriptors can be derived from a [`TypeCatalog`]
//!   filtered by [`Stereotype`] and module path
//! - **Thread-safe**: ready components are read lock-free of the
//!   construction lock; constructions are serialized
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{ComponentCollection, ComponentType, Inject, Resolver, Stereotype};
//! use std::sync::Arc;
//!
//! trait PersonDao: Send + Sync {
//!     fn find(&self, id: u32) -> String;
//! }
//!
//! #[derive(Default)]
//! struct MemoryPersonDao;
//! impl PersonDao for MemoryPersonDao {
//!     fn find(&self, id: u32) -> String {
//!         format!("person-{}", id)
//!     }
//! }
//!
//! #[derive(Default)]
//! struct PersonService {
//!     dao: Inject<dyn PersonDao>,
//! }
//!
//! let mut components = ComponentCollection::new();
//! components
//!     .add_component(
//!         ComponentType::builder::<MemoryPersonDao>()
//!             .stereotype(Stereotype::Repository)
//!             .implements::<dyn PersonDao>(|dao| dao)
//!             .build(),
//!     )
//!     .add_component(
//!         ComponentType::builder::<PersonService>()
//!             .stereotype(Stereotype::Service)
//!             .inject_named("dao", "memoryPersonDao", |s| &s.dao)
//!             .build(),
//!     );
//!
//! let container = components.build().unwrap();
//! let service = container.get::<PersonService>().unwrap();
//! assert_eq!(service.dao.get().unwrap().find(7), "person-7");
//! ```
//!
//! ## Circular Dependencies
//!
//! ```rust
//! use ferrous_ioc::{ComponentCollection, ComponentType, Inject, Resolver, Stereotype};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Ping {
//!     pong: Inject<Pong>,
//! }
//!
//! #[derive(Default)]
//! struct Pong {
//!     ping: Inject<Ping>,
//! }
//!
//! let mut components = ComponentCollection::new();
//! components
//!     .add_component(
//!         ComponentType::builder::<Ping>()
//!             .stereotype(Stereotype::Controller)
//!             .inject_named("pong", "pong", |p| &p.pong)
//!             .build(),
//!     )
//!     .add_component(
//!         ComponentType::builder::<Pong>()
//!             .stereotype(Stereotype::Service)
//!             .inject_named("ping", "ping", |p| &p.ping)
//!             .build(),
//!     );
//!
//! let container = components.build().unwrap();
//! let ping = container.get_named::<Ping>("ping").unwrap();
//! let pong = ping.pong.get().unwrap();
//! assert!(Arc::ptr_eq(&pong.ping.get().unwrap(), &ping));
//! container.shutdown();
//! ```
//!
//! ## Component Scan
//!
//! ```rust
//! use ferrous_ioc::{Container, ComponentType, Resolver, Stereotype, TypeCatalog};
//!
//! #[derive(Default)]
//! struct Greeter;
//!
//! let mut catalog = TypeCatalog::new();
//! catalog.register(
//!     ComponentType::builder::<Greeter>()
//!         .stereotype(Stereotype::Component)
//!         .module_path("demo::app")
//!         .build(),
//! );
//!
//! # use std::io::Write;
//! # let mut file = tempfile::Builder::new().suffix(".properties").tempfile().unwrap();
//! # file.write_all(b"scanPackage=demo.app\n").unwrap();
//! # let path = file.path();
//! // application.properties: scanPackage=demo.app
//! let location = format!("classpath:{}", path.display());
//!
//! let container = Container::from_config(&[location.as_str()], &catalog).unwrap();
//! assert!(container.get_named::<Greeter>("greeter").is_ok());
//! ```

// Module declarations
pub mod collection;
pub mod component;
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod hook;
pub mod key;
pub mod observer;
pub mod scan;
pub mod traits;

// Internal modules
mod injector;
mod internal;
mod registration;

// Re-exports
pub use collection::{ComponentCollection, ComponentCollectionExt, ComponentModule};
pub use component::{ComponentType, ComponentTypeBuilder, Inject, InjectionPoint, Instance, Stereotype};
pub use config::{ConfigProvider, ConfigSource, ConfigValue, EnvironmentConfigSource, PropertiesConfigSource};
#[cfg(feature = "config")]
pub use config::JsonConfigSource;
pub use container::Container;
pub use descriptors::ComponentDescriptor;
pub use error::{IocError, IocResult};
pub use hook::{EarlyReferenceHook, IdentityHook};
pub use internal::singletons::CacheSnapshot;
pub use key::{key_of_type, TypeKey};
pub use observer::{ContainerObserver, LoggingObserver};
pub use scan::{ComponentScanner, DescriptorSource, TypeCatalog};
pub use traits::{Resolver, ResolverCore};
