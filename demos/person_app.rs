//! Person App Demo - a small layered application wired by component scan
//!
//! This example demonstrates:
//! - Registering component types in a `TypeCatalog`
//! - Starting a container from `application.properties`
//! - A controller and a service that depend on each other
//! - Interface-typed injection through the scanned interface alias
//! - Construction events logged through `tracing`
//!
//! Run with `RUST_LOG=debug cargo run --example person_app` to watch the cache tiers at work.

use ferrous_ioc::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod app {
    pub mod dao {
        pub trait PersonDao: Send + Sync {
            fn find_name(&self, id: u32) -> Option<String>;
        }

        #[derive(Default)]
        pub struct MemoryPersonDao;

        impl PersonDao for MemoryPersonDao {
            fn find_name(&self, id: u32) -> Option<String> {
                match id {
                    1 => Some("Ada".to_string()),
                    2 => Some("Grace".to_string()),
                    _ => None,
                }
            }
        }
    }

    pub mod service {
        use super::dao::PersonDao;
        use super::web::PersonController;
        use ferrous_ioc::Inject;

        #[derive(Default)]
        pub struct PersonService {
            pub dao: Inject<dyn PersonDao>,
            pub controller: Inject<PersonController>,
        }

        impl PersonService {
            pub fn greet(&self, id: u32) -> String {
                let name = self
                    .dao
                    .get()
                    .and_then(|dao| dao.find_name(id))
                    .unwrap_or_else(|| "stranger".to_string());
                format!("Hello, {}!", name)
            }
        }
    }

    pub mod web {
        use super::service::PersonService;
        use ferrous_ioc::Inject;

        #[derive(Default)]
        pub struct PersonController {
            pub service: Inject<PersonService>,
        }

        impl PersonController {
            pub fn handle(&self, id: u32) -> String {
                match self.service.get() {
                    Some(service) => service.greet(id),
                    None => "503 Service Unavailable".to_string(),
                }
            }
        }
    }
}

use app::dao::{MemoryPersonDao, PersonDao};
use app::service::PersonService;
use app::web::PersonController;

fn catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog
        .register(
            ComponentType::builder::<MemoryPersonDao>()
                .stereotype(Stereotype::Repository)
                .implements::<dyn PersonDao>(|dao| dao)
                .build(),
        )
        .register(
            ComponentType::builder::<PersonService>()
                .stereotype(Stereotype::Service)
                .inject("dao", |s| &s.dao)
                .inject_named("controller", "personController", |s| &s.controller)
                .build(),
        )
        .register(
            ComponentType::builder::<PersonController>()
                .stereotype(Stereotype::Controller)
                .inject_named("service", "personService", |c| &c.service)
                .build(),
        );
    catalog
}

fn main() -> IocResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let location = format!("classpath:{}/demos/application.properties", env!("CARGO_MANIFEST_DIR"));

    // from_config scans, registers and eagerly builds everything
    let container = Container::from_config(&[location.as_str()], &catalog())?;
    println!("Started with {} ready components", container.ready_count());

    let controller = container.get::<PersonController>()?;
    println!("GET /person/1 -> {}", controller.handle(1));
    println!("GET /person/9 -> {}", controller.handle(9));

    // the controller and service point at each other
    let service = container.get::<PersonService>()?;
    let back = service.controller.get().expect("controller injected");
    println!("Cycle closed on one controller: {}", Arc::ptr_eq(&back, &controller));

    for descriptor in container.descriptors() {
        println!("  {:<40} -> {}", descriptor.name, descriptor.type_name());
    }

    container.shutdown();
    Ok(())
}
