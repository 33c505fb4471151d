/// Tests for grouped registration through component modules

use ferrous_ioc::{
    ComponentCollection, ComponentCollectionExt, ComponentDescriptor, ComponentModule, ComponentType, Inject,
    IocError, IocResult, Resolver, Stereotype,
};
use std::sync::Arc;

#[derive(Default)]
struct OrderRepository;

#[derive(Default)]
struct OrderService {
    repository: Inject<OrderRepository>,
}

struct PersistenceModule;

impl ComponentModule for PersistenceModule {
    fn register_components(self, components: &mut ComponentCollection) -> IocResult<()> {
        components.add_component(
            ComponentType::builder::<OrderRepository>()
                .stereotype(Stereotype::Repository)
                .build(),
        );
        Ok(())
    }
}

struct ServiceModule {
    repository_name: &'static str,
}

impl ComponentModule for ServiceModule {
    fn register_components(self, components: &mut ComponentCollection) -> IocResult<()> {
        components.add_component(
            ComponentType::builder::<OrderService>()
                .stereotype(Stereotype::Service)
                .inject_named("repository", self.repository_name, |s| &s.repository)
                .build(),
        );
        Ok(())
    }
}

struct RejectingModule;

impl ComponentModule for RejectingModule {
    fn register_components(self, _components: &mut ComponentCollection) -> IocResult<()> {
        Err(IocError::Config("module disabled".to_string()))
    }
}

#[test]
fn test_modules_compose() -> IocResult<()> {
    let mut components = ComponentCollection::new();
    components
        .add_module(PersistenceModule)?
        .add_module(ServiceModule {
            repository_name: "orderRepository",
        })?;

    let container = components.build()?;
    let service = container.get::<OrderService>()?;
    let repository = container.get::<OrderRepository>()?;
    assert!(Arc::ptr_eq(&service.repository.get().unwrap(), &repository));
    Ok(())
}

#[test]
fn test_module_order_does_not_matter() -> IocResult<()> {
    let mut components = ComponentCollection::new();
    components
        .add_module(ServiceModule {
            repository_name: "orders",
        })?
        .add_descriptor(ComponentDescriptor::of::<OrderRepository>("orders"))
        .add_module(PersistenceModule)?;

    let container = components.build()?;
    assert!(container.get_named::<OrderService>("orderService")?.repository.is_injected());
    Ok(())
}

#[test]
fn test_module_error_propagates() {
    let mut components = ComponentCollection::new();
    let err = components.add_module(RejectingModule).err();
    assert_eq!(err, Some(IocError::Config("module disabled".to_string())));
}
