use ferrous_ioc::{
    CacheSnapshot, ComponentCollection, ComponentDescriptor, ComponentType, Inject, IocError, Resolver, ResolverCore, Stereotype,
    TypeKey,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait PersonDao: Send + Sync {
    fn name(&self, id: u32) -> String;
}

#[derive(Default)]
struct SqlPersonDao;

impl PersonDao for SqlPersonDao {
    fn name(&self, id: u32) -> String {
        format!("person-{}", id)
    }
}

#[derive(Default)]
struct PersonService {
    dao: Inject<dyn PersonDao>,
}

struct AuditLog;

#[derive(Default)]
struct PersonController {
    service: Inject<PersonService>,
}

fn person_components() -> ComponentCollection {
    let mut components = ComponentCollection::new();
    components
        .add_component(
            ComponentType::builder::<SqlPersonDao>()
                .stereotype(Stereotype::Repository)
                .implements::<dyn PersonDao>(|dao| dao)
                .build(),
        )
        .add_component(
            ComponentType::builder::<PersonService>()
                .stereotype(Stereotype::Service)
                .inject_named("dao", "sqlPersonDao", |s| &s.dao)
                .build(),
        )
        .add_component(
            ComponentType::builder::<PersonController>()
                .stereotype(Stereotype::Controller)
                .inject_named("service", "personService", |c| &c.service)
                .build(),
        );
    components
}

#[test]
fn test_eager_startup_makes_everything_ready() {
    let container = person_components().build().unwrap();

    assert_eq!(container.ready_count(), 3);
    for name in ["sqlPersonDao", "personService", "personController"] {
        let snapshot = container.cache_snapshot(name);
        assert!(snapshot.ready, "{} not ready", name);
        assert!(!snapshot.early_reference && !snapshot.factory && !snapshot.in_progress);
    }
}

#[test]
fn test_resolve_by_name_returns_same_instance() {
    let container = person_components().build().unwrap();

    let first = container.resolve_by_name("personService").unwrap();
    let second = container.resolve_by_name("personService").unwrap();
    assert!(first.ptr_eq(&second));

    let controller = container.get_named::<PersonController>("personController").unwrap();
    let service = controller.service.get().unwrap();
    assert_eq!(service.dao.get().unwrap().name(3), "person-3");
    assert!(Arc::ptr_eq(&service, &first.downcast::<PersonService>().unwrap()));
}

#[test]
fn test_view_through_interface() {
    let container = person_components().build().unwrap();

    let dao = container.get_named::<dyn PersonDao>("sqlPersonDao").unwrap();
    let concrete = container.get::<SqlPersonDao>().unwrap();
    assert_eq!(dao.name(1), "person-1");
    assert_eq!(
        Arc::as_ptr(&dao) as *const (),
        Arc::as_ptr(&concrete) as *const ()
    );
}

#[test]
fn test_missing_name() {
    let container = person_components().build().unwrap();
    match container.resolve_by_name("orderService") {
        Err(IocError::NotFound(name)) => assert_eq!(name, "orderService"),
        other => panic!("unexpected: {:?}", other.map(|i| i.type_name())),
    }
}

#[test]
fn test_type_mismatch() {
    let container = person_components().build().unwrap();
    match container.get_named::<PersonController>("personService") {
        Err(err) => assert_eq!(
            err,
            IocError::TypeMismatch {
                name: "personService".to_string(),
                expected: std::any::type_name::<PersonController>(),
            }
        ),
        Ok(_) => panic!("personService resolved as a controller"),
    }
}

#[test]
fn test_resolve_by_type_zero_one_many() {
    let mut components = person_components();
    components.add_descriptor(ComponentDescriptor::of::<PersonService>("backupPersonService"));
    let container = components.build().unwrap();

    // exactly one
    let controller = container.resolve_by_type(TypeKey::of::<PersonController>()).unwrap();
    assert!(controller.ptr_eq(&container.resolve_by_name("personController").unwrap()));

    // more than one
    match container.get::<PersonService>() {
        Err(IocError::AmbiguousType { type_name, candidates }) => {
            assert_eq!(type_name, std::any::type_name::<PersonService>());
            assert_eq!(candidates, ["personService", "backupPersonService"]);
        }
        other => panic!("expected ambiguity, got {:?}", other.map(|_| ())),
    }

    // none
    assert_eq!(
        container.get::<String>().unwrap_err(),
        IocError::NotFound(std::any::type_name::<String>().to_string())
    );
}

#[test]
fn test_resolve_by_type_matches_implementation_only() {
    let container = person_components().build().unwrap();
    assert!(matches!(
        container.resolve_by_type(TypeKey::of::<dyn PersonDao>()),
        Err(IocError::NotFound(_))
    ));
}

#[test]
fn test_duplicate_descriptor_fails_startup() {
    let mut components = person_components();
    components.add_descriptor(ComponentDescriptor::of::<SqlPersonDao>("personService"));
    assert_eq!(
        components.build().unwrap_err(),
        IocError::DuplicateDescriptor("personService".to_string())
    );
}

#[test]
fn test_duplicate_descriptor_constructs_nothing() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();

    let mut components = person_components();
    components
        .add_type(
            ComponentType::with_constructor(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                AuditLog
            })
            .stereotype(Stereotype::Component)
            .build(),
        )
        .add_descriptor(ComponentDescriptor::of::<AuditLog>("auditLog"))
        .add_descriptor(ComponentDescriptor::of::<AuditLog>("personController"));

    match components.build() {
        Err(err) => assert_eq!(err, IocError::DuplicateDescriptor("personController".to_string())),
        Ok(_) => panic!("duplicate name accepted"),
    }
    assert_eq!(built.load(Ordering::SeqCst), 0);
}

#[test]
fn test_lazy_descriptor_built_on_first_use() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();

    let mut components = ComponentCollection::new();
    components
        .add_type(
            ComponentType::with_constructor(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                SqlPersonDao
            })
            .build(),
        )
        .add_descriptor(ComponentDescriptor::of::<SqlPersonDao>("dao").lazy(true));

    let container = components.build().unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 0);
    assert!(!container.cache_snapshot("dao").ready);

    let first = container.resolve_by_name("dao").unwrap();
    let second = container.resolve_by_name("dao").unwrap();
    assert!(first.ptr_eq(&second));
    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert!(container.cache_snapshot("dao").ready);
}

#[test]
fn test_build_lazy_constructs_nothing() {
    let container = person_components().build_lazy().unwrap();
    assert_eq!(container.ready_count(), 0);
    assert!(container.contains("personController"));

    // resolving the top pulls in its dependencies
    container.resolve_by_name("personController").unwrap();
    assert_eq!(container.ready_count(), 3);
}

#[test]
fn test_failed_injection_is_fail_fast_and_retryable() {
    let mut components = ComponentCollection::new();
    components.add_component(
        ComponentType::builder::<PersonService>()
            .stereotype(Stereotype::Service)
            .inject_named("dao", "nobody", |s| &s.dao)
            .build(),
    );
    assert_eq!(
        components.build().err(),
        Some(IocError::NotFound("nobody".to_string()))
    );

    let mut components = ComponentCollection::new();
    components.add_component(
        ComponentType::builder::<PersonService>()
            .stereotype(Stereotype::Service)
            .inject_named("dao", "nobody", |s| &s.dao)
            .build(),
    );
    let container = components.build_lazy().unwrap();
    for _ in 0..2 {
        // a retry reports the same failure, never a construction conflict
        assert_eq!(
            container.resolve_by_name("personService").unwrap_err(),
            IocError::NotFound("nobody".to_string())
        );
        assert_eq!(container.cache_snapshot("personService"), CacheSnapshot::default());
    }
}

#[test]
fn test_slot_of_wrong_type_is_injection_failure() {
    #[derive(Default)]
    struct Broken {
        dao: Inject<dyn PersonDao>,
    }

    let mut components = ComponentCollection::new();
    components
        .add_component(ComponentType::builder::<PersonController>().build())
        .add_component(
            ComponentType::builder::<Broken>()
                .stereotype(Stereotype::Service)
                .inject_named("dao", "personController", |b| &b.dao)
                .build(),
        );

    match components.build() {
        Err(IocError::InjectionFailure { component, field, reason }) => {
            assert_eq!(component, "broken");
            assert_eq!(field, "dao");
            assert!(reason.contains("PersonController"), "{}", reason);
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_descriptor_listing() {
    let container = person_components().build_lazy().unwrap();
    let names: Vec<&str> = container.descriptors().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["sqlPersonDao", "personService", "personController"]);

    let descriptor = container.descriptor("personService").unwrap();
    assert!(descriptor.singleton && !descriptor.lazy);
    assert_eq!(descriptor.type_name(), std::any::type_name::<PersonService>());
}
