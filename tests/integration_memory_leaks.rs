/// Memory integration tests
///
/// Injected cycles are `Arc` cycles. They stay alive as long as the slots hold
/// each other; `Container::shutdown` empties every slot so they can drop.

use ferrous_ioc::{ComponentCollection, ComponentType, Inject, Resolver, ResolverCore, Stereotype};
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

static DROPPED: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct Producer {
    consumer: Inject<Consumer>,
}

#[derive(Default)]
struct Consumer {
    producer: Inject<Producer>,
}

impl Drop for Producer {
    fn drop(&mut self) {
        DROPPED.fetch_add(1, Ordering::SeqCst);
    }
}

fn pipeline() -> ComponentCollection {
    let mut components = ComponentCollection::new();
    components
        .add_component(
            ComponentType::builder::<Producer>()
                .stereotype(Stereotype::Service)
                .inject_named("consumer", "consumer", |p| &p.consumer)
                .build(),
        )
        .add_component(
            ComponentType::builder::<Consumer>()
                .stereotype(Stereotype::Service)
                .inject_named("producer", "producer", |c| &c.producer)
                .build(),
        );
    components
}

#[test]
#[serial]
fn test_shutdown_releases_cycles() {
    let container = pipeline().build().unwrap();
    let producer: Weak<Producer> = Arc::downgrade(&container.get::<Producer>().unwrap());
    let consumer: Weak<Consumer> = Arc::downgrade(&container.get::<Consumer>().unwrap());
    assert!(producer.upgrade().is_some());

    let before = DROPPED.load(Ordering::SeqCst);
    container.shutdown();
    assert_eq!(container.ready_count(), 0);
    drop(container);

    assert!(producer.upgrade().is_none());
    assert!(consumer.upgrade().is_none());
    assert_eq!(DROPPED.load(Ordering::SeqCst), before + 1);
}

#[test]
#[serial]
fn test_resolution_after_shutdown_builds_fresh_instances() {
    let container = pipeline().build().unwrap();
    let old = container.resolve_by_name("producer").unwrap();
    container.shutdown();

    let fresh = container.resolve_by_name("producer").unwrap();
    assert!(!fresh.ptr_eq(&old));

    let producer = container.get::<Producer>().unwrap();
    let consumer = producer.consumer.get().unwrap();
    assert!(Arc::ptr_eq(&consumer.producer.get().unwrap(), &producer));

    // the old graph was unwired
    let old = old.downcast::<Producer>().unwrap();
    assert!(!old.consumer.is_injected());
    container.shutdown();
}
