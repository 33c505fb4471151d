#![no_main]

use ferrous_ioc::{ComponentCollection, ComponentDescriptor, ComponentType, IocError, ResolverCore};
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

#[derive(Default)]
struct Widget;

fuzz_target!(|data: &[u8]| {
    // each byte is one descriptor: low nibble picks the name, bit 4 the lazy flag
    let descriptors: Vec<ComponentDescriptor> = data
        .iter()
        .take(64)
        .map(|b| ComponentDescriptor::of::<Widget>(format!("widget{}", b & 0x0f)).lazy(b & 0x10 != 0))
        .collect();

    let mut seen = HashSet::new();
    let duplicate = descriptors.iter().find(|d| !seen.insert(d.name.clone())).map(|d| d.name.clone());

    let mut components = ComponentCollection::new();
    components
        .add_type(ComponentType::builder::<Widget>().build())
        .add_descriptors(descriptors.clone());

    match (components.build(), duplicate) {
        (Ok(container), None) => {
            let eager = descriptors.iter().filter(|d| !d.lazy).count();
            assert_eq!(container.ready_count(), eager);
            for descriptor in &descriptors {
                let first = container.resolve_by_name(&descriptor.name).unwrap();
                let second = container.resolve_by_name(&descriptor.name).unwrap();
                assert!(first.ptr_eq(&second));
            }
            assert_eq!(container.ready_count(), descriptors.len());
        }
        (Err(IocError::DuplicateDescriptor(name)), Some(expected)) => assert_eq!(name, expected),
        (other, expected) => panic!("unexpected {:?} for {:?}", other.err(), expected),
    }
});
