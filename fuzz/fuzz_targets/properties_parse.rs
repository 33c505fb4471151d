#![no_main]

use ferrous_ioc::{ComponentScanner, ConfigSource, DescriptorSource, PropertiesConfigSource, TypeCatalog};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let source = PropertiesConfigSource::parse(text);
    assert!(source.len() <= text.lines().count());

    // every listed key must be readable back
    for key in source.keys() {
        assert!(source.get(&key).is_some());
    }

    // any scan root is accepted, and an empty catalog scans to nothing
    let catalog = TypeCatalog::new();
    let scanned = ComponentScanner::new(&catalog, text).list_descriptors().unwrap();
    assert!(scanned.is_empty());
});
