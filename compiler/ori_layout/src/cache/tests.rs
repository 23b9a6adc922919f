#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;

use super::*;
use crate::capability::{OpaqueBytes, ValidRange};

#[test]
fn repeated_lookup_shares_layout() {
    let cache = LayoutCache::new(ByteOrder::Little);
    assert!(cache.is_empty());

    let byte = OpaqueBytes::new(1);
    let first = cache.get_or_compute(&byte, 512);
    let second = cache.get_or_compute(&byte, 512);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.size(), 2);
    assert_eq!(cache.len(), 1);
}

#[test]
fn distinct_payloads_get_distinct_layouts() {
    let cache = LayoutCache::new(ByteOrder::Big);
    let plain = cache.get_or_compute(&OpaqueBytes::new(1), 4);
    let spare = cache.get_or_compute(&ValidRange::bool(), 4);

    assert_eq!(plain.num_tag_bytes(), 1);
    assert_eq!(spare.num_tag_bytes(), 0);
    assert_eq!(spare.byte_order(), ByteOrder::Big);
    assert_eq!(cache.len(), 2);
}

#[test]
fn payloads_with_equal_metrics_share_layout() {
    let cache = LayoutCache::default();
    let a = cache.get_or_compute(&OpaqueBytes::new(4), 1);
    let b = cache.get_or_compute(&OpaqueBytes::new(4), 1);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.byte_order(), ByteOrder::NATIVE);
}

#[test]
fn concurrent_lookups_agree() {
    let cache = Arc::new(LayoutCache::new(ByteOrder::Little));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get_or_compute(&OpaqueBytes::new(2), 70_000))
        })
        .collect();

    let layouts: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    for layout in &layouts {
        assert!(Arc::ptr_eq(layout, &layouts[0]));
    }
    assert_eq!(cache.len(), 1);
}
