//! Shared cache of derived enum layouts.
//!
//! Layouts are derived once per enum type and immutable afterwards, so any
//! number of threads can hold the same `Arc<SinglePayloadLayout>`. The lock
//! is only taken while looking up or deriving a layout, never while encoding
//! or decoding a buffer.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::byte_order::ByteOrder;
use crate::capability::PayloadCapability;
use crate::single_payload::SinglePayloadLayout;

/// Everything a single-payload layout is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutKey {
    pub payload_size: usize,
    pub payload_alignment: usize,
    pub payload_extra_inhabitants: u32,
    pub num_empty_cases: u32,
    pub order: ByteOrder,
}

impl LayoutKey {
    pub fn new<P: PayloadCapability + ?Sized>(
        payload: &P,
        num_empty_cases: u32,
        order: ByteOrder,
    ) -> Self {
        LayoutKey {
            payload_size: payload.size(),
            payload_alignment: payload.alignment(),
            payload_extra_inhabitants: payload.extra_inhabitant_count(),
            num_empty_cases,
            order,
        }
    }

    fn derive(self) -> SinglePayloadLayout {
        SinglePayloadLayout::from_parts(
            self.payload_size,
            self.payload_alignment,
            self.payload_extra_inhabitants,
            self.num_empty_cases,
            self.order,
        )
    }
}

/// Thread-safe memo of single-payload layouts for one byte order.
pub struct LayoutCache {
    order: ByteOrder,
    layouts: RwLock<FxHashMap<LayoutKey, Arc<SinglePayloadLayout>>>,
}

impl LayoutCache {
    pub fn new(order: ByteOrder) -> Self {
        LayoutCache {
            order,
            layouts: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Layout of the enum with `num_empty_cases` empty cases around
    /// `payload`, deriving and caching it on first use.
    pub fn get_or_compute<P: PayloadCapability + ?Sized>(
        &self,
        payload: &P,
        num_empty_cases: u32,
    ) -> Arc<SinglePayloadLayout> {
        let key = LayoutKey::new(payload, num_empty_cases, self.order);

        if let Some(layout) = self.layouts.read().get(&key) {
            tracing::trace!(?key, "layout cache hit");
            return Arc::clone(layout);
        }

        // Another thread may have derived it between the two locks.
        let mut layouts = self.layouts.write();
        let layout = layouts.entry(key).or_insert_with(|| {
            let layout = key.derive();
            tracing::debug!(
                payload_size = key.payload_size,
                payload_xi = key.payload_extra_inhabitants,
                num_empty_cases,
                tag_bytes = layout.num_tag_bytes(),
                "derived single-payload enum layout"
            );
            Arc::new(layout)
        });
        Arc::clone(layout)
    }

    /// Number of distinct layouts derived so far.
    pub fn len(&self) -> usize {
        self.layouts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.read().is_empty()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        LayoutCache::new(ByteOrder::NATIVE)
    }
}

#[cfg(test)]
mod tests;
