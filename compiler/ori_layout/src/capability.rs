//! Payload capabilities.
//!
//! The tag codec never sees a concrete payload type. Everything it needs to
//! know about the type in the payload slot comes through a
//! [`PayloadCapability`]: its size and alignment, how many of its bit
//! patterns can never be a genuine value ("extra inhabitants"), and how to
//! recognize and write those patterns.
//!
//! A capability is constructed once per concrete payload type by whoever owns
//! that type's metadata and is then shared by every enum that wraps it.
//!
//! # Built-in Capabilities
//!
//! - [`OpaqueBytes`]: raw storage, every pattern is a valid value
//! - [`ValidRange`]: an unsigned integer whose values above a maximum are
//!   reserved (`bool`, a byte with `254`/`255` reserved, ...)
//! - [`PointerLike`]: a pointer-sized integer whose lowest addresses are
//!   reserved (null, and the unmapped first page for heap objects)

use crate::byte_order::{uint_fits, ByteOrder};

/// Capability interface of a payload type, consumed by the tag codec.
///
/// Every method that takes a `payload` slice receives exactly
/// [`size`](Self::size) bytes.
pub trait PayloadCapability {
    /// Size of the payload representation in bytes.
    fn size(&self) -> usize;

    /// Required alignment in bytes (a power of two).
    fn alignment(&self) -> usize {
        1
    }

    /// Distance in bytes between consecutive elements of an array.
    fn stride(&self) -> usize {
        stride_of(self.size(), self.alignment())
    }

    /// Number of bit patterns that never occur as a genuine value.
    fn extra_inhabitant_count(&self) -> u32;

    /// Classify the pattern in `payload`.
    ///
    /// Returns `0` for a genuine value, or `k` in `1..=extra_inhabitant_count()`
    /// if `payload` holds extra inhabitant `k`.
    fn extra_inhabitant_tag(&self, payload: &[u8]) -> u32;

    /// Write extra inhabitant `tag` into `payload`.
    ///
    /// `tag` is in `1..=extra_inhabitant_count()`; `0` is never passed since
    /// genuine values are written by the payload's owner, not the codec.
    fn store_extra_inhabitant_tag(&self, payload: &mut [u8], tag: u32);
}

impl<P: PayloadCapability + ?Sized> PayloadCapability for &P {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn alignment(&self) -> usize {
        (**self).alignment()
    }

    fn stride(&self) -> usize {
        (**self).stride()
    }

    fn extra_inhabitant_count(&self) -> u32 {
        (**self).extra_inhabitant_count()
    }

    fn extra_inhabitant_tag(&self, payload: &[u8]) -> u32 {
        (**self).extra_inhabitant_tag(payload)
    }

    fn store_extra_inhabitant_tag(&self, payload: &mut [u8], tag: u32) {
        (**self).store_extra_inhabitant_tag(payload, tag);
    }
}

/// Round `size` up to `alignment`, never below one byte.
pub fn stride_of(size: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two(), "alignment {alignment} is not a power of two");
    let mask = alignment - 1;
    ((size + mask) & !mask).max(1)
}

/// Natural alignment of an integer of `size` bytes.
fn natural_alignment(size: usize) -> usize {
    if size.is_power_of_two() {
        size.min(16)
    } else {
        1
    }
}

/// Largest pattern an unsigned integer of `size` bytes can hold.
fn max_pattern(size: usize) -> u64 {
    if size >= 8 {
        u64::MAX
    } else {
        (1u64 << (size * 8)) - 1
    }
}

// ── OpaqueBytes ─────────────────────────────────────────────────

/// Raw storage with no spare patterns.
///
/// Every bit pattern is a valid value, so an enum over `OpaqueBytes` always
/// needs overflow bytes for its empty cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OpaqueBytes {
    size: usize,
    alignment: usize,
}

impl OpaqueBytes {
    pub fn new(size: usize) -> Self {
        OpaqueBytes { size, alignment: 1 }
    }

    /// Override the alignment (a power of two).
    #[must_use]
    pub fn with_alignment(mut self, alignment: usize) -> Self {
        debug_assert!(alignment.is_power_of_two());
        self.alignment = alignment;
        self
    }
}

impl PayloadCapability for OpaqueBytes {
    fn size(&self) -> usize {
        self.size
    }

    fn alignment(&self) -> usize {
        self.alignment
    }

    fn extra_inhabitant_count(&self) -> u32 {
        0
    }

    fn extra_inhabitant_tag(&self, _payload: &[u8]) -> u32 {
        0
    }

    fn store_extra_inhabitant_tag(&self, _payload: &mut [u8], tag: u32) {
        debug_assert!(false, "opaque bytes have no extra inhabitant {tag}");
    }
}

// ── ValidRange ──────────────────────────────────────────────────

/// Unsigned integer payload whose genuine values are `0..=max_valid`.
///
/// Extra inhabitant `k` is the pattern `max_valid + k`. A byte with `254` and
/// `255` reserved is `ValidRange::new(1, 253, order)`; `bool` is
/// [`ValidRange::bool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValidRange {
    size: usize,
    alignment: usize,
    max_valid: u64,
    order: ByteOrder,
}

impl ValidRange {
    /// Integer of `size` bytes (`1..=8`) whose values above `max_valid`
    /// are reserved.
    ///
    /// Returns `None` if `size` is out of range or `max_valid` does not fit.
    pub fn new(size: usize, max_valid: u64, order: ByteOrder) -> Option<Self> {
        if size == 0 || size > 8 || !uint_fits(max_valid, size) {
            return None;
        }
        Some(ValidRange {
            size,
            alignment: natural_alignment(size),
            max_valid,
            order,
        })
    }

    /// Integer of `size` bytes with its top `reserved` patterns reserved.
    pub fn with_reserved(size: usize, reserved: u32, order: ByteOrder) -> Option<Self> {
        if size == 0 || size > 8 {
            return None;
        }
        let max_valid = max_pattern(size).checked_sub(u64::from(reserved))?;
        Self::new(size, max_valid, order)
    }

    /// Override the natural alignment (a power of two).
    #[must_use]
    pub fn with_alignment(mut self, alignment: usize) -> Self {
        debug_assert!(alignment.is_power_of_two());
        self.alignment = alignment;
        self
    }

    /// One-byte boolean: `0` and `1` are genuine, `2..=255` are spare.
    pub fn bool() -> Self {
        ValidRange {
            size: 1,
            alignment: 1,
            max_valid: 1,
            order: ByteOrder::NATIVE,
        }
    }

    pub fn max_valid(&self) -> u64 {
        self.max_valid
    }
}

impl PayloadCapability for ValidRange {
    fn size(&self) -> usize {
        self.size
    }

    fn alignment(&self) -> usize {
        self.alignment
    }

    fn extra_inhabitant_count(&self) -> u32 {
        let spare = max_pattern(self.size) - self.max_valid;
        u32::try_from(spare).unwrap_or(u32::MAX)
    }

    fn extra_inhabitant_tag(&self, payload: &[u8]) -> u32 {
        let value = self.order.read_uint(payload);
        if value <= self.max_valid {
            return 0;
        }
        u32::try_from(value - self.max_valid).unwrap_or(u32::MAX)
    }

    fn store_extra_inhabitant_tag(&self, payload: &mut [u8], tag: u32) {
        debug_assert!(tag > 0 && tag <= self.extra_inhabitant_count());
        self.order.write_uint(payload, self.max_valid + u64::from(tag));
    }
}

// ── PointerLike ─────────────────────────────────────────────────

/// Pointer-sized payload whose addresses below `reserved` never point at a
/// live object.
///
/// Extra inhabitant `k` is the address `k - 1`, so tag `1` is null.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerLike {
    size: usize,
    alignment: usize,
    reserved: u32,
    order: ByteOrder,
}

impl PointerLike {
    /// Addresses below this are never mapped for heap objects.
    pub const LEAST_VALID_POINTER: u32 = 4096;

    /// Pointer of `size` bytes (`1..=8`) with addresses `0..reserved` spare.
    pub fn new(size: usize, reserved: u32, order: ByteOrder) -> Option<Self> {
        if size == 0 || size > 8 || u64::from(reserved) > max_pattern(size) {
            return None;
        }
        Some(PointerLike {
            size,
            alignment: natural_alignment(size),
            reserved,
            order,
        })
    }

    /// A 64-bit heap object reference.
    pub fn heap_object(order: ByteOrder) -> Self {
        PointerLike {
            size: 8,
            alignment: 8,
            reserved: Self::LEAST_VALID_POINTER,
            order,
        }
    }
}

impl PayloadCapability for PointerLike {
    fn size(&self) -> usize {
        self.size
    }

    fn alignment(&self) -> usize {
        self.alignment
    }

    fn extra_inhabitant_count(&self) -> u32 {
        self.reserved
    }

    fn extra_inhabitant_tag(&self, payload: &[u8]) -> u32 {
        let address = self.order.read_uint(payload);
        match u32::try_from(address) {
            Ok(address) if address < self.reserved => address + 1,
            _ => 0,
        }
    }

    fn store_extra_inhabitant_tag(&self, payload: &mut [u8], tag: u32) {
        debug_assert!(tag > 0 && tag <= self.reserved);
        self.order.write_uint(payload, u64::from(tag.saturating_sub(1)));
    }
}
