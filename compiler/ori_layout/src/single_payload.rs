//! Single-payload enum tag codec.
//!
//! An enum with exactly one case carrying a value and `N` empty cases is
//! stored in the payload's own footprint plus, only when necessary, a few
//! overflow tag bytes appended after it:
//!
//! ```text
//!   +───────────────────────────+──────────────────+
//!   | payload (payload_size)    | tag (0..=4 bytes) |
//!   +───────────────────────────+──────────────────+
//! ```
//!
//! Case indices are `0` for the payload case and `1..=N` for the empty cases:
//!
//! - `1..=xi` are the payload's extra inhabitants, written through its
//!   [`PayloadCapability`]; the tag is zero.
//! - Everything above is an overflow case. With `O = case - xi - 1` and
//!   `C = 2^(8 * payload_size)`, the tag holds `O / C + 1` and the payload
//!   region holds `O % C`, both as unsigned integers in the layout's
//!   [`ByteOrder`].
//!
//! Decoding checks the tag first, then the payload's extra inhabitants, and
//! otherwise reports the payload case. Neither direction allocates, loops
//! over cases, or keeps state between calls.
//!
//! # Out-of-range Cases
//!
//! Encoding a case above `N` is rejected with
//! [`LayoutError::CaseOutOfRange`] and leaves the buffer untouched. Decoding
//! clamps whatever it reads to `N`, so a corrupt buffer never yields an
//! index the enum does not have.

use crate::byte_order::ByteOrder;
use crate::capability::{stride_of, PayloadCapability};
use crate::error::LayoutError;
use crate::tag_counts::{payload_cardinality, TagCounts};

/// Derived, immutable layout constants of one single-payload enum type.
///
/// Computed once per enum type and then used against every buffer of that
/// type. The capability passed to [`decode`](Self::decode) and
/// [`encode`](Self::encode) must be the one the layout was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SinglePayloadLayout {
    payload_size: usize,
    payload_alignment: usize,
    payload_extra_inhabitants: u32,
    num_empty_cases: u32,
    tags: TagCounts,
    order: ByteOrder,
}

impl SinglePayloadLayout {
    /// Derive the layout of an enum with `num_empty_cases` empty cases
    /// around `payload`.
    pub fn new<P: PayloadCapability + ?Sized>(
        payload: &P,
        num_empty_cases: u32,
        order: ByteOrder,
    ) -> Self {
        Self::from_parts(
            payload.size(),
            payload.alignment(),
            payload.extra_inhabitant_count(),
            num_empty_cases,
            order,
        )
    }

    /// Derive a layout from raw payload metrics.
    pub fn from_parts(
        payload_size: usize,
        payload_alignment: usize,
        payload_extra_inhabitants: u32,
        num_empty_cases: u32,
        order: ByteOrder,
    ) -> Self {
        SinglePayloadLayout {
            payload_size,
            payload_alignment,
            payload_extra_inhabitants,
            num_empty_cases,
            tags: TagCounts::compute(payload_size, payload_extra_inhabitants, num_empty_cases),
            order,
        }
    }

    pub fn payload_size(&self) -> usize {
        self.payload_size
    }

    pub fn payload_extra_inhabitants(&self) -> u32 {
        self.payload_extra_inhabitants
    }

    pub fn num_empty_cases(&self) -> u32 {
        self.num_empty_cases
    }

    pub fn tag_counts(&self) -> TagCounts {
        self.tags
    }

    /// Bytes appended after the payload for the overflow tag.
    pub fn num_tag_bytes(&self) -> usize {
        self.tags.num_tag_bytes
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Total representation size: payload plus overflow tag.
    pub fn size(&self) -> usize {
        self.payload_size + self.tags.num_tag_bytes
    }

    /// The enum is aligned like its payload.
    pub fn alignment(&self) -> usize {
        self.payload_alignment
    }

    pub fn stride(&self) -> usize {
        stride_of(self.size(), self.payload_alignment)
    }

    /// Payload extra inhabitants left over after numbering the empty cases.
    ///
    /// These are re-exported so an enclosing enum can use them in turn.
    pub fn extra_inhabitant_count(&self) -> u32 {
        self.payload_extra_inhabitants.saturating_sub(self.num_empty_cases)
    }

    /// Read the case index stored in `buffer`.
    ///
    /// `buffer` must hold at least [`size`](Self::size) bytes; anything past
    /// that is ignored.
    pub fn decode<P: PayloadCapability + ?Sized>(
        &self,
        buffer: &[u8],
        payload: &P,
    ) -> Result<u32, LayoutError> {
        self.debug_check_payload(payload);
        let Some(repr) = buffer.get(..self.size()) else {
            return Err(self.too_small(buffer.len()));
        };

        if self.num_empty_cases == 0 {
            return Ok(0);
        }

        let (payload_bytes, tag_bytes) = repr.split_at(self.payload_size);

        if !tag_bytes.is_empty() {
            let tag = self.order.read_uint(tag_bytes);
            if tag != 0 {
                return Ok(self.overflow_case(tag, self.order.read_uint(payload_bytes)));
            }
        }

        if self.payload_extra_inhabitants > 0 {
            let spare = payload.extra_inhabitant_tag(payload_bytes);
            debug_assert!(
                spare <= self.payload_extra_inhabitants,
                "payload reported extra inhabitant {spare} of {}",
                self.payload_extra_inhabitants
            );
            return Ok(spare.min(self.num_empty_cases));
        }

        Ok(0)
    }

    /// Store case index `case` into `buffer`.
    ///
    /// Case `0` only clears the overflow tag; the payload value itself is
    /// written by the payload's owner. Empty cases overwrite the payload
    /// region, which is safe because they carry no payload.
    pub fn encode<P: PayloadCapability + ?Sized>(
        &self,
        buffer: &mut [u8],
        case: u32,
        payload: &P,
    ) -> Result<(), LayoutError> {
        self.debug_check_payload(payload);
        if case > self.num_empty_cases {
            return Err(LayoutError::CaseOutOfRange {
                case,
                num_empty_cases: self.num_empty_cases,
            });
        }

        let size = self.size();
        let actual = buffer.len();
        let Some(repr) = buffer.get_mut(..size) else {
            return Err(self.too_small(actual));
        };
        let (payload_bytes, tag_bytes) = repr.split_at_mut(self.payload_size);

        if case <= self.payload_extra_inhabitants {
            tag_bytes.fill(0);
            if case > 0 {
                payload.store_extra_inhabitant_tag(payload_bytes, case);
            }
            return Ok(());
        }

        // Overflow cases only exist when the tag is at least one byte wide.
        let no_payload_index = u64::from(case - self.payload_extra_inhabitants - 1);
        let (tag, value) = match payload_cardinality(self.payload_size) {
            Some(cardinality) => (
                no_payload_index / cardinality + 1,
                no_payload_index % cardinality,
            ),
            None => (1, no_payload_index),
        };

        self.order.write_uint(payload_bytes, value);
        self.order.write_uint(tag_bytes, tag);
        Ok(())
    }

    /// Case index of a nonzero overflow `tag` with `value` in the payload.
    fn overflow_case(&self, tag: u64, value: u64) -> u32 {
        let index = match payload_cardinality(self.payload_size) {
            Some(cardinality) => u128::from(tag - 1) * u128::from(cardinality) + u128::from(value),
            // One tag value covers every case; higher tags are corrupt.
            None if tag > 1 => return self.num_empty_cases,
            None => u128::from(value),
        };
        let case = u128::from(self.payload_extra_inhabitants) + index + 1;
        u32::try_from(case).map_or(self.num_empty_cases, |case| case.min(self.num_empty_cases))
    }

    fn too_small(&self, actual: usize) -> LayoutError {
        LayoutError::BufferTooSmall {
            needed: self.size(),
            actual,
        }
    }

    fn debug_check_payload<P: PayloadCapability + ?Sized>(&self, payload: &P) {
        debug_assert_eq!(
            payload.size(),
            self.payload_size,
            "payload capability does not match layout"
        );
        debug_assert_eq!(
            payload.extra_inhabitant_count(),
            self.payload_extra_inhabitants,
            "payload capability does not match layout"
        );
    }
}

/// Read the case index of an enum with `num_empty_cases` empty cases around
/// `payload`.
///
/// Derives the layout on every call; callers decoding many buffers of one
/// type should hold a [`SinglePayloadLayout`] instead.
pub fn decode<P: PayloadCapability + ?Sized>(
    buffer: &[u8],
    num_empty_cases: u32,
    payload: &P,
    order: ByteOrder,
) -> Result<u32, LayoutError> {
    SinglePayloadLayout::new(payload, num_empty_cases, order).decode(buffer, payload)
}

/// Store case index `case` of an enum with `num_empty_cases` empty cases
/// around `payload`.
pub fn encode<P: PayloadCapability + ?Sized>(
    buffer: &mut [u8],
    case: u32,
    num_empty_cases: u32,
    payload: &P,
    order: ByteOrder,
) -> Result<(), LayoutError> {
    SinglePayloadLayout::new(payload, num_empty_cases, order).encode(buffer, case, payload)
}

/// A single-payload enum type: a payload capability bound to its layout.
///
/// The enum is itself a [`PayloadCapability`], so enums nest. An outer enum
/// numbers its empty cases through the inhabitants this one left unused,
/// e.g. `option[option[bool]]` still fits in one byte.
#[derive(Clone, Debug)]
pub struct SinglePayloadEnum<P> {
    payload: P,
    layout: SinglePayloadLayout,
}

impl<P: PayloadCapability> SinglePayloadEnum<P> {
    pub fn new(payload: P, num_empty_cases: u32, order: ByteOrder) -> Self {
        let layout = SinglePayloadLayout::new(&payload, num_empty_cases, order);
        tracing::debug!(
            payload_size = layout.payload_size(),
            payload_xi = layout.payload_extra_inhabitants(),
            num_empty_cases,
            tag_bytes = layout.num_tag_bytes(),
            xi = layout.extra_inhabitant_count(),
            "single-payload enum layout"
        );
        SinglePayloadEnum { payload, layout }
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn layout(&self) -> &SinglePayloadLayout {
        &self.layout
    }

    pub fn decode(&self, buffer: &[u8]) -> Result<u32, LayoutError> {
        self.layout.decode(buffer, &self.payload)
    }

    pub fn encode(&self, buffer: &mut [u8], case: u32) -> Result<(), LayoutError> {
        self.layout.encode(buffer, case, &self.payload)
    }
}

impl<P: PayloadCapability> PayloadCapability for SinglePayloadEnum<P> {
    fn size(&self) -> usize {
        self.layout.size()
    }

    fn alignment(&self) -> usize {
        self.layout.alignment()
    }

    fn stride(&self) -> usize {
        self.layout.stride()
    }

    fn extra_inhabitant_count(&self) -> u32 {
        self.layout.extra_inhabitant_count()
    }

    // Leftover inhabitants imply no overflow tag, so `payload` is exactly the
    // wrapped payload's bytes.
    fn extra_inhabitant_tag(&self, payload: &[u8]) -> u32 {
        if self.layout.extra_inhabitant_count() == 0 {
            return 0;
        }
        self.payload
            .extra_inhabitant_tag(payload)
            .saturating_sub(self.layout.num_empty_cases())
    }

    fn store_extra_inhabitant_tag(&self, payload: &mut [u8], tag: u32) {
        debug_assert!(tag > 0 && tag <= self.layout.extra_inhabitant_count());
        self.payload
            .store_extra_inhabitant_tag(payload, tag + self.layout.num_empty_cases());
    }
}
