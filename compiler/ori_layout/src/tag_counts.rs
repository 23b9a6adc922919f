//! Overflow tag sizing for single-payload enums.
//!
//! Empty cases that do not fit in the payload's extra inhabitants are
//! numbered through the payload region itself, reinterpreted as a raw
//! unsigned integer, plus a nonzero tag in bytes appended after the payload.
//! An all-zero tag means "no overflow": the payload region then holds a
//! genuine value or an extra inhabitant.

/// Overflow tag requirements of one single-payload enum layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TagCounts {
    /// Distinct overflow tag values in use, counting the zero tag.
    pub num_tags: u64,
    /// Bytes appended after the payload to hold the tag.
    pub num_tag_bytes: usize,
}

impl TagCounts {
    /// Every empty case fits in the payload's extra inhabitants.
    pub const NONE: TagCounts = TagCounts {
        num_tags: 1,
        num_tag_bytes: 0,
    };

    /// Derive the overflow tag for `num_empty_cases` empty cases over a
    /// payload of `payload_size` bytes with `extra_inhabitants` spare
    /// patterns.
    ///
    /// The tag width is the smallest number of bytes whose nonzero values,
    /// each paired with every payload pattern, cover all overflow cases.
    pub fn compute(payload_size: usize, extra_inhabitants: u32, num_empty_cases: u32) -> Self {
        if num_empty_cases <= extra_inhabitants {
            return TagCounts::NONE;
        }

        let overflow = u64::from(num_empty_cases - extra_inhabitants);
        let tag_values = match payload_cardinality(payload_size) {
            Some(cardinality) => overflow.div_ceil(cardinality),
            None => 1,
        };

        TagCounts {
            num_tags: tag_values + 1,
            num_tag_bytes: bytes_to_hold(tag_values),
        }
    }
}

/// Number of case indices the payload region can number on the overflow
/// path, `2^(8 * payload_size)`.
///
/// Returns `None` once that exceeds every `u32` case count, in which case a
/// single overflow tag value suffices.
pub fn payload_cardinality(payload_size: usize) -> Option<u64> {
    if payload_size >= 4 {
        None
    } else {
        Some(1u64 << (payload_size * 8))
    }
}

/// Total bytes of the enum representation: payload plus overflow tag.
pub fn size_of_representation(
    payload_size: usize,
    extra_inhabitants: u32,
    num_empty_cases: u32,
) -> usize {
    payload_size + TagCounts::compute(payload_size, extra_inhabitants, num_empty_cases).num_tag_bytes
}

/// Smallest byte width holding `value`.
fn bytes_to_hold(value: u64) -> usize {
    let bits = u64::BITS - value.leading_zeros();
    bits.div_ceil(8) as usize
}
