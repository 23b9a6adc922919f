//! Property-based tests for the single-payload enum tag codec.
//!
//! These generate payload shapes, case counts, byte orders and arbitrary
//! starting buffers, and verify:
//! 1. Round-trip: decode(encode(case)) == case
//! 2. Storing the payload case never touches the payload region
//! 3. Distinct cases never share a byte pattern
//! 4. Overflow tag width never shrinks as cases are added
//! 5. Decoding arbitrary bytes never yields a case the enum does not have

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::cast_possible_truncation,
    reason = "Proptest macros generate code with these patterns"
)]

use ori_layout::{
    ByteOrder, OpaqueBytes, PayloadCapability, PointerLike, SinglePayloadLayout, TagCounts,
    ValidRange,
};
use proptest::prelude::*;

// -- Payload Shapes --

/// A payload type the codec can be exercised against.
#[derive(Clone, Debug)]
enum PayloadShape {
    /// Raw bytes, no extra inhabitants.
    Opaque(usize),
    /// Integer with its top values reserved.
    Range { size: usize, reserved: u32 },
    /// Pointer with its low addresses reserved.
    Pointer { reserved: u32 },
}

impl PayloadShape {
    fn capability(&self, order: ByteOrder) -> Box<dyn PayloadCapability> {
        match *self {
            PayloadShape::Opaque(size) => Box::new(OpaqueBytes::new(size)),
            PayloadShape::Range { size, reserved } => {
                Box::new(ValidRange::with_reserved(size, reserved, order).expect("valid range"))
            }
            PayloadShape::Pointer { reserved } => {
                Box::new(PointerLike::new(8, reserved, order).expect("valid pointer"))
            }
        }
    }

    /// Overwrite the payload region with a genuine (non-spare) value.
    fn write_genuine(&self, payload: &mut [u8], order: ByteOrder) {
        match *self {
            // Every pattern is genuine.
            PayloadShape::Opaque(_) => {}
            // Zero is below every reserved value.
            PayloadShape::Range { .. } => payload.fill(0),
            // The first unreserved address.
            PayloadShape::Pointer { reserved } => order.write_uint(payload, u64::from(reserved)),
        }
    }
}

fn shape_strategy() -> impl Strategy<Value = PayloadShape> {
    prop_oneof![
        (0usize..=12).prop_map(PayloadShape::Opaque),
        (1usize..=4, 1u32..=600)
            .prop_filter("reservation must fit", |&(size, reserved)| {
                size > 1 || reserved <= 255
            })
            .prop_map(|(size, reserved)| PayloadShape::Range { size, reserved }),
        (1u32..=4096).prop_map(|reserved| PayloadShape::Pointer { reserved }),
    ]
}

fn order_strategy() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::Little), Just(ByteOrder::Big)]
}

fn cases_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![
        0u32..=600,
        0u32..=300_000,
        Just(u32::MAX),
    ]
}

/// Pick a case index in `0..=cases` from a random seed.
fn pick_case(cases: u32, seed: u64) -> u32 {
    (seed % (u64::from(cases) + 1)) as u32
}

/// Random bytes stretched or truncated to `len`.
fn sized(mut bytes: Vec<u8>, len: usize) -> Vec<u8> {
    bytes.resize(len, 0x5A);
    bytes
}

proptest! {
    #[test]
    fn round_trip(
        shape in shape_strategy(),
        order in order_strategy(),
        cases in cases_strategy(),
        seed in any::<u64>(),
        start in proptest::collection::vec(any::<u8>(), 0..24),
    ) {
        let payload = shape.capability(order);
        let layout = SinglePayloadLayout::new(payload.as_ref(), cases, order);
        let case = pick_case(cases, seed);

        let mut buf = sized(start, layout.size());
        if case == 0 {
            shape.write_genuine(&mut buf[..layout.payload_size()], order);
        }

        layout.encode(&mut buf, case, payload.as_ref()).unwrap();
        prop_assert_eq!(layout.decode(&buf, payload.as_ref()).unwrap(), case);
    }

    #[test]
    fn payload_case_preserves_payload(
        shape in shape_strategy(),
        order in order_strategy(),
        cases in cases_strategy(),
        start in proptest::collection::vec(any::<u8>(), 0..24),
    ) {
        let payload = shape.capability(order);
        let layout = SinglePayloadLayout::new(payload.as_ref(), cases, order);
        let before = sized(start, layout.size());

        let mut buf = before.clone();
        layout.encode(&mut buf, 0, payload.as_ref()).unwrap();

        let payload_size = layout.payload_size();
        prop_assert_eq!(&buf[..payload_size], &before[..payload_size]);
        prop_assert!(buf[payload_size..].iter().all(|&b| b == 0));
    }

    #[test]
    fn distinct_cases_have_distinct_patterns(
        shape in shape_strategy(),
        order in order_strategy(),
        cases in cases_strategy(),
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
        start in proptest::collection::vec(any::<u8>(), 0..24),
    ) {
        let payload = shape.capability(order);
        let layout = SinglePayloadLayout::new(payload.as_ref(), cases, order);
        let a = pick_case(cases, seed_a);
        let b = pick_case(cases, seed_b);
        prop_assume!(a != b);

        let mut start = sized(start, layout.size());
        shape.write_genuine(&mut start[..layout.payload_size()], order);

        let mut buf_a = start.clone();
        let mut buf_b = start;
        layout.encode(&mut buf_a, a, payload.as_ref()).unwrap();
        layout.encode(&mut buf_b, b, payload.as_ref()).unwrap();
        prop_assert_ne!(buf_a, buf_b, "cases {} and {} collide", a, b);
    }

    #[test]
    fn tag_width_is_monotonic(
        payload_size in 0usize..=6,
        xi in prop_oneof![Just(0u32), 0u32..=300, Just(4096)],
        fewer in any::<u32>(),
        more in any::<u32>(),
    ) {
        let (fewer, more) = if fewer <= more { (fewer, more) } else { (more, fewer) };
        let small = TagCounts::compute(payload_size, xi, fewer);
        let large = TagCounts::compute(payload_size, xi, more);
        prop_assert!(small.num_tag_bytes <= large.num_tag_bytes);
    }

    #[test]
    fn decode_stays_in_range(
        shape in shape_strategy(),
        order in order_strategy(),
        cases in cases_strategy(),
        bytes in proptest::collection::vec(any::<u8>(), 0..24),
    ) {
        let payload = shape.capability(order);
        let layout = SinglePayloadLayout::new(payload.as_ref(), cases, order);
        let buf = sized(bytes, layout.size());
        let case = layout.decode(&buf, payload.as_ref()).unwrap();
        prop_assert!(case <= cases);
    }

    #[test]
    fn encode_touches_only_the_representation(
        shape in shape_strategy(),
        order in order_strategy(),
        cases in cases_strategy(),
        seed in any::<u64>(),
        tail in proptest::collection::vec(any::<u8>(), 1..8),
    ) {
        let payload = shape.capability(order);
        let layout = SinglePayloadLayout::new(payload.as_ref(), cases, order);
        let case = pick_case(cases, seed);

        let mut buf = vec![0u8; layout.size()];
        buf.extend_from_slice(&tail);
        layout.encode(&mut buf, case, payload.as_ref()).unwrap();
        prop_assert_eq!(&buf[layout.size()..], tail.as_slice());
    }
}
