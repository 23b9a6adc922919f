//! Value layout for the Ori runtime: the single-payload enum tag codec.
//!
//! An enum with one payload-carrying case and any number of empty cases
//! (`option[T]`, a nullable reference, a result-like type with unit errors)
//! is stored in its payload's own footprint whenever possible:
//!
//! - **Extra inhabitants**, bit patterns the payload type promises never to
//!   produce, number the first empty cases at no size cost.
//! - **Overflow tag bytes** appended after the payload number the rest,
//!   reusing the whole payload region as index space.
//!
//! The codec is generic: it only sees the payload through a
//! [`PayloadCapability`] and treats every buffer as plain bytes.
//!
//! # Components
//!
//! - [`ByteOrder`]: the single byte-order convention of a deployment
//! - [`PayloadCapability`] and the built-in [`OpaqueBytes`], [`ValidRange`],
//!   [`PointerLike`] payloads
//! - [`TagCounts`] / [`size_of_representation`]: overflow tag sizing
//! - [`SinglePayloadLayout`], [`decode`], [`encode`]: the codec
//! - [`SinglePayloadEnum`]: an enum type that nests as a payload itself
//! - [`LayoutCache`]: layouts shared across threads
//!
//! # Example
//!
//! ```
//! use ori_layout::{ByteOrder, OpaqueBytes, SinglePayloadLayout};
//!
//! // A byte-sized payload with 512 empty cases needs one tag byte.
//! let byte = OpaqueBytes::new(1);
//! let layout = SinglePayloadLayout::new(&byte, 512, ByteOrder::Little);
//! assert_eq!(layout.size(), 2);
//!
//! let mut buf = [0u8; 2];
//! layout.encode(&mut buf, 512, &byte)?;
//! assert_eq!(buf, [255, 2]);
//! assert_eq!(layout.decode(&buf, &byte)?, 512);
//! # Ok::<(), ori_layout::LayoutError>(())
//! ```

mod byte_order;
mod cache;
mod capability;
pub mod commands;
mod config;
mod error;
mod single_payload;
mod tag_counts;

pub use byte_order::ByteOrder;
pub use cache::{LayoutCache, LayoutKey};
pub use capability::{stride_of, OpaqueBytes, PayloadCapability, PointerLike, ValidRange};
pub use config::{init_tracing, LayoutConfig, BYTE_ORDER_ENV};
pub use error::LayoutError;
pub use single_payload::{decode, encode, SinglePayloadEnum, SinglePayloadLayout};
pub use tag_counts::{payload_cardinality, size_of_representation, TagCounts};
