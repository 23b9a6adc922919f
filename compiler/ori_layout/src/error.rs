//! Layout and codec errors.

use thiserror::Error;

/// Error from encoding, decoding, or configuring an enum layout.
///
/// The codec itself has no transient failure modes; every variant reports a
/// caller contract violation or malformed user input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A case index above the enum's number of empty cases.
    #[error("case index {case} is out of range for an enum with {num_empty_cases} empty cases")]
    CaseOutOfRange { case: u32, num_empty_cases: u32 },

    /// A buffer shorter than the enum's representation.
    #[error("buffer of {actual} bytes is too small for a {needed}-byte enum representation")]
    BufferTooSmall { needed: usize, actual: usize },

    /// An unrecognized byte-order name.
    #[error("unknown byte order '{0}' (expected little, big, or native)")]
    InvalidByteOrder(String),

    /// A malformed hex byte string.
    #[error("invalid hex bytes '{0}'")]
    InvalidHex(String),

    /// A malformed command-line argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
