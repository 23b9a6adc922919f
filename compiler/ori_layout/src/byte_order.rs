//! Byte-order convention for integer views of raw layout bytes.
//!
//! The overflow region of a single-payload enum, and the payload region when
//! it is reused as index space, are read and written as unsigned integers.
//! Which end of a slice is most significant is fixed per deployment by a
//! [`ByteOrder`] value that every codec entry point takes explicitly. The
//! same value must be used to encode and to decode a given buffer.

use std::fmt;

/// Significance order of the bytes in an integer view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl ByteOrder {
    /// Byte order of the build target.
    pub const NATIVE: ByteOrder = if cfg!(target_endian = "big") {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };

    /// Parse a byte-order name as accepted by `--byte-order` and
    /// `ORI_BYTE_ORDER`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "little" | "le" => Some(ByteOrder::Little),
            "big" | "be" => Some(ByteOrder::Big),
            "native" => Some(ByteOrder::NATIVE),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ByteOrder::Little => "little",
            ByteOrder::Big => "big",
        }
    }

    /// Read `bytes` as an unsigned integer.
    ///
    /// An empty slice reads as zero. Values too wide for a `u64` saturate
    /// to `u64::MAX`; callers clamp the result against a case count anyway.
    pub fn read_uint(self, bytes: &[u8]) -> u64 {
        match self {
            ByteOrder::Little => accumulate(bytes.iter().rev()),
            ByteOrder::Big => accumulate(bytes.iter()),
        }
    }

    /// Write `value` into `bytes` as an unsigned integer, zeroing every byte
    /// above the value's width.
    ///
    /// `value` must fit in `bytes.len()` bytes.
    pub fn write_uint(self, bytes: &mut [u8], value: u64) {
        debug_assert!(
            uint_fits(value, bytes.len()),
            "{value} does not fit in {} bytes",
            bytes.len()
        );

        let le = value.to_le_bytes();
        let significance = |i: usize| le.get(i).copied().unwrap_or(0);
        match self {
            ByteOrder::Little => {
                for (i, byte) in bytes.iter_mut().enumerate() {
                    *byte = significance(i);
                }
            }
            ByteOrder::Big => {
                for (i, byte) in bytes.iter_mut().rev().enumerate() {
                    *byte = significance(i);
                }
            }
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::NATIVE
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fold bytes given most significant first, saturating on overflow.
fn accumulate<'a>(msb_first: impl Iterator<Item = &'a u8>) -> u64 {
    let mut value: u64 = 0;
    for &byte in msb_first {
        if value > u64::MAX >> 8 {
            return u64::MAX;
        }
        value = (value << 8) | u64::from(byte);
    }
    value
}

/// Whether `value` is representable in `width` bytes.
pub(crate) fn uint_fits(value: u64, width: usize) -> bool {
    width >= 8 || value >> (width * 8) == 0
}
