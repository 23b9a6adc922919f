//! Layout configuration and debug instrumentation.
//!
//! The byte order of overflow tags is a deployment-wide choice. It is
//! resolved once, from the command line or the `ORI_BYTE_ORDER` environment
//! variable, falling back to the build target's order, and then passed
//! explicitly to every codec entry point.

use std::env::VarError;
use std::sync::Once;

use crate::byte_order::ByteOrder;
use crate::error::LayoutError;

/// Environment variable overriding the default byte order.
pub const BYTE_ORDER_ENV: &str = "ORI_BYTE_ORDER";

/// Deployment-wide layout settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Byte order of overflow tags and payload-as-integer views.
    pub byte_order: ByteOrder,
}

impl LayoutConfig {
    /// Defaults, overridden by `ORI_BYTE_ORDER` when it is set.
    pub fn from_env() -> Result<Self, LayoutError> {
        Self::from_var(std::env::var(BYTE_ORDER_ENV))
    }

    /// Resolve the result of reading `ORI_BYTE_ORDER`.
    ///
    /// An unset variable keeps the defaults; a value that is not valid
    /// UTF-8 is reported rather than ignored.
    pub fn from_var(value: Result<String, VarError>) -> Result<Self, LayoutError> {
        match value {
            Ok(name) => Self::default().with_byte_order_name(&name),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(raw)) => Err(LayoutError::InvalidByteOrder(
                raw.to_string_lossy().into_owned(),
            )),
        }
    }

    /// Override the byte order by name (`little`, `big`, `native`).
    pub fn with_byte_order_name(mut self, name: &str) -> Result<Self, LayoutError> {
        self.byte_order =
            ByteOrder::parse(name).ok_or_else(|| LayoutError::InvalidByteOrder(name.to_string()))?;
        Ok(self)
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=ori_layout=debug`
/// (layout derivation) or `RUST_LOG=ori_layout=trace` (cache hits).
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
mod tests;
