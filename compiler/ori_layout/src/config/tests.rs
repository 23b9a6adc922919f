use pretty_assertions::assert_eq;

use super::*;

#[test]
fn default_is_native() {
    assert_eq!(LayoutConfig::default().byte_order, ByteOrder::NATIVE);
}

#[test]
fn byte_order_override() {
    let config = LayoutConfig::default().with_byte_order_name("big");
    assert_eq!(
        config,
        Ok(LayoutConfig {
            byte_order: ByteOrder::Big,
        })
    );
}

#[test]
fn unknown_byte_order_is_rejected() {
    let config = LayoutConfig::default().with_byte_order_name("pdp");
    assert_eq!(config, Err(LayoutError::InvalidByteOrder("pdp".to_string())));
}

// ── Environment ─────────────────────────────────────────────────

#[test]
fn unset_variable_keeps_native_order() {
    assert_eq!(
        LayoutConfig::from_var(Err(VarError::NotPresent)),
        Ok(LayoutConfig::default())
    );
}

#[test]
fn variable_selects_byte_order() {
    assert_eq!(
        LayoutConfig::from_var(Ok("little".to_string())),
        Ok(LayoutConfig {
            byte_order: ByteOrder::Little,
        })
    );
    assert_eq!(
        LayoutConfig::from_var(Ok("big".to_string())),
        Ok(LayoutConfig {
            byte_order: ByteOrder::Big,
        })
    );
}

#[test]
fn invalid_variable_is_rejected() {
    assert_eq!(
        LayoutConfig::from_var(Ok("middle".to_string())),
        Err(LayoutError::InvalidByteOrder("middle".to_string()))
    );
}

#[cfg(unix)]
#[test]
fn non_utf8_variable_is_rejected() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let raw = OsString::from_vec(vec![b'b', 0xFF, b'g']);
    assert!(matches!(
        LayoutConfig::from_var(Err(VarError::NotUnicode(raw))),
        Err(LayoutError::InvalidByteOrder(_))
    ));
}

#[test]
fn tracing_init_is_idempotent() {
    init_tracing();
    init_tracing();
}
