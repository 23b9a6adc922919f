//! `ori-layout` subcommands.
//!
//! Each command renders its report to a `String` so the binary only prints
//! and chooses an exit code.
//!
//! The payload is described by its size and `--xi=N`: with `N > 0` it is an
//! unsigned integer whose top `N` values are reserved, otherwise opaque bytes.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::capability::{OpaqueBytes, PayloadCapability, ValidRange};
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::single_payload::SinglePayloadLayout;

/// Payload description and layout flags shared by every subcommand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutOptions {
    pub payload_size: usize,
    pub extra_inhabitants: u32,
    pub num_empty_cases: u32,
    /// `--align=N`; the payload's natural alignment when unset.
    pub alignment: Option<usize>,
    /// Initial buffer contents for `encode` (defaults to zeros).
    pub fill: Option<Vec<u8>>,
    pub config: LayoutConfig,
}

impl LayoutOptions {
    pub fn new(payload_size: usize, config: LayoutConfig) -> Self {
        LayoutOptions {
            payload_size,
            extra_inhabitants: 0,
            num_empty_cases: 1,
            alignment: None,
            fill: None,
            config,
        }
    }

    /// Apply one `--flag=value` argument.
    pub fn apply_flag(&mut self, arg: &str) -> Result<(), LayoutError> {
        if let Some(value) = arg.strip_prefix("--xi=") {
            self.extra_inhabitants = parse_number("--xi", value)?;
        } else if let Some(value) = arg.strip_prefix("--cases=") {
            self.num_empty_cases = parse_number("--cases", value)?;
        } else if let Some(value) = arg.strip_prefix("--align=") {
            let alignment: usize = parse_number("--align", value)?;
            if !alignment.is_power_of_two() {
                return Err(LayoutError::InvalidArgument(format!(
                    "--align must be a power of two, got {alignment}"
                )));
            }
            self.alignment = Some(alignment);
        } else if let Some(value) = arg.strip_prefix("--byte-order=") {
            self.config = self.config.with_byte_order_name(value)?;
        } else if let Some(value) = arg.strip_prefix("--fill=") {
            self.fill = Some(parse_hex(value)?);
        } else {
            return Err(LayoutError::InvalidArgument(format!("unknown option '{arg}'")));
        }
        Ok(())
    }

    /// Capability of the described payload.
    pub fn payload(&self) -> Result<Box<dyn PayloadCapability>, LayoutError> {
        if self.extra_inhabitants == 0 {
            let bytes = match self.alignment {
                Some(alignment) => OpaqueBytes::new(self.payload_size).with_alignment(alignment),
                None => OpaqueBytes::new(self.payload_size),
            };
            return Ok(Box::new(bytes));
        }
        ValidRange::with_reserved(
            self.payload_size,
            self.extra_inhabitants,
            self.config.byte_order,
        )
        .map(|range| {
            let range = match self.alignment {
                Some(alignment) => range.with_alignment(alignment),
                None => range,
            };
            Box::new(range) as Box<dyn PayloadCapability>
        })
        .ok_or_else(|| {
            LayoutError::InvalidArgument(format!(
                "a {}-byte integer cannot reserve {} values (sizes 1 to 8 only)",
                self.payload_size, self.extra_inhabitants
            ))
        })
    }
}

/// A parsed `ori-layout` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Report sizes and tag requirements.
    Size(LayoutOptions),
    /// Store a case index and print the resulting bytes.
    Encode(LayoutOptions, u32),
    /// Read the case index of a byte pattern.
    Decode(LayoutOptions, Vec<u8>),
}

/// Parse `args` (without the program name) into a [`Command`].
pub fn parse_command(args: &[String], config: LayoutConfig) -> Result<Command, LayoutError> {
    let Some((name, rest)) = args.split_first() else {
        return Err(LayoutError::InvalidArgument("missing command".to_string()));
    };

    let (positional, flags): (Vec<&String>, Vec<&String>) =
        rest.iter().partition(|arg| !arg.starts_with("--"));

    let expected = match name.as_str() {
        "size" => 1,
        "encode" | "decode" => 2,
        other => {
            return Err(LayoutError::InvalidArgument(format!(
                "unknown command '{other}'"
            )))
        }
    };
    if positional.len() != expected {
        return Err(LayoutError::InvalidArgument(format!(
            "'{name}' takes {expected} positional argument(s), got {}",
            positional.len()
        )));
    }

    let mut options = LayoutOptions::new(parse_number("payload size", positional[0])?, config);
    for flag in flags {
        options.apply_flag(flag)?;
    }

    match name.as_str() {
        "encode" => {
            let case = parse_number("case", positional[1])?;
            Ok(Command::Encode(options, case))
        }
        "decode" => {
            let bytes = parse_hex(positional[1])?;
            Ok(Command::Decode(options, bytes))
        }
        _ => Ok(Command::Size(options)),
    }
}

/// Run a command, returning its report.
pub fn run_command(command: &Command) -> Result<String, LayoutError> {
    match command {
        Command::Size(options) => size_report(options),
        Command::Encode(options, case) => encode_report(options, *case),
        Command::Decode(options, bytes) => decode_report(options, bytes),
    }
}

fn layout_of(
    options: &LayoutOptions,
) -> Result<(Box<dyn PayloadCapability>, SinglePayloadLayout), LayoutError> {
    let payload = options.payload()?;
    let layout = SinglePayloadLayout::new(
        payload.as_ref(),
        options.num_empty_cases,
        options.config.byte_order,
    );
    Ok((payload, layout))
}

/// Describe the layout of the enum.
pub fn size_report(options: &LayoutOptions) -> Result<String, LayoutError> {
    let (payload, layout) = layout_of(options)?;
    let tags = layout.tag_counts();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "payload:          {} bytes, {} extra inhabitants, align {}",
        payload.size(),
        payload.extra_inhabitant_count(),
        payload.alignment()
    );
    let _ = writeln!(out, "empty cases:      {}", layout.num_empty_cases());
    let _ = writeln!(
        out,
        "tag bytes:        {} ({} tag values)",
        tags.num_tag_bytes, tags.num_tags
    );
    let _ = writeln!(
        out,
        "size:             {} (stride {}, align {})",
        layout.size(),
        layout.stride(),
        layout.alignment()
    );
    let _ = writeln!(out, "extra inhabitants: {}", layout.extra_inhabitant_count());
    let _ = write!(out, "byte order:       {}", layout.byte_order());
    Ok(out)
}

/// Encode `case` into a fresh (or `--fill`) buffer and render its bytes.
pub fn encode_report(options: &LayoutOptions, case: u32) -> Result<String, LayoutError> {
    let (payload, layout) = layout_of(options)?;
    let mut buffer = match &options.fill {
        Some(fill) => fill.clone(),
        None => vec![0; layout.size()],
    };
    layout.encode(&mut buffer, case, payload.as_ref())?;
    Ok(format_hex(&buffer))
}

/// Decode `bytes` and render the case index.
pub fn decode_report(options: &LayoutOptions, bytes: &[u8]) -> Result<String, LayoutError> {
    let (payload, layout) = layout_of(options)?;
    let case = layout.decode(bytes, payload.as_ref())?;
    if case == 0 {
        Ok("case 0 (payload)".to_string())
    } else {
        Ok(format!("case {case}"))
    }
}

fn parse_number<T: FromStr>(what: &str, value: &str) -> Result<T, LayoutError> {
    value
        .trim()
        .parse()
        .map_err(|_| LayoutError::InvalidArgument(format!("{what}: '{value}' is not a number")))
}

/// Parse hex bytes such as `ff02`, `0xff02`, `ff,02` or `ff:02`.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, LayoutError> {
    let trimmed = text.trim();
    let digits: Vec<u8> = trimmed
        .strip_prefix("0x")
        .unwrap_or(trimmed)
        .bytes()
        .filter(|b| !matches!(b, b',' | b':' | b' ' | b'_'))
        .collect();

    if digits.len() % 2 != 0 || !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(LayoutError::InvalidHex(text.to_string()));
    }

    digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| LayoutError::InvalidHex(text.to_string()))
        })
        .collect()
}

/// Render bytes as space-separated lowercase hex.
pub fn format_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}
