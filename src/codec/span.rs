//! Field spans
//!
//! Reads and writes the byte span of a BYTES/STRING/BCD field according to
//! its [`LengthMode`]. Fixed spans are sized by the calling codec; this
//! module only frames them.

use crate::config::CodecConfig;
use crate::error::{ProtoError, Result};
use crate::numeric;
use crate::schema::{FieldDescriptor, LengthMode};
use crate::stream::{ByteSink, ByteSource};

/// Prefix widths accepted by `LengthMode::LengthPrefixed`
pub const PREFIX_WIDTHS: [usize; 3] = [1, 2, 4];

/// Declared fixed length of a field
pub fn fixed_length(field: &FieldDescriptor) -> Result<usize> {
    field.length.ok_or_else(|| {
        ProtoError::Schema(format!(
            "field '{}' is FIXED but declares no length",
            field.name
        ))
    })
}

/// Read exactly `n` bytes, failing early when the source already knows it is short
pub fn read_fixed(source: &mut dyn ByteSource, n: usize) -> Result<Vec<u8>> {
    if let Some(available) = source.available_hint() {
        if available < n {
            return Err(ProtoError::short(n, available));
        }
    }
    source.read_exactly(n)
}

/// Read the span of `field`
pub fn read_span(
    source: &mut dyn ByteSource,
    field: &FieldDescriptor,
    config: &CodecConfig,
) -> Result<Vec<u8>> {
    let limit = config.max_variable_length;
    match field.length_mode {
        LengthMode::Fixed => read_fixed(source, fixed_length(field)?),
        LengthMode::LengthPrefixed { prefix } => {
            check_prefix(field, prefix)?;
            let len = numeric::from_be_bytes(&read_fixed(source, prefix)?) as usize;
            if len > limit {
                return Err(ProtoError::LengthMismatch(format!(
                    "field '{}' announces {} bytes (max {})",
                    field.name, len, limit
                )));
            }
            read_fixed(source, len)
        }
        LengthMode::SeparatorTerminated { separator } => source.read_until(separator, limit),
        LengthMode::AllRemainingBytes => source.read_remaining(limit),
    }
}

/// Write `data` as the span of `field`, returning the bytes written
///
/// For FIXED fields `data` is written as-is.
pub fn write_span(
    sink: &mut dyn ByteSink,
    field: &FieldDescriptor,
    data: &[u8],
    config: &CodecConfig,
) -> Result<usize> {
    let limit = config.max_variable_length;
    match field.length_mode {
        LengthMode::Fixed => {
            sink.write_all(data)?;
            Ok(data.len())
        }
        LengthMode::LengthPrefixed { prefix } => {
            check_prefix(field, prefix)?;
            if data.len() > limit || !numeric::fits(data.len() as u64, prefix) {
                return Err(ProtoError::LengthMismatch(format!(
                    "field '{}' of {} bytes does not fit a {}-byte length prefix (max {})",
                    field.name,
                    data.len(),
                    prefix,
                    limit
                )));
            }
            sink.write_all(&numeric::to_be_bytes(data.len() as u64, prefix))?;
            sink.write_all(data)?;
            Ok(prefix + data.len())
        }
        LengthMode::SeparatorTerminated { separator } => {
            check_limit(field, data, limit)?;
            if data.contains(&separator) {
                return Err(ProtoError::Encoding(format!(
                    "field '{}' contains its separator byte 0x{:02x}",
                    field.name, separator
                )));
            }
            sink.write_all(data)?;
            sink.write_all(&[separator])?;
            Ok(data.len() + 1)
        }
        LengthMode::AllRemainingBytes => {
            check_limit(field, data, limit)?;
            sink.write_all(data)?;
            Ok(data.len())
        }
    }
}

fn check_prefix(field: &FieldDescriptor, prefix: usize) -> Result<()> {
    if PREFIX_WIDTHS.contains(&prefix) {
        Ok(())
    } else {
        Err(ProtoError::Schema(format!(
            "field '{}' uses a {}-byte length prefix (expected 1, 2 or 4)",
            field.name, prefix
        )))
    }
}

fn check_limit(field: &FieldDescriptor, data: &[u8], limit: usize) -> Result<()> {
    if data.len() > limit {
        return Err(ProtoError::LengthMismatch(format!(
            "field '{}' of {} bytes exceeds max variable length {}",
            field.name,
            data.len(),
            limit
        )));
    }
    Ok(())
}
