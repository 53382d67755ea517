//! Raw byte-array codec
//!
//! FIXED fields use copy semantics on encode: the value is copied to the
//! front of the span, a short value is zero-filled, a long one is cut.

use crate::config::CodecConfig;
use crate::error::{ProtoError, Result};
use crate::schema::{FieldDescriptor, LengthMode};
use crate::stream::{ByteSink, ByteSource};

use super::span::{fixed_length, read_span, write_span};
use super::{ScalarCodec, Value};

/// Passthrough codec for BYTES fields
#[derive(Debug, Clone, Copy, Default)]
pub struct RawBytesCodec;

impl ScalarCodec for RawBytesCodec {
    fn name(&self) -> &'static str {
        "BYTES"
    }

    fn decode(
        &self,
        source: &mut dyn ByteSource,
        field: &FieldDescriptor,
        config: &CodecConfig,
    ) -> Result<Value> {
        Ok(Value::Bytes(read_span(source, field, config)?))
    }

    fn encode(
        &self,
        value: &Value,
        field: &FieldDescriptor,
        sink: &mut dyn ByteSink,
        config: &CodecConfig,
    ) -> Result<usize> {
        let data = value.as_bytes().ok_or_else(|| {
            ProtoError::UnsupportedType(format!(
                "BYTES codec cannot encode {} value of field '{}'",
                value.kind(),
                field.name
            ))
        })?;

        if field.length_mode != LengthMode::Fixed {
            return write_span(sink, field, data, config);
        }

        let len = fixed_length(field)?;
        if data.len() > len {
            tracing::warn!(
                field = field.name,
                actual = data.len(),
                declared = len,
                "byte array truncated to declared length"
            );
        }
        let mut span = vec![0u8; len];
        let copied = data.len().min(len);
        span[..copied].copy_from_slice(&data[..copied]);
        write_span(sink, field, &span, config)
    }
}
