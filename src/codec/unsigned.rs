//! Unsigned integer codec
//!
//! BYTE, WORD and DWORD: big-endian, fixed width, never sign-extended.

use crate::config::CodecConfig;
use crate::error::{ProtoError, Result};
use crate::numeric;
use crate::schema::{FieldDescriptor, LengthMode};
use crate::stream::{ByteSink, ByteSource};

use super::span::read_fixed;
use super::{ScalarCodec, Value};

/// Fixed-width unsigned integer codec
#[derive(Debug, Clone, Copy)]
pub struct UnsignedCodec {
    width: usize,
    name: &'static str,
}

impl UnsignedCodec {
    pub const BYTE: UnsignedCodec = UnsignedCodec { width: 1, name: "BYTE" };
    pub const WORD: UnsignedCodec = UnsignedCodec { width: 2, name: "WORD" };
    pub const DWORD: UnsignedCodec = UnsignedCodec { width: 4, name: "DWORD" };

    pub fn width(&self) -> usize {
        self.width
    }

    /// Only FIXED spans of exactly `width` bytes are supported
    fn check_field(&self, field: &FieldDescriptor) -> Result<()> {
        if field.length_mode != LengthMode::Fixed {
            return Err(ProtoError::UnsupportedType(format!(
                "{} codec only supports FIXED length, field '{}' uses {:?}",
                self.name, field.name, field.length_mode
            )));
        }
        match field.length {
            Some(len) if len != self.width => Err(ProtoError::LengthMismatch(format!(
                "field '{}' declares {} bytes, {} is {} bytes",
                field.name, len, self.name, self.width
            ))),
            _ => Ok(()),
        }
    }
}

impl ScalarCodec for UnsignedCodec {
    fn name(&self) -> &'static str {
        self.name
    }

    fn decode(
        &self,
        source: &mut dyn ByteSource,
        field: &FieldDescriptor,
        _config: &CodecConfig,
    ) -> Result<Value> {
        self.check_field(field)?;
        let bytes = read_fixed(source, self.width)?;
        Ok(Value::Uint(numeric::from_be_bytes(&bytes)))
    }

    fn encode(
        &self,
        value: &Value,
        field: &FieldDescriptor,
        sink: &mut dyn ByteSink,
        _config: &CodecConfig,
    ) -> Result<usize> {
        self.check_field(field)?;
        let raw = value.as_uint().ok_or_else(|| {
            ProtoError::UnsupportedType(format!(
                "{} codec cannot encode {} value of field '{}'",
                self.name,
                value.kind(),
                field.name
            ))
        })?;

        if !numeric::fits(raw, self.width) {
            tracing::warn!(
                field = field.name,
                value = raw,
                width = self.width,
                "value truncated to declared width"
            );
        }

        sink.write_all(&numeric::to_be_bytes(raw, self.width))?;
        Ok(self.width)
    }
}
