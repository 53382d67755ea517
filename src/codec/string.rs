//! String codec
//!
//! Decoding right-trims zero bytes before applying the charset. Encoding
//! writes the charset bytes without padding; fitting a FIXED span is the
//! caller's job.

use crate::config::CodecConfig;
use crate::error::{ProtoError, Result};
use crate::schema::{Charset, FieldDescriptor};
use crate::stream::{ByteSink, ByteSource};

use super::span::{read_span, write_span};
use super::{ScalarCodec, Value};

impl Charset {
    /// Encode `text` into this charset
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::Ascii => text
                .chars()
                .map(|c| {
                    if c.is_ascii() {
                        Ok(c as u8)
                    } else {
                        Err(unencodable(c, "ASCII"))
                    }
                })
                .collect(),
            Charset::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).map_err(|_| unencodable(c, "ISO-8859-1")))
                .collect(),
        }
    }

    /// Decode `bytes` from this charset
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| ProtoError::Encoding(format!("invalid UTF-8: {}", e))),
            Charset::Ascii => {
                if let Some(bad) = bytes.iter().find(|b| !b.is_ascii()) {
                    return Err(ProtoError::Encoding(format!(
                        "byte 0x{:02x} is not ASCII",
                        bad
                    )));
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
            Charset::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

fn unencodable(c: char, charset: &str) -> ProtoError {
    ProtoError::Encoding(format!("character {:?} cannot be encoded as {}", c, charset))
}

/// Strip trailing zero bytes
fn trim_trailing_zeros(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}

/// Charset-aware STRING codec
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl ScalarCodec for StringCodec {
    fn name(&self) -> &'static str {
        "STRING"
    }

    fn decode(
        &self,
        source: &mut dyn ByteSource,
        field: &FieldDescriptor,
        config: &CodecConfig,
    ) -> Result<Value> {
        let bytes = read_span(source, field, config)?;
        let text = field.charset.decode(trim_trailing_zeros(&bytes))?;
        Ok(Value::Text(text))
    }

    fn encode(
        &self,
        value: &Value,
        field: &FieldDescriptor,
        sink: &mut dyn ByteSink,
        config: &CodecConfig,
    ) -> Result<usize> {
        let text = value.as_str().ok_or_else(|| {
            ProtoError::UnsupportedType(format!(
                "STRING codec cannot encode {} value of field '{}'",
                value.kind(),
                field.name
            ))
        })?;
        let bytes = field.charset.encode(text)?;
        write_span(sink, field, &bytes, config)
    }
}
