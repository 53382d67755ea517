//! BCD codec
//!
//! Each byte carries two digits, high nibble first. Digits are hex
//! characters so that filler nibbles (`a`-`f`) survive a round trip;
//! decoding always yields lowercase.
//!
//! ## Examples
//! ```text
//! "123"  in 3 bytes ──► 00 01 23
//! "007"  in 2 bytes ──► 00 07     ──► "7"
//! ""     in 1 byte  ──► 00        ──► "0"
//! ```

use crate::config::CodecConfig;
use crate::error::{ProtoError, Result};
use crate::schema::{FieldDescriptor, LengthMode};
use crate::stream::{ByteSink, ByteSource};

use super::span::{fixed_length, read_span, write_span};
use super::{ScalarCodec, Value};

/// Binary-coded decimal codec
#[derive(Debug, Clone, Copy, Default)]
pub struct BcdCodec;

impl BcdCodec {
    /// Render packed nibbles as a digit string without leading zeros
    pub fn digits_from_bytes(bytes: &[u8]) -> String {
        let mut digits = String::with_capacity(bytes.len() * 2);
        for byte in bytes {
            digits.push_str(&format!("{:02x}", byte));
        }
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Pack a digit string into `ceil(len / 2)` bytes, left-padding odd counts with a zero nibble
    pub fn bytes_from_digits(digits: &str) -> Result<Vec<u8>> {
        let mut nibbles = Vec::with_capacity(digits.len() + 1);
        if digits.len() % 2 == 1 {
            nibbles.push(0u8);
        }
        for ch in digits.chars() {
            let nibble = ch.to_digit(16).ok_or_else(|| {
                ProtoError::Encoding(format!("invalid BCD digit {:?} in {:?}", ch, digits))
            })?;
            nibbles.push(nibble as u8);
        }
        Ok(nibbles
            .chunks(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect())
    }

    /// Minimum bytes needed to hold `digit_count` digits
    pub fn minimum_bytes(digit_count: usize) -> usize {
        digit_count.div_ceil(2)
    }
}

impl ScalarCodec for BcdCodec {
    fn name(&self) -> &'static str {
        "BCD"
    }

    fn decode(
        &self,
        source: &mut dyn ByteSource,
        field: &FieldDescriptor,
        config: &CodecConfig,
    ) -> Result<Value> {
        let bytes = read_span(source, field, config)?;
        Ok(Value::Digits(Self::digits_from_bytes(&bytes)))
    }

    fn encode(
        &self,
        value: &Value,
        field: &FieldDescriptor,
        sink: &mut dyn ByteSink,
        config: &CodecConfig,
    ) -> Result<usize> {
        let digits = match value {
            Value::Digits(s) | Value::Text(s) => s.clone(),
            Value::Uint(v) => v.to_string(),
            Value::Bytes(_) => {
                return Err(ProtoError::UnsupportedType(format!(
                    "BCD codec cannot encode bytes value of field '{}'",
                    field.name
                )))
            }
        };

        let packed = Self::bytes_from_digits(&digits)?;
        if field.length_mode != LengthMode::Fixed {
            return write_span(sink, field, &packed, config);
        }

        let declared = fixed_length(field)?;
        if declared < packed.len() {
            return Err(ProtoError::LengthMismatch(format!(
                "field '{}' needs {} bytes for {} digits, declared {}",
                field.name,
                packed.len(),
                digits.len(),
                declared
            )));
        }
        let mut span = vec![0u8; declared - packed.len()];
        span.extend_from_slice(&packed);
        write_span(sink, field, &span, config)
    }
}
