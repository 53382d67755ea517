//! Bit-Field Packing Codec
//!
//! Packs independently named integers into one big-endian container of
//! 1 to 4 bytes.
//!
//! ## Bit Numbering
//! ```text
//!   container (2 bytes):   byte 0            byte 1
//!                        ┌─────────────────┬─────────────────┐
//!   bit index            │ 15 14 ...  9  8 │  7  6 ...  1  0 │
//!                        └─────────────────┴─────────────────┘
//!   {offset=4, len=4} selects bits 7..4 of byte 1
//! ```
//!
//! Encoding skips zero values: a zero sub-field sets no bits, so it is
//! indistinguishable from an absent one.

use crate::error::{ProtoError, Result};
use crate::numeric;
use crate::schema::BitFieldDescriptor;
use crate::stream::{ByteSink, ByteSource};

use super::span::read_fixed;

/// Width of the integer that accumulates a container
pub const ACCUMULATOR_BITS: u32 = 32;

/// Largest container, in bytes
pub const MAX_CONTAINER_LENGTH: usize = (ACCUMULATOR_BITS / 8) as usize;

/// Reject containers the accumulator cannot hold
pub fn check_container(length: usize) -> Result<()> {
    if length == 0 || length > MAX_CONTAINER_LENGTH {
        return Err(ProtoError::LengthMismatch(format!(
            "bit-field container must be 1..={} bytes, got {}",
            MAX_CONTAINER_LENGTH, length
        )));
    }
    Ok(())
}

/// Reject a sub-field whose span does not lie inside the container
pub fn check_span(field: &BitFieldDescriptor, container_length: usize) -> Result<()> {
    let container_bits = (container_length as u32) * 8;
    if field.bit_length > ACCUMULATOR_BITS {
        return Err(ProtoError::ValueRange(format!(
            "bit-field '{}' is {} bits wide, accumulator holds {}",
            field.name, field.bit_length, ACCUMULATOR_BITS
        )));
    }
    let end = field.bit_offset.saturating_add(field.bit_length);
    if end > container_bits {
        return Err(ProtoError::ValueRange(format!(
            "bit-field '{}' spans bits {}..{}, container has {}",
            field.name,
            field.bit_offset,
            end,
            container_bits
        )));
    }
    Ok(())
}

/// Extract every sub-field from container bytes, in the order given
pub fn unpack(container: &[u8], fields: &[&BitFieldDescriptor]) -> Result<Vec<u64>> {
    check_container(container.len())?;
    let acc = numeric::from_be_bytes(container);
    fields
        .iter()
        .map(|field| {
            check_span(field, container.len())?;
            Ok((acc >> field.bit_offset) & numeric::bit_mask(field.bit_length))
        })
        .collect()
}

/// Pack `(descriptor, value)` pairs into `container_length` big-endian bytes
pub fn pack(container_length: usize, fields: &[(&BitFieldDescriptor, u64)]) -> Result<Vec<u8>> {
    check_container(container_length)?;
    let mut acc: u64 = 0;
    for (field, value) in fields {
        if *value == 0 {
            continue;
        }
        check_span(field, container_length)?;
        if value >> field.bit_length != 0 {
            return Err(ProtoError::ValueRange(format!(
                "value {} of bit-field '{}' does not fit in {} bits",
                value, field.name, field.bit_length
            )));
        }
        acc |= value << field.bit_offset;
    }
    Ok(numeric::to_be_bytes(acc, container_length))
}

/// Stream-facing wrapper over [`pack`] and [`unpack`] for one container size
#[derive(Debug, Clone, Copy)]
pub struct BitFieldCodec {
    length: usize,
}

impl BitFieldCodec {
    pub fn new(length: usize) -> Result<Self> {
        check_container(length)?;
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn decode(
        &self,
        source: &mut dyn ByteSource,
        fields: &[&BitFieldDescriptor],
    ) -> Result<Vec<u64>> {
        let container = read_fixed(source, self.length)?;
        unpack(&container, fields)
    }

    pub fn encode(
        &self,
        fields: &[(&BitFieldDescriptor, u64)],
        sink: &mut dyn ByteSink,
    ) -> Result<usize> {
        let container = pack(self.length, fields)?;
        sink.write_all(&container)?;
        Ok(self.length)
    }
}
