//! Codec Module
//!
//! Scalar, bit-field and composite codecs plus the registry that maps wire
//! types to scalar codecs.
//!
//! ## Data Flow
//! ```text
//!   ResolvedFieldPlan ──► composite walker ──► CodecRegistry::lookup(wire_type)
//!                              │                        │
//!                              │ OBJECT                 ▼
//!                              ├──► nested record    ScalarCodec ──► ByteSource / ByteSink
//!                              │
//!                              └──► packed record ──► bitfield::pack / unpack
//! ```
//!
//! ## Built-in Wire Types
//! - BYTE / WORD / DWORD: unsigned big-endian, 1/2/4 bytes
//! - BYTES: raw passthrough
//! - BCD: two digits per byte, leading zeros stripped on decode
//! - STRING: charset-aware, trailing zero bytes trimmed on decode

mod bcd;
pub mod bitfield;
mod composite;
mod raw;
mod registry;
pub mod span;
mod string;
mod unsigned;
mod value;

use crate::config::CodecConfig;
use crate::error::Result;
use crate::schema::FieldDescriptor;
use crate::stream::{ByteSink, ByteSource};

pub use bcd::BcdCodec;
pub use bitfield::BitFieldCodec;
pub use composite::{DecodeScope, EncodeScope};
pub use raw::RawBytesCodec;
pub use registry::CodecRegistry;
pub use string::StringCodec;
pub use unsigned::UnsignedCodec;
pub use value::{Value, WireValue};

/// A codec for a single scalar field
///
/// Implementations read or write exactly the span their descriptor
/// declares. They hold no per-stream state and may be shared across
/// threads.
pub trait ScalarCodec: Send + Sync {
    /// Short name for diagnostics
    fn name(&self) -> &'static str;

    /// Decode one value from `source`
    fn decode(
        &self,
        source: &mut dyn ByteSource,
        field: &FieldDescriptor,
        config: &CodecConfig,
    ) -> Result<Value>;

    /// Encode `value` into `sink`, returning the number of bytes written
    fn encode(
        &self,
        value: &Value,
        field: &FieldDescriptor,
        sink: &mut dyn ByteSink,
        config: &CodecConfig,
    ) -> Result<usize>;
}
