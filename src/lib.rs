//! # protomarshal
//!
//! Schema-described binary record marshalling:
//! - Fixed and variable-length scalar codecs (unsigned integers, bytes, BCD, strings)
//! - Sub-byte bit-field packing in big-endian containers
//! - Multi-version field layouts resolved per protocol version
//! - Optional parse trees for inspecting decoded records
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Marshaller                             │
//! │              encode(record) / decode(source)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ plan(R, version)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │          Schema Resolver  ──►  PlanCache (RwLock)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ ordered fields
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Composite Codec                             │
//! └──────┬──────────────────────┬──────────────────────┬────────┘
//!        │                      │                      │
//!        ▼                      ▼                      ▼
//!  ┌────────────┐        ┌─────────────┐        ┌─────────────┐
//!  │  Registry  │        │  Bit-Field  │        │   Nested    │
//!  │  (scalar)  │        │   Packing   │        │   Record    │
//!  └─────┬──────┘        └──────┬──────┘        └─────────────┘
//!        │                      │
//!        ▼                      ▼
//!  ┌─────────────────────────────────────┐
//!  │      ByteSource / ByteSink          │
//!  └─────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod numeric;

pub mod stream;
pub mod codec;
pub mod schema;
pub mod tree;
pub mod marshaller;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ProtoError, Result};
pub use config::CodecConfig;
pub use codec::{CodecRegistry, ScalarCodec, Value, WireValue};
pub use marshaller::{Decoded, Marshaller};
pub use schema::{
    BitFieldDescriptor, Charset, FieldDescriptor, LengthMode, Record, RecordSchema,
    ResolvedFieldPlan, VersionSet, WireType,
};
pub use stream::{ByteSink, ByteSource, ReaderSource, SliceSource, WriterSink};
pub use tree::{ObjectNode, ParseNode};

/// Encode `record` at `version` with the shared default marshaller
pub fn encode<R: Record>(record: &R, version: u32, sink: &mut dyn ByteSink) -> Result<usize> {
    Marshaller::shared().encode(record, version, sink)
}

/// Decode one `R` at `version` with the shared default marshaller
pub fn decode<R: Record>(source: &mut dyn ByteSource, version: u32) -> Result<Decoded<R>> {
    Marshaller::shared().decode(source, version)
}

// =============================================================================
// Version Info
// =============================================================================

/// Current version of protomarshal
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
