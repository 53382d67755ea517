//! Schema Module
//!
//! Static record descriptions and their per-version resolution.
//!
//! ## Responsibilities
//! - Field and bit-field descriptors with version sets
//! - Typed accessor tables binding descriptors to record fields
//! - Per-version selection and ordering of fields into a plan
//! - Caching plans per (record type, version)
//!
//! ## Lifecycle
//! ```text
//!   RecordSchema (static, built once)
//!        │  resolve(version)
//!        ▼
//!   ResolvedFieldPlan (immutable, cached in PlanCache)
//!        │  walked by the composite codec
//!        ▼
//!   wire bytes  ◄──►  record
//! ```

mod cache;
mod descriptor;
mod record;
mod resolver;

pub use cache::PlanCache;
pub use descriptor::{
    BitFieldDescriptor, Charset, FieldDescriptor, LengthMode, VersionSet, Versioned, WireType,
};
pub use record::{
    BitBinding, FieldBinding, FieldsBuilder, PackedBuilder, Record, RecordSchema, SchemaInfo,
};
pub use resolver::{resolve, select, ResolvedFieldPlan};

pub(crate) use record::Access;
pub(crate) use resolver::PlanBody;
