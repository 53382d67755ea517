//! Record schemas
//!
//! Typed accessor tables replace runtime field lookup: every field of a
//! record is bound to a getter/setter pair plus its descriptors. A schema
//! is built once per record type and lives for the whole process.
//!
//! ## Shapes
//! - Field records: an ordered list of scalar and nested-record fields.
//! - Packed records: a single container of 1..=4 bytes holding bit-fields.

use std::fmt;

use crate::codec::{DecodeScope, EncodeScope, Value, WireValue};
use crate::error::Result;
use crate::tree::ObjectNode;

use super::{BitFieldDescriptor, FieldDescriptor};

/// A record type with a static schema
///
/// ```ignore
/// static SCHEMA: LazyLock<RecordSchema<Reading>> = LazyLock::new(|| {
///     RecordSchema::<Reading>::builder("Reading")
///         .scalar("id", [FieldDescriptor::dword().order(0)], |r| r.id, |r, v| r.id = v)
///         .build()
/// });
///
/// impl Record for Reading {
///     fn schema() -> &'static RecordSchema<Self> {
///         &SCHEMA
///     }
/// }
/// ```
pub trait Record: Default + 'static {
    fn schema() -> &'static RecordSchema<Self>;
}

pub(crate) type Getter<R> = Box<dyn Fn(&R) -> Value + Send + Sync>;
pub(crate) type Setter<R> = Box<dyn Fn(&mut R, Value) -> Result<()> + Send + Sync>;
pub(crate) type NestedEncode<R> =
    Box<dyn Fn(&R, &mut EncodeScope<'_>) -> Result<usize> + Send + Sync>;
pub(crate) type NestedDecode<R> =
    Box<dyn Fn(&mut R, &mut DecodeScope<'_>) -> Result<Option<ObjectNode>> + Send + Sync>;

/// Static facts about a nested record type, checked during resolution
#[derive(Debug, Clone, Copy)]
pub struct SchemaInfo {
    pub name: &'static str,
    /// Container length when the record is packed
    pub packed_length: Option<usize>,
}

fn schema_info<N: Record>() -> SchemaInfo {
    let schema = N::schema();
    SchemaInfo {
        name: schema.name,
        packed_length: schema.packed_length(),
    }
}

/// Schema of one record type
pub struct RecordSchema<R: 'static> {
    pub(crate) name: &'static str,
    pub(crate) layout: Layout<R>,
}

pub(crate) enum Layout<R: 'static> {
    Fields(Vec<FieldBinding<R>>),
    Packed { length: usize, bits: Vec<BitBinding<R>> },
}

/// One field of a field record
pub struct FieldBinding<R: 'static> {
    pub(crate) name: &'static str,
    pub(crate) descriptors: Vec<FieldDescriptor>,
    pub(crate) access: Access<R>,
}

pub(crate) enum Access<R: 'static> {
    Scalar { get: Getter<R>, set: Setter<R> },
    Nested(NestedAccess<R>),
}

pub(crate) struct NestedAccess<R: 'static> {
    pub(crate) info: fn() -> SchemaInfo,
    pub(crate) encode: NestedEncode<R>,
    pub(crate) decode: NestedDecode<R>,
}

/// One sub-field of a packed record
pub struct BitBinding<R: 'static> {
    pub(crate) name: &'static str,
    pub(crate) descriptors: Vec<BitFieldDescriptor>,
    pub(crate) get: Getter<R>,
    pub(crate) set: Setter<R>,
}

impl<R: 'static> RecordSchema<R> {
    /// Start a field record schema
    pub fn builder(name: &'static str) -> FieldsBuilder<R> {
        FieldsBuilder {
            name,
            fields: Vec::new(),
        }
    }

    /// Start a packed bit-field record schema of `length` container bytes
    pub fn packed(name: &'static str, length: usize) -> PackedBuilder<R> {
        PackedBuilder {
            name,
            length,
            bits: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn packed_length(&self) -> Option<usize> {
        match &self.layout {
            Layout::Packed { length, .. } => Some(*length),
            Layout::Fields(_) => None,
        }
    }

    /// Declared field (or bit-field) names, in declaration order
    pub fn field_names(&self) -> Vec<&'static str> {
        match &self.layout {
            Layout::Fields(fields) => fields.iter().map(|f| f.name).collect(),
            Layout::Packed { bits, .. } => bits.iter().map(|b| b.name).collect(),
        }
    }
}

impl<R: 'static> fmt::Debug for RecordSchema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("packed_length", &self.packed_length())
            .field("fields", &self.field_names())
            .finish()
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Builder for field records
pub struct FieldsBuilder<R: 'static> {
    name: &'static str,
    fields: Vec<FieldBinding<R>>,
}

impl<R: 'static> FieldsBuilder<R> {
    /// Bind a scalar field
    pub fn scalar<T: WireValue + 'static>(
        mut self,
        name: &'static str,
        descriptors: impl IntoIterator<Item = FieldDescriptor>,
        get: fn(&R) -> T,
        set: fn(&mut R, T),
    ) -> Self {
        self.fields.push(FieldBinding {
            name,
            descriptors: descriptors.into_iter().map(|d| d.named(name)).collect(),
            access: Access::Scalar {
                get: Box::new(move |record: &R| get(record).into_value()),
                set: Box::new(move |record: &mut R, value: Value| {
                    set(record, T::from_value(value)?);
                    Ok(())
                }),
            },
        });
        self
    }

    /// Bind a nested record field (field record or packed record)
    pub fn nested<N: Record>(
        mut self,
        name: &'static str,
        descriptors: impl IntoIterator<Item = FieldDescriptor>,
        get: fn(&R) -> &N,
        get_mut: fn(&mut R) -> &mut N,
    ) -> Self {
        self.fields.push(FieldBinding {
            name,
            descriptors: descriptors.into_iter().map(|d| d.named(name)).collect(),
            access: Access::Nested(NestedAccess {
                info: schema_info::<N>,
                encode: Box::new(move |record: &R, scope: &mut EncodeScope<'_>| {
                    scope.encode_record(get(record))
                }),
                decode: Box::new(move |record: &mut R, scope: &mut DecodeScope<'_>| {
                    scope.decode_into(get_mut(record))
                }),
            }),
        });
        self
    }

    pub fn build(self) -> RecordSchema<R> {
        RecordSchema {
            name: self.name,
            layout: Layout::Fields(self.fields),
        }
    }
}

/// Builder for packed bit-field records
pub struct PackedBuilder<R: 'static> {
    name: &'static str,
    length: usize,
    bits: Vec<BitBinding<R>>,
}

impl<R: 'static> PackedBuilder<R> {
    /// Bind a bit-field
    pub fn bits<T: WireValue + 'static>(
        mut self,
        name: &'static str,
        descriptors: impl IntoIterator<Item = BitFieldDescriptor>,
        get: fn(&R) -> T,
        set: fn(&mut R, T),
    ) -> Self {
        self.bits.push(BitBinding {
            name,
            descriptors: descriptors.into_iter().map(|d| d.named(name)).collect(),
            get: Box::new(move |record: &R| get(record).into_value()),
            set: Box::new(move |record: &mut R, value: Value| {
                set(record, T::from_value(value)?);
                Ok(())
            }),
        });
        self
    }

    pub fn build(self) -> RecordSchema<R> {
        RecordSchema {
            name: self.name,
            layout: Layout::Packed {
                length: self.length,
                bits: self.bits,
            },
        }
    }
}
