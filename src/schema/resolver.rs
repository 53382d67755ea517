//! Schema Resolver
//!
//! Turns a record schema and a protocol version into an ordered field plan.
//!
//! ## Selection Rules
//! 1. Keep the descriptors whose version set is empty or contains the version
//! 2. No match: the field is absent for that version
//! 3. One match: the field is planned with that descriptor
//! 4. More than one: `AmbiguousVersionMapping`
//!
//! Field names must be unique within a record. Fields are then sorted by
//! `order` (ties are a schema error) and bit-fields by `bit_offset`.

use std::collections::HashSet;
use std::fmt;

use crate::codec::bitfield;
use crate::codec::span;
use crate::error::{ProtoError, Result};

use super::record::{Access, BitBinding, FieldBinding, Layout};
use super::{BitFieldDescriptor, FieldDescriptor, LengthMode, Record, Versioned, WireType};

/// The version-specific, ordered list of fields of one record type
///
/// Immutable once built; safe to share across concurrent calls.
pub struct ResolvedFieldPlan<R: 'static> {
    pub(crate) record: &'static str,
    pub(crate) version: u32,
    pub(crate) body: PlanBody<R>,
}

pub(crate) enum PlanBody<R: 'static> {
    Fields(Vec<PlannedField<R>>),
    Packed {
        length: usize,
        bits: Vec<PlannedBit<R>>,
    },
}

pub(crate) struct PlannedField<R: 'static> {
    pub(crate) binding: &'static FieldBinding<R>,
    pub(crate) descriptor: &'static FieldDescriptor,
}

pub(crate) struct PlannedBit<R: 'static> {
    pub(crate) binding: &'static BitBinding<R>,
    pub(crate) descriptor: &'static BitFieldDescriptor,
}

impl<R: 'static> ResolvedFieldPlan<R> {
    pub fn record(&self) -> &'static str {
        self.record
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Planned field names in wire order
    pub fn field_names(&self) -> Vec<&'static str> {
        match &self.body {
            PlanBody::Fields(fields) => fields.iter().map(|f| f.binding.name).collect(),
            PlanBody::Packed { bits, .. } => bits.iter().map(|b| b.binding.name).collect(),
        }
    }

    /// Selected descriptors in wire order (field records only)
    pub fn descriptors(&self) -> Vec<&'static FieldDescriptor> {
        match &self.body {
            PlanBody::Fields(fields) => fields.iter().map(|f| f.descriptor).collect(),
            PlanBody::Packed { .. } => Vec::new(),
        }
    }

    /// Selected bit-field descriptors in ascending offset (packed records only)
    pub fn bit_descriptors(&self) -> Vec<&'static BitFieldDescriptor> {
        match &self.body {
            PlanBody::Packed { bits, .. } => bits.iter().map(|b| b.descriptor).collect(),
            PlanBody::Fields(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.body {
            PlanBody::Fields(fields) => fields.len(),
            PlanBody::Packed { bits, .. } => bits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: 'static> fmt::Debug for ResolvedFieldPlan<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedFieldPlan")
            .field("record", &self.record)
            .field("version", &self.version)
            .field("fields", &self.field_names())
            .finish()
    }
}

/// Pick the single descriptor matching `version`, if any
pub fn select<'a, D: Versioned>(
    record: &str,
    field: &str,
    descriptors: &'a [D],
    version: u32,
) -> Result<Option<&'a D>> {
    let mut matches = descriptors.iter().filter(|d| d.versions().matches(version));
    let first = matches.next();
    if matches.next().is_some() {
        return Err(ProtoError::AmbiguousVersionMapping {
            record: record.to_string(),
            field: field.to_string(),
            version,
        });
    }
    Ok(first)
}

/// Resolve the plan of `R` for `version`
pub fn resolve<R: Record>(version: u32) -> Result<ResolvedFieldPlan<R>> {
    let schema = R::schema();
    check_unique_names(schema.name, &schema.field_names())?;
    let body = match &schema.layout {
        Layout::Fields(fields) => PlanBody::Fields(resolve_fields(schema.name, fields, version)?),
        Layout::Packed { length, bits } => PlanBody::Packed {
            length: *length,
            bits: resolve_bits(schema.name, *length, bits, version)?,
        },
    };
    let plan = ResolvedFieldPlan {
        record: schema.name,
        version,
        body,
    };
    tracing::debug!(
        record = schema.name,
        version,
        fields = ?plan.field_names(),
        "field plan resolved"
    );
    Ok(plan)
}

fn resolve_fields<R: 'static>(
    record: &'static str,
    fields: &'static [FieldBinding<R>],
    version: u32,
) -> Result<Vec<PlannedField<R>>> {
    let mut planned = Vec::with_capacity(fields.len());
    for binding in fields {
        let Some(descriptor) = select(record, binding.name, &binding.descriptors, version)? else {
            tracing::trace!(record, field = binding.name, version, "field absent for version");
            continue;
        };
        check_descriptor(record, binding, descriptor)?;
        planned.push(PlannedField {
            binding,
            descriptor,
        });
    }

    planned.sort_by_key(|f| f.descriptor.order);
    if let Some(pair) = planned
        .windows(2)
        .find(|pair| pair[0].descriptor.order == pair[1].descriptor.order)
    {
        return Err(ProtoError::Schema(format!(
            "{}: fields '{}' and '{}' share order {} in version {}",
            record, pair[0].binding.name, pair[1].binding.name, pair[0].descriptor.order, version
        )));
    }
    Ok(planned)
}

fn check_unique_names(record: &str, names: &[&'static str]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    match names.iter().find(|name| !seen.insert(**name)) {
        Some(name) => Err(ProtoError::Schema(format!(
            "{}: field name '{}' is declared more than once",
            record, name
        ))),
        None => Ok(()),
    }
}

fn check_descriptor<R: 'static>(
    record: &str,
    binding: &FieldBinding<R>,
    descriptor: &FieldDescriptor,
) -> Result<()> {
    match (&binding.access, descriptor.wire_type) {
        (Access::Scalar { .. }, WireType::Object) => {
            return Err(ProtoError::Schema(format!(
                "{}.{} is OBJECT but bound to a scalar accessor",
                record, binding.name
            )));
        }
        (Access::Nested(nested), WireType::Object) => {
            let info = (nested.info)();
            if let (Some(container), Some(declared)) = (info.packed_length, descriptor.length) {
                if container != declared {
                    return Err(ProtoError::LengthMismatch(format!(
                        "{}.{} declares {} bytes, packed record {} is {} bytes",
                        record, binding.name, declared, info.name, container
                    )));
                }
            }
        }
        (Access::Nested(_), wire_type) => {
            return Err(ProtoError::Schema(format!(
                "{}.{} binds a nested record but is {}",
                record, binding.name, wire_type
            )));
        }
        (Access::Scalar { .. }, _) => {}
    }

    match descriptor.length_mode {
        LengthMode::Fixed
            if descriptor.length.is_none() && descriptor.wire_type != WireType::Object =>
        {
            Err(ProtoError::Schema(format!(
                "{}.{} is FIXED but declares no length",
                record, binding.name
            )))
        }
        LengthMode::LengthPrefixed { prefix } if !span::PREFIX_WIDTHS.contains(&prefix) => {
            Err(ProtoError::Schema(format!(
                "{}.{} uses a {}-byte length prefix (expected 1, 2 or 4)",
                record, binding.name, prefix
            )))
        }
        _ => Ok(()),
    }
}

fn resolve_bits<R: 'static>(
    record: &'static str,
    length: usize,
    bits: &'static [BitBinding<R>],
    version: u32,
) -> Result<Vec<PlannedBit<R>>> {
    bitfield::check_container(length)?;
    let mut planned = Vec::with_capacity(bits.len());
    for binding in bits {
        let Some(descriptor) = select(record, binding.name, &binding.descriptors, version)? else {
            continue;
        };
        bitfield::check_span(descriptor, length)?;
        planned.push(PlannedBit {
            binding,
            descriptor,
        });
    }
    planned.sort_by_key(|b| b.descriptor.bit_offset);
    Ok(planned)
}
