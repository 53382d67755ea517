//! Composite (Object) Codec
//!
//! Walks a resolved plan in ascending order against one shared stream.
//! Scalar fields go through the registry, nested records recurse, packed
//! records go through the bit-field packer. The first failure aborts the
//! whole record; the stream stays wherever that failure left it.

use crate::error::{ProtoError, Result};
use crate::marshaller::Marshaller;
use crate::schema::{Access, PlanBody, Record};
use crate::stream::{ByteSink, ByteSource};
use crate::tree::{ObjectNode, ParseNode};

use super::bitfield;
use super::span::read_fixed;
use super::Value;

/// State of one encode call
pub struct EncodeScope<'a> {
    marshaller: &'a Marshaller,
    sink: &'a mut dyn ByteSink,
    version: u32,
}

impl<'a> EncodeScope<'a> {
    pub(crate) fn new(
        marshaller: &'a Marshaller,
        sink: &'a mut dyn ByteSink,
        version: u32,
    ) -> Self {
        Self {
            marshaller,
            sink,
            version,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Encode `record` at the current stream position, returning the bytes written
    pub fn encode_record<R: Record>(&mut self, record: &R) -> Result<usize> {
        let marshaller = self.marshaller;
        let plan = marshaller.plan::<R>(self.version)?;
        let config = marshaller.config();
        let mut written = 0;

        match &plan.body {
            PlanBody::Fields(fields) => {
                for field in fields {
                    let descriptor = field.descriptor;
                    let n = match &field.binding.access {
                        Access::Scalar { get, .. } => {
                            let codec = marshaller.registry().lookup(descriptor.wire_type)?;
                            codec.encode(&get(record), descriptor, &mut *self.sink, config)?
                        }
                        Access::Nested(nested) => (nested.encode)(record, self)?,
                    };
                    tracing::trace!(
                        record = plan.record,
                        field = descriptor.name,
                        wire_type = %descriptor.wire_type,
                        bytes = n,
                        "field encoded"
                    );
                    written += n;
                }
            }
            PlanBody::Packed { length, bits } => {
                let mut values = Vec::with_capacity(bits.len());
                for bit in bits {
                    let value = (bit.binding.get)(record);
                    let raw = value.as_uint().ok_or_else(|| {
                        ProtoError::UnsupportedType(format!(
                            "bit-field {}.{} holds a {} value",
                            plan.record,
                            bit.descriptor.name,
                            value.kind()
                        ))
                    })?;
                    values.push((bit.descriptor, raw));
                }
                let container = bitfield::pack(*length, &values)?;
                self.sink.write_all(&container)?;
                tracing::trace!(record = plan.record, bytes = *length, "bit-fields packed");
                written += *length;
            }
        }
        Ok(written)
    }
}

/// State of one decode call
pub struct DecodeScope<'a> {
    marshaller: &'a Marshaller,
    source: &'a mut dyn ByteSource,
    version: u32,
    capture: bool,
}

impl<'a> DecodeScope<'a> {
    pub(crate) fn new(
        marshaller: &'a Marshaller,
        source: &'a mut dyn ByteSource,
        version: u32,
        capture: bool,
    ) -> Self {
        Self {
            marshaller,
            source,
            version,
            capture,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Decode into `target` from the current stream position
    ///
    /// Returns the record's parse node when the tree is being captured.
    pub fn decode_into<R: Record>(&mut self, target: &mut R) -> Result<Option<ObjectNode>> {
        let marshaller = self.marshaller;
        let plan = marshaller.plan::<R>(self.version)?;
        let config = marshaller.config();
        let mut tree = self.capture.then(ObjectNode::new);

        match &plan.body {
            PlanBody::Fields(fields) => {
                for field in fields {
                    let descriptor = field.descriptor;
                    match &field.binding.access {
                        Access::Scalar { set, .. } => {
                            let codec = marshaller.registry().lookup(descriptor.wire_type)?;
                            let value = codec.decode(&mut *self.source, descriptor, config)?;
                            tracing::trace!(
                                record = plan.record,
                                field = descriptor.name,
                                wire_type = %descriptor.wire_type,
                                "field decoded"
                            );
                            if let Some(node) = tree.as_mut() {
                                node.insert(descriptor.name, ParseNode::Value(value.clone()));
                            }
                            set(target, value)?;
                        }
                        Access::Nested(nested) => {
                            let child = (nested.decode)(target, self)?;
                            if let (Some(node), Some(child)) = (tree.as_mut(), child) {
                                node.insert(descriptor.name, ParseNode::Object(child));
                            }
                        }
                    }
                }
            }
            PlanBody::Packed { length, bits } => {
                let container = read_fixed(&mut *self.source, *length)?;
                let descriptors: Vec<_> = bits.iter().map(|b| b.descriptor).collect();
                let values = bitfield::unpack(&container, &descriptors)?;
                for (bit, raw) in bits.iter().zip(values) {
                    if let Some(node) = tree.as_mut() {
                        node.insert(bit.descriptor.name, ParseNode::Value(Value::Uint(raw)));
                    }
                    (bit.binding.set)(target, Value::Uint(raw))?;
                }
                tracing::trace!(record = plan.record, bytes = *length, "bit-fields unpacked");
            }
        }
        Ok(tree)
    }
}
