//! Codec Registry
//!
//! Maps wire types to scalar codecs. Populated once, then read-only.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::error::{ProtoError, Result};
use crate::schema::WireType;

use super::{BcdCodec, RawBytesCodec, ScalarCodec, StringCodec, UnsignedCodec};

/// Process-wide registry holding the built-in codecs
static BUILTIN_REGISTRY: LazyLock<Arc<CodecRegistry>> =
    LazyLock::new(|| Arc::new(CodecRegistry::builtin()));

/// Wire type → scalar codec table
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<WireType, Arc<dyn ScalarCodec>>,
}

impl CodecRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in scalar codec
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(WireType::Byte, Arc::new(UnsignedCodec::BYTE));
        registry.insert(WireType::Word, Arc::new(UnsignedCodec::WORD));
        registry.insert(WireType::Dword, Arc::new(UnsignedCodec::DWORD));
        registry.insert(WireType::Bytes, Arc::new(RawBytesCodec));
        registry.insert(WireType::Bcd, Arc::new(BcdCodec));
        registry.insert(WireType::String, Arc::new(StringCodec));
        registry
    }

    /// The shared built-in registry
    pub fn shared() -> Arc<CodecRegistry> {
        Arc::clone(&BUILTIN_REGISTRY)
    }

    /// Register a codec for a wire type not yet present
    ///
    /// OBJECT belongs to the composite codec and cannot be registered;
    /// neither can a wire type that already has a codec.
    pub fn register(&mut self, wire_type: WireType, codec: Arc<dyn ScalarCodec>) -> Result<()> {
        if wire_type == WireType::Object {
            return Err(ProtoError::UnsupportedType(
                "OBJECT is handled by the composite codec".to_string(),
            ));
        }
        if self.codecs.contains_key(&wire_type) {
            return Err(ProtoError::UnsupportedType(format!(
                "a codec for {} is already registered",
                wire_type
            )));
        }
        self.insert(wire_type, codec);
        Ok(())
    }

    /// Look up the codec for a wire type
    pub fn lookup(&self, wire_type: WireType) -> Result<&dyn ScalarCodec> {
        self.codecs
            .get(&wire_type)
            .map(|codec| codec.as_ref())
            .ok_or_else(|| {
                ProtoError::UnsupportedType(format!("no codec registered for {}", wire_type))
            })
    }

    pub fn contains(&self, wire_type: WireType) -> bool {
        self.codecs.contains_key(&wire_type)
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    fn insert(&mut self, wire_type: WireType, codec: Arc<dyn ScalarCodec>) {
        tracing::trace!(%wire_type, codec = codec.name(), "codec registered");
        self.codecs.insert(wire_type, codec);
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.codecs.keys().map(|w| w.to_string()).collect();
        names.sort();
        f.debug_struct("CodecRegistry").field("codecs", &names).finish()
    }
}
