//! Marshaller
//!
//! The public entry points: encode a record into a byte sink, decode one
//! from a byte source, for a given protocol version.
//!
//! ## Sharing
//! A `Marshaller` is immutable apart from its plan cache, which is
//! internally locked. One instance can serve concurrent calls as long as
//! each call uses its own stream.

use std::sync::{Arc, LazyLock};

use crate::codec::{CodecRegistry, DecodeScope, EncodeScope};
use crate::config::CodecConfig;
use crate::error::Result;
use crate::schema::{resolve, PlanCache, Record, ResolvedFieldPlan};
use crate::stream::{ByteSink, ByteSource, SliceSource};
use crate::tree::ParseNode;

static DEFAULT_MARSHALLER: LazyLock<Marshaller> = LazyLock::new(Marshaller::default);

/// Output of a decode call
#[derive(Debug, Clone)]
pub struct Decoded<R> {
    pub record: R,
    /// Present when parse-tree capture was requested
    pub tree: Option<ParseNode>,
}

/// Encoder/decoder for schema-described records
#[derive(Debug)]
pub struct Marshaller {
    config: CodecConfig,
    registry: Arc<CodecRegistry>,
    plans: PlanCache,
}

impl Default for Marshaller {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl Marshaller {
    /// Marshaller over the built-in codecs
    pub fn new(config: CodecConfig) -> Self {
        Self::with_registry(config, CodecRegistry::shared())
    }

    /// Marshaller over a caller-provided (usually extended) registry
    pub fn with_registry(config: CodecConfig, registry: Arc<CodecRegistry>) -> Self {
        Self {
            config,
            registry,
            plans: PlanCache::new(),
        }
    }

    /// Process-wide marshaller with the default configuration
    pub fn shared() -> &'static Marshaller {
        &DEFAULT_MARSHALLER
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    pub fn plan_cache(&self) -> &PlanCache {
        &self.plans
    }

    /// Resolved plan of `R` for `version`
    pub fn plan<R: Record>(&self, version: u32) -> Result<Arc<ResolvedFieldPlan<R>>> {
        if self.config.cache_plans {
            self.plans.get_or_resolve::<R>(version)
        } else {
            resolve::<R>(version).map(Arc::new)
        }
    }

    // =========================================================================
    // Encode
    // =========================================================================

    /// Encode `record` at `version` into `sink`, returning the bytes written
    pub fn encode<R: Record>(
        &self,
        record: &R,
        version: u32,
        sink: &mut dyn ByteSink,
    ) -> Result<usize> {
        let mut scope = EncodeScope::new(self, sink, version);
        let written = scope.encode_record(record)?;
        tracing::debug!(record = R::schema().name(), version, bytes = written, "record encoded");
        Ok(written)
    }

    /// Encode `record` into a fresh buffer
    pub fn encode_to_vec<R: Record>(&self, record: &R, version: u32) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(record, version, &mut out)?;
        Ok(out)
    }

    // =========================================================================
    // Decode
    // =========================================================================

    /// Decode one `R` at `version` from `source`
    ///
    /// A parse tree is built when `capture_parse_tree` is configured.
    pub fn decode<R: Record>(
        &self,
        source: &mut dyn ByteSource,
        version: u32,
    ) -> Result<Decoded<R>> {
        self.decode_inner(source, version, self.config.capture_parse_tree)
    }

    /// Decode one `R` and always build its parse tree
    pub fn decode_with_tree<R: Record>(
        &self,
        source: &mut dyn ByteSource,
        version: u32,
    ) -> Result<(R, ParseNode)> {
        let decoded = self.decode_inner::<R>(source, version, true)?;
        let tree = decoded.tree.unwrap_or_default();
        Ok((decoded.record, tree))
    }

    /// Decode one `R` from the front of `bytes`, ignoring any trailing bytes
    pub fn decode_from_slice<R: Record>(&self, bytes: &[u8], version: u32) -> Result<R> {
        let mut source = SliceSource::new(bytes);
        Ok(self.decode_inner::<R>(&mut source, version, false)?.record)
    }

    fn decode_inner<R: Record>(
        &self,
        source: &mut dyn ByteSource,
        version: u32,
        capture: bool,
    ) -> Result<Decoded<R>> {
        let mut record = R::default();
        let mut scope = DecodeScope::new(self, source, version, capture);
        let tree = scope.decode_into(&mut record)?.map(ParseNode::Object);
        tracing::debug!(record = R::schema().name(), version, "record decoded");
        Ok(Decoded { record, tree })
    }
}
