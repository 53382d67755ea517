//! Field descriptors
//!
//! Static, per-field wire rules. A field may carry several descriptors that
//! apply to different protocol versions; the resolver picks one per version.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Logical wire type selecting a codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WireType {
    /// Unsigned 8-bit integer
    Byte,
    /// Unsigned 16-bit big-endian integer
    Word,
    /// Unsigned 32-bit big-endian integer
    Dword,
    /// Raw byte array
    Bytes,
    /// Binary-coded decimal digit string
    Bcd,
    /// Charset-encoded string
    String,
    /// Nested record
    Object,
    /// Application-registered codec
    Custom(u16),
}

impl WireType {
    /// Fixed width of the integer wire types
    pub fn natural_width(&self) -> Option<usize> {
        match self {
            WireType::Byte => Some(1),
            WireType::Word => Some(2),
            WireType::Dword => Some(4),
            _ => None,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireType::Byte => f.write_str("BYTE"),
            WireType::Word => f.write_str("WORD"),
            WireType::Dword => f.write_str("DWORD"),
            WireType::Bytes => f.write_str("BYTES"),
            WireType::Bcd => f.write_str("BCD"),
            WireType::String => f.write_str("STRING"),
            WireType::Object => f.write_str("OBJECT"),
            WireType::Custom(tag) => write!(f, "CUSTOM({})", tag),
        }
    }
}

/// How a field's byte span is delimited on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LengthMode {
    /// Exactly `length` bytes
    Fixed,
    /// Big-endian unsigned length of `prefix` bytes (1, 2 or 4), then the data
    LengthPrefixed { prefix: usize },
    /// Data followed by a single `separator` byte
    SeparatorTerminated { separator: u8 },
    /// Everything left in the stream
    AllRemainingBytes,
}

/// Character set of a STRING field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Charset {
    #[default]
    Utf8,
    Ascii,
    /// ISO-8859-1
    Latin1,
}

/// Protocol versions a descriptor applies to; empty means every version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionSet(BTreeSet<u32>);

impl VersionSet {
    pub fn all() -> Self {
        Self(BTreeSet::new())
    }

    pub fn of(versions: impl IntoIterator<Item = u32>) -> Self {
        Self(versions.into_iter().collect())
    }

    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, version: u32) -> bool {
        self.0.is_empty() || self.0.contains(&version)
    }
}

/// Anything the version filter can select between
pub trait Versioned {
    fn versions(&self) -> &VersionSet;
}

// =============================================================================
// FieldDescriptor
// =============================================================================

/// Wire rules for one field of a record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Field name, unique within the declaring record
    pub name: &'static str,
    pub wire_type: WireType,
    /// Fixed byte length; `None` when the span is variable
    pub length: Option<usize>,
    pub length_mode: LengthMode,
    /// Serialization position (ascending)
    pub order: i32,
    /// Only meaningful for STRING fields
    pub charset: Charset,
    pub versions: VersionSet,
}

impl FieldDescriptor {
    pub fn new(wire_type: WireType) -> Self {
        Self {
            name: "",
            wire_type,
            length: wire_type.natural_width(),
            length_mode: LengthMode::Fixed,
            order: 0,
            charset: Charset::default(),
            versions: VersionSet::all(),
        }
    }

    pub fn byte() -> Self {
        Self::new(WireType::Byte)
    }

    pub fn word() -> Self {
        Self::new(WireType::Word)
    }

    pub fn dword() -> Self {
        Self::new(WireType::Dword)
    }

    pub fn bytes(length: usize) -> Self {
        Self::new(WireType::Bytes).length(length)
    }

    pub fn bcd(length: usize) -> Self {
        Self::new(WireType::Bcd).length(length)
    }

    pub fn string(length: usize) -> Self {
        Self::new(WireType::String).length(length)
    }

    /// Nested record; `length` is only set for packed bit-field records
    pub fn object() -> Self {
        Self::new(WireType::Object)
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Switch to a variable-length span, clearing any fixed length
    pub fn mode(mut self, mode: LengthMode) -> Self {
        if mode != LengthMode::Fixed {
            self.length = None;
        }
        self.length_mode = mode;
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn versions(mut self, versions: impl IntoIterator<Item = u32>) -> Self {
        self.versions = VersionSet::of(versions);
        self
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl Versioned for FieldDescriptor {
    fn versions(&self) -> &VersionSet {
        &self.versions
    }
}

// =============================================================================
// BitFieldDescriptor
// =============================================================================

/// One sub-byte value inside a bit-field container
///
/// `bit_offset` counts from the least-significant bit of the container,
/// whose bytes are big-endian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitFieldDescriptor {
    pub name: &'static str,
    pub bit_offset: u32,
    pub bit_length: u32,
    pub versions: VersionSet,
}

impl BitFieldDescriptor {
    pub fn new(bit_offset: u32, bit_length: u32) -> Self {
        Self {
            name: "",
            bit_offset,
            bit_length,
            versions: VersionSet::all(),
        }
    }

    pub fn versions(mut self, versions: impl IntoIterator<Item = u32>) -> Self {
        self.versions = VersionSet::of(versions);
        self
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl Versioned for BitFieldDescriptor {
    fn versions(&self) -> &VersionSet {
        &self.versions
    }
}
