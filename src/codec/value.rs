//! Codec values
//!
//! The carrier type passed between record accessors and codecs.

use std::fmt;
use std::num::IntErrorKind;

use serde::Serialize;

use crate::error::{ProtoError, Result};
use crate::numeric;

/// A single decoded (or to-be-encoded) field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Unsigned integer, widened so the wire value never sign-extends
    Uint(u64),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Charset-decoded text
    Text(String),

    /// BCD digit string (lowercase hex nibbles, no leading zeros)
    Digits(String),
}

impl Value {
    /// Short kind name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Digits(_) => "digits",
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Text or digit content
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Digits(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uint(v) => write!(f, "{} (0x{:X})", v, v),
            Value::Bytes(b) => {
                f.write_str("[")?;
                for (i, byte) in b.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{:02x}", byte)?;
                }
                f.write_str("]")
            }
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Digits(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// WireValue
// =============================================================================

/// Conversion between a record field type and [`Value`]
///
/// Integer fields narrow silently: a wider wire value assigned to a
/// narrower field keeps its low bits. Signed fields reinterpret the
/// two's-complement bits of their own width. Integer fields also accept
/// decimal BCD digits, which must fit the field's width.
pub trait WireValue: Sized {
    fn into_value(self) -> Value;
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: &str, value: &Value) -> ProtoError {
    ProtoError::UnsupportedType(format!(
        "cannot assign {} value to {} field",
        value.kind(),
        expected
    ))
}

/// Parse a decimal digit string (as decoded from BCD) that must fit `width` bytes
fn uint_from_digits(digits: &str, width: usize, expected: &str) -> Result<u64> {
    let value = digits.parse::<u64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => ProtoError::ValueRange(format!(
            "digits {:?} overflow a {} field",
            digits, expected
        )),
        _ => ProtoError::Encoding(format!(
            "digits {:?} are not a decimal {} value",
            digits, expected
        )),
    })?;
    if !numeric::fits(value, width) {
        return Err(ProtoError::ValueRange(format!(
            "digits {:?} overflow a {} field",
            digits, expected
        )));
    }
    Ok(value)
}

macro_rules! unsigned_wire_value {
    ($($ty:ty),*) => {
        $(
            impl WireValue for $ty {
                fn into_value(self) -> Value {
                    Value::Uint(self as u64)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Uint(v) => {
                            Ok(numeric::narrow(v, std::mem::size_of::<$ty>()) as $ty)
                        }
                        Value::Digits(digits) => Ok(uint_from_digits(
                            &digits,
                            std::mem::size_of::<$ty>(),
                            stringify!($ty),
                        )? as $ty),
                        other => Err(mismatch(stringify!($ty), &other)),
                    }
                }
            }
        )*
    };
}

macro_rules! signed_wire_value {
    ($($ty:ty),*) => {
        $(
            impl WireValue for $ty {
                fn into_value(self) -> Value {
                    Value::Uint(numeric::unsigned_from_signed(
                        self as i64,
                        std::mem::size_of::<$ty>(),
                    ))
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Uint(v) => Ok(numeric::signed_from_unsigned(
                            v,
                            std::mem::size_of::<$ty>(),
                        ) as $ty),
                        Value::Digits(digits) => {
                            let width = std::mem::size_of::<$ty>();
                            let raw = uint_from_digits(&digits, width, stringify!($ty))?;
                            Ok(numeric::signed_from_unsigned(raw, width) as $ty)
                        }
                        other => Err(mismatch(stringify!($ty), &other)),
                    }
                }
            }
        )*
    };
}

unsigned_wire_value!(u8, u16, u32, u64);
signed_wire_value!(i8, i16, i32);

impl WireValue for bool {
    fn into_value(self) -> Value {
        Value::Uint(u64::from(self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uint(v) => Ok(v != 0),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl WireValue for Vec<u8> {
    fn into_value(self) -> Value {
        Value::Bytes(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(mismatch("bytes", &other)),
        }
    }
}

impl WireValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) | Value::Digits(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl WireValue for Value {
    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}
