//! Shared record fixtures for the integration tests

#![allow(dead_code)]

use std::sync::LazyLock;

use protomarshal::schema::{BitFieldDescriptor, FieldDescriptor, LengthMode, Record, RecordSchema};

// =============================================================================
// Reading: DWORD + BCD
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    pub a: u32,
    pub b: String,
}

static READING: LazyLock<RecordSchema<Reading>> = LazyLock::new(|| {
    RecordSchema::<Reading>::builder("Reading")
        .scalar("a", [FieldDescriptor::dword().order(0)], |r| r.a, |r, v| r.a = v)
        .scalar("b", [FieldDescriptor::bcd(3).order(1)], |r| r.b.clone(), |r, v| r.b = v)
        .build()
});

impl Record for Reading {
    fn schema() -> &'static RecordSchema<Self> {
        &READING
    }
}

// =============================================================================
// Flags: one packed byte
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flags {
    pub low: u8,
    pub high: u8,
}

static FLAGS: LazyLock<RecordSchema<Flags>> = LazyLock::new(|| {
    RecordSchema::<Flags>::packed("Flags", 1)
        .bits("high", [BitFieldDescriptor::new(4, 4)], |r| r.high, |r, v| r.high = v)
        .bits("low", [BitFieldDescriptor::new(0, 4)], |r| r.low, |r, v| r.low = v)
        .build()
});

impl Record for Flags {
    fn schema() -> &'static RecordSchema<Self> {
        &FLAGS
    }
}

// =============================================================================
// Header / Frame: nesting and variable spans
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub kind: u8,
    pub flags: Flags,
}

static HEADER: LazyLock<RecordSchema<Header>> = LazyLock::new(|| {
    RecordSchema::<Header>::builder("Header")
        .nested(
            "flags",
            [FieldDescriptor::object().length(1).order(1)],
            |r| &r.flags,
            |r| &mut r.flags,
        )
        .scalar("kind", [FieldDescriptor::byte().order(0)], |r| r.kind, |r, v| r.kind = v)
        .build()
});

impl Record for Header {
    fn schema() -> &'static RecordSchema<Self> {
        &HEADER
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub header: Header,
    pub name: String,
    pub payload: Vec<u8>,
}

static FRAME: LazyLock<RecordSchema<Frame>> = LazyLock::new(|| {
    RecordSchema::<Frame>::builder("Frame")
        .nested("header", [FieldDescriptor::object().order(0)], |r| &r.header, |r| &mut r.header)
        .scalar(
            "name",
            [FieldDescriptor::string(0)
                .mode(LengthMode::LengthPrefixed { prefix: 1 })
                .order(1)],
            |r| r.name.clone(),
            |r, v| r.name = v,
        )
        .scalar(
            "payload",
            [FieldDescriptor::bytes(0).mode(LengthMode::AllRemainingBytes).order(2)],
            |r| r.payload.clone(),
            |r, v| r.payload = v,
        )
        .build()
});

impl Record for Frame {
    fn schema() -> &'static RecordSchema<Self> {
        &FRAME
    }
}

// =============================================================================
// Telemetry: layout changes across versions 1 and 2
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Telemetry {
    pub id: u16,
    pub value: u32,
    pub extra: u8,
}

static TELEMETRY: LazyLock<RecordSchema<Telemetry>> = LazyLock::new(|| {
    RecordSchema::<Telemetry>::builder("Telemetry")
        .scalar("id", [FieldDescriptor::word().order(0)], |r| r.id, |r, v| r.id = v)
        .scalar(
            "value",
            [
                FieldDescriptor::word().order(1).versions([1]),
                FieldDescriptor::dword().order(1).versions([2]),
            ],
            |r| r.value,
            |r, v| r.value = v,
        )
        .scalar(
            "extra",
            [FieldDescriptor::byte().order(2).versions([2])],
            |r| r.extra,
            |r, v| r.extra = v,
        )
        .build()
});

impl Record for Telemetry {
    fn schema() -> &'static RecordSchema<Self> {
        &TELEMETRY
    }
}

// =============================================================================
// Signed: two's-complement fields over unsigned wire types
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signed {
    pub small: i8,
    pub wide: i32,
}

static SIGNED: LazyLock<RecordSchema<Signed>> = LazyLock::new(|| {
    RecordSchema::<Signed>::builder("Signed")
        .scalar("small", [FieldDescriptor::byte().order(0)], |r| r.small, |r, v| r.small = v)
        .scalar("wide", [FieldDescriptor::dword().order(1)], |r| r.wide, |r, v| r.wide = v)
        .build()
});

impl Record for Signed {
    fn schema() -> &'static RecordSchema<Self> {
        &SIGNED
    }
}

/// Decode a hex fixture, panicking on malformed literals
pub fn bytes(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str.replace(' ', "")).unwrap()
}

// =============================================================================
// Meter: integer fields carried as BCD
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meter {
    pub serial: u32,
    pub offset: i16,
}

static METER: LazyLock<RecordSchema<Meter>> = LazyLock::new(|| {
    RecordSchema::<Meter>::builder("Meter")
        .scalar("serial", [FieldDescriptor::bcd(4).order(0)], |r| r.serial, |r, v| r.serial = v)
        .scalar("offset", [FieldDescriptor::bcd(3).order(1)], |r| r.offset, |r, v| r.offset = v)
        .build()
});

impl Record for Meter {
    fn schema() -> &'static RecordSchema<Self> {
        &METER
    }
}
