//! End-to-end tests for the marshaller
//!
//! These tests verify:
//! - Wire layouts of flat, packed, nested and variable-length records
//! - Version-dependent layouts
//! - Failure behavior on short input and out-of-range values
//! - Plan caching and configuration
//! - Concurrent use of one marshaller

#[path = "../common/mod.rs"]
mod common;

use std::io::Cursor;
use std::thread;

use common::{bytes, Flags, Frame, Header, Meter, Reading, Signed, Telemetry};
use proptest::prelude::*;
use protomarshal::stream::{ReaderSource, SliceSource, WriterSink};
use protomarshal::{CodecConfig, Marshaller, ProtoError};

fn reading() -> Reading {
    Reading {
        a: 0x01020304,
        b: "123".to_string(),
    }
}

// =============================================================================
// Flat Record Tests
// =============================================================================

#[test]
fn test_encode_dword_then_bcd() {
    let marshaller = Marshaller::default();
    let encoded = marshaller.encode_to_vec(&reading(), 1).unwrap();
    assert_eq!(encoded, bytes("01020304 000123"));
}

#[test]
fn test_decode_dword_then_bcd() {
    let marshaller = Marshaller::default();
    let decoded: Reading = marshaller
        .decode_from_slice(&bytes("01020304 000123"), 1)
        .unwrap();
    assert_eq!(decoded, reading());
}

#[test]
fn test_encode_reports_bytes_written() {
    let mut out: Vec<u8> = Vec::new();
    let written = Marshaller::shared().encode(&reading(), 1, &mut out).unwrap();
    assert_eq!(written, 7);
    assert_eq!(out.len(), 7);
}

#[test]
fn test_short_input_is_insufficient_data() {
    let err = Marshaller::default()
        .decode_from_slice::<Reading>(&bytes("01020304 0001"), 1)
        .unwrap_err();
    assert!(matches!(
        err,
        ProtoError::InsufficientData {
            needed: 3,
            available: 2
        }
    ));
}

#[test]
fn test_trailing_bytes_are_left_in_source() {
    let data = bytes("01020304 000123 ffee");
    let mut source = SliceSource::new(&data);
    let decoded = Marshaller::default()
        .decode::<Reading>(&mut source, 1)
        .unwrap();
    assert_eq!(decoded.record, reading());
    assert!(decoded.tree.is_none());
    assert_eq!(source.remaining(), &[0xFFu8, 0xEE]);
}

#[test]
fn test_signed_fields_reinterpret_bits() {
    let marshaller = Marshaller::default();
    let record = Signed {
        small: -1,
        wide: -2,
    };
    let encoded = marshaller.encode_to_vec(&record, 1).unwrap();
    assert_eq!(encoded, bytes("ff fffffffe"));

    let decoded: Signed = marshaller.decode_from_slice(&encoded, 1).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn test_integer_fields_round_trip_through_bcd() {
    let marshaller = Marshaller::default();
    let meter = Meter {
        serial: 12345678,
        offset: -5,
    };

    // i16 -5 travels as its 16-bit pattern 65531
    let encoded = marshaller.encode_to_vec(&meter, 1).unwrap();
    assert_eq!(encoded, bytes("12345678 065531"));

    let decoded: Meter = marshaller.decode_from_slice(&encoded, 1).unwrap();
    assert_eq!(decoded, meter);
}

#[test]
fn test_bcd_digits_wider_than_field() {
    let err = Marshaller::default()
        .decode_from_slice::<Meter>(&bytes("12345678 099999"), 1)
        .unwrap_err();
    assert!(matches!(err, ProtoError::ValueRange(_)));
}

#[test]
fn test_bcd_filler_nibbles_in_integer_field() {
    let err = Marshaller::default()
        .decode_from_slice::<Meter>(&bytes("1234567f 000001"), 1)
        .unwrap_err();
    assert!(matches!(err, ProtoError::Encoding(_)));
}

// =============================================================================
// Packed And Nested Record Tests
// =============================================================================

#[test]
fn test_packed_record_layout() {
    let marshaller = Marshaller::default();
    let flags = Flags {
        low: 0xA,
        high: 0x5,
    };
    assert_eq!(marshaller.encode_to_vec(&flags, 1).unwrap(), vec![0x5A]);
    assert_eq!(marshaller.decode_from_slice::<Flags>(&[0x5A], 1).unwrap(), flags);
}

#[test]
fn test_packed_value_out_of_range() {
    let flags = Flags { low: 16, high: 0 };
    let err = Marshaller::default().encode_to_vec(&flags, 1).unwrap_err();
    assert!(matches!(err, ProtoError::ValueRange(_)));
}

#[test]
fn test_nested_records_share_the_stream() {
    let marshaller = Marshaller::default();
    let frame = Frame {
        header: Header {
            kind: 7,
            flags: Flags { low: 1, high: 2 },
        },
        name: "ab".to_string(),
        payload: vec![1, 2, 3],
    };

    let encoded = marshaller.encode_to_vec(&frame, 1).unwrap();
    assert_eq!(encoded, bytes("07 21 02 6162 010203"));

    let decoded: Frame = marshaller.decode_from_slice(&encoded, 1).unwrap();
    assert_eq!(decoded, frame);
}

#[test]
fn test_empty_trailing_payload() {
    let decoded: Frame = Marshaller::default()
        .decode_from_slice(&bytes("00 00 00"), 1)
        .unwrap();
    assert_eq!(decoded, Frame::default());
}

// =============================================================================
// Versioned Layout Tests
// =============================================================================

#[test]
fn test_layout_depends_on_version() {
    let marshaller = Marshaller::default();
    let record = Telemetry {
        id: 1,
        value: 0x0001_2345,
        extra: 9,
    };

    // v1: WORD value (narrowed), no extra
    assert_eq!(
        marshaller.encode_to_vec(&record, 1).unwrap(),
        bytes("0001 2345")
    );
    // v2: DWORD value, trailing extra byte
    assert_eq!(
        marshaller.encode_to_vec(&record, 2).unwrap(),
        bytes("0001 00012345 09")
    );

    let v1: Telemetry = marshaller.decode_from_slice(&bytes("0001 2345"), 1).unwrap();
    assert_eq!(
        v1,
        Telemetry {
            id: 1,
            value: 0x2345,
            extra: 0
        }
    );
}

// =============================================================================
// Stream Adapter Tests
// =============================================================================

#[test]
fn test_reader_and_writer_adapters() {
    let marshaller = Marshaller::default();

    let mut sink = WriterSink::new(Vec::new());
    marshaller.encode(&reading(), 1, &mut sink).unwrap();
    assert_eq!(sink.bytes_written(), 7);

    let mut source = ReaderSource::new(Cursor::new(sink.into_inner()));
    let decoded = marshaller.decode::<Reading>(&mut source, 1).unwrap();
    assert_eq!(decoded.record, reading());
    assert_eq!(source.consumed(), 7);
}

#[test]
fn test_unbounded_variable_length_from_reader() {
    let config = CodecConfig::builder()
        .max_variable_length(usize::MAX)
        .build()
        .unwrap();
    let mut source = ReaderSource::new(Cursor::new(bytes("00 00 00 010203")));
    let decoded = Marshaller::new(config)
        .decode::<Frame>(&mut source, 1)
        .unwrap();
    assert_eq!(decoded.record.payload, vec![1, 2, 3]);
}

#[test]
fn test_crate_level_helpers() {
    let mut out: Vec<u8> = Vec::new();
    protomarshal::encode(&reading(), 1, &mut out).unwrap();

    let mut source = SliceSource::new(&out);
    let decoded = protomarshal::decode::<Reading>(&mut source, 1).unwrap();
    assert_eq!(decoded.record, reading());
}

// =============================================================================
// Configuration And Caching Tests
// =============================================================================

#[test]
fn test_plans_are_cached_after_use() {
    let marshaller = Marshaller::default();
    assert!(marshaller.plan_cache().is_empty());

    marshaller.encode_to_vec(&reading(), 1).unwrap();
    marshaller.decode_from_slice::<Reading>(&bytes("01020304 000123"), 1).unwrap();
    assert!(marshaller.plan_cache().contains::<Reading>(1));
    assert_eq!(marshaller.plan_cache().len(), 1);
}

#[test]
fn test_nested_plans_are_cached_too() {
    let marshaller = Marshaller::default();
    marshaller.encode_to_vec(&Frame::default(), 3).unwrap();
    assert!(marshaller.plan_cache().contains::<Frame>(3));
    assert!(marshaller.plan_cache().contains::<Header>(3));
    assert!(marshaller.plan_cache().contains::<Flags>(3));
}

#[test]
fn test_cache_can_be_disabled() {
    let config = CodecConfig::builder().cache_plans(false).build().unwrap();
    let marshaller = Marshaller::new(config);
    marshaller.encode_to_vec(&reading(), 1).unwrap();
    assert!(marshaller.plan_cache().is_empty());
}

#[test]
fn test_config_rejects_zero_variable_length() {
    let err = CodecConfig::builder()
        .max_variable_length(0)
        .build()
        .unwrap_err();
    assert!(matches!(err, ProtoError::Config(_)));
}

#[test]
fn test_variable_length_limit_applies_to_records() {
    let config = CodecConfig::builder().max_variable_length(2).build().unwrap();
    let marshaller = Marshaller::new(config);
    let err = marshaller
        .decode_from_slice::<Frame>(&bytes("00 00 00 010203"), 1)
        .unwrap_err();
    assert!(matches!(err, ProtoError::LengthMismatch(_)));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_shared_marshaller_across_threads() {
    let marshaller = Marshaller::default();

    thread::scope(|scope| {
        for i in 0..8u32 {
            let marshaller = &marshaller;
            scope.spawn(move || {
                let record = Telemetry {
                    id: i as u16,
                    value: i * 1000,
                    extra: i as u8,
                };
                let version = 1 + i % 2;
                let encoded = marshaller.encode_to_vec(&record, version).unwrap();
                let decoded: Telemetry = marshaller.decode_from_slice(&encoded, version).unwrap();
                assert_eq!(decoded.id, record.id);
                assert_eq!(decoded.value, record.value);
            });
        }
    });

    assert_eq!(marshaller.plan_cache().len(), 2);
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn prop_reading_survives_encode_decode(a in any::<u32>(), b in "[1-9][0-9]{0,5}") {
        let marshaller = Marshaller::shared();
        let record = Reading { a, b };
        let encoded = marshaller.encode_to_vec(&record, 1).unwrap();
        prop_assert_eq!(encoded.len(), 7);
        let decoded: Reading = marshaller.decode_from_slice(&encoded, 1).unwrap();
        prop_assert_eq!(decoded, record);
    }
}
