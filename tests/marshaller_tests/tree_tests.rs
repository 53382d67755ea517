//! Tests for parse-tree capture
//!
//! These tests verify:
//! - Trees mirror record nesting and wire order
//! - Dotted-path lookup
//! - Indented text rendering and serde output

#[path = "../common/mod.rs"]
mod common;

use common::{bytes, Frame, Reading};
use protomarshal::codec::Value;
use protomarshal::stream::SliceSource;
use protomarshal::tree::{ObjectNode, ParseNode};
use protomarshal::{CodecConfig, Marshaller};

fn frame_tree() -> (Frame, ParseNode) {
    let data = bytes("07 21 02 6162 0102");
    let mut source = SliceSource::new(&data);
    Marshaller::default()
        .decode_with_tree::<Frame>(&mut source, 1)
        .unwrap()
}

// =============================================================================
// Capture Tests
// =============================================================================

#[test]
fn test_tree_mirrors_nesting() {
    let (frame, tree) = frame_tree();
    assert_eq!(frame.header.kind, 7);

    let root = tree.as_object().unwrap();
    assert_eq!(root.names().collect::<Vec<_>>(), vec!["header", "name", "payload"]);
    assert_eq!(root.value("name"), Some(&Value::Text("ab".into())));
    assert_eq!(root.value("payload"), Some(&Value::Bytes(vec![1, 2])));

    let header = root.get("header").and_then(ParseNode::as_object).unwrap();
    assert_eq!(header.names().collect::<Vec<_>>(), vec!["kind", "flags"]);
}

#[test]
fn test_dotted_path_lookup() {
    let (_, tree) = frame_tree();
    assert_eq!(
        tree.at("header.flags.low").and_then(ParseNode::as_value),
        Some(&Value::Uint(1))
    );
    assert_eq!(
        tree.at("header.flags.high").and_then(ParseNode::as_value),
        Some(&Value::Uint(2))
    );
    assert!(tree.at("header.missing").is_none());
    assert!(tree.at("name.deeper").is_none());
}

#[test]
fn test_capture_follows_config() {
    let data = bytes("01020304 000123");

    let mut source = SliceSource::new(&data);
    let decoded = Marshaller::default()
        .decode::<Reading>(&mut source, 1)
        .unwrap();
    assert!(decoded.tree.is_none());

    let config = CodecConfig::builder().capture_parse_tree(true).build().unwrap();
    let mut source = SliceSource::new(&data);
    let decoded = Marshaller::new(config)
        .decode::<Reading>(&mut source, 1)
        .unwrap();
    let tree = decoded.tree.unwrap();
    assert_eq!(tree.at("a").and_then(ParseNode::as_value), Some(&Value::Uint(0x01020304)));
    assert_eq!(
        tree.at("b").and_then(ParseNode::as_value),
        Some(&Value::Digits("123".into()))
    );
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[test]
fn test_display_is_indented() {
    let (_, tree) = frame_tree();
    let expected = "\
header:
  kind: 7 (0x7)
  flags:
    low: 1 (0x1)
    high: 2 (0x2)
name: \"ab\"
payload: [01 02]
";
    assert_eq!(tree.to_string(), expected);
}

#[test]
fn test_serializes_as_nested_map() {
    let (_, tree) = frame_tree();
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "header": { "kind": 7, "flags": { "low": 1, "high": 2 } },
            "name": "ab",
            "payload": [1, 2]
        })
    );
}

#[test]
fn test_insert_replaces_in_place() {
    let mut node = ObjectNode::new();
    node.insert("a", ParseNode::Value(Value::Uint(1)));
    node.insert("b", ParseNode::Value(Value::Uint(2)));
    node.insert("a", ParseNode::Value(Value::Uint(3)));

    assert_eq!(node.len(), 2);
    assert_eq!(node.names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(node.value("a"), Some(&Value::Uint(3)));
}
