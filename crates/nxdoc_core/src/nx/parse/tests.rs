use nxdoc_testkit::{NodeSpec, NodeValue, NxBuilder};

use super::parse_nodes;
use crate::nx::node::{NodeData, NodeRecord};
use crate::nx::tables::Tables;
use crate::nx::{NxError, NxHeader, OpenOptions, TableKind};

fn parse(bytes: &[u8]) -> crate::nx::Result<Vec<NodeRecord>> {
	parse_with(bytes, &OpenOptions::default())
}

fn parse_with(bytes: &[u8], options: &OpenOptions) -> crate::nx::Result<Vec<NodeRecord>> {
	let header = NxHeader::parse(bytes)?;
	let tables = Tables::load(bytes, &header)?;
	parse_nodes(bytes, &header, &tables, options)
}

fn names(records: &[NodeRecord]) -> Vec<&str> {
	records.iter().map(|record| record.name.as_ref()).collect()
}

#[test]
fn assigns_indices_in_pre_order() {
	let root = NodeSpec::empty("root")
		.child(NodeSpec::empty("a").child(NodeSpec::empty("a1")).child(NodeSpec::empty("a2")))
		.child(NodeSpec::empty("b").child(NodeSpec::empty("b1")));
	let records = parse(&NxBuilder::new(root).build()).expect("tree parses");

	assert_eq!(names(&records), ["root", "a", "a1", "a2", "b", "b1"]);
	assert_eq!(records[0].parent, None);
	assert_eq!(records[2].parent, Some(1));
	assert_eq!(records[5].parent, Some(4));
	assert_eq!(records[0].children.get("b"), Some(&4));
	assert!(records[2].children.is_empty());
}

#[test]
fn decodes_every_scalar_payload() {
	let root = NodeSpec::empty("root")
		.child(NodeSpec::new("int", NodeValue::Int(-42)))
		.child(NodeSpec::new("float", NodeValue::Float(1.5)))
		.child(NodeSpec::new("text", NodeValue::Str("hello".to_owned())))
		.child(NodeSpec::new("origin", NodeValue::Point(-3, 7)))
		.child(NodeSpec::new("link", NodeValue::Link(2)));
	let records = parse(&NxBuilder::new(root).build()).expect("tree parses");

	assert!(matches!(records[1].data, NodeData::Int32(-42)));
	assert!(matches!(records[2].data, NodeData::Float64(value) if value == 1.5));
	assert!(matches!(&records[3].data, NodeData::String(value) if value.as_ref() == "hello"));
	assert!(matches!(records[4].data, NodeData::Point(point) if point.x == -3 && point.y == 7));
	assert!(matches!(records[5].data, NodeData::Link(2)));
}

#[test]
fn duplicate_sibling_names_keep_the_last_record() {
	let root = NodeSpec::empty("root")
		.child(NodeSpec::new("dup", NodeValue::Int(1)))
		.child(NodeSpec::new("dup", NodeValue::Int(2)));
	let records = parse(&NxBuilder::new(root).build()).expect("tree parses");

	assert_eq!(records.len(), 3);
	assert_eq!(records[0].children.len(), 1);
	assert_eq!(records[0].children.get("dup"), Some(&2));
	assert_eq!(records[1].parent, Some(0));
}

#[test]
fn blob_index_without_table_is_consumed_and_absent() {
	let root = NodeSpec::empty("root")
		.child(NodeSpec::new("canvas", NodeValue::Canvas(99)))
		.child(NodeSpec::new("sound", NodeValue::Audio(7)))
		.child(NodeSpec::new("after", NodeValue::Int(5)));
	let records = parse(&NxBuilder::new(root).build()).expect("tree parses");

	assert!(matches!(&records[1].data, NodeData::Canvas(blob) if blob.offset().is_none()));
	assert!(matches!(&records[2].data, NodeData::Audio(blob) if blob.offset().is_none()));
	assert!(matches!(records[3].data, NodeData::Int32(5)), "payload stays aligned after absent blobs");
}

#[test]
fn blob_index_past_table_is_fatal() {
	let mut builder = NxBuilder::new(NodeSpec::empty("root").child(NodeSpec::new("canvas", NodeValue::Canvas(1))));
	builder.add_bitmap(1, 1, &[0, 0, 0, 0]);
	let err = parse(&builder.build()).expect_err("only one bitmap");
	assert!(matches!(err, NxError::IndexOutOfRange { table: TableKind::Bitmap, index: 1, count: 1 }));
}

#[test]
fn unknown_tag_aborts_parse() {
	let root = NodeSpec::empty("root").child(NodeSpec::new("odd", NodeValue::Raw { tag: 9, payload: Vec::new() }));
	let bytes = NxBuilder::new(root).build();
	let err = parse(&bytes).expect_err("tag 9 is unknown");
	assert!(matches!(err, NxError::UnknownNodeType { tag: 9, .. }));
	assert!(err.is_format_error());
}

#[test]
fn string_index_past_table_is_fatal() {
	let root = NodeSpec::empty("root").child(NodeSpec::new("bad", NodeValue::Raw { tag: 3, payload: 50_u32.to_le_bytes().to_vec() }));
	let err = parse(&NxBuilder::new(root).build()).expect_err("string 50 does not exist");
	assert!(matches!(err, NxError::IndexOutOfRange { table: TableKind::String, index: 50, .. }));
}

#[test]
fn truncated_node_block_is_eof() {
	let mut bytes = NxBuilder::new(NodeSpec::empty("root").child(NodeSpec::new("int", NodeValue::Int(3)))).build();
	bytes.truncate(bytes.len() - 2);
	assert!(matches!(parse(&bytes), Err(NxError::UnexpectedEof { .. })));
}

#[test]
fn depth_and_count_guards() {
	let deep = NodeSpec::empty("root").child(NodeSpec::empty("a").child(NodeSpec::empty("b").child(NodeSpec::empty("c"))));
	let bytes = NxBuilder::new(deep).build();
	let shallow = OpenOptions {
		max_depth: 2,
		..OpenOptions::default()
	};
	assert!(matches!(parse_with(&bytes, &shallow), Err(NxError::NodeDepthExceeded { max_depth: 2 })));

	let two = NodeSpec::empty("root").child(NodeSpec::empty("a")).child(NodeSpec::empty("b"));
	let bytes = NxBuilder::new(two.clone()).node_count(2).build();
	assert!(matches!(parse(&bytes), Err(NxError::NodeCountExceeded { declared: 2 })));

	let bytes = NxBuilder::new(two).node_count(10).build();
	assert_eq!(parse(&bytes).expect("fewer nodes than declared is accepted").len(), 3);
}
