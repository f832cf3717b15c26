use nxdoc_testkit::{AUDIO_PAIR_AT, BITMAP_PAIR_AT, NODE_PAIR_AT, NodeSpec, NxBuilder, STRING_PAIR_AT, patch_u32, patch_u64};

use crate::nx::{NxError, NxHeader, TableKind};

fn minimal() -> Vec<u8> {
	NxBuilder::new(NodeSpec::empty("root")).build()
}

#[test]
fn parses_minimal_header() {
	let bytes = minimal();
	let header = NxHeader::parse(&bytes).expect("header parses");
	assert_eq!(header.nodes.count, 1);
	assert_eq!(header.strings.count, 1);
	assert_eq!(header.strings.offset, NxHeader::SIZE as u64);
	assert_eq!(header.bitmaps.count, 0);
	assert_eq!(header.audio.count, 0);
}

#[test]
fn rejects_single_bit_magic_flip() {
	let mut bytes = minimal();
	bytes[0] ^= 0x01;
	let err = NxHeader::parse(&bytes).expect_err("magic mismatch");
	assert!(matches!(err, NxError::BadMagic { magic } if magic == *b"QKG2"));
}

#[test]
fn magic_is_checked_before_counts() {
	let mut bytes = minimal();
	bytes[3] = b'3';
	patch_u32(&mut bytes, NODE_PAIR_AT, 0);
	let err = NxHeader::parse(&bytes).expect_err("bad magic wins");
	assert!(matches!(err, NxError::BadMagic { .. }));
}

#[test]
fn truncated_source_reports_bad_magic_or_eof() {
	let err = NxHeader::parse(b"PK").expect_err("too short for magic");
	assert!(matches!(err, NxError::BadMagic { magic } if magic == [b'P', b'K', 0, 0]));

	let err = NxHeader::parse(b"PKG2\x01\x00").expect_err("too short for header");
	assert!(matches!(err, NxError::UnexpectedEof { .. }));
}

#[test]
fn zero_node_or_string_count_is_rejected() {
	let mut bytes = minimal();
	patch_u32(&mut bytes, NODE_PAIR_AT, 0);
	let err = NxHeader::parse(&bytes).expect_err("zero nodes");
	assert!(matches!(err, NxError::ZeroRequiredTable { table: TableKind::Node }));

	let mut bytes = minimal();
	patch_u32(&mut bytes, STRING_PAIR_AT, 0);
	let err = NxHeader::parse(&bytes).expect_err("zero strings");
	assert!(matches!(err, NxError::ZeroRequiredTable { table: TableKind::String }));
}

#[test]
fn table_offsets_past_end_are_rejected() {
	let mut bytes = minimal();
	let len = bytes.len() as u64;
	patch_u64(&mut bytes, STRING_PAIR_AT + 4, len + 1);
	let err = NxHeader::parse(&bytes).expect_err("string table out of range");
	assert!(matches!(
		err,
		NxError::TableOutOfRange { table: TableKind::String, offset, len: reported } if offset == len + 1 && reported == len
	));

	patch_u64(&mut bytes, STRING_PAIR_AT + 4, len);
	let err = NxHeader::parse(&bytes).expect_err("string table starting at end of source");
	assert!(err.is_format_error());
	assert!(matches!(
		err,
		NxError::TableOutOfRange { table: TableKind::String, offset, .. } if offset == len
	));
}

#[test]
fn empty_optional_tables_skip_offset_checks() {
	let mut bytes = minimal();
	patch_u64(&mut bytes, BITMAP_PAIR_AT + 4, u64::MAX);
	patch_u64(&mut bytes, AUDIO_PAIR_AT + 4, u64::MAX);
	NxHeader::parse(&bytes).expect("empty tables ignore their offsets");

	patch_u32(&mut bytes, AUDIO_PAIR_AT, 1);
	let err = NxHeader::parse(&bytes).expect_err("non-empty audio table must be in range");
	assert!(matches!(err, NxError::TableOutOfRange { table: TableKind::Audio, .. }));
}
