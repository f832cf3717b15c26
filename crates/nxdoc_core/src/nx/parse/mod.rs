//! Node block decoding.
//!
//! Each record is `u32 name`, `u8 tag`, a tag-specific payload, and, when the
//! tag's high bit is set, a `u16` child count followed by the child records.
//! Nodes receive indices in pre-order: a node before its children.

use std::collections::HashMap;

use crate::nx::blob::LazyBlob;
use crate::nx::bytes::Cursor;
use crate::nx::node::{NodeData, NodeRecord};
use crate::nx::tables::Tables;
use crate::nx::{BlobKind, NodeKind, NxError, NxHeader, OpenOptions, Point, Result};

const HAS_CHILDREN: u8 = 0x80;

/// Parse the whole node block into an arena ordered by node index.
pub(crate) fn parse_nodes(bytes: &[u8], header: &NxHeader, tables: &Tables, options: &OpenOptions) -> Result<Vec<NodeRecord>> {
	let mut cursor = Cursor::new(bytes);
	cursor.seek(usize::try_from(header.nodes.offset).unwrap_or(usize::MAX));

	let mut parser = NodeParser {
		cursor,
		tables,
		records: Vec::with_capacity((header.nodes.count as usize).min(bytes.len() / 5)),
		declared: header.nodes.count,
		max_depth: options.max_depth,
	};
	parser.parse_node(None, 0)?;
	Ok(parser.records)
}

struct NodeParser<'a> {
	cursor: Cursor<'a>,
	tables: &'a Tables,
	records: Vec<NodeRecord>,
	declared: u32,
	max_depth: u32,
}

impl NodeParser<'_> {
	fn parse_node(&mut self, parent: Option<u32>, depth: u32) -> Result<u32> {
		if depth > self.max_depth {
			return Err(NxError::NodeDepthExceeded { max_depth: self.max_depth });
		}
		if self.records.len() >= self.declared as usize {
			return Err(NxError::NodeCountExceeded { declared: self.declared });
		}

		let name = self.tables.string(self.cursor.read_u32_le()?)?.clone();
		let tag_at = self.cursor.pos() as u64;
		let tag = self.cursor.read_u8()?;
		let kind = NodeKind::from_tag(tag).ok_or(NxError::UnknownNodeType { tag: tag & 0x7F, at: tag_at })?;
		let data = self.parse_data(kind)?;

		let index = self.records.len() as u32;
		self.records.push(NodeRecord {
			name,
			parent,
			children: HashMap::new(),
			data,
		});

		if tag & HAS_CHILDREN == 0 {
			return Ok(index);
		}

		let count = self.cursor.read_u16_le()?;
		let mut children = HashMap::with_capacity(usize::from(count));
		for _ in 0..count {
			let child = self.parse_node(Some(index), depth + 1)?;
			// Later siblings with the same name replace earlier ones.
			children.insert(self.records[child as usize].name.clone(), child);
		}
		self.records[index as usize].children = children;
		Ok(index)
	}

	fn parse_data(&mut self, kind: NodeKind) -> Result<NodeData> {
		Ok(match kind {
			NodeKind::Empty => NodeData::Empty,
			NodeKind::Int32 => NodeData::Int32(self.cursor.read_i32_le()?),
			NodeKind::Float64 => NodeData::Float64(self.cursor.read_f64_le()?),
			NodeKind::String => NodeData::String(self.tables.string(self.cursor.read_u32_le()?)?.clone()),
			NodeKind::Point => {
				let x = self.cursor.read_i32_le()?;
				let y = self.cursor.read_i32_le()?;
				NodeData::Point(Point { x, y })
			}
			NodeKind::Canvas => NodeData::Canvas(LazyBlob::new(self.blob_offset(BlobKind::Canvas)?)),
			NodeKind::Audio => NodeData::Audio(LazyBlob::new(self.blob_offset(BlobKind::Audio)?)),
			NodeKind::Link => NodeData::Link(self.cursor.read_i32_le()?),
		})
	}

	/// Consume a blob index field; files without a table for `kind` yield no offset.
	fn blob_offset(&mut self, kind: BlobKind) -> Result<Option<u64>> {
		let index = self.cursor.read_u32_le()?;
		if self.tables.offsets(kind).is_empty() {
			return Ok(None);
		}
		self.tables.offset(kind, index).map(Some)
	}
}

#[cfg(test)]
mod tests;
