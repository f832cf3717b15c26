use std::sync::Arc;

use crate::nx::bytes::Cursor;
use crate::nx::mutf8::read_string;
use crate::nx::{BlobKind, NxError, NxHeader, Result, TableKind, TableRef};

/// Lookup tables consumed by the node parser and dropped once the tree is built.
#[derive(Debug, Default)]
pub(crate) struct Tables {
	pub strings: Vec<Arc<str>>,
	pub bitmaps: Vec<u64>,
	pub audio: Vec<u64>,
}

impl Tables {
	/// Read the string table and both blob offset tables declared by `header`.
	pub fn load(bytes: &[u8], header: &NxHeader) -> Result<Self> {
		let mut cursor = Cursor::new(bytes);
		Ok(Self {
			strings: load_strings(&mut cursor, header.strings)?,
			bitmaps: load_offsets(&mut cursor, header.bitmaps)?,
			audio: load_offsets(&mut cursor, header.audio)?,
		})
	}

	/// Resolve a string table index.
	pub fn string(&self, index: u32) -> Result<&Arc<str>> {
		lookup(&self.strings, TableKind::String, index)
	}

	/// Return the offset table backing one blob kind.
	pub fn offsets(&self, kind: BlobKind) -> &[u64] {
		match kind {
			BlobKind::Canvas => &self.bitmaps,
			BlobKind::Audio => &self.audio,
		}
	}

	/// Resolve a blob offset table index.
	pub fn offset(&self, kind: BlobKind, index: u32) -> Result<u64> {
		lookup(self.offsets(kind), kind.table(), index).copied()
	}
}

fn lookup<T>(entries: &[T], table: TableKind, index: u32) -> Result<&T> {
	entries.get(index as usize).ok_or(NxError::IndexOutOfRange {
		table,
		index,
		count: entries.len() as u32,
	})
}

fn load_strings(cursor: &mut Cursor<'_>, table: TableRef) -> Result<Vec<Arc<str>>> {
	seek_table(cursor, table);
	let mut out = Vec::with_capacity(bounded_capacity(table.count, cursor.remaining(), 2));
	for _ in 0..table.count {
		out.push(Arc::from(read_string(cursor)?));
	}
	Ok(out)
}

fn load_offsets(cursor: &mut Cursor<'_>, table: TableRef) -> Result<Vec<u64>> {
	if table.count == 0 {
		return Ok(Vec::new());
	}

	seek_table(cursor, table);
	let mut out = Vec::with_capacity(bounded_capacity(table.count, cursor.remaining(), 8));
	for _ in 0..table.count {
		out.push(cursor.read_u64_le()?);
	}
	Ok(out)
}

fn seek_table(cursor: &mut Cursor<'_>, table: TableRef) {
	// Offsets were range-checked against the source length by `NxHeader::parse`.
	cursor.seek(usize::try_from(table.offset).unwrap_or(usize::MAX));
}

/// Cap preallocation by what the remaining bytes could possibly hold.
fn bounded_capacity(count: u32, remaining: usize, min_entry: usize) -> usize {
	(count as usize).min(remaining / min_entry)
}
