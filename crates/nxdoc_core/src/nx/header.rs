use std::fmt;

use crate::nx::bytes::Cursor;
use crate::nx::{NxError, Result};

/// NX container signature (`PKG2`).
pub const NX_MAGIC: [u8; 4] = *b"PKG2";

/// Lookup tables addressed from the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
	/// Node block.
	Node,
	/// String table.
	String,
	/// Bitmap offset table.
	Bitmap,
	/// Audio offset table.
	Audio,
}

impl TableKind {
	/// Render table kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Node => "node",
			Self::String => "string",
			Self::Bitmap => "bitmap",
			Self::Audio => "audio",
		}
	}
}

impl fmt::Display for TableKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Entry count and absolute offset of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableRef {
	/// Number of entries.
	pub count: u32,
	/// Absolute byte offset of the first entry.
	pub offset: u64,
}

/// Parsed fixed-layout NX file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NxHeader {
	/// Node block location.
	pub nodes: TableRef,
	/// String table location.
	pub strings: TableRef,
	/// Bitmap offset table location.
	pub bitmaps: TableRef,
	/// Audio offset table location.
	pub audio: TableRef,
}

impl NxHeader {
	/// Size of the fixed header in bytes.
	pub const SIZE: usize = 52;

	const NODE_AT: usize = 4;
	const STRING_AT: usize = 16;
	const BITMAP_AT: usize = 28;
	const AUDIO_AT: usize = 40;

	/// Parse and validate the header against a source of `bytes.len()` bytes.
	///
	/// The signature is checked before anything else is read.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let mut cursor = Cursor::new(bytes);
		if bytes.len() < NX_MAGIC.len() || bytes[..NX_MAGIC.len()] != NX_MAGIC {
			return Err(NxError::BadMagic { magic: first4(bytes) });
		}

		let header = Self {
			nodes: read_table_ref(&mut cursor, Self::NODE_AT)?,
			strings: read_table_ref(&mut cursor, Self::STRING_AT)?,
			bitmaps: read_table_ref(&mut cursor, Self::BITMAP_AT)?,
			audio: read_table_ref(&mut cursor, Self::AUDIO_AT)?,
		};
		header.validate(bytes.len() as u64)?;
		Ok(header)
	}

	/// Return the location of one table.
	pub fn table(&self, kind: TableKind) -> TableRef {
		match kind {
			TableKind::Node => self.nodes,
			TableKind::String => self.strings,
			TableKind::Bitmap => self.bitmaps,
			TableKind::Audio => self.audio,
		}
	}

	fn validate(&self, len: u64) -> Result<()> {
		for kind in [TableKind::Node, TableKind::String] {
			if self.table(kind).count == 0 {
				return Err(NxError::ZeroRequiredTable { table: kind });
			}
		}

		for kind in [TableKind::Node, TableKind::String, TableKind::Bitmap, TableKind::Audio] {
			let table = self.table(kind);
			// Empty optional tables are never read, so their offsets are not checked.
			if table.count > 0 && table.offset >= len {
				return Err(NxError::TableOutOfRange {
					table: kind,
					offset: table.offset,
					len,
				});
			}
		}

		Ok(())
	}
}

fn read_table_ref(cursor: &mut Cursor<'_>, at: usize) -> Result<TableRef> {
	cursor.seek(at);
	let count = cursor.read_u32_le()?;
	let offset = cursor.read_u64_le()?;
	Ok(TableRef { count, offset })
}

pub(crate) fn first4(bytes: &[u8]) -> [u8; 4] {
	let mut magic = [0_u8; 4];
	let take = bytes.len().min(4);
	magic[..take].copy_from_slice(&bytes[..take]);
	magic
}

#[cfg(test)]
mod tests;
