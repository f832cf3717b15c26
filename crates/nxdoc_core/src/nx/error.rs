use thiserror::Error;

use crate::nx::TableKind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, NxError>;

/// Errors produced while opening and parsing NX containers.
#[derive(Debug, Error)]
pub enum NxError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Leading four bytes, after any container inflation, are not the NX signature.
	#[error("not an NX file (magic={magic:?})")]
	BadMagic {
		/// First up-to-4 bytes of the stream.
		magic: [u8; 4],
	},
	/// A mandatory table declared zero entries.
	#[error("{table} table declares zero entries")]
	ZeroRequiredTable {
		/// Table with the empty count.
		table: TableKind,
	},
	/// A non-empty table starts at or past the end of the source.
	#[error("{table} table offset {offset} out of range (source length {len})")]
	TableOutOfRange {
		/// Table whose offset is invalid.
		table: TableKind,
		/// Declared absolute offset.
		offset: u64,
		/// Source length in bytes.
		len: u64,
	},
	/// A node record referenced a table slot that does not exist.
	#[error("{table} table index out of range: idx={index}, count={count}")]
	IndexOutOfRange {
		/// Table being indexed.
		table: TableKind,
		/// Offending index value.
		index: u32,
		/// Number of entries in the table.
		count: u32,
	},
	/// Node type tag outside the known variant range.
	#[error("unknown node type {tag} at offset {at}")]
	UnknownNodeType {
		/// Low seven bits of the tag byte.
		tag: u8,
		/// Absolute offset of the tag byte.
		at: u64,
	},
	/// Invalid modified-UTF8 byte sequence in the string table.
	#[error("malformed string data at offset {at}")]
	MalformedString {
		/// Absolute offset of the faulting byte.
		at: u64,
	},
	/// Node nesting exceeded the configured limit.
	#[error("node depth exceeded (max={max_depth})")]
	NodeDepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Node block holds more records than the header declares.
	#[error("node block holds more than the declared {declared} nodes")]
	NodeCountExceeded {
		/// Node count from the header.
		declared: u32,
	},
	/// Container decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Blob record declares an output larger than its block can expand to.
	#[error("blob declares {declared} bytes from a {compressed}-byte block")]
	ImplausibleBlobSize {
		/// Output size declared by the record header.
		declared: usize,
		/// Length of the compressed block.
		compressed: usize,
	},
	/// Block codec rejected its input.
	#[error("block decompression failed: {0}")]
	Decompress(#[from] lz4_flex::block::DecompressError),
}

impl NxError {
	/// Whether this error describes malformed file structure rather than an IO or codec failure.
	pub fn is_format_error(&self) -> bool {
		!matches!(self, Self::Io(_) | Self::UnexpectedEof { .. } | Self::Decompress(_))
	}
}
