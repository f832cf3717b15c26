use std::fmt;
use std::fs;
use std::path::Path;

use crate::nx::compression::decode_bytes;
use crate::nx::node::NodeRecord;
use crate::nx::parse::parse_nodes;
use crate::nx::tables::Tables;
use crate::nx::{ByteSource, Compression, Node, NxError, NxHeader, Result};

/// Limits applied while opening a container.
#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
	/// Maximum node nesting depth below the root.
	///
	/// Deeper trees fail with `NodeDepthExceeded`. The default of 1024 bounds
	/// parser recursion; raise it for unusually deep files.
	pub max_depth: u32,
	/// Maximum size of a zstd-wrapped container after inflation.
	pub max_decompressed_bytes: usize,
}

impl Default for OpenOptions {
	fn default() -> Self {
		Self {
			max_depth: 1024,
			max_decompressed_bytes: 1024 * 1024 * 1024,
		}
	}
}

/// Parsed NX container: header, node arena, and the bytes blobs decode from.
pub struct NxFile {
	header: NxHeader,
	compression: Compression,
	source: Box<dyn ByteSource>,
	records: Vec<NodeRecord>,
}

impl NxFile {
	/// Read and parse an NX file from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Self::open_with(path, &OpenOptions::default())
	}

	/// Read and parse an NX file from disk with explicit limits.
	pub fn open_with(path: impl AsRef<Path>, options: &OpenOptions) -> Result<Self> {
		let raw = fs::read(path)?;
		let (compression, bytes) = decode_bytes(raw, options.max_decompressed_bytes)?;
		Self::build(Box::new(bytes), compression, options)
	}

	/// Parse a caller-supplied byte source.
	pub fn from_source(source: impl ByteSource + 'static) -> Result<Self> {
		Self::from_source_with(source, &OpenOptions::default())
	}

	/// Parse a caller-supplied byte source with explicit limits.
	pub fn from_source_with(source: impl ByteSource + 'static, options: &OpenOptions) -> Result<Self> {
		Self::build(Box::new(source), Compression::None, options)
	}

	fn build(source: Box<dyn ByteSource>, compression: Compression, options: &OpenOptions) -> Result<Self> {
		let len = usize::try_from(source.len()).unwrap_or(usize::MAX);
		let bytes = source.slice(0, len).ok_or(NxError::UnexpectedEof { at: 0, need: len, rem: 0 })?;

		let header = NxHeader::parse(bytes)?;
		let tables = Tables::load(bytes, &header)?;
		tracing::debug!(
			nodes = header.nodes.count,
			strings = tables.strings.len(),
			bitmaps = tables.bitmaps.len(),
			audio = tables.audio.len(),
			"nx tables loaded"
		);

		let records = parse_nodes(bytes, &header, &tables, options)?;
		tracing::debug!(parsed = records.len(), declared = header.nodes.count, "nx node tree parsed");

		Ok(Self {
			header,
			compression,
			source,
			records,
		})
	}

	/// Parsed file header.
	pub fn header(&self) -> &NxHeader {
		&self.header
	}

	/// Container compression detected on open.
	pub fn compression(&self) -> Compression {
		self.compression
	}

	/// Root node (index 0).
	pub fn root(&self) -> Node<'_> {
		Node::new(self, 0)
	}

	/// Node by global pre-order index.
	pub fn node(&self, index: u32) -> Option<Node<'_>> {
		((index as usize) < self.records.len()).then(|| Node::new(self, index))
	}

	/// Number of parsed nodes.
	pub fn node_count(&self) -> usize {
		self.records.len()
	}

	/// All nodes in index order.
	pub fn nodes(&self) -> impl ExactSizeIterator<Item = Node<'_>> {
		(0..self.records.len() as u32).map(move |index| Node::new(self, index))
	}

	pub(crate) fn records(&self) -> &[NodeRecord] {
		&self.records
	}

	pub(crate) fn source(&self) -> &dyn ByteSource {
		self.source.as_ref()
	}
}

impl fmt::Debug for NxFile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NxFile")
			.field("header", &self.header)
			.field("compression", &self.compression)
			.field("nodes", &self.records.len())
			.finish_non_exhaustive()
	}
}
