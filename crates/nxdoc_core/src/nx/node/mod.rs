use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::nx::blob::{LazyBlob, decode_audio, decode_canvas};
use crate::nx::{Bitmap, NxFile};

/// Node value families selected by the low seven bits of a record's tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
	/// No payload.
	Empty,
	/// Signed 32-bit integer.
	Int32,
	/// IEEE-754 double.
	Float64,
	/// String table reference.
	String,
	/// Two signed 32-bit coordinates.
	Point,
	/// Lazily decoded bitmap.
	Canvas,
	/// Lazily decoded audio stream.
	Audio,
	/// Reference to another node by global index.
	Link,
}

impl NodeKind {
	/// Map a tag byte to its kind, ignoring the children flag.
	pub fn from_tag(tag: u8) -> Option<Self> {
		Some(match tag & 0x7F {
			0 => Self::Empty,
			1 => Self::Int32,
			2 => Self::Float64,
			3 => Self::String,
			4 => Self::Point,
			5 => Self::Canvas,
			6 => Self::Audio,
			7 => Self::Link,
			_ => return None,
		})
	}

	/// Render kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Empty => "empty",
			Self::Int32 => "int32",
			Self::Float64 => "float64",
			Self::String => "string",
			Self::Point => "point",
			Self::Canvas => "canvas",
			Self::Audio => "audio",
			Self::Link => "link",
		}
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Two-dimensional integer coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: i32,
	/// Vertical coordinate.
	pub y: i32,
}

/// Typed node value as seen by callers.
///
/// Blob variants carry the decoded payload, or `None` when the file has no
/// blob table for that kind or the record failed to decode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
	/// No payload.
	Empty,
	/// Signed 32-bit integer.
	Int32(i32),
	/// IEEE-754 double.
	Float64(f64),
	/// String table entry.
	String(&'a str),
	/// Integer coordinate.
	Point(Point),
	/// Decoded bitmap.
	Canvas(Option<&'a Bitmap>),
	/// Decoded audio bytes.
	Audio(Option<&'a [u8]>),
	/// Link target, `None` when the index names no parsed node.
	Link(Option<Node<'a>>),
}

impl Value<'_> {
	/// Kind of this value.
	pub fn kind(&self) -> NodeKind {
		match self {
			Self::Empty => NodeKind::Empty,
			Self::Int32(_) => NodeKind::Int32,
			Self::Float64(_) => NodeKind::Float64,
			Self::String(_) => NodeKind::String,
			Self::Point(_) => NodeKind::Point,
			Self::Canvas(_) => NodeKind::Canvas,
			Self::Audio(_) => NodeKind::Audio,
			Self::Link(_) => NodeKind::Link,
		}
	}
}

/// Arena entry for one parsed node.
#[derive(Debug)]
pub(crate) struct NodeRecord {
	pub name: Arc<str>,
	pub parent: Option<u32>,
	pub children: HashMap<Arc<str>, u32>,
	pub data: NodeData,
}

#[derive(Debug)]
pub(crate) enum NodeData {
	Empty,
	Int32(i32),
	Float64(f64),
	String(Arc<str>),
	Point(Point),
	Canvas(LazyBlob<Bitmap>),
	Audio(LazyBlob<Vec<u8>>),
	Link(i32),
}

impl NodeData {
	fn kind(&self) -> NodeKind {
		match self {
			Self::Empty => NodeKind::Empty,
			Self::Int32(_) => NodeKind::Int32,
			Self::Float64(_) => NodeKind::Float64,
			Self::String(_) => NodeKind::String,
			Self::Point(_) => NodeKind::Point,
			Self::Canvas(_) => NodeKind::Canvas,
			Self::Audio(_) => NodeKind::Audio,
			Self::Link(_) => NodeKind::Link,
		}
	}
}

/// Borrowed handle to one node of an [`NxFile`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
	file: &'a NxFile,
	index: u32,
}

impl<'a> Node<'a> {
	pub(crate) fn new(file: &'a NxFile, index: u32) -> Self {
		Self { file, index }
	}

	fn record(&self) -> &'a NodeRecord {
		&self.file.records()[self.index as usize]
	}

	/// Global pre-order index assigned during parsing.
	pub fn index(&self) -> u32 {
		self.index
	}

	/// Node name.
	pub fn name(&self) -> &'a str {
		&self.record().name
	}

	/// Parent node; `None` for the root.
	pub fn parent(&self) -> Option<Node<'a>> {
		self.record().parent.map(|index| Node::new(self.file, index))
	}

	/// Value kind, without decoding blobs.
	pub fn kind(&self) -> NodeKind {
		self.record().data.kind()
	}

	/// Typed value; blob variants decode and cache on first access.
	pub fn value(&self) -> Value<'a> {
		match &self.record().data {
			NodeData::Empty => Value::Empty,
			NodeData::Int32(value) => Value::Int32(*value),
			NodeData::Float64(value) => Value::Float64(*value),
			NodeData::String(value) => Value::String(value),
			NodeData::Point(value) => Value::Point(*value),
			NodeData::Canvas(_) => Value::Canvas(self.bitmap()),
			NodeData::Audio(_) => Value::Audio(self.audio()),
			NodeData::Link(_) => Value::Link(self.link_target()),
		}
	}

	/// Direct child by name.
	pub fn child(&self, name: &str) -> Option<Node<'a>> {
		self.record().children.get(name).map(|index| Node::new(self.file, *index))
	}

	/// Direct children in unspecified order.
	pub fn children(&self) -> impl ExactSizeIterator<Item = Node<'a>> + use<'a> {
		let file = self.file;
		self.record().children.values().map(move |index| Node::new(file, *index))
	}

	/// Number of distinct child names.
	pub fn child_count(&self) -> usize {
		self.record().children.len()
	}

	/// Whether `node` is a direct child of this node.
	pub fn contains(&self, node: Node<'_>) -> bool {
		std::ptr::eq(self.file, node.file) && self.record().children.get(node.name()) == Some(&node.index)
	}

	/// Slash-joined names from the root to this node, root name included.
	pub fn path(&self) -> String {
		let mut names = vec![self.name()];
		let mut cursor = self.parent();
		while let Some(node) = cursor {
			names.push(node.name());
			cursor = node.parent();
		}
		names.reverse();
		names.join("/")
	}

	/// Raw link payload for link nodes.
	pub fn link_index(&self) -> Option<i32> {
		match self.record().data {
			NodeData::Link(index) => Some(index),
			_ => None,
		}
	}

	/// Node named by this link's index, when it exists.
	pub fn link_target(&self) -> Option<Node<'a>> {
		let index = u32::try_from(self.link_index()?).ok()?;
		self.file.node(index)
	}

	/// Decoded bitmap for canvas nodes.
	pub fn bitmap(&self) -> Option<&'a Bitmap> {
		let NodeData::Canvas(blob) = &self.record().data else {
			return None;
		};
		let source = self.file.source();
		let index = self.index;
		blob.get_or_resolve(|offset| match decode_canvas(source, offset) {
			Ok(bitmap) => {
				tracing::debug!(node = index, offset, width = bitmap.width(), height = bitmap.height(), "canvas resolved");
				Some(bitmap)
			}
			Err(err) => {
				tracing::debug!(node = index, offset, error = %err, "canvas decode failed");
				None
			}
		})
	}

	/// Decoded audio bytes for audio nodes.
	pub fn audio(&self) -> Option<&'a [u8]> {
		let NodeData::Audio(blob) = &self.record().data else {
			return None;
		};
		let source = self.file.source();
		let index = self.index;
		blob.get_or_resolve(|offset| match decode_audio(source, offset) {
			Ok(bytes) => {
				tracing::debug!(node = index, offset, len = bytes.len(), "audio resolved");
				Some(bytes)
			}
			Err(err) => {
				tracing::debug!(node = index, offset, error = %err, "audio decode failed");
				None
			}
		})
		.map(Vec::as_slice)
	}

	/// Absolute record offset for blob nodes; `None` for other kinds and absent blobs.
	pub fn blob_offset(&self) -> Option<u64> {
		match &self.record().data {
			NodeData::Canvas(blob) => blob.offset(),
			NodeData::Audio(blob) => blob.offset(),
			_ => None,
		}
	}

	/// Whether a blob node's cache is filled; always true for non-blob nodes.
	pub fn is_blob_resolved(&self) -> bool {
		match &self.record().data {
			NodeData::Canvas(blob) => blob.is_resolved(),
			NodeData::Audio(blob) => blob.is_resolved(),
			_ => true,
		}
	}
}

impl PartialEq for Node<'_> {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self.file, other.file) && self.index == other.index
	}
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Node")
			.field("index", &self.index)
			.field("path", &self.path())
			.field("kind", &self.kind())
			.finish()
	}
}

impl fmt::Display for Node<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.path(), self.kind())
	}
}
