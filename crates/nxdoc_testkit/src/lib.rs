//! Shared test helpers for workspace crates.
//!
//! [`NxBuilder`] lays out a complete NX image in memory: header, string table,
//! bitmap and audio offset tables, blob records, and the node block.

use std::collections::HashMap;

/// Byte offset of the node `(count, offset)` pair in the header.
pub const NODE_PAIR_AT: usize = 4;
/// Byte offset of the string `(count, offset)` pair in the header.
pub const STRING_PAIR_AT: usize = 16;
/// Byte offset of the bitmap `(count, offset)` pair in the header.
pub const BITMAP_PAIR_AT: usize = 28;
/// Byte offset of the audio `(count, offset)` pair in the header.
pub const AUDIO_PAIR_AT: usize = 40;

const HEADER_SIZE: usize = 52;

/// Value payload of a synthesized node record.
#[derive(Debug, Clone)]
pub enum NodeValue {
	/// Tag 0.
	Empty,
	/// Tag 1.
	Int(i32),
	/// Tag 2.
	Float(f64),
	/// Tag 3, interned into the string table.
	Str(String),
	/// Tag 4.
	Point(i32, i32),
	/// Tag 5 with a bitmap offset table index.
	Canvas(u32),
	/// Tag 6 with an audio offset table index.
	Audio(u32),
	/// Tag 7 with a global node index.
	Link(i32),
	/// Arbitrary tag byte (high bit is managed by the builder) and payload.
	Raw {
		/// Low seven bits of the tag.
		tag: u8,
		/// Payload bytes written after the tag.
		payload: Vec<u8>,
	},
}

/// One node and its subtree.
#[derive(Debug, Clone)]
pub struct NodeSpec {
	/// Node name, interned into the string table.
	pub name: String,
	/// Node value.
	pub value: NodeValue,
	/// Children in record order.
	pub children: Vec<NodeSpec>,
}

impl NodeSpec {
	/// Create a leaf node.
	pub fn new(name: &str, value: NodeValue) -> Self {
		Self {
			name: name.to_owned(),
			value,
			children: Vec::new(),
		}
	}

	/// Create a leaf node with no value.
	pub fn empty(name: &str) -> Self {
		Self::new(name, NodeValue::Empty)
	}

	/// Append a child and return `self`.
	pub fn child(mut self, child: NodeSpec) -> Self {
		self.children.push(child);
		self
	}

	fn count(&self) -> u32 {
		1 + self.children.iter().map(NodeSpec::count).sum::<u32>()
	}
}

/// In-memory NX image builder.
#[derive(Debug, Clone)]
pub struct NxBuilder {
	root: NodeSpec,
	magic: [u8; 4],
	node_count: Option<u32>,
	extra_strings: Vec<String>,
	bitmaps: Vec<Vec<u8>>,
	audio: Vec<Vec<u8>>,
}

impl NxBuilder {
	/// Start an image whose node block holds `root`.
	pub fn new(root: NodeSpec) -> Self {
		Self {
			root,
			magic: *b"PKG2",
			node_count: None,
			extra_strings: Vec::new(),
			bitmaps: Vec::new(),
			audio: Vec::new(),
		}
	}

	/// Override the signature bytes.
	pub fn magic(mut self, magic: [u8; 4]) -> Self {
		self.magic = magic;
		self
	}

	/// Override the declared node count.
	pub fn node_count(mut self, count: u32) -> Self {
		self.node_count = Some(count);
		self
	}

	/// Intern an extra string that no node references.
	pub fn string(mut self, value: &str) -> Self {
		self.extra_strings.push(value.to_owned());
		self
	}

	/// Add a canvas record from `width * height` B,G,R,A pixels and return its table index.
	pub fn add_bitmap(&mut self, width: u16, height: u16, bgra: &[u8]) -> u32 {
		let compressed = lz4_flex::block::compress(bgra);
		let mut record = Vec::with_capacity(8 + compressed.len());
		record.extend_from_slice(&width.to_le_bytes());
		record.extend_from_slice(&height.to_le_bytes());
		record.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
		record.extend_from_slice(&compressed);
		self.add_raw_bitmap(record)
	}

	/// Add a raw canvas record verbatim and return its table index.
	pub fn add_raw_bitmap(&mut self, record: Vec<u8>) -> u32 {
		self.bitmaps.push(record);
		(self.bitmaps.len() - 1) as u32
	}

	/// Add an audio record for `data` and return its table index.
	pub fn add_audio(&mut self, data: &[u8]) -> u32 {
		let compressed = lz4_flex::block::compress(data);
		let mut record = Vec::with_capacity(8 + compressed.len());
		record.extend_from_slice(&(data.len() as u32).to_le_bytes());
		record.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
		record.extend_from_slice(&compressed);
		self.audio.push(record);
		(self.audio.len() - 1) as u32
	}

	/// Lay out the image.
	pub fn build(&self) -> Vec<u8> {
		let mut strings = StringPool::default();
		intern_tree(&self.root, &mut strings);
		for value in &self.extra_strings {
			strings.intern(value);
		}

		let mut out = vec![0_u8; HEADER_SIZE];
		out[..4].copy_from_slice(&self.magic);

		let string_offset = out.len() as u64;
		for value in &strings.values {
			let encoded = encode_mutf8(value);
			out.extend_from_slice(&(encoded.len() as u16).to_le_bytes());
			out.extend_from_slice(&encoded);
		}

		let bitmap_table_offset = out.len() as u64;
		out.resize(out.len() + self.bitmaps.len() * 8, 0);
		let audio_table_offset = out.len() as u64;
		out.resize(out.len() + self.audio.len() * 8, 0);

		for (idx, record) in self.bitmaps.iter().enumerate() {
			let at = out.len() as u64;
			patch_u64(&mut out, bitmap_table_offset as usize + idx * 8, at);
			out.extend_from_slice(record);
		}
		for (idx, record) in self.audio.iter().enumerate() {
			let at = out.len() as u64;
			patch_u64(&mut out, audio_table_offset as usize + idx * 8, at);
			out.extend_from_slice(record);
		}

		let node_offset = out.len() as u64;
		write_node(&self.root, &strings, &mut out);

		let node_count = self.node_count.unwrap_or_else(|| self.root.count());
		write_pair(&mut out, NODE_PAIR_AT, node_count, node_offset);
		write_pair(&mut out, STRING_PAIR_AT, strings.values.len() as u32, string_offset);
		write_pair(&mut out, BITMAP_PAIR_AT, self.bitmaps.len() as u32, bitmap_table_offset);
		write_pair(&mut out, AUDIO_PAIR_AT, self.audio.len() as u32, audio_table_offset);
		out
	}
}

#[derive(Default)]
struct StringPool {
	values: Vec<String>,
	ids: HashMap<String, u32>,
}

impl StringPool {
	fn intern(&mut self, value: &str) -> u32 {
		if let Some(id) = self.ids.get(value) {
			return *id;
		}
		let id = self.values.len() as u32;
		self.values.push(value.to_owned());
		self.ids.insert(value.to_owned(), id);
		id
	}

	fn id(&self, value: &str) -> u32 {
		self.ids[value]
	}
}

fn intern_tree(node: &NodeSpec, strings: &mut StringPool) {
	strings.intern(&node.name);
	if let NodeValue::Str(value) = &node.value {
		strings.intern(value);
	}
	for child in &node.children {
		intern_tree(child, strings);
	}
}

fn write_node(node: &NodeSpec, strings: &StringPool, out: &mut Vec<u8>) {
	out.extend_from_slice(&strings.id(&node.name).to_le_bytes());

	let (tag, payload) = match &node.value {
		NodeValue::Empty => (0, Vec::new()),
		NodeValue::Int(value) => (1, value.to_le_bytes().to_vec()),
		NodeValue::Float(value) => (2, value.to_le_bytes().to_vec()),
		NodeValue::Str(value) => (3, strings.id(value).to_le_bytes().to_vec()),
		NodeValue::Point(x, y) => (4, [x.to_le_bytes(), y.to_le_bytes()].concat()),
		NodeValue::Canvas(idx) => (5, idx.to_le_bytes().to_vec()),
		NodeValue::Audio(idx) => (6, idx.to_le_bytes().to_vec()),
		NodeValue::Link(idx) => (7, idx.to_le_bytes().to_vec()),
		NodeValue::Raw { tag, payload } => (*tag & 0x7F, payload.clone()),
	};

	let has_children = !node.children.is_empty();
	out.push(if has_children { tag | 0x80 } else { tag });
	out.extend_from_slice(&payload);

	if has_children {
		out.extend_from_slice(&(node.children.len() as u16).to_le_bytes());
		for child in &node.children {
			write_node(child, strings, out);
		}
	}
}

fn write_pair(out: &mut [u8], at: usize, count: u32, offset: u64) {
	patch_u32(out, at, count);
	patch_u64(out, at + 4, offset);
}

/// Overwrite a little-endian `u32` at `at`.
pub fn patch_u32(bytes: &mut [u8], at: usize, value: u32) {
	bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

/// Overwrite a little-endian `u64` at `at`.
pub fn patch_u64(bytes: &mut [u8], at: usize, value: u64) {
	bytes[at..at + 8].copy_from_slice(&value.to_le_bytes());
}

/// Read a little-endian `u64` at `at`.
pub fn read_u64(bytes: &[u8], at: usize) -> u64 {
	let mut buf = [0_u8; 8];
	buf.copy_from_slice(&bytes[at..at + 8]);
	u64::from_le_bytes(buf)
}

/// Encode text as modified UTF-8 (surrogate pairs as two 3-byte sequences, NUL as two bytes).
pub fn encode_mutf8(value: &str) -> Vec<u8> {
	let mut out = Vec::with_capacity(value.len());
	for unit in value.encode_utf16() {
		let unit = u32::from(unit);
		match unit {
			0x0001..=0x007F => out.push(unit as u8),
			0x0000 | 0x0080..=0x07FF => {
				out.push(0xC0 | (unit >> 6) as u8);
				out.push(0x80 | (unit & 0x3F) as u8);
			}
			_ => {
				out.push(0xE0 | (unit >> 12) as u8);
				out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
				out.push(0x80 | (unit & 0x3F) as u8);
			}
		}
	}
	out
}

/// Wrap an image in a zstd frame.
pub fn zstd_wrap(bytes: &[u8]) -> Vec<u8> {
	zstd::stream::encode_all(bytes, 3).unwrap_or_else(|err| panic!("zstd encode failed: {err}"))
}

/// Synthesize `width * height` B,G,R,A pixels with a deterministic pattern.
pub fn gradient_bgra(width: u16, height: u16) -> Vec<u8> {
	let mut out = Vec::with_capacity(usize::from(width) * usize::from(height) * 4);
	for y in 0..height {
		for x in 0..width {
			out.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 0xFF]);
		}
	}
	out
}
