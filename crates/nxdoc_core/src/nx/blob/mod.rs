//! Canvas and audio records stored outside the node block.
//!
//! Record layouts (all little-endian):
//!
//! - canvas: `u16 width`, `u16 height`, `u32 compressed_len`, LZ4 block
//! - audio: `u32 decoded_len`, `u32 compressed_len`, LZ4 block
//!
//! Decoded canvas bytes are `height` rows of `width` pixels in B, G, R, A order.

use std::sync::OnceLock;

use crate::nx::codec::decompress;
use crate::nx::{ByteSource, NxError, Result, TableKind};

const RECORD_HEAD: usize = 8;

/// Blob record families addressed from node records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKind {
	/// Compressed bitmap.
	Canvas,
	/// Compressed audio stream.
	Audio,
}

impl BlobKind {
	/// Offset table that indexes this blob kind.
	pub fn table(self) -> TableKind {
		match self {
			Self::Canvas => TableKind::Bitmap,
			Self::Audio => TableKind::Audio,
		}
	}
}

/// Decoded canvas pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
	width: u16,
	height: u16,
	pixels: Vec<u32>,
}

impl Bitmap {
	/// Build a bitmap from packed ARGB pixels, row-major from the top-left corner.
	pub fn from_argb(width: u16, height: u16, pixels: Vec<u32>) -> Option<Self> {
		(pixels.len() == usize::from(width) * usize::from(height)).then_some(Self { width, height, pixels })
	}

	/// Width in pixels.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Packed `0xAARRGGBB` pixels, row-major.
	pub fn pixels(&self) -> &[u32] {
		&self.pixels
	}

	/// Pixel at column `x`, row `y`.
	pub fn pixel(&self, x: u16, y: u16) -> Option<u32> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.pixels.get(usize::from(y) * usize::from(self.width) + usize::from(x)).copied()
	}

	/// Expand to R, G, B, A bytes.
	pub fn to_rgba8(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(self.pixels.len() * 4);
		for argb in &self.pixels {
			let [b, g, r, a] = argb.to_le_bytes();
			out.extend_from_slice(&[r, g, b, a]);
		}
		out
	}
}

/// Blob slot that resolves at most once.
///
/// `offset` of `None` means the file carries no table for this kind; such
/// slots never decode and always report no value.
#[derive(Debug)]
pub(crate) struct LazyBlob<T> {
	offset: Option<u64>,
	cache: OnceLock<Option<T>>,
}

impl<T> LazyBlob<T> {
	pub fn new(offset: Option<u64>) -> Self {
		Self {
			offset,
			cache: OnceLock::new(),
		}
	}

	pub fn offset(&self) -> Option<u64> {
		self.offset
	}

	pub fn is_resolved(&self) -> bool {
		self.offset.is_none() || self.cache.get().is_some()
	}

	/// Return the cached value, running `resolve` on first access only.
	pub fn get_or_resolve(&self, resolve: impl FnOnce(u64) -> Option<T>) -> Option<&T> {
		let offset = self.offset?;
		self.cache.get_or_init(|| resolve(offset)).as_ref()
	}
}

/// Decode a canvas record at `offset`.
pub(crate) fn decode_canvas(source: &dyn ByteSource, offset: u64) -> Result<Bitmap> {
	let head = read_record(source, offset, RECORD_HEAD)?;
	let width = u16::from_le_bytes([head[0], head[1]]);
	let height = u16::from_le_bytes([head[2], head[3]]);
	let compressed_len = u32::from_le_bytes([head[4], head[5], head[6], head[7]]) as usize;

	let block = read_record(source, offset + RECORD_HEAD as u64, compressed_len)?;
	let capacity = usize::from(width) * usize::from(height) * 4;
	let mut raw = decompress(block, capacity)?;
	// A short block leaves the remaining pixels zeroed.
	raw.resize(capacity, 0);

	let pixels = raw
		.chunks_exact(4)
		.map(|bgra| u32::from_le_bytes([bgra[0], bgra[1], bgra[2], bgra[3]]))
		.collect();
	Ok(Bitmap { width, height, pixels })
}

/// Decode an audio record at `offset` into its raw byte stream.
pub(crate) fn decode_audio(source: &dyn ByteSource, offset: u64) -> Result<Vec<u8>> {
	let head = read_record(source, offset, RECORD_HEAD)?;
	let decoded_len = u32::from_le_bytes([head[0], head[1], head[2], head[3]]) as usize;
	let compressed_len = u32::from_le_bytes([head[4], head[5], head[6], head[7]]) as usize;

	let block = read_record(source, offset + RECORD_HEAD as u64, compressed_len)?;
	decompress(block, decoded_len)
}

fn read_record(source: &dyn ByteSource, offset: u64, len: usize) -> Result<&[u8]> {
	source.slice(offset, len).ok_or_else(|| NxError::UnexpectedEof {
		at: usize::try_from(offset).unwrap_or(usize::MAX),
		need: len,
		rem: usize::try_from(source.len().saturating_sub(offset)).unwrap_or(usize::MAX),
	})
}
