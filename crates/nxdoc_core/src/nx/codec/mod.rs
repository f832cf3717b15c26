//! LZ4 block codec used by canvas and audio records.

use crate::nx::{NxError, Result};

/// Sizing bound for the compressed form of `n` input bytes: `max(floor(n * 0.005), 8) + n`.
pub fn max_compressed_size(n: usize) -> usize {
	(n / 200).max(8).saturating_add(n)
}

/// Largest output a raw LZ4 block of `n` bytes can expand to.
pub fn max_decompressed_size(n: usize) -> usize {
	n.saturating_mul(255).saturating_add(16)
}

/// Compress `src` into a raw LZ4 block with no size prefix.
pub fn compress(src: &[u8]) -> Vec<u8> {
	lz4_flex::block::compress(src)
}

/// Decompress a raw LZ4 block into a buffer of at most `capacity` bytes.
///
/// Fails when the output does not fit, the block is malformed, or `capacity`
/// is more than `src` could ever expand to. The returned buffer is truncated
/// to the decompressed length.
pub fn decompress(src: &[u8], capacity: usize) -> Result<Vec<u8>> {
	if capacity > max_decompressed_size(src.len()) {
		return Err(NxError::ImplausibleBlobSize {
			declared: capacity,
			compressed: src.len(),
		});
	}

	let mut out = vec![0_u8; capacity];
	let written = lz4_flex::block::decompress_into(src, &mut out)?;
	out.truncate(written);
	Ok(out)
}
