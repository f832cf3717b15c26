use std::sync::Arc;

/// Random-access view over the raw bytes of an NX container.
///
/// Readers borrow immutable slices instead of sharing a seek position, so
/// concurrent blob decodes against one source never interleave.
pub trait ByteSource: Send + Sync {
	/// Total addressable length in bytes.
	fn len(&self) -> u64;

	/// Borrow `len` bytes starting at `offset`, or `None` when the range is out of bounds.
	fn slice(&self, offset: u64, len: usize) -> Option<&[u8]>;

	/// Whether the source holds no bytes.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

fn slice_of(bytes: &[u8], offset: u64, len: usize) -> Option<&[u8]> {
	let start = usize::try_from(offset).ok()?;
	let end = start.checked_add(len)?;
	bytes.get(start..end)
}

impl ByteSource for Vec<u8> {
	fn len(&self) -> u64 {
		self.as_slice().len() as u64
	}

	fn slice(&self, offset: u64, len: usize) -> Option<&[u8]> {
		slice_of(self, offset, len)
	}
}

impl ByteSource for Box<[u8]> {
	fn len(&self) -> u64 {
		self.as_ref().len() as u64
	}

	fn slice(&self, offset: u64, len: usize) -> Option<&[u8]> {
		slice_of(self, offset, len)
	}
}

impl ByteSource for Arc<[u8]> {
	fn len(&self) -> u64 {
		self.as_ref().len() as u64
	}

	fn slice(&self, offset: u64, len: usize) -> Option<&[u8]> {
		slice_of(self, offset, len)
	}
}

impl ByteSource for &'static [u8] {
	fn len(&self) -> u64 {
		<[u8]>::len(self) as u64
	}

	fn slice(&self, offset: u64, len: usize) -> Option<&[u8]> {
		slice_of(self, offset, len)
	}
}
