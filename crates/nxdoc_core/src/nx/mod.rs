mod blob;
mod bytes;
mod codec;
mod compression;
mod error;
mod file;
mod header;
mod mutf8;
mod node;
mod parse;
mod path;
mod source;
mod tables;

/// Blob record kinds and decoded bitmaps.
pub use blob::{Bitmap, BlobKind};
/// LZ4 block codec boundary.
pub use codec::{compress, decompress, max_compressed_size, max_decompressed_size};
/// Container compression detection result.
pub use compression::{Compression, ZSTD_MAGIC};
/// Error and result aliases.
pub use error::{NxError, Result};
/// Parsed container and open limits.
pub use file::{NxFile, OpenOptions};
/// File header representation.
pub use header::{NX_MAGIC, NxHeader, TableKind, TableRef};
/// Modified UTF-8 decoding.
pub use mutf8::decode as decode_mutf8;
/// Node handles and values.
pub use node::{Node, NodeKind, Point, Value};
/// Random-access byte sources.
pub use source::ByteSource;
