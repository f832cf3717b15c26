use thiserror::Error;

/// Timed repeated-open benchmark command.
pub mod bench;
/// Blob export command.
pub mod blob;
/// Single node lookup command.
pub mod get;
/// File-level information command.
pub mod info;
/// Subtree listing command.
pub mod tree;

mod util;

/// Command result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
	/// Container failed to open or parse.
	#[error(transparent)]
	Nx(#[from] nxdoc::nx::NxError),
	/// Output file or stdout failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// JSON rendering failure.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Path did not resolve to a node.
	#[error("node not found: {path}")]
	NodeNotFound {
		/// User-provided path.
		path: String,
	},
	/// Node exists but holds no blob payload.
	#[error("{path} is not a blob node (kind {kind})")]
	NotABlob {
		/// User-provided path.
		path: String,
		/// Kind label of the resolved node.
		kind: &'static str,
	},
	/// Blob node has no decodable payload.
	#[error("{path} has no decodable payload")]
	BlobUnavailable {
		/// User-provided path.
		path: String,
	},
}
