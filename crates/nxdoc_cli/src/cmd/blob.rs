use std::path::PathBuf;

use nxdoc::nx::{NodeKind, NxFile};
use serde::Serialize;

use crate::cmd::util::{display_path, emit_json, resolve};
use crate::cmd::{CliError, Result};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	pub path: String,
	/// Destination for RGBA8 pixels or raw audio bytes.
	#[arg(long)]
	pub out: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct BlobJson {
	path: String,
	kind: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	width: Option<u16>,
	#[serde(skip_serializing_if = "Option::is_none")]
	height: Option<u16>,
	bytes: usize,
	out: String,
}

/// Decode a canvas or audio payload and write it to disk.
pub fn run(args: Args) -> Result<()> {
	let Args { file, path, out, json } = args;

	let nx = NxFile::open(&file)?;
	let node = resolve(&nx, &path, false)?;

	let unavailable = || CliError::BlobUnavailable { path: path.clone() };
	let (bytes, dims) = match node.kind() {
		NodeKind::Canvas => {
			let bitmap = node.bitmap().ok_or_else(unavailable)?;
			(bitmap.to_rgba8(), Some((bitmap.width(), bitmap.height())))
		}
		NodeKind::Audio => (node.audio().ok_or_else(unavailable)?.to_vec(), None),
		kind => {
			return Err(CliError::NotABlob {
				path: path.clone(),
				kind: kind.as_str(),
			});
		}
	};

	std::fs::write(&out, &bytes)?;
	tracing::debug!(path = %node.path(), bytes = bytes.len(), out = %out.display(), "blob written");

	let report = BlobJson {
		path: node.path(),
		kind: node.kind().as_str(),
		width: dims.map(|(w, _)| w),
		height: dims.map(|(_, h)| h),
		bytes: bytes.len(),
		out: display_path(&out),
	};

	if json {
		return emit_json(&report);
	}

	println!("path: {}", report.path);
	println!("kind: {}", report.kind);
	if let Some((width, height)) = dims {
		println!("size: {width}x{height}");
	}
	println!("bytes: {}", report.bytes);
	println!("out: {}", report.out);

	Ok(())
}
