use std::path::PathBuf;

use nxdoc::nx::NxFile;
use serde::Serialize;

use crate::cmd::Result;
use crate::cmd::util::{ValueJson, emit_json, resolve, value_summary};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	pub path: String,
	/// Resolve from the root without `.`/`..` handling.
	#[arg(long)]
	pub literal: bool,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct GetJson {
	index: u32,
	path: String,
	kind: &'static str,
	value: ValueJson,
	children: Vec<String>,
}

/// Resolve one node and print its value and child names.
pub fn run(args: Args) -> Result<()> {
	let Args {
		file,
		path,
		literal,
		json,
	} = args;

	let nx = NxFile::open(&file)?;
	let node = resolve(&nx, &path, literal)?;

	let mut children: Vec<String> = node.children().map(|child| child.name().to_owned()).collect();
	children.sort();

	if json {
		return emit_json(&GetJson {
			index: node.index(),
			path: node.path(),
			kind: node.kind().as_str(),
			value: node.value().into(),
			children,
		});
	}

	println!("path: {}", node.path());
	println!("index: {}", node.index());
	println!("kind: {}", node.kind());
	println!("value: {}", value_summary(node.value()));
	println!("children: {}", children.len());
	for name in children {
		println!("  {name}");
	}

	Ok(())
}
