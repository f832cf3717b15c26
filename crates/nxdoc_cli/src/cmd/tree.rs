use std::path::PathBuf;

use nxdoc::nx::{Node, NxFile};
use serde::Serialize;

use crate::cmd::Result;
use crate::cmd::util::{ValueJson, emit_json, is_blob, resolve, shallow_summary};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long)]
	pub path: Option<String>,
	#[arg(long)]
	pub depth: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct TreeJson {
	name: String,
	kind: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	value: Option<ValueJson>,
	#[serde(skip_serializing_if = "Option::is_none")]
	blob_offset: Option<u64>,
	child_count: usize,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	children: Vec<TreeJson>,
}

/// Print a subtree, children sorted by name. Blob payloads are listed by offset, not decoded.
pub fn run(args: Args) -> Result<()> {
	let Args { file, path, depth, json } = args;

	let nx = NxFile::open(&file)?;
	let start = match path.as_deref() {
		Some(path) => resolve(&nx, path, false)?,
		None => nx.root(),
	};
	let max_depth = depth.unwrap_or(usize::MAX);

	if json {
		return emit_json(&tree_json(start, max_depth));
	}

	print_tree(start, 0, max_depth);
	Ok(())
}

fn sorted_children(node: Node<'_>) -> Vec<Node<'_>> {
	let mut children: Vec<_> = node.children().collect();
	children.sort_by(|left, right| left.name().cmp(right.name()));
	children
}

fn print_tree(node: Node<'_>, depth: usize, max_depth: usize) {
	let label = if depth == 0 && node.name().is_empty() { "/" } else { node.name() };
	println!("{:indent$}{label} [{}] {}", "", node.kind(), shallow_summary(node), indent = depth * 2);

	if depth >= max_depth {
		return;
	}
	for child in sorted_children(node) {
		print_tree(child, depth + 1, max_depth);
	}
}

fn tree_json(node: Node<'_>, remaining: usize) -> TreeJson {
	let children = if remaining == 0 {
		Vec::new()
	} else {
		sorted_children(node).into_iter().map(|child| tree_json(child, remaining - 1)).collect()
	};

	TreeJson {
		name: node.name().to_owned(),
		kind: node.kind().as_str(),
		value: (!is_blob(node)).then(|| node.value().into()),
		blob_offset: node.blob_offset(),
		child_count: node.child_count(),
		children,
	}
}
