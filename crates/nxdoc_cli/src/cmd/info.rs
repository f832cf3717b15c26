use std::collections::BTreeMap;
use std::path::PathBuf;

use nxdoc::nx::{NX_MAGIC, NxFile, TableKind};
use serde::Serialize;

use crate::cmd::Result;
use crate::cmd::util::{display_path, emit_json};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct TableJson {
	table: &'static str,
	count: u32,
	offset: u64,
}

#[derive(Serialize)]
struct InfoJson {
	path: String,
	compression: &'static str,
	magic: String,
	tables: Vec<TableJson>,
	node_count: usize,
	kinds: BTreeMap<&'static str, usize>,
}

/// Print header tables and node kind statistics.
pub fn run(args: Args) -> Result<()> {
	let Args { file, json } = args;

	let nx = NxFile::open(&file)?;
	let header = nx.header();

	let mut kinds = BTreeMap::new();
	for node in nx.nodes() {
		*kinds.entry(node.kind().as_str()).or_insert(0_usize) += 1;
	}

	let tables: Vec<_> = [TableKind::Node, TableKind::String, TableKind::Bitmap, TableKind::Audio]
		.into_iter()
		.map(|kind| {
			let table = header.table(kind);
			TableJson {
				table: kind.as_str(),
				count: table.count,
				offset: table.offset,
			}
		})
		.collect();

	let info = InfoJson {
		path: display_path(&file),
		compression: nx.compression().as_str(),
		magic: String::from_utf8_lossy(&NX_MAGIC).into_owned(),
		tables,
		node_count: nx.node_count(),
		kinds,
	};

	if json {
		return emit_json(&info);
	}

	println!("path: {}", info.path);
	println!("compression: {}", info.compression);
	println!("magic: {}", info.magic);
	for table in &info.tables {
		println!("{}_table: count={} offset={}", table.table, table.count, table.offset);
	}
	println!("node_count: {}", info.node_count);
	println!("kinds:");
	for (kind, count) in &info.kinds {
		println!("  {kind}: {count}");
	}

	Ok(())
}
