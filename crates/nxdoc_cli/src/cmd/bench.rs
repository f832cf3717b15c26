use std::path::PathBuf;
use std::time::Instant;

use nxdoc::nx::NxFile;
use serde::Serialize;

use crate::cmd::Result;
use crate::cmd::util::{display_path, emit_json};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long, default_value_t = 10)]
	pub iterations: u32,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct BenchJson {
	path: String,
	iterations: u32,
	node_count: usize,
	total_us: u128,
	per_iteration_us: u128,
}

/// Time repeated full opens of a container.
pub fn run(args: Args) -> Result<()> {
	let Args { file, iterations, json } = args;
	let iterations = iterations.max(1);

	let mut node_count = 0;
	let started = Instant::now();
	for _ in 0..iterations {
		let nx = NxFile::open(&file)?;
		node_count = nx.node_count();
	}
	let total = started.elapsed();

	let report = BenchJson {
		path: display_path(&file),
		iterations,
		node_count,
		total_us: total.as_micros(),
		per_iteration_us: total.as_micros() / u128::from(iterations),
	};

	if json {
		return emit_json(&report);
	}

	println!("path: {}", report.path);
	println!("iterations: {}", report.iterations);
	println!("node_count: {}", report.node_count);
	println!("total_us: {}", report.total_us);
	println!("per_iteration_us: {}", report.per_iteration_us);

	Ok(())
}
