#![allow(missing_docs)]

use std::path::Path;
use std::process::{Command, Output};

use nxdoc_testkit::{NodeSpec, NodeValue, NxBuilder, gradient_bgra, zstd_wrap};
use serde_json::Value;
use tempfile::TempDir;

fn sample_image() -> Vec<u8> {
	let root = NodeSpec::empty("root")
		.child(
			NodeSpec::empty("Map")
				.child(NodeSpec::new("id", NodeValue::Int(100_000_000)))
				.child(NodeSpec::new("name", NodeValue::Str("Henesys".to_owned())))
				.child(NodeSpec::new("origin", NodeValue::Point(-4, 9))),
		)
		.child(NodeSpec::new("icon", NodeValue::Canvas(0)))
		.child(NodeSpec::new("bgm", NodeValue::Audio(0)))
		.child(NodeSpec::new("alias", NodeValue::Link(1)));

	let mut builder = NxBuilder::new(root);
	builder.add_bitmap(3, 2, &gradient_bgra(3, 2));
	builder.add_audio(b"pcm-bytes");
	builder.build()
}

fn write_image(dir: &TempDir, name: &str, bytes: &[u8]) -> String {
	let path = dir.path().join(name);
	std::fs::write(&path, bytes).expect("write image");
	path.display().to_string()
}

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_nxdoc")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(
		output.status.success(),
		"command should succeed: {}",
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

#[test]
fn info_json_reports_tables_and_kinds() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx", &sample_image());

	let json = run_json(&["info", &file, "--json"]);
	assert_eq!(json["compression"], "none");
	assert_eq!(json["magic"], "PKG2");
	assert_eq!(json["node_count"], 8);
	assert_eq!(json["tables"][0]["table"], "node");
	assert_eq!(json["tables"][0]["count"], 8);
	assert_eq!(json["tables"][2]["count"], 1);
	assert_eq!(json["kinds"]["empty"], 2);
	assert_eq!(json["kinds"]["canvas"], 1);
	assert_eq!(json["kinds"]["link"], 1);
}

#[test]
fn info_reads_zstd_wrapped_files() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx.zst", &zstd_wrap(&sample_image()));

	let json = run_json(&["info", &file, "--json"]);
	assert_eq!(json["compression"], "zstd");
	assert_eq!(json["node_count"], 8);
}

#[test]
fn get_json_resolves_nested_paths() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx", &sample_image());

	let json = run_json(&["get", &file, "Map/name", "--json"]);
	assert_eq!(json["path"], "root/Map/name");
	assert_eq!(json["kind"], "string");
	assert_eq!(json["value"]["kind"], "string");
	assert_eq!(json["value"]["value"], "Henesys");

	let map = run_json(&["get", &file, "/Map", "--json"]);
	assert_eq!(map["children"], serde_json::json!(["id", "name", "origin"]));
}

#[test]
fn get_literal_resolves_each_segment_against_root() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx", &sample_image());

	let json = run_json(&["get", &file, "Map/icon", "--literal", "--json"]);
	assert_eq!(json["path"], "root/icon");
	assert_eq!(json["value"]["kind"], "canvas");
	assert_eq!(json["value"]["width"], 3);
	assert_eq!(json["value"]["height"], 2);
}

#[test]
fn get_json_follows_links() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx", &sample_image());

	let json = run_json(&["get", &file, "alias", "--json"]);
	assert_eq!(json["value"]["kind"], "link");
	assert_eq!(json["value"]["target"], "root/Map");
}

#[test]
fn tree_json_honors_depth() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx", &sample_image());

	let json = run_json(&["tree", &file, "--depth", "1", "--json"]);
	let names: Vec<_> = json["children"]
		.as_array()
		.expect("children array")
		.iter()
		.map(|child| child["name"].as_str().expect("name").to_owned())
		.collect();
	assert_eq!(names, ["Map", "alias", "bgm", "icon"]);
	assert_eq!(json["children"][0]["child_count"], 3);
	assert!(json["children"][0].get("children").is_none());
}

#[test]
fn tree_lists_blob_nodes_by_offset() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx", &sample_image());

	let json = run_json(&["tree", &file, "--json"]);
	let icon = &json["children"][3];
	assert_eq!(icon["name"], "icon");
	assert_eq!(icon["kind"], "canvas");
	assert!(icon["blob_offset"].is_u64());
	assert!(icon.get("value").is_none());
	assert_eq!(json["children"][2]["kind"], "audio");
	assert_eq!(json["children"][0]["children"][0]["value"]["value"], 100_000_000);

	let output = run(&["tree", &file]);
	assert!(output.status.success());
	let text = String::from_utf8_lossy(&output.stdout);
	assert!(text.contains("icon [canvas] <canvas @ "), "unexpected tree output: {text}");
}

#[test]
fn blob_writes_rgba_pixels() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx", &sample_image());
	let out = dir.path().join("icon.rgba");
	let out_arg = out.display().to_string();

	let json = run_json(&["blob", &file, "icon", "--out", &out_arg, "--json"]);
	assert_eq!(json["kind"], "canvas");
	assert_eq!(json["bytes"], 24);

	let rgba = std::fs::read(&out).expect("read output");
	// Pixel (1, 0) is stored B=1 G=0 R=1 A=255.
	assert_eq!(&rgba[4..8], &[1, 0, 1, 255]);
}

#[test]
fn blob_writes_audio_bytes() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx", &sample_image());
	let out = dir.path().join("bgm.bin");
	let out_arg = out.display().to_string();

	let json = run_json(&["blob", &file, "bgm", "--out", &out_arg, "--json"]);
	assert_eq!(json["kind"], "audio");
	assert_eq!(std::fs::read(&out).expect("read output"), b"pcm-bytes");
}

#[test]
fn blob_rejects_non_blob_nodes() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx", &sample_image());
	let out = dir.path().join("nothing.bin");

	let output = run(&["blob", &file, "Map", "--out", &out.display().to_string()]);
	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).contains("error: Map is not a blob node (kind empty)"));
	assert!(!Path::new(&out).exists());
}

#[test]
fn bench_json_reports_iterations() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx", &sample_image());

	let json = run_json(&["bench", &file, "--iterations", "3", "--json"]);
	assert_eq!(json["iterations"], 3);
	assert_eq!(json["node_count"], 8);
	assert!(json["total_us"].is_u64());
}

#[test]
fn missing_node_exits_with_error() {
	let dir = TempDir::new().expect("tempdir");
	let file = write_image(&dir, "sample.nx", &sample_image());

	let output = run(&["get", &file, "Map/missing"]);
	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).contains("error: node not found: Map/missing"));
}

#[test]
fn bad_magic_exits_with_error() {
	let dir = TempDir::new().expect("tempdir");
	let image = NxBuilder::new(NodeSpec::empty("root")).magic(*b"NOPE").build();
	let file = write_image(&dir, "bad.nx", &image);

	let output = run(&["info", &file]);
	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).contains("error: not an NX file"));
}
