use std::path::Path;

use nxdoc::nx::{Node, NodeKind, NxFile, Value};
use serde::Serialize;

use crate::cmd::{CliError, Result};

/// Print one pretty JSON document to stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(payload)?;
	println!("{text}");
	Ok(())
}

/// Resolve `path` from the root, hierarchically unless `literal` is set.
pub(crate) fn resolve<'a>(file: &'a NxFile, path: &str, literal: bool) -> Result<Node<'a>> {
	let node = if literal { file.resolve_path(path) } else { file.root().resolve(path) };
	node.ok_or_else(|| CliError::NodeNotFound { path: path.to_owned() })
}

/// Render a node value as a short human-readable summary.
pub(crate) fn value_summary(value: Value<'_>) -> String {
	match value {
		Value::Empty => "-".to_owned(),
		Value::Int32(v) => v.to_string(),
		Value::Float64(v) => v.to_string(),
		Value::String(v) => format!("{v:?}"),
		Value::Point(p) => format!("({}, {})", p.x, p.y),
		Value::Canvas(Some(bitmap)) => format!("{}x{} bitmap", bitmap.width(), bitmap.height()),
		Value::Audio(Some(data)) => format!("{} bytes of audio", data.len()),
		Value::Canvas(None) | Value::Audio(None) => "<unavailable>".to_owned(),
		Value::Link(Some(target)) => format!("-> {}", target.path()),
		Value::Link(None) => "-> <dangling>".to_owned(),
	}
}

/// Whether `node` holds a lazily decoded canvas or audio payload.
pub(crate) fn is_blob(node: Node<'_>) -> bool {
	matches!(node.kind(), NodeKind::Canvas | NodeKind::Audio)
}

/// Summarise a node without decoding blob payloads.
pub(crate) fn shallow_summary(node: Node<'_>) -> String {
	if !is_blob(node) {
		return value_summary(node.value());
	}
	match node.blob_offset() {
		Some(offset) => format!("<{} @ {offset}>", node.kind()),
		None => "<unavailable>".to_owned(),
	}
}

/// JSON view of a node value.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum ValueJson {
	Empty,
	Int32 { value: i32 },
	Float64 { value: f64 },
	String { value: String },
	Point { x: i32, y: i32 },
	Canvas { available: bool, width: Option<u16>, height: Option<u16> },
	Audio { available: bool, len: Option<usize> },
	Link { target: Option<String> },
}

impl From<Value<'_>> for ValueJson {
	fn from(value: Value<'_>) -> Self {
		match value {
			Value::Empty => Self::Empty,
			Value::Int32(value) => Self::Int32 { value },
			Value::Float64(value) => Self::Float64 { value },
			Value::String(value) => Self::String { value: value.to_owned() },
			Value::Point(p) => Self::Point { x: p.x, y: p.y },
			Value::Canvas(bitmap) => Self::Canvas {
				available: bitmap.is_some(),
				width: bitmap.map(|b| b.width()),
				height: bitmap.map(|b| b.height()),
			},
			Value::Audio(data) => Self::Audio {
				available: data.is_some(),
				len: data.map(<[u8]>::len),
			},
			Value::Link(target) => Self::Link {
				target: target.map(|node| node.path()),
			},
		}
	}
}

/// Render a filesystem path for output.
pub(crate) fn display_path(path: &Path) -> String {
	path.display().to_string()
}
