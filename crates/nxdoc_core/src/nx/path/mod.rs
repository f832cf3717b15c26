//! Slash-delimited node lookup.
//!
//! [`NxFile::resolve_path`] keeps the historical lookup rule: every segment
//! other than `.` is looked up among the root's children, and `..` asks for
//! the root's parent. Only direct children of the root are reachable through
//! it. [`Node::resolve`] walks the tree conventionally.

use crate::nx::{Node, NxFile};

impl NxFile {
	/// Resolve `path` with the root-anchored lookup rule.
	///
	/// A leading `/` is ignored. Each segment is resolved against the root,
	/// not against the node reached by the previous segment, so `a/b` yields
	/// the root's child `b` when `a` also exists.
	pub fn resolve_path(&self, path: &str) -> Option<Node<'_>> {
		let root = self.root();
		let mut resolved = root;
		for segment in segments(path) {
			resolved = match segment {
				"." => continue,
				".." => root.parent()?,
				name => root.child(name)?,
			};
		}
		Some(resolved)
	}
}

impl<'a> Node<'a> {
	/// Resolve `path` relative to this node, one level per segment.
	///
	/// `.` and empty segments stay in place, `..` moves to the current node's
	/// parent, and a leading `/` is ignored.
	pub fn resolve(&self, path: &str) -> Option<Node<'a>> {
		let mut resolved = *self;
		for segment in segments(path) {
			resolved = match segment {
				"" | "." => continue,
				".." => resolved.parent()?,
				name => resolved.child(name)?,
			};
		}
		Some(resolved)
	}
}

/// Split after stripping one leading `/`. Trailing empty segments are
/// dropped, but an empty remainder is a single empty segment.
fn segments(path: &str) -> Vec<&str> {
	let path = path.strip_prefix('/').unwrap_or(path);
	if path.is_empty() {
		return vec![""];
	}

	let mut out: Vec<&str> = path.split('/').collect();
	while out.last().is_some_and(|segment| segment.is_empty()) {
		out.pop();
	}
	out
}
