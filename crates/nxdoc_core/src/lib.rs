//! Public library API for reading NX node-tree containers.

/// NX header and table loading, node tree parsing, lazy blob decoding, and path lookup.
pub mod nx;
