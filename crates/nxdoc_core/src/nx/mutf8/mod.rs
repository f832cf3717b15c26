//! Modified UTF-8 string records.
//!
//! Each record is a `u16` byte length followed by that many bytes. Code units
//! are one, two, or three bytes wide; supplementary characters arrive as two
//! three-byte surrogate halves and are recombined here.

use crate::nx::bytes::Cursor;
use crate::nx::{NxError, Result};

/// Read one length-prefixed string record at the cursor position.
pub fn read_string(cursor: &mut Cursor<'_>) -> Result<String> {
	let len = usize::from(cursor.read_u16_le()?);
	let at = cursor.pos() as u64;
	let raw = cursor.read_exact(len)?;
	decode(raw, at)
}

/// Decode modified UTF-8 bytes; `base` is the absolute offset of `raw[0]` used in errors.
pub fn decode(raw: &[u8], base: u64) -> Result<String> {
	let ascii = raw.iter().position(|byte| *byte >= 0x80).unwrap_or(raw.len());
	if ascii == raw.len() {
		// All bytes below 0x80 are valid single-byte UTF-8 as well.
		return Ok(raw.iter().map(|byte| char::from(*byte)).collect());
	}

	let mut units: Vec<u16> = raw[..ascii].iter().map(|byte| u16::from(*byte)).collect();
	let mut idx = ascii;
	let fault = |at: usize| NxError::MalformedString { at: base + at as u64 };

	while idx < raw.len() {
		let lead = raw[idx];
		match lead >> 4 {
			0..=7 => {
				units.push(u16::from(lead));
				idx += 1;
			}
			12 | 13 => {
				let second = continuation(raw, idx + 1).ok_or_else(|| fault(idx + 1))?;
				units.push((u16::from(lead & 0x1F) << 6) | second);
				idx += 2;
			}
			14 => {
				let second = continuation(raw, idx + 1).ok_or_else(|| fault(idx + 1))?;
				let third = continuation(raw, idx + 2).ok_or_else(|| fault(idx + 2))?;
				units.push((u16::from(lead & 0x0F) << 12) | (second << 6) | third);
				idx += 3;
			}
			_ => return Err(fault(idx)),
		}
	}

	Ok(char::decode_utf16(units)
		.map(|item| item.unwrap_or(char::REPLACEMENT_CHARACTER))
		.collect())
}

/// Payload bits of a `10xxxxxx` byte at `idx`, or `None` if absent or not a continuation.
fn continuation(raw: &[u8], idx: usize) -> Option<u16> {
	let byte = *raw.get(idx)?;
	(byte & 0xC0 == 0x80).then_some(u16::from(byte & 0x3F))
}
