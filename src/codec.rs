// SPDX-License-Identifier: EUPL-1.2

use winnow::binary::{be_i16, be_i32, be_u16, be_u32, u8 as be_u8};
use winnow::error::ContextError;
use winnow::prelude::*;

// Unknown `TypeName` strings are rejected at load time, so every descriptor
// that makes it into the catalog carries one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatapointType {
	U8,
	U16,
	S16,
	U32,
	S32,
}

impl DatapointType {
	pub fn from_type_name(name: &str) -> Option<Self> {
		match name {
			"U8" => Some(Self::U8),
			"U16" => Some(Self::U16),
			"S16" => Some(Self::S16),
			"U32" => Some(Self::U32),
			"S32" => Some(Self::S32),
			_ => None,
		}
	}

	pub fn size(self) -> usize {
		match self {
			Self::U8 => 1,
			Self::U16 | Self::S16 => 2,
			Self::U32 | Self::S32 => 4,
		}
	}

	// Returns None ("unavailable") if the slice is too short for the declared
	// width or the bytes are a recognized sentinel/error encoding.
	pub fn decode_raw(self, data: &[u8]) -> Option<i64> {
		if data.len() < self.size() {
			return None;
		}
		let mut input = data;
		match self {
			Self::U8 => {
				let raw: u8 = be_u8::<_, ContextError>.parse_next(&mut input).ok()?;
				(raw != 0xFF).then_some(raw as i64)
			}
			Self::U16 => {
				let raw: u16 = be_u16::<_, ContextError>.parse_next(&mut input).ok()?;
				(raw != 0xFFFF).then_some(raw as i64)
			}
			Self::S16 => {
				// The error-code band is checked on the raw bytes, not the
				// decoded value: 0xFFF5 (-11, i.e. -1.1 °C at decimal=1) is a
				// genuine negative reading and must not be caught here, but
				// anything from 0xFF00 through 0xFF05 — and the all-ones
				// 0xFFFF sentinel — is not real data.
				if data[0] == 0xFF && (data[1] == 0xFF || data[1] <= 0x05) {
					return None;
				}
				let raw: i16 = be_i16::<_, ContextError>.parse_next(&mut input).ok()?;
				(!matches!(raw, -32768 | 32767)).then_some(raw as i64)
			}
			Self::U32 => {
				let raw: u32 = be_u32::<_, ContextError>.parse_next(&mut input).ok()?;
				(raw != 0xFFFF_FFFF).then_some(raw as i64)
			}
			Self::S32 => {
				let raw: i32 = be_i32::<_, ContextError>.parse_next(&mut input).ok()?;
				(raw != i32::MIN).then_some(raw as i64)
			}
		}
	}
}

// Divides by 10^decimal and rounds to 2 decimal places. decimal=0 returns
// the raw integer unchanged.
pub fn scale(raw: i64, decimal: u8) -> f64 {
	if decimal == 0 {
		return raw as f64;
	}
	let divisor = 10f64.powi(decimal as i32);
	round2(raw as f64 / divisor)
}

fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}
