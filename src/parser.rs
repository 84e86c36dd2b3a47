// SPDX-License-Identifier: EUPL-1.2

use tracing::trace;

use crate::catalog::{Catalog, Descriptor};
use crate::codec::scale;

// One decoded-but-not-yet-filtered value, on its way to the state store.
// Carries the descriptor's raw `name`; normalization happens later.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEmission {
	pub name: String,
	pub value: f64,
	pub unit: String,
}

/// Walks `frame` looking for the `0x00 <id:u16> <value>` primary encoding.
/// Unknown ids resync by a single byte rather than skipping a whole record,
/// since the stream carries no self-delimiting length.
pub fn parse_frame(frame: &[u8], catalog: &Catalog) -> Vec<RawEmission> {
	let mut emissions = Vec::new();
	if frame.len() < 4 {
		return emissions;
	}

	let end = frame.len() - 2;
	let mut i = 2;
	while i < end {
		if frame[i] != 0x00 || i + 3 > frame.len() {
			i += 1;
			continue;
		}

		let id = u16::from_be_bytes([frame[i + 1], frame[i + 2]]);
		if id == 0 {
			// Id 0 does not follow the primary encoding; it's recovered by
			// the reverse scanner instead.
			i += 3;
			continue;
		}

		let Some(descriptor) = catalog.get(id) else {
			trace!(id, offset = i, "unknown datapoint id, resyncing by one byte");
			i += 1;
			continue;
		};

		if let Some(value) = frame.get(i + 3..).and_then(|slice| descriptor.decode(slice)) {
			if passes_range_gate(&descriptor.name, value) {
				emissions.push(RawEmission {
					name: descriptor.name.clone(),
					value,
					unit: descriptor.unit.clone(),
				});
			}
		}

		i += 3 + descriptor.dtype.size();
	}

	emissions
}

fn passes_range_gate(name: &str, value: f64) -> bool {
	let is_temperature_like = name.contains("Temp") || name.contains("Aussen");
	if is_temperature_like && !(-40.0..=70.0).contains(&value) {
		return false;
	}
	if name.contains("Aussen") && value == 0.0 {
		return false;
	}
	true
}

const OUTDOOR_TERMINATOR: [u8; 2] = [0xFF, 0x02];
const OUTDOOR_MIN_OFFSET: usize = 6;

// Reverse-scans `frame` for the id=0 outdoor-temperature encoding. Only
// called when id 0 is actually catalogued. First match wins.
pub fn scan_outdoor_temperature(frame: &[u8], descriptor: &Descriptor) -> Option<RawEmission> {
	if frame.len() < OUTDOOR_MIN_OFFSET + 2 {
		return None;
	}

	for i in OUTDOOR_MIN_OFFSET..=frame.len() - 2 {
		if frame[i..i + 2] != OUTDOOR_TERMINATOR {
			continue;
		}

		let value = &frame[i - 2..i];
		let prefix = &frame[i - 6..i - 2];
		if !prefix_accepted(prefix) || value_rejected(value) {
			continue;
		}

		let raw = i16::from_be_bytes([value[0], value[1]]) as i64;
		let scaled = scale(raw, 1);
		if (-40.0..=50.0).contains(&scaled) {
			return Some(RawEmission {
				name: descriptor.name.clone(),
				value: scaled,
				unit: descriptor.unit.clone(),
			});
		}
	}

	None
}

/// Four prefix acceptance rules, listed in decreasing strictness. They
/// overlap — the relaxed fallback (`prefix[1] == 0`) is implied by each of
/// the other three, which is expected of a heuristic accumulated across
/// device-observation variants rather than derived from a documented
/// format.
fn prefix_accepted(prefix: &[u8]) -> bool {
	debug_assert_eq!(prefix.len(), 4);
	let all_four_zero = prefix.iter().all(|&b| b == 0);
	let bytes_1_3_zero = prefix[1] == 0 && prefix[2] == 0;
	let bytes_0_2_zero = prefix[0] == 0 && prefix[1] == 0;
	let bytes_1_2_zero = prefix[1] == 0;
	all_four_zero || bytes_1_3_zero || bytes_0_2_zero || bytes_1_2_zero
}

fn value_rejected(value: &[u8]) -> bool {
	debug_assert_eq!(value.len(), 2);
	matches!(value, [0xFF, 0xFF] | [0xFF, 0x02] | [0x00, 0x00]) || (value[0] == 0xFF && value[1] <= 0x01)
}
