// SPDX-License-Identifier: EUPL-1.2

use tracing::trace;

const DELIMITER: [u8; 2] = [0xFF, 0x01];
// Frame includes the leading 2-byte delimiter, so 5 payload bytes means 7 total.
const MIN_FRAME_LEN: usize = 7;
const MAX_BUFFER: usize = 64 * 1024;

// One instance per device.
#[derive(Debug, Default)]
pub struct FrameSplitter {
	buffer: Vec<u8>,
}

impl FrameSplitter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn feed(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
		self.buffer.extend_from_slice(bytes);
		self.enforce_cap();

		let mut frames = Vec::new();
		while let Some(frame) = self.take_one_frame() {
			if frame.len() >= MIN_FRAME_LEN {
				frames.push(frame);
			} else {
				trace!(len = frame.len(), "discarding undersized frame");
			}
		}
		frames
	}

	fn enforce_cap(&mut self) {
		if self.buffer.len() <= MAX_BUFFER {
			return;
		}
		let drop = self.buffer.len() / 2;
		trace!(
			dropped = drop,
			remaining = self.buffer.len() - drop,
			"frame buffer exceeded cap without a delimiter, discarding oldest half"
		);
		self.buffer.drain(..drop);
	}

	fn take_one_frame(&mut self) -> Option<Vec<u8>> {
		let first = find_delimiter(&self.buffer, 0)?;
		let second = find_delimiter(&self.buffer, first + 2)?;
		let frame = self.buffer[first..second].to_vec();
		self.buffer.drain(..second);
		Some(frame)
	}
}

fn find_delimiter(data: &[u8], from: usize) -> Option<usize> {
	data.get(from..)?
		.windows(2)
		.position(|window| window == DELIMITER)
		.map(|pos| pos + from)
}

#[cfg(test)]
mod frame_splitter_tests {
	use super::*;

	#[test]
	fn splits_a_single_well_formed_frame() {
		let mut splitter = FrameSplitter::new();
		let frames = splitter.feed(&[0xFF, 0x01, 0x00, 0x04, 0x00, 0x00, 0x2A, 0xFF, 0x01]);
		assert_eq!(frames, vec![vec![0xFF, 0x01, 0x00, 0x04, 0x00, 0x00, 0x2A]]);
	}

	#[test]
	fn retains_incomplete_tail_across_feeds() {
		let mut splitter = FrameSplitter::new();
		assert!(splitter.feed(&[0xFF, 0x01, 0x00, 0x00, 0x00, 0x00]).is_empty());
		let frames = splitter.feed(&[0x2A, 0xFF, 0x01]);
		assert_eq!(frames, vec![vec![0xFF, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2A]]);
	}

	#[test]
	fn splitting_is_independent_of_chunk_boundaries() {
		let whole: &[u8] = &[
			0xFF, 0x01, 0x00, 0x04, 0x00, 0x00, 0x2A, 0xFF, 0x01, 0x00, 0x00, 0x02, 0xFF, 0xF5, 0xFF, 0x01,
		];

		let mut one_shot = FrameSplitter::new();
		let whole_frames = one_shot.feed(whole);

		let mut byte_at_a_time = FrameSplitter::new();
		let mut chunked_frames = Vec::new();
		for byte in whole {
			chunked_frames.extend(byte_at_a_time.feed(std::slice::from_ref(byte)));
		}

		assert_eq!(whole_frames, chunked_frames);
	}

	#[test]
	fn undersized_frames_are_discarded() {
		let mut splitter = FrameSplitter::new();
		// Only 2 payload bytes between the delimiters: below MIN_FRAME_LEN.
		let frames = splitter.feed(&[0xFF, 0x01, 0x00, 0x00, 0xFF, 0x01]);
		assert!(frames.is_empty());
	}

	#[test]
	fn a_single_catalogued_datapoint_is_still_below_the_minimum() {
		let mut splitter = FrameSplitter::new();
		// 4 payload bytes (prefix + id + one-byte value): still too short.
		let frames = splitter.feed(&[0xFF, 0x01, 0x00, 0x04, 0x00, 0x2A, 0xFF, 0x01]);
		assert!(frames.is_empty());
	}

	#[test]
	fn buffer_cap_discards_oldest_half_without_a_delimiter() {
		let mut splitter = FrameSplitter::new();
		let junk = vec![0x00u8; MAX_BUFFER + 10];
		let frames = splitter.feed(&junk);
		assert!(frames.is_empty());
		assert!(splitter.buffer.len() <= MAX_BUFFER);
	}
}
