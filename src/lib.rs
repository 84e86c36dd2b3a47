// SPDX-License-Identifier: EUPL-1.2

//! Stream decoder for the Hoval HomeVent telemetry protocol: a CSV-driven
//! datapoint catalog, a delimiter-framed stream splitter, a two-encoding
//! frame parser, a per-type value codec, and a change-detecting state store,
//! wired together by [`orchestrator::Orchestrator`].

pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod frame;
pub mod name;
pub mod orchestrator;
pub mod parser;
pub mod store;

pub mod utils {
	pub fn read_test_file(filename: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
		if filename.ends_with(".hex") {
			let data = std::fs::read_to_string(filename)?;

			data.trim()
				.split(' ')
				.map(|substr| u8::from_str_radix(substr, 16))
				.collect::<Result<Vec<_>, _>>()
				.map_err(|e| e.into())
		} else {
			std::fs::read(filename).map_err(|e| e.into())
		}
	}
}
