// SPDX-License-Identifier: EUPL-1.2

//! Drives the decoder against a file of captured device bytes and prints the
//! resulting snapshot. No TCP, no MQTT — just `push` followed by `snapshot`,
//! the same surface a real collaborator uses.

use std::error;

use hovalstream::catalog::Catalog;
use hovalstream::orchestrator::Orchestrator;
use hovalstream::utils::read_test_file;

fn run(catalog_path: &str, capture_path: &str, unit_id: u16) -> Result<(), Box<dyn error::Error>> {
	let catalog = Catalog::load_from_path(catalog_path, unit_id, &[]);
	println!("loaded {} datapoints for unit {}", catalog.len(), unit_id);

	let bytes = read_test_file(capture_path)?;
	let mut orchestrator = Orchestrator::new(catalog);
	orchestrator.push(&bytes);

	let mut snapshot: Vec<_> = orchestrator.snapshot().into_iter().collect();
	snapshot.sort_by(|a, b| a.0.cmp(&b.0));
	for (name, (value, unit)) in snapshot {
		println!("{name} = {value}{unit}");
	}

	Ok(())
}

fn main() {
	let mut args = std::env::args().skip(1);
	let (Some(catalog_path), Some(capture_path)) = (args.next(), args.next()) else {
		eprintln!("usage: decode_dump <catalog.csv> <capture.hex|capture.bin> [unit_id]");
		std::process::exit(1);
	};
	let unit_id = args.next().and_then(|s| s.parse().ok()).unwrap_or(513);

	if let Err(err) = run(&catalog_path, &capture_path, unit_id) {
		eprintln!("failed: {err}");
		std::process::exit(1);
	}
}
