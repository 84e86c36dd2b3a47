// SPDX-License-Identifier: EUPL-1.2

use serde::Deserialize;

fn default_port() -> u16 {
	3113
}

fn default_unit_id() -> u16 {
	513
}

fn default_scan_interval() -> u32 {
	5
}

// `host`, `port` and `scan_interval` are read but never interpreted here —
// transport and snapshot cadence are the orchestrating collaborator's concern.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub host: String,

	#[serde(default = "default_port")]
	pub port: u16,

	#[serde(default = "default_unit_id")]
	pub unit_id: u16,

	#[serde(default)]
	pub ignore_keywords: Vec<String>,

	#[serde(default = "default_scan_interval")]
	pub scan_interval: u32,
}

impl Config {
	pub fn new(host: impl Into<String>) -> Self {
		Self {
			host: host.into(),
			port: default_port(),
			unit_id: default_unit_id(),
			ignore_keywords: Vec::new(),
			scan_interval: default_scan_interval(),
		}
	}
}
