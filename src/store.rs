// SPDX-License-Identifier: EUPL-1.2

use std::collections::HashMap;

use tracing::trace;

use crate::name::normalize_name;
use crate::parser::RawEmission;

const CELSIUS: &str = "°C";
const SENTINEL_BAND_TOLERANCE: f64 = 0.1;
const CELSIUS_RANGE: std::ops::RangeInclusive<f64> = -40.0..=70.0;

// A value accepted into the store, ready to hand to a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
	pub normalized_name: String,
	pub value: f64,
	pub unit: String,
}

// Last-known-value table, keyed by `normalize_name`d datapoint name.
#[derive(Debug, Default, Clone)]
pub struct Store {
	values: HashMap<String, (f64, String)>,
}

impl Store {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn apply(&mut self, emission: RawEmission) -> Option<Reading> {
		let normalized_name = normalize_name(&emission.name);

		if let Some((previous, _)) = self.values.get(&normalized_name) {
			if *previous == emission.value {
				return None;
			}
		}

		if emission.unit == CELSIUS && !self.passes_celsius_filter(&normalized_name, emission.value) {
			trace!(name = %normalized_name, value = emission.value, "Celsius reading rejected by anomaly filter");
			return None;
		}

		self.values.insert(normalized_name.clone(), (emission.value, emission.unit.clone()));

		Some(Reading {
			normalized_name,
			value: emission.value,
			unit: emission.unit,
		})
	}

	fn passes_celsius_filter(&self, normalized_name: &str, value: f64) -> bool {
		if (value - 25.5).abs() < SENTINEL_BAND_TOLERANCE || (value + 25.5).abs() < SENTINEL_BAND_TOLERANCE {
			return false;
		}
		if !CELSIUS_RANGE.contains(&value) {
			return false;
		}
		if value == 0.0 && normalized_name.contains("aussen") && !self.values.contains_key(normalized_name) {
			return false;
		}
		true
	}

	pub fn get(&self, normalized_name: &str) -> Option<(f64, &str)> {
		self.values.get(normalized_name).map(|(value, unit)| (*value, unit.as_str()))
	}

	pub fn snapshot(&self) -> HashMap<String, (f64, String)> {
		self.values.clone()
	}
}

#[cfg(test)]
mod store_tests {
	use super::*;

	fn emission(name: &str, value: f64, unit: &str) -> RawEmission {
		RawEmission {
			name: name.to_string(),
			value,
			unit: unit.to_string(),
		}
	}

	#[test]
	fn first_reading_is_always_a_change() {
		let mut store = Store::new();
		let reading = store.apply(emission("Lüftungsstufe", 42.0, "%")).unwrap();
		assert_eq!(reading.normalized_name, "lueftungsstufe");
		assert_eq!(reading.value, 42.0);
	}

	#[test]
	fn unchanged_value_is_not_reemitted() {
		let mut store = Store::new();
		assert!(store.apply(emission("Raumtemperatur", 21.5, "°C")).is_some());
		assert!(store.apply(emission("Raumtemperatur", 21.5, "°C")).is_none());
		assert!(store.apply(emission("Raumtemperatur", 21.6, "°C")).is_some());
	}

	#[test]
	fn outdoor_zero_before_any_real_reading_is_suppressed() {
		let mut store = Store::new();
		assert!(store.apply(emission("Aussentemperatur", 0.0, "°C")).is_none());
		assert!(store.apply(emission("Aussentemperatur", 3.2, "°C")).is_some());
	}

	#[test]
	fn outdoor_zero_after_a_real_reading_is_accepted_as_a_change() {
		let mut store = Store::new();
		store.apply(emission("Aussentemperatur", 3.2, "°C")).unwrap();
		let reading = store.apply(emission("Aussentemperatur", 0.0, "°C"));
		assert!(reading.is_some());
	}

	#[test]
	fn celsius_sentinel_band_is_rejected_for_any_named_datapoint() {
		let mut store = Store::new();
		store.apply(emission("Raumtemperatur", 3.2, "°C")).unwrap();
		assert!(store.apply(emission("Raumtemperatur", 25.5, "°C")).is_none());
		assert!(store.apply(emission("Raumtemperatur", -25.5, "°C")).is_none());
	}

	#[test]
	fn celsius_out_of_range_values_are_rejected() {
		let mut store = Store::new();
		store.apply(emission("Raumtemperatur", 3.2, "°C")).unwrap();
		assert!(store.apply(emission("Raumtemperatur", 80.0, "°C")).is_none());
		assert!(store.apply(emission("Raumtemperatur", -45.0, "°C")).is_none());
	}

	#[test]
	fn non_celsius_values_are_not_subject_to_the_celsius_filter() {
		let mut store = Store::new();
		let reading = store.apply(emission("Lüftungsstufe", 0.0, "%")).unwrap();
		assert_eq!(reading.value, 0.0);
	}

	#[test]
	fn snapshot_reflects_the_latest_accepted_values() {
		let mut store = Store::new();
		store.apply(emission("Lüftungsstufe", 42.0, "%")).unwrap();
		store.apply(emission("Raumtemperatur", 21.5, "°C")).unwrap();
		let snapshot = store.snapshot();
		assert_eq!(snapshot.get("lueftungsstufe"), Some(&(42.0, "%".to_string())));
		assert_eq!(snapshot.get("raumtemperatur"), Some(&(21.5, "°C".to_string())));
	}
}
