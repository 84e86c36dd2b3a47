// SPDX-License-Identifier: EUPL-1.2

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::codec::DatapointType;
use crate::error::CatalogError;
use crate::name::normalize_name;

const REQUIRED_COLUMNS: &[&str] = &[
	"UnitName",
	"UnitId",
	"DatapointId",
	"DatapointName",
	"TypeName",
	"Decimal",
	"unit",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
	pub id: u16,
	pub name: String,
	pub normalized_name: String,
	pub dtype: DatapointType,
	pub decimal: u8,
	pub unit: String,
}

impl Descriptor {
	pub fn decode(&self, data: &[u8]) -> Option<f64> {
		let raw = self.dtype.decode_raw(data)?;
		Some(crate::codec::scale(raw, self.decimal))
	}
}

// Datapoint descriptors keyed by numeric ID, read-only once loaded.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
	by_id: HashMap<u16, Descriptor>,
}

impl Catalog {
	pub fn get(&self, id: u16) -> Option<&Descriptor> {
		self.by_id.get(&id)
	}

	pub fn contains(&self, id: u16) -> bool {
		self.by_id.contains_key(&id)
	}

	pub fn len(&self) -> usize {
		self.by_id.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}

	// A missing or unreadable file is a warning, not a failure: the result
	// is an empty catalog.
	pub fn load_from_path(path: impl AsRef<Path>, unit_id: u16, ignore_keywords: &[String]) -> Catalog {
		match std::fs::File::open(path.as_ref()) {
			Ok(file) => Self::load(file, unit_id, ignore_keywords),
			Err(err) => {
				warn!(path = %path.as_ref().display(), error = %err, "datapoint catalog missing, starting with an empty catalog");
				Catalog::default()
			}
		}
	}

	// Never fails: I/O or CSV structure problems are logged and yield an
	// empty catalog.
	pub fn load(mut source: impl Read, unit_id: u16, ignore_keywords: &[String]) -> Catalog {
		let mut bytes = Vec::new();
		if let Err(err) = source.read_to_end(&mut bytes) {
			warn!(error = %err, "failed to read datapoint catalog, starting with an empty catalog");
			return Catalog::default();
		}
		match Self::try_load(&bytes, unit_id, ignore_keywords) {
			Ok(catalog) => catalog,
			Err(err) => {
				warn!(error = %err, "failed to parse datapoint catalog, starting with an empty catalog");
				Catalog::default()
			}
		}
	}

	fn try_load(bytes: &[u8], unit_id: u16, ignore_keywords: &[String]) -> Result<Catalog, CatalogError> {
		let text = String::from_utf8_lossy(bytes);
		let delimiter = detect_delimiter(&text);

		let mut reader = csv::ReaderBuilder::new()
			.delimiter(delimiter)
			.flexible(true)
			.from_reader(text.as_bytes());

		let headers = reader.headers()?.clone();
		for column in REQUIRED_COLUMNS {
			if !headers.iter().any(|h| h == *column) {
				return Err(CatalogError::MissingColumn(column));
			}
		}

		let mut by_id = HashMap::new();
		for record in reader.into_records() {
			let Ok(record) = record else { continue };
			if let Some(descriptor) = parse_row(&headers, &record, unit_id, ignore_keywords) {
				by_id.insert(descriptor.id, descriptor);
			}
		}

		debug!(count = by_id.len(), unit_id, "loaded datapoint catalog");
		Ok(Catalog { by_id })
	}
}

// First non-empty line decides the delimiter: `;` if present, else `,`.
fn detect_delimiter(text: &str) -> u8 {
	let first_line = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
	if first_line.contains(';') {
		b';'
	} else {
		b','
	}
}

fn parse_row(
	headers: &csv::StringRecord,
	record: &csv::StringRecord,
	unit_id: u16,
	ignore_keywords: &[String],
) -> Option<Descriptor> {
	let field = |column: &str| {
		headers
			.iter()
			.position(|h| h == column)
			.and_then(|i| record.get(i))
	};

	if field("UnitName")? != "HV" {
		return None;
	}
	let row_unit_id: u16 = field("UnitId")?.trim().parse().ok()?;
	if row_unit_id != unit_id {
		return None;
	}

	let name = field("DatapointName")?.to_string();
	if ignore_keywords.iter().any(|kw| name.contains(kw.as_str())) {
		return None;
	}

	let id: u16 = field("DatapointId")?.trim().parse().ok()?;
	let decimal: u8 = field("Decimal")?.trim().parse().ok()?;
	let dtype = DatapointType::from_type_name(field("TypeName")?.trim())?;
	let unit = field("unit").unwrap_or("").to_string();

	Some(Descriptor {
		id,
		normalized_name: normalize_name(&name),
		name,
		dtype,
		decimal,
		unit,
	})
}
