// SPDX-License-Identifier: EUPL-1.2

use thiserror::Error;

/// Errors that can stop catalog loading. This is the only boundary in the
/// decoder that actually propagates a `Result` — everywhere else (codec,
/// frame parser, scanner) degrades silently to "no emission" per the error
/// handling policy.
#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("failed to read datapoint catalog: {0}")]
	Io(#[from] std::io::Error),

	#[error("malformed datapoint catalog: {0}")]
	Csv(#[from] csv::Error),

	#[error("datapoint catalog is missing required column {0:?}")]
	MissingColumn(&'static str),
}
