// SPDX-License-Identifier: EUPL-1.2

use std::collections::HashMap;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::catalog::Catalog;
use crate::frame::FrameSplitter;
use crate::parser::{parse_frame, scan_outdoor_temperature, RawEmission};
use crate::store::{Reading, Store};

// Chosen so a momentarily slow subscriber doesn't lose the most recent
// handful of updates outright: once full, further publishes are dropped.
const DEFAULT_SUBSCRIPTION_CAPACITY: usize = 64;

/// One device's decoder instance. Not reentrant: `push` must not be called
/// concurrently with itself. `snapshot` and `subscribe` may be called from
/// other threads, hence the catalog/store wrapping below.
pub struct Orchestrator {
	catalog: Arc<Catalog>,
	splitter: FrameSplitter,
	store: Arc<Mutex<Store>>,
	subscribers: Vec<SyncSender<Reading>>,
}

impl Orchestrator {
	pub fn new(catalog: Catalog) -> Self {
		Self {
			catalog: Arc::new(catalog),
			splitter: FrameSplitter::new(),
			store: Arc::new(Mutex::new(Store::new())),
			subscribers: Vec::new(),
		}
	}

	pub fn push(&mut self, bytes: &[u8]) {
		for frame in self.splitter.feed(bytes) {
			for emission in self.decode_frame(&frame) {
				let reading = self.store.lock().unwrap().apply(emission);
				if let Some(reading) = reading {
					self.publish(reading);
				}
			}
		}
	}

	fn decode_frame(&self, frame: &[u8]) -> Vec<RawEmission> {
		let mut emissions = Vec::new();
		if let Some(descriptor) = self.catalog.get(0) {
			if let Some(emission) = scan_outdoor_temperature(frame, descriptor) {
				emissions.push(emission);
			}
		}
		emissions.extend(parse_frame(frame, &self.catalog));
		emissions
	}

	fn publish(&mut self, reading: Reading) {
		self.subscribers.retain_mut(|tx| match tx.try_send(reading.clone()) {
			Ok(()) => true,
			Err(TrySendError::Full(_)) => {
				trace!(name = %reading.normalized_name, "subscriber channel full, dropping change event");
				true
			}
			Err(TrySendError::Disconnected(_)) => false,
		});
	}

	pub fn snapshot(&self) -> HashMap<String, (f64, String)> {
		self.store.lock().unwrap().snapshot()
	}

	pub fn subscribe(&mut self) -> Receiver<Reading> {
		self.subscribe_with_capacity(DEFAULT_SUBSCRIPTION_CAPACITY)
	}

	// A full channel drops the event rather than blocking `push`.
	pub fn subscribe_with_capacity(&mut self, capacity: usize) -> Receiver<Reading> {
		let (tx, rx) = sync_channel(capacity);
		self.subscribers.push(tx);
		rx
	}
}
