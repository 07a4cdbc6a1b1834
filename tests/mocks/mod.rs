//! Shared test doubles for the native side of the bridge.

pub mod mock_native_store;

#[allow(unused_imports)]
pub use mock_native_store::{AutoRespondingBridge, MockNativeStore};

use device_contacts::{ContactResult, ResultHandler};
use std::sync::{Arc, Mutex};

/// A result handler that records everything it receives.
#[allow(dead_code)]
pub fn recording_handler() -> (Arc<Mutex<Vec<ContactResult>>>, ResultHandler) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let handler: ResultHandler = Arc::new(move |result| sink.lock().unwrap().push(result));
    (seen, handler)
}
