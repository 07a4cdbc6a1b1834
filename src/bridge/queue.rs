//! In-process bridge that queues calls for the host to execute.

use super::{Bridge, BridgeCall};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{debug, error};

/// A bridge that parks calls until the host's event loop drains them.
///
/// The host forwards drained calls to the native store and reports each
/// outcome back through `Contacts::complete` or `Contacts::fail`.
#[derive(Debug, Default)]
pub struct QueueBridge {
    queue: Mutex<VecDeque<BridgeCall>>,
}

impl QueueBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued call, oldest first.
    pub fn drain(&self) -> Vec<BridgeCall> {
        match self.queue.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Take the oldest queued call.
    pub fn pop(&self) -> Option<BridgeCall> {
        self.queue.lock().ok().and_then(|mut queue| queue.pop_front())
    }

    pub fn len(&self) -> usize {
        self.queue.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Bridge for QueueBridge {
    fn exec(&self, call: BridgeCall) {
        match self.queue.lock() {
            Ok(mut queue) => {
                debug!(request_id = call.request_id, action = %call.action, "Queued bridge call");
                queue.push_back(call);
            }
            Err(_) => error!(
                request_id = call.request_id,
                action = %call.action,
                "Bridge queue poisoned, call dropped"
            ),
        }
    }
}
