//! Matching native results to the handlers waiting for them.

use super::handlers::{ErrorHandler, ResultHandler};
use crate::bridge::{Command, RequestId};
use crate::config::CorrelationMode;
use std::collections::BTreeMap;

/// Which internal callback decodes a request's success payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    /// A batch of contacts, decoded by `find_callback`
    Find,
    /// A single contact, decoded by `contact_callback`
    Contact,
    /// Raw payload handed straight to the handler given with the call
    Direct,
}

struct InFlight {
    command: Command,
    route: Route,
    on_success: Option<ResultHandler>,
    on_failure: Option<ErrorHandler>,
}

/// Handler lookup result for a completed request.
pub(crate) struct Resolved {
    pub command: Command,
    pub route: Route,
    pub handler: Option<ResultHandler>,
}

/// Bookkeeping for requests the native side has not answered yet.
///
/// In single-slot mode the success handler of every `Find`/`Contact` request
/// goes into one shared slot that the next such request overwrites. The slot
/// is never cleared, so late results keep flowing to the last registered
/// handler. Per-request mode keeps each handler with its own request instead.
/// Failure handlers and `Direct` handlers always stay with their request.
///
/// Results delivered without a request id retire the oldest single-slot
/// request on their route, so answered requests do not linger.
pub(crate) struct Correlator {
    mode: CorrelationMode,
    next_id: RequestId,
    pending: Option<ResultHandler>,
    in_flight: BTreeMap<RequestId, InFlight>,
}

impl Correlator {
    pub fn new(mode: CorrelationMode) -> Self {
        Self {
            mode,
            next_id: 1,
            pending: None,
            in_flight: BTreeMap::new(),
        }
    }

    pub fn mode(&self) -> CorrelationMode {
        self.mode
    }

    /// Record a new request and return its id.
    pub fn register(
        &mut self,
        command: Command,
        route: Route,
        on_success: Option<ResultHandler>,
        on_failure: Option<ErrorHandler>,
    ) -> RequestId {
        let request_id = self.next_id;
        self.next_id += 1;

        let keep_with_request = route == Route::Direct || self.mode == CorrelationMode::PerRequest;
        let on_success = if keep_with_request {
            on_success
        } else {
            self.pending = on_success;
            None
        };

        self.in_flight.insert(
            request_id,
            InFlight {
                command,
                route,
                on_success,
                on_failure,
            },
        );
        request_id
    }

    /// The handler the id-less callbacks deliver to.
    pub fn pending(&self) -> Option<ResultHandler> {
        self.pending.clone()
    }

    /// Release the oldest in-flight request on `route` after an answer that
    /// carried no request id.
    ///
    /// Only single-slot mode retires anything: per-request entries keep
    /// their handlers until `resolve_success`, `resolve_failure` or `abandon`.
    pub fn retire_oldest(&mut self, route: Route) -> Option<RequestId> {
        if self.mode != CorrelationMode::SingleSlot {
            return None;
        }
        let request_id = self
            .in_flight
            .iter()
            .find(|(_, entry)| entry.route == route)
            .map(|(request_id, _)| *request_id)?;
        self.in_flight.remove(&request_id);
        Some(request_id)
    }

    /// Release a request answered with a result and find its handler.
    pub fn resolve_success(&mut self, request_id: RequestId) -> Option<Resolved> {
        let entry = self.in_flight.remove(&request_id)?;
        let handler = match (self.mode, entry.route) {
            (_, Route::Direct) | (CorrelationMode::PerRequest, _) => entry.on_success,
            (CorrelationMode::SingleSlot, _) => self.pending.clone(),
        };
        Some(Resolved {
            command: entry.command,
            route: entry.route,
            handler,
        })
    }

    /// Release a request answered with an error and return its failure handler.
    pub fn resolve_failure(
        &mut self,
        request_id: RequestId,
    ) -> Option<(Command, Option<ErrorHandler>)> {
        self.in_flight
            .remove(&request_id)
            .map(|entry| (entry.command, entry.on_failure))
    }

    /// Forget a request. Returns whether it was still in flight.
    pub fn abandon(&mut self, request_id: RequestId) -> bool {
        self.in_flight.remove(&request_id).is_some()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
