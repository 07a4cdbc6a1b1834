//! The contacts collection service.
//!
//! `Contacts` issues bridge commands and turns the native answers back into
//! typed contacts. It is an ordinary value: build one per bridge and pass it by
//! reference to whatever needs it.

use super::correlation::{Correlator, Route};
use super::handlers::{ContactResult, ErrorHandler, ResultHandler};
use crate::bridge::{Bridge, BridgeCall, Command, RequestId};
use crate::config::{Config, CorrelationMode};
use crate::error::{ContactError, MarshalResult};
use crate::marshal::dates::normalize_updated_since;
use crate::marshal::payload::{
    create_from_properties, decode_batch, decode_contact, encode_args, ChooseArgs, SearchArgs,
};
use crate::models::{Contact, ContactFindOptions};
use crate::observability::DispatchMetrics;
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, warn};

struct ServiceState {
    /// Carried over from the scripted API; no operation reads or writes it.
    in_progress: bool,
    /// Carried over from the scripted API; no operation reads or writes it.
    records: Vec<Contact>,
    correlator: Correlator,
}

/// Coordinates contact searches, UI commands and result delivery.
pub struct Contacts {
    bridge: Arc<dyn Bridge>,
    config: Config,
    state: Mutex<ServiceState>,
    metrics: DispatchMetrics,
}

impl Contacts {
    pub fn new(bridge: Arc<dyn Bridge>, config: Config) -> Self {
        let correlator = Correlator::new(config.correlation);
        Self {
            bridge,
            config,
            state: Mutex::new(ServiceState {
                in_progress: false,
                records: Vec::new(),
                correlator,
            }),
            metrics: DispatchMetrics::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    pub fn correlation(&self) -> CorrelationMode {
        self.state().correlator.mode()
    }

    pub fn is_in_progress(&self) -> bool {
        self.state().in_progress
    }

    pub fn records(&self) -> Vec<Contact> {
        self.state().records.clone()
    }

    /// Number of requests the native side has not answered yet.
    pub fn in_flight(&self) -> usize {
        self.state().correlator.in_flight()
    }

    /// Search the native store.
    ///
    /// `on_success` becomes the pending result handler. A non-empty
    /// `updated_since` is normalized to epoch milliseconds before sending.
    pub fn find(
        &self,
        fields: &[String],
        on_success: ResultHandler,
        on_failure: ErrorHandler,
        options: Option<ContactFindOptions>,
    ) -> RequestId {
        let options = options.map(|mut options| {
            normalize_updated_since(&mut options);
            options
        });
        let args = encode_args(&SearchArgs {
            fields,
            find_options: options.as_ref(),
        });
        self.issue(
            Command::Search,
            args,
            Route::Find,
            Some(on_success),
            Some(on_failure),
        )
    }

    /// Build a contact from a property bag without persisting it.
    ///
    /// Properties that are not contact fields are ignored.
    pub fn create(&self, properties: &Value) -> MarshalResult<Contact> {
        create_from_properties(properties)
    }

    /// Present the native contact-creation UI.
    pub fn new_contact_ui(&self, on_success: ResultHandler) -> RequestId {
        self.issue(
            Command::NewContact,
            Value::Null,
            Route::Direct,
            Some(on_success),
            None,
        )
    }

    /// Present the native contact picker.
    pub fn choose_contact(&self, on_success: ResultHandler, options: Option<Value>) -> RequestId {
        let args = encode_args(&ChooseArgs {
            options: options.as_ref(),
        });
        self.issue(
            Command::ChooseContact,
            args,
            Route::Direct,
            Some(on_success),
            None,
        )
    }

    /// Native entry point for search results.
    ///
    /// Decodes the batch and hands it to the pending result handler. An absent
    /// batch yields an empty list; a batch that fails to decode yields `None`.
    /// The oldest unanswered search is retired.
    pub fn find_callback(&self, raw: Option<&Value>) {
        let handler = self.take_pending(Route::Find);
        self.deliver_find(handler, raw);
    }

    /// Native entry point for single-contact results of `save` and `remove`.
    ///
    /// Decodes the contact and hands it to the pending result handler, or
    /// `None` when the payload is absent or undecodable. The oldest
    /// unanswered save or remove is retired.
    pub fn contact_callback(&self, raw: Option<&Value>) {
        let handler = self.take_pending(Route::Contact);
        self.deliver_contact(handler, raw);
    }

    /// Report the result of a request.
    ///
    /// Search results go through `find_callback` semantics, save and remove
    /// results through `contact_callback` semantics, and UI results to the
    /// handler given with the call.
    pub fn complete(&self, request_id: RequestId, raw: Option<&Value>) {
        let resolved = self.state().correlator.resolve_success(request_id);
        let Some(resolved) = resolved else {
            warn!(request_id, "Result for unknown or abandoned request dropped");
            self.metrics.track_unmatched_response();
            return;
        };

        debug!(request_id, command = %resolved.command, "Request completed");
        match resolved.route {
            Route::Find => self.deliver_find(resolved.handler, raw),
            Route::Contact => self.deliver_contact(resolved.handler, raw),
            Route::Direct => {
                let payload = raw.filter(|value| !value.is_null()).cloned();
                self.deliver(resolved.handler, ContactResult::Native(payload));
            }
        }
    }

    /// Report the failure of a request to the failure handler given with it.
    pub fn fail(&self, request_id: RequestId, error: ContactError) {
        let resolved = self.state().correlator.resolve_failure(request_id);
        match resolved {
            Some((command, Some(handler))) => {
                debug!(request_id, command = %command, code = %error.code, "Request failed");
                self.report_failure(&handler, error);
            }
            Some((command, None)) => {
                warn!(request_id, command = %command, code = %error.code, "Failure for request without failure handler");
            }
            None => {
                warn!(request_id, code = %error.code, "Failure for unknown or abandoned request dropped");
                self.metrics.track_unmatched_response();
            }
        }
    }

    /// Stop waiting for a request. A result arriving later is dropped.
    ///
    /// In single-slot mode `find_callback` and `contact_callback` still
    /// deliver to the pending handler; only `complete` and `fail` honor this.
    pub fn abandon(&self, request_id: RequestId) -> bool {
        self.state().correlator.abandon(request_id)
    }

    /// Register a request and hand it to the bridge.
    pub(crate) fn issue(
        &self,
        command: Command,
        args: Value,
        route: Route,
        on_success: Option<ResultHandler>,
        on_failure: Option<ErrorHandler>,
    ) -> RequestId {
        let request_id = self
            .state()
            .correlator
            .register(command, route, on_success, on_failure);

        let call = BridgeCall {
            request_id,
            command,
            action: command.qualified(&self.config.service_name),
            args,
        };
        self.metrics.track_request(&call.action);
        // No lock is held here: a synchronous bridge may answer inline.
        self.bridge.exec(call);
        request_id
    }

    /// Invoke a failure handler, containing any panic it raises.
    pub(crate) fn report_failure(&self, handler: &ErrorHandler, error: ContactError) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(error)));
        if let Err(payload) = &outcome {
            error!(panic = %panic_message(&**payload), "Error in user's error callback");
        }
        self.metrics.track_delivery(true, outcome.is_err());
    }

    fn take_pending(&self, route: Route) -> Option<ResultHandler> {
        let mut state = self.state();
        if let Some(request_id) = state.correlator.retire_oldest(route) {
            debug!(request_id, "Request answered without id");
        }
        state.correlator.pending()
    }

    fn deliver_find(&self, handler: Option<ResultHandler>, raw: Option<&Value>) {
        let contacts = match raw {
            None | Some(Value::Null) => Some(Vec::new()),
            Some(batch) => match decode_batch(batch, self.config.batch_policy) {
                Ok(contacts) => Some(contacts),
                Err(e) => {
                    warn!(error = %e, "Error parsing contacts");
                    self.metrics.track_malformed_payload();
                    None
                }
            },
        };
        self.deliver(handler, ContactResult::Contacts(contacts));
    }

    fn deliver_contact(&self, handler: Option<ResultHandler>, raw: Option<&Value>) {
        let contact = match raw {
            None | Some(Value::Null) => None,
            Some(value) => match decode_contact(value) {
                Ok(contact) => Some(contact),
                Err(e) => {
                    warn!(error = %e, "Error parsing contact");
                    self.metrics.track_malformed_payload();
                    None
                }
            },
        };
        self.deliver(handler, ContactResult::Contact(contact));
    }

    fn deliver(&self, handler: Option<ResultHandler>, result: ContactResult) {
        let Some(handler) = handler else {
            warn!("No result handler registered, result dropped");
            self.metrics.track_unmatched_response();
            return;
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(result)));
        if let Err(payload) = &outcome {
            error!(panic = %panic_message(&**payload), "Error in user's result callback");
        }
        self.metrics.track_delivery(false, outcome.is_err());
    }

    fn state(&self) -> MutexGuard<'_, ServiceState> {
        // Handlers never run under this lock, so a poisoned state is still consistent
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
