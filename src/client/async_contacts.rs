//! Future-based contacts API.
//!
//! Each request gets its own handler pair, so results can never reach the
//! wrong caller. The callbacks resolve a oneshot channel that the returned
//! future awaits.

use crate::bridge::{Bridge, RequestId};
use crate::config::{Config, CorrelationMode};
use crate::error::{ContactError, ContactErrorCode};
use crate::models::{Contact, ContactFindOptions};
use crate::observability::Timer;
use crate::services::{Contacts, ContactResult, ErrorHandler, ResultHandler};
use futures::channel::oneshot;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

type Outcome = Result<ContactResult, ContactError>;

/// Contacts API where every call returns a future of its own result.
///
/// Wraps a `Contacts` service running in per-request correlation mode. The
/// native side still answers through `contacts().complete(..)` and
/// `contacts().fail(..)`.
#[derive(Clone)]
pub struct AsyncContacts {
    contacts: Arc<Contacts>,
    timeout: Option<Duration>,
}

impl AsyncContacts {
    /// Build the service. The configured correlation mode is overridden with
    /// per-request correlation.
    pub fn new(bridge: Arc<dyn Bridge>, config: Config) -> Self {
        let timeout = (config.request_timeout > 0)
            .then(|| Duration::from_secs(config.request_timeout));
        let config = config.with_correlation(CorrelationMode::PerRequest);
        Self {
            contacts: Arc::new(Contacts::new(bridge, config)),
            timeout,
        }
    }

    /// Override the request timeout. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The underlying service, for delivering native results.
    pub fn contacts(&self) -> &Arc<Contacts> {
        &self.contacts
    }

    /// Search the native store.
    pub async fn find(
        &self,
        fields: &[String],
        options: Option<ContactFindOptions>,
    ) -> Result<Vec<Contact>, ContactError> {
        let (on_success, on_failure, rx) = completion();
        let request_id = self.contacts.find(fields, on_success, on_failure, options);

        match self.wait(request_id, "find", rx).await? {
            ContactResult::Contacts(Some(contacts)) => Ok(contacts),
            other => Err(unexpected(request_id, other)),
        }
    }

    /// Persist a contact and return the stored version with its id.
    pub async fn save(&self, contact: &Contact) -> Result<Contact, ContactError> {
        let (on_success, on_failure, rx) = completion();
        let request_id = contact.save(&self.contacts, on_success, on_failure);

        match self.wait(request_id, "save", rx).await? {
            ContactResult::Contact(Some(saved)) => Ok(saved),
            other => Err(unexpected(request_id, other)),
        }
    }

    /// Remove a contact. Fails with `NOT_FOUND` if it was never saved.
    pub async fn remove(&self, contact: &Contact) -> Result<(), ContactError> {
        let (on_success, on_failure, rx) = completion();
        let request_id = contact.remove(&self.contacts, on_success, on_failure);

        self.wait(request_id, "remove", rx).await.map(|_| ())
    }

    async fn wait(
        &self,
        request_id: RequestId,
        operation: &str,
        rx: oneshot::Receiver<Outcome>,
    ) -> Outcome {
        let timer = Timer::new(operation);
        let _pending = PendingRequest {
            contacts: &self.contacts,
            request_id,
        };

        let received = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(received) => received,
                Err(_) => {
                    warn!(request_id, operation, "Request timed out");
                    timer.finish_with_status(false);
                    return Err(ContactError::timeout());
                }
            },
            None => rx.await,
        };

        // A dropped sender means the request was abandoned without an answer
        let outcome =
            received.unwrap_or_else(|_| Err(ContactError::new(ContactErrorCode::Unknown)));
        timer.finish_with_status(outcome.is_ok());
        outcome
    }
}

/// Abandons its request when dropped, so a timed-out or cancelled future
/// leaves nothing in flight. Abandoning an answered request is a no-op.
struct PendingRequest<'a> {
    contacts: &'a Contacts,
    request_id: RequestId,
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if self.contacts.abandon(self.request_id) {
            debug!(request_id = self.request_id, "Unanswered request abandoned");
        }
    }
}

/// A handler pair that resolves a single oneshot channel, first answer wins.
fn completion() -> (ResultHandler, ErrorHandler, oneshot::Receiver<Outcome>) {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));

    let success_tx = tx.clone();
    let on_success: ResultHandler = Arc::new(move |result| send(&success_tx, Ok(result)));
    let on_failure: ErrorHandler = Arc::new(move |error| send(&tx, Err(error)));

    (on_success, on_failure, rx)
}

fn send(tx: &Mutex<Option<oneshot::Sender<Outcome>>>, outcome: Outcome) {
    let sender = tx.lock().ok().and_then(|mut slot| slot.take());
    if let Some(sender) = sender {
        // Receiver gone means the caller stopped waiting
        let _ = sender.send(outcome);
    }
}

fn unexpected(request_id: RequestId, result: ContactResult) -> ContactError {
    warn!(request_id, result = ?result, "Native result could not be decoded");
    ContactError::new(ContactErrorCode::Unknown)
}
