//! Completion handler types.

use crate::error::ContactError;
use crate::models::Contact;
use serde_json::Value;
use std::sync::Arc;

/// What a success handler receives.
///
/// Which variant arrives depends on the callback that answered, not on the
/// request that registered the handler: in single-slot mode a `find` handler
/// may be handed the contact of a `save` issued before it.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactResult {
    /// Search results. `None` when the native batch could not be decoded.
    Contacts(Option<Vec<Contact>>),

    /// A saved or removed contact. `None` when absent or undecodable.
    Contact(Option<Contact>),

    /// Raw payload of a UI command.
    Native(Option<Value>),
}

impl ContactResult {
    pub fn into_contacts(self) -> Option<Vec<Contact>> {
        match self {
            Self::Contacts(contacts) => contacts,
            _ => None,
        }
    }

    pub fn into_contact(self) -> Option<Contact> {
        match self {
            Self::Contact(contact) => contact,
            _ => None,
        }
    }

    pub fn into_native(self) -> Option<Value> {
        match self {
            Self::Native(value) => value,
            _ => None,
        }
    }
}

/// Success handler. Shared because the single result slot may hand it
/// several results.
pub type ResultHandler = Arc<dyn Fn(ContactResult) + Send + Sync>;

/// Failure handler, tied to the request it was given with.
pub type ErrorHandler = Arc<dyn Fn(ContactError) + Send + Sync>;

/// Wrap a closure as a `ResultHandler`.
pub fn on_result<F>(f: F) -> ResultHandler
where
    F: Fn(ContactResult) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an `ErrorHandler`.
pub fn on_error<F>(f: F) -> ErrorHandler
where
    F: Fn(ContactError) + Send + Sync + 'static,
{
    Arc::new(f)
}
