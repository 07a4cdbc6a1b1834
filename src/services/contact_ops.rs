//! Operations on a single contact record.

use super::contacts::Contacts;
use super::correlation::Route;
use super::handlers::{ErrorHandler, ResultHandler};
use crate::bridge::{Command, RequestId};
use crate::error::ContactError;
use crate::marshal::dates::convert_dates_out;
use crate::marshal::payload::{encode_args, ContactArgs, DisplayArgs};
use crate::models::Contact;
use serde_json::Value;

impl Contact {
    /// Remove this contact from the native store.
    ///
    /// An unsaved contact (no id) reports `NOT_FOUND` to `on_failure` right
    /// away, and the remove command is still sent.
    pub fn remove(
        &self,
        contacts: &Contacts,
        on_success: ResultHandler,
        on_failure: ErrorHandler,
    ) -> RequestId {
        if self.id.is_none() {
            contacts.report_failure(&on_failure, ContactError::not_found());
        }
        let args = encode_args(&ContactArgs { contact: self });
        contacts.issue(
            Command::Remove,
            args,
            Route::Contact,
            Some(on_success),
            Some(on_failure),
        )
    }

    /// Persist this contact in the native store.
    ///
    /// The contact itself is not modified: a deep copy with dates in wire
    /// form is sent. The saved contact, with its assigned id, comes back
    /// through the result handler.
    pub fn save(
        &self,
        contacts: &Contacts,
        on_success: ResultHandler,
        on_failure: ErrorHandler,
    ) -> RequestId {
        let mut outbound = self.clone();
        convert_dates_out(&mut outbound);

        let args = encode_args(&ContactArgs {
            contact: &outbound,
        });
        contacts.issue(
            Command::Save,
            args,
            Route::Contact,
            Some(on_success),
            Some(on_failure),
        )
    }

    /// Show this contact in the native contact UI.
    ///
    /// Same id precondition as `remove`: an unsaved contact reports
    /// `NOT_FOUND` and the command is still sent.
    pub fn display(
        &self,
        contacts: &Contacts,
        on_success: ResultHandler,
        on_failure: ErrorHandler,
        options: Option<Value>,
    ) -> RequestId {
        if self.id.is_none() {
            contacts.report_failure(&on_failure, ContactError::not_found());
        }
        let args = encode_args(&DisplayArgs {
            id: self.id.as_deref(),
            options: options.as_ref(),
        });
        contacts.issue(
            Command::DisplayContact,
            args,
            Route::Direct,
            Some(on_success),
            Some(on_failure),
        )
    }
}
