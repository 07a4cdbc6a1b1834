//! Application service layer.
//!
//! The `Contacts` collection service, the per-contact operations built on it,
//! and the bookkeeping that matches native results to waiting handlers.

mod contact_ops;
mod contacts;
mod correlation;
pub mod handlers;

pub use contacts::Contacts;
pub use handlers::{on_error, on_result, ContactResult, ErrorHandler, ResultHandler};
