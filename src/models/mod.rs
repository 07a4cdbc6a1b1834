//! Data models for the device contacts store.
//!
//! This module contains the plain records exchanged with the native side:
//! contacts, their sub-records, temporal values and search options.

pub mod contact;
pub mod date_value;
pub mod find_options;

pub use contact::{
    Connected, Contact, ContactAccount, ContactAddress, ContactField, ContactName,
    ContactOrganization,
};
pub use date_value::DateValue;
pub use find_options::ContactFindOptions;
