//! Client-facing APIs layered on the contacts service.

pub mod async_contacts;

pub use async_contacts::AsyncContacts;
