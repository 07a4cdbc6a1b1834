//! Device Contacts - contact data model and marshaling layer for a native contacts bridge.
//!
//! Application code queries, creates, mutates and persists contacts without knowing
//! how the native store represents them. Requests go out over an asynchronous
//! command channel (the bridge); answers come back as JSON payloads that are decoded
//! into typed contacts and handed to the caller's handlers.
//!
//! # Architecture
//!
//! - **models**: Contact records, sub-records, temporal values and search options
//! - **marshal**: Date normalization and payload codecs for the wire format
//! - **bridge**: The command channel seam and an in-process queue implementation
//! - **services**: The `Contacts` collection service, contact operations and result correlation
//! - **client**: Future-based API with per-request correlation
//! - **repositories**: Async repository trait over the future-based API
//! - **observability**: Logging setup and dispatch counters
//! - **config**: Configuration management from environment variables
//! - **error**: Error codes and error types

pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod marshal;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;

pub use bridge::{Bridge, BridgeCall, Command, QueueBridge, RequestId};
pub use client::AsyncContacts;
pub use config::{BatchPolicy, Config, CorrelationMode};
pub use error::{ConfigError, ContactError, ContactErrorCode, MarshalError};
pub use models::{
    Connected, Contact, ContactAccount, ContactAddress, ContactField, ContactFindOptions,
    ContactName, ContactOrganization, DateValue,
};
pub use observability::{init_logging, DispatchMetrics};
pub use repositories::{BridgeContactRepository, ContactRepository};
pub use services::{on_error, on_result, ContactResult, Contacts, ErrorHandler, ResultHandler};
