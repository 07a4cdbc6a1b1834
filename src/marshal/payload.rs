//! Payload codecs between contacts and the bridge.
//!
//! Inbound, the native store answers with JSON-encoded contact strings (or
//! plain objects). Outbound, each command carries a small argument envelope.

use super::dates::convert_dates_in;
use crate::config::BatchPolicy;
use crate::error::{MarshalError, MarshalResult};
use crate::models::{Contact, ContactFindOptions};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, warn};

/// Build a contact from a bag of properties without persisting it.
///
/// Only properties whose name is a contact field are copied; unknown
/// properties are ignored. A `null` bag yields an empty contact.
pub fn create_from_properties(properties: &Value) -> MarshalResult<Contact> {
    let object = match properties {
        Value::Null => return Ok(Contact::new()),
        Value::Object(object) => object,
        other => {
            return Err(MarshalError::UnexpectedShape {
                expected: "object",
                actual: value_kind(other),
            })
        }
    };

    let known: Map<String, Value> = object
        .iter()
        .filter(|(key, _)| Contact::is_known_field(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(serde_json::from_value(Value::Object(known))?)
}

/// Turn one native contact representation into a contact.
///
/// The native side sends either a JSON-encoded string or an object. Epoch
/// fields are converted to structured dates.
pub fn decode_contact(raw: &Value) -> MarshalResult<Contact> {
    let mut contact = match raw {
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(text)?;
            create_from_properties(&parsed)?
        }
        Value::Object(_) => create_from_properties(raw)?,
        other => {
            return Err(MarshalError::UnexpectedShape {
                expected: "JSON string or object",
                actual: value_kind(other),
            })
        }
    };
    convert_dates_in(&mut contact);
    Ok(contact)
}

/// Turn a native result batch into contacts.
///
/// With `BatchPolicy::FailFast` the first malformed entry fails the whole
/// batch. With `BatchPolicy::SkipInvalid` malformed entries are logged and
/// dropped.
pub fn decode_batch(raw: &Value, policy: BatchPolicy) -> MarshalResult<Vec<Contact>> {
    let entries = match raw {
        Value::Array(entries) => entries,
        other => {
            return Err(MarshalError::UnexpectedShape {
                expected: "array",
                actual: value_kind(other),
            })
        }
    };

    match policy {
        BatchPolicy::FailFast => entries.iter().map(decode_contact).collect(),
        BatchPolicy::SkipInvalid => Ok(entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match decode_contact(entry) {
                Ok(contact) => Some(contact),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed contact in result batch");
                    None
                }
            })
            .collect()),
    }
}

/// Arguments of `save` and `remove`.
#[derive(Debug, Serialize)]
pub struct ContactArgs<'a> {
    pub contact: &'a Contact,
}

/// Arguments of `search`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArgs<'a> {
    pub fields: &'a [String],
    pub find_options: Option<&'a ContactFindOptions>,
}

/// Arguments of `displayContact`.
#[derive(Debug, Serialize)]
pub struct DisplayArgs<'a> {
    pub id: Option<&'a str>,
    pub options: Option<&'a Value>,
}

/// Arguments of `chooseContact`.
#[derive(Debug, Serialize)]
pub struct ChooseArgs<'a> {
    pub options: Option<&'a Value>,
}

/// Encode an argument envelope for the bridge.
///
/// Envelopes only hold string-keyed data, so encoding does not fail in
/// practice; if it ever does the failure is logged and `null` is sent.
pub fn encode_args<T: Serialize>(args: &T) -> Value {
    serde_json::to_value(args).unwrap_or_else(|e| {
        error!(error = %e, "Failed to encode bridge arguments");
        Value::Null
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
