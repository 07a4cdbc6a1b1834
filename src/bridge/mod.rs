//! Command channel to the native contacts store.
//!
//! The bridge is fire-and-forget: `exec` hands a call over and returns nothing.
//! The native side answers later through `Contacts::complete` or
//! `Contacts::fail`, quoting the call's request id.

pub mod queue;

pub use queue::QueueBridge;

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Identifier attached to every bridge call.
pub type RequestId = u64;

/// Commands understood by the native contacts service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Remove,
    Save,
    DisplayContact,
    Search,
    NewContact,
    ChooseContact,
}

impl Command {
    /// Method name on the native service.
    pub fn method(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::Save => "save",
            Self::DisplayContact => "displayContact",
            Self::Search => "search",
            Self::NewContact => "newContact",
            Self::ChooseContact => "chooseContact",
        }
    }

    /// Full command identifier, e.g. `Contacts.search`.
    pub fn qualified(self, service: &str) -> String {
        format!("{}.{}", service, self.method())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// One request handed to the bridge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeCall {
    pub request_id: RequestId,

    #[serde(skip)]
    pub command: Command,

    /// Qualified command identifier, e.g. `Contacts.save`
    pub action: String,

    /// Command arguments
    pub args: Value,
}

/// Asynchronous command-execution channel to the native store.
///
/// Implementations must eventually answer each call at most once, either with
/// a result or with an error.
pub trait Bridge: Send + Sync {
    fn exec(&self, call: BridgeCall);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_identifiers() {
        let ids: Vec<String> = [
            Command::Remove,
            Command::Save,
            Command::DisplayContact,
            Command::Search,
            Command::NewContact,
            Command::ChooseContact,
        ]
        .iter()
        .map(|c| c.qualified("Contacts"))
        .collect();

        assert_eq!(
            ids,
            vec![
                "Contacts.remove",
                "Contacts.save",
                "Contacts.displayContact",
                "Contacts.search",
                "Contacts.newContact",
                "Contacts.chooseContact",
            ]
        );
    }

    #[test]
    fn test_call_envelope() {
        let call = BridgeCall {
            request_id: 4,
            command: Command::Search,
            action: "Contacts.search".to_string(),
            args: json!({"fields": [], "findOptions": null}),
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(
            json,
            json!({
                "requestId": 4,
                "action": "Contacts.search",
                "args": {"fields": [], "findOptions": null}
            })
        );
    }
}
