use device_contacts::{
    Bridge, BridgeCall, Command, ContactError, Contacts, QueueBridge,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Mock native contacts store for testing.
///
/// Answers bridge calls the way the device store would: `save` assigns ids,
/// `search` matches on display name, `remove` fails with NOT_FOUND for unknown
/// ids. Records are kept in wire form and tracks method calls for verification.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockNativeStore {
    records: Arc<Mutex<BTreeMap<String, Value>>>,
    next_id: Arc<AtomicU64>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockNativeStore {
    /// Create a new empty MockNativeStore.
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get the number of times a command was received.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Stored wire record for an id.
    pub fn record(&self, id: &str) -> Option<Value> {
        self.records.lock().unwrap().get(id).cloned()
    }

    /// Answer every queued call and report the outcomes to `contacts`.
    pub fn pump(&self, bridge: &QueueBridge, contacts: &Contacts) -> usize {
        let calls = bridge.drain();
        let answered = calls.len();
        for call in calls {
            self.answer(&call, contacts);
        }
        answered
    }

    /// Answer one call and report the outcome to `contacts`.
    pub fn answer(&self, call: &BridgeCall, contacts: &Contacts) {
        match self.handle(call) {
            Ok(payload) => contacts.complete(call.request_id, payload.as_ref()),
            Err(error) => contacts.fail(call.request_id, error),
        }
    }

    /// Execute a call against the store.
    pub fn handle(&self, call: &BridgeCall) -> Result<Option<Value>, ContactError> {
        self.track_call(call.command.method());

        match call.command {
            Command::Save => {
                let mut contact = call.args["contact"].clone();
                if contact["id"].is_null() {
                    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                    contact["id"] = Value::String(id.to_string());
                }
                let id = contact["id"].as_str().unwrap_or_default().to_string();
                self.records.lock().unwrap().insert(id, contact.clone());
                Ok(Some(Value::String(contact.to_string())))
            }
            Command::Remove => {
                let id = call.args["contact"]["id"].as_str();
                let removed = id.and_then(|id| self.records.lock().unwrap().remove(id));
                match removed {
                    Some(contact) => Ok(Some(Value::String(contact.to_string()))),
                    None => Err(ContactError::not_found()),
                }
            }
            Command::Search => {
                let options = &call.args["findOptions"];
                let filter = options["filter"].as_str().unwrap_or("").to_lowercase();
                let since = options["updatedSince"].as_f64();
                let limit = options["limit"].as_u64().map(|l| l as usize);

                let records = self.records.lock().unwrap();
                let matches: Vec<Value> = records
                    .values()
                    .filter(|record| {
                        record["displayName"]
                            .as_str()
                            .map(|name| name.to_lowercase().contains(&filter))
                            .unwrap_or(filter.is_empty())
                    })
                    .filter(|record| match since {
                        Some(since) => record["updated"].as_f64().map(|u| u >= since).unwrap_or(false),
                        None => true,
                    })
                    .take(limit.unwrap_or(usize::MAX))
                    .map(|record| Value::String(record.to_string()))
                    .collect();
                Ok(Some(Value::Array(matches)))
            }
            Command::ChooseContact => {
                let records = self.records.lock().unwrap();
                Ok(records.keys().next().map(|id| Value::String(id.clone())))
            }
            Command::DisplayContact | Command::NewContact => Ok(None),
        }
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }
}

impl Default for MockNativeStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridge that lets a `MockNativeStore` answer every call as soon as it is issued.
#[allow(dead_code)]
pub struct AutoRespondingBridge {
    store: MockNativeStore,
    contacts: Mutex<Weak<Contacts>>,
}

#[allow(dead_code)]
impl AutoRespondingBridge {
    pub fn new(store: MockNativeStore) -> Self {
        Self {
            store,
            contacts: Mutex::new(Weak::new()),
        }
    }

    /// Connect the service that receives the answers.
    pub fn attach(&self, contacts: &Arc<Contacts>) {
        *self.contacts.lock().unwrap() = Arc::downgrade(contacts);
    }
}

impl Bridge for AutoRespondingBridge {
    fn exec(&self, call: BridgeCall) {
        let contacts = self.contacts.lock().unwrap().upgrade();
        if let Some(contacts) = contacts {
            self.store.answer(&call, &contacts);
        }
    }
}
