//! Contact lifecycle tests against a mock native store.
//!
//! These tests drive the callback-level API end to end: requests go out through
//! a queue bridge, the mock store answers them, and results come back through
//! the registered handlers.

mod mocks;

use chrono::{TimeZone, Utc};
use device_contacts::{
    on_error, Config, Contact, ContactError, ContactErrorCode, ContactField, ContactFindOptions,
    ContactResult, Contacts, DateValue, QueueBridge,
};
use mocks::{recording_handler, MockNativeStore};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn setup() -> (Arc<QueueBridge>, Contacts, MockNativeStore) {
    let bridge = Arc::new(QueueBridge::new());
    let contacts = Contacts::new(bridge.clone(), Config::default());
    (bridge, contacts, MockNativeStore::new())
}

fn error_sink() -> (Arc<Mutex<Vec<ContactError>>>, device_contacts::ErrorHandler) {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    (errors, on_error(move |e| sink.lock().unwrap().push(e)))
}

fn sample_contact(display_name: &str) -> Contact {
    Contact {
        display_name: Some(display_name.to_string()),
        emails: Some(vec![ContactField::new("work", "someone@example.com")]),
        birthday: DateValue::Date(Utc.with_ymd_and_hms(1990, 2, 1, 0, 0, 0).unwrap()),
        ..Default::default()
    }
}

#[test]
fn test_save_assigns_id_and_restores_dates() {
    let (bridge, contacts, store) = setup();
    let (seen, handler) = recording_handler();
    let (errors, on_failure) = error_sink();
    let contact = sample_contact("Jane Appleseed");

    contact.save(&contacts, handler, on_failure);
    store.pump(&bridge, &contacts);

    let seen = seen.lock().unwrap();
    let saved = seen[0].clone().into_contact().expect("saved contact");
    assert_eq!(saved.id.as_deref(), Some("1"));
    assert_eq!(saved.display_name.as_deref(), Some("Jane Appleseed"));
    assert_eq!(saved.birthday, contact.birthday);
    assert!(errors.lock().unwrap().is_empty());

    // The store received epoch milliseconds
    let stored = store.record("1").unwrap();
    assert_eq!(
        stored["birthday"],
        json!(Utc.with_ymd_and_hms(1990, 2, 1, 0, 0, 0).unwrap().timestamp_millis())
    );
}

#[test]
fn test_save_never_mutates_original() {
    let (bridge, contacts, store) = setup();
    let (_seen, handler) = recording_handler();
    let (_errors, on_failure) = error_sink();
    let published = Utc.with_ymd_and_hms(2009, 1, 1, 8, 0, 0).unwrap();
    let contact = Contact {
        published: DateValue::Date(published),
        updated: DateValue::from("2010-05-05"),
        anniversary: DateValue::Date(published),
        ..sample_contact("Jane")
    };
    let before = contact.clone();

    contact.save(&contacts, handler, on_failure);
    store.pump(&bridge, &contacts);

    assert_eq!(contact, before);
    assert_eq!(contact.published, DateValue::Date(published));
    assert_eq!(contact.updated, DateValue::from("2010-05-05"));
}

#[test]
fn test_find_returns_matching_contacts() {
    let (bridge, contacts, store) = setup();
    for name in ["Jane Appleseed", "John Appleseed", "Maria Garcia"] {
        let (_seen, handler) = recording_handler();
        let (_errors, on_failure) = error_sink();
        sample_contact(name).save(&contacts, handler, on_failure);
    }
    store.pump(&bridge, &contacts);

    let (seen, handler) = recording_handler();
    let (_errors, on_failure) = error_sink();
    let fields = vec!["displayName".to_string()];
    contacts.find(
        &fields,
        handler,
        on_failure,
        Some(ContactFindOptions::new("appleseed")),
    );
    store.pump(&bridge, &contacts);

    let seen = seen.lock().unwrap();
    let found = seen[0].clone().into_contacts().unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|c| c.display_name.clone().unwrap())
        .collect();
    assert_eq!(names, vec!["Jane Appleseed", "John Appleseed"]);
    assert!(found.iter().all(|c| c.birthday.as_date().is_some()));
    assert_eq!(store.get_call_count("search"), 1);
}

#[test]
fn test_find_with_updated_since_sends_epoch() {
    let (bridge, contacts, store) = setup();
    let cutoff = Utc.with_ymd_and_hms(2011, 1, 1, 0, 0, 0).unwrap();

    for (name, updated) in [("Old", "2010-06-01"), ("New", "2011-06-01")] {
        let (_seen, handler) = recording_handler();
        let (_errors, on_failure) = error_sink();
        let contact = Contact {
            updated: DateValue::from(updated),
            ..sample_contact(name)
        };
        contact.save(&contacts, handler, on_failure);
    }
    store.pump(&bridge, &contacts);

    let (seen, handler) = recording_handler();
    let (_errors, on_failure) = error_sink();
    contacts.find(
        &[],
        handler,
        on_failure,
        Some(ContactFindOptions::default().with_updated_since(cutoff)),
    );

    let call = bridge.pop().unwrap();
    assert_eq!(
        call.args["findOptions"]["updatedSince"],
        json!(cutoff.timestamp_millis())
    );
    store.answer(&call, &contacts);

    let seen = seen.lock().unwrap();
    let found = seen[0].clone().into_contacts().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].display_name.as_deref(), Some("New"));
}

#[test]
fn test_remove_persisted_contact() {
    let (bridge, contacts, store) = setup();
    let (seen, handler) = recording_handler();
    let (_errors, on_failure) = error_sink();
    sample_contact("Jane").save(&contacts, handler, on_failure);
    store.pump(&bridge, &contacts);
    let saved = seen.lock().unwrap()[0].clone().into_contact().unwrap();

    let (removed_seen, handler) = recording_handler();
    let (errors, on_failure) = error_sink();
    saved.remove(&contacts, handler, on_failure);
    store.pump(&bridge, &contacts);

    assert_eq!(store.len(), 0);
    assert!(errors.lock().unwrap().is_empty());
    let removed = removed_seen.lock().unwrap()[0].clone().into_contact().unwrap();
    assert_eq!(removed.id, saved.id);
}

#[test]
fn test_remove_unknown_id_reports_native_error() {
    let (bridge, contacts, store) = setup();
    let (seen, handler) = recording_handler();
    let (errors, on_failure) = error_sink();
    let contact = Contact {
        id: Some("404".to_string()),
        ..Default::default()
    };

    contact.remove(&contacts, handler, on_failure);
    store.pump(&bridge, &contacts);

    assert_eq!(
        *errors.lock().unwrap(),
        vec![ContactError::new(ContactErrorCode::NotFound)]
    );
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_create_ignores_unknown_properties() {
    let (_bridge, contacts, _store) = setup();

    let contact = contacts
        .create(&json!({"displayName": "Jane", "bogusField": "x"}))
        .unwrap();

    assert_eq!(contact.display_name.as_deref(), Some("Jane"));
    assert!(contact.id.is_none());
    let wire = serde_json::to_value(&contact).unwrap();
    assert!(wire.get("bogusField").is_none());
}

#[test]
fn test_create_then_save_round_trip() {
    let (bridge, contacts, store) = setup();
    let contact = contacts
        .create(&json!({
            "displayName": "Sam",
            "phoneNumbers": [{"type": "mobile", "value": "555-0199", "primary": true}],
            "nickname": "S"
        }))
        .unwrap();
    let (seen, handler) = recording_handler();
    let (_errors, on_failure) = error_sink();

    contact.save(&contacts, handler, on_failure);
    store.pump(&bridge, &contacts);

    let saved = seen.lock().unwrap()[0].clone().into_contact().unwrap();
    let phones = saved.phone_numbers.unwrap();
    assert_eq!(phones[0].value.as_deref(), Some("555-0199"));
    assert_eq!(phones[0].primary, Some(true));
    assert_eq!(saved.nickname.as_deref(), Some("S"));
}

#[test]
fn test_choose_contact_returns_native_payload() {
    let (bridge, contacts, store) = setup();
    let (_seen, handler) = recording_handler();
    let (_errors, on_failure) = error_sink();
    sample_contact("Jane").save(&contacts, handler, on_failure);
    store.pump(&bridge, &contacts);

    let (seen, handler) = recording_handler();
    contacts.choose_contact(handler, None);
    store.pump(&bridge, &contacts);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![ContactResult::Native(Some(json!("1")))]
    );
}
