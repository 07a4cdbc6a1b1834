//! Contact model and its sub-records.
//!
//! Wire names are camelCase, matching what the native contacts store reads and
//! writes. Absent values travel as `null`.

use super::date_value::DateValue;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Scalar forms a native store may use for an identifier
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

/// Custom deserializer for ids sent either as strings or as numbers
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Signed(n) => n.to_string(),
        RawId::Unsigned(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    }))
}

/// Custom deserializer for boolean flags sent as booleans, numbers or text.
///
/// Text reads as `false` when empty, "false" or "0" and `true` otherwise.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Number(f64),
        Text(String),
    }

    Ok(Option::<RawFlag>::deserialize(deserializer)?.map(|raw| match raw {
        RawFlag::Bool(flag) => flag,
        RawFlag::Number(n) => n != 0.0 && !n.is_nan(),
        RawFlag::Text(text) => !matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "0"
        ),
    }))
}

/// Value of the `connected` field: a flag on some platforms, text on others.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Connected {
    Flag(bool),
    Text(String),
}

impl fmt::Display for Connected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{}", flag),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<bool> for Connected {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<&str> for Connected {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A contact held in the device contacts store.
///
/// A contact whose `id` is `None` has never been persisted. The native store
/// assigns an id when the contact is saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    /// Opaque identifier assigned by the native store. Numeric ids are read as text.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub name: Option<ContactName>,
    pub nickname: Option<String>,
    pub phone_numbers: Option<Vec<ContactField>>,
    pub emails: Option<Vec<ContactField>>,
    pub addresses: Option<Vec<ContactAddress>>,
    /// Instant messaging user ids
    pub ims: Option<Vec<ContactField>>,
    pub organizations: Option<Vec<ContactOrganization>>,
    /// When the contact was first created
    pub published: DateValue,
    /// When the contact was last updated
    pub updated: DateValue,
    pub birthday: DateValue,
    pub anniversary: DateValue,
    pub gender: Option<String>,
    /// User notes about the contact
    pub note: Option<String>,
    pub preferred_username: Option<String>,
    pub photos: Option<Vec<ContactField>>,
    pub tags: Option<Vec<ContactField>>,
    pub relationships: Option<Vec<ContactField>>,
    /// Web sites
    pub urls: Option<Vec<ContactField>>,
    /// Online accounts
    pub accounts: Option<Vec<ContactAccount>>,
    /// UTC time zone offset
    pub utc_offset: Option<String>,
    pub connected: Option<Connected>,
}

/// Structured name of a contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactName {
    pub formatted: Option<String>,
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub middle_name: Option<String>,
    pub honorific_prefix: Option<String>,
    pub honorific_suffix: Option<String>,
}

/// Generic typed value: a phone number, email, IM handle, photo, tag, relationship or url.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ContactField {
    /// Kind of value, e.g. "home", "work", "mobile"
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub value: Option<String>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub primary: Option<bool>,
    /// Identifier of this entry inside its persisted parent
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
}

/// Postal address of a contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactAddress {
    pub formatted: Option<String>,
    pub street_address: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
}

/// Organization a contact belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactOrganization {
    pub name: Option<String>,
    pub department: Option<String>,
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
}

/// Online account of a contact. Accounts carry no identifier of their own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ContactAccount {
    pub domain: Option<String>,
    pub username: Option<String>,
    pub userid: Option<String>,
}

impl Contact {
    /// Wire names of every contact field, in declaration order.
    ///
    /// `create` copies a property only when its name appears here.
    pub const FIELD_NAMES: [&'static str; 23] = [
        "id",
        "displayName",
        "name",
        "nickname",
        "phoneNumbers",
        "emails",
        "addresses",
        "ims",
        "organizations",
        "published",
        "updated",
        "birthday",
        "anniversary",
        "gender",
        "note",
        "preferredUsername",
        "photos",
        "tags",
        "relationships",
        "urls",
        "accounts",
        "utcOffset",
        "connected",
    ];

    /// Create an empty, unsaved contact.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is one of the contact's wire field names.
    pub fn is_known_field(name: &str) -> bool {
        Self::FIELD_NAMES.contains(&name)
    }

    /// Whether the native store has assigned this contact an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Deep copy of this contact that the native store will treat as new.
    ///
    /// The top-level id and the ids of phone numbers, emails, addresses, ims,
    /// organizations, tags, relationships and urls are cleared. Photos and
    /// accounts are left as they are.
    pub fn clone_as_new(&self) -> Self {
        let mut cloned = self.clone();
        cloned.id = None;

        for list in [
            &mut cloned.phone_numbers,
            &mut cloned.emails,
            &mut cloned.ims,
            &mut cloned.tags,
            &mut cloned.relationships,
            &mut cloned.urls,
        ] {
            if let Some(fields) = list {
                fields.iter_mut().for_each(|field| field.id = None);
            }
        }
        if let Some(addresses) = &mut cloned.addresses {
            addresses.iter_mut().for_each(|address| address.id = None);
        }
        if let Some(organizations) = &mut cloned.organizations {
            organizations.iter_mut().for_each(|org| org.id = None);
        }

        cloned
    }
}

impl ContactField {
    /// Create a field with a type and value.
    pub fn new(field_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_type: Some(field_type.into()),
            value: Some(value.into()),
            primary: None,
            id: None,
        }
    }

    /// Same field, carrying the given id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
