//! Search descriptor for `Contacts::find`.

use super::date_value::DateValue;
use serde::{Deserialize, Serialize};

/// Options applied to a contact search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactFindOptions {
    /// Text used to match contacts (default: empty)
    pub filter: String,

    /// Whether more than one contact may be returned (default: true)
    pub multiple: bool,

    /// Maximum number of results, unbounded when `None`
    pub limit: Option<u32>,

    /// Only return contacts updated on or after this time.
    ///
    /// Accepts any date-like value; it is normalized to epoch milliseconds
    /// before the search is sent. The default is the empty string.
    pub updated_since: DateValue,
}

impl ContactFindOptions {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn with_updated_since(mut self, updated_since: impl Into<DateValue>) -> Self {
        self.updated_since = updated_since.into();
        self
    }
}

impl Default for ContactFindOptions {
    fn default() -> Self {
        Self {
            filter: String::new(),
            multiple: true,
            limit: None,
            updated_since: DateValue::Text(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ContactFindOptions::default();
        assert_eq!(options.filter, "");
        assert!(options.multiple);
        assert!(options.limit.is_none());
        assert_eq!(options.updated_since, DateValue::Text(String::new()));
    }

    #[test]
    fn test_wire_shape() {
        let options = ContactFindOptions::new("Jane").with_limit(10);
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["filter"], "Jane");
        assert_eq!(json["multiple"], true);
        assert_eq!(json["limit"], 10);
        assert_eq!(json["updatedSince"], "");
    }
}
