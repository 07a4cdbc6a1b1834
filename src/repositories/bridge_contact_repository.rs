use crate::client::AsyncContacts;
use crate::error::ContactError;
use crate::models::{Contact, ContactFindOptions};
use crate::repositories::traits::ContactRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Fields requested by `search_by_name`.
const NAME_FIELDS: [&str; 3] = ["displayName", "name", "nickname"];

/// Contact repository backed by the native contacts bridge.
///
/// This repository delegates all operations to `AsyncContacts`,
/// keeping callers independent of the callback-level service.
pub struct BridgeContactRepository {
    client: Arc<AsyncContacts>,
}

impl BridgeContactRepository {
    /// Create a new BridgeContactRepository with the given client.
    pub fn new(client: Arc<AsyncContacts>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContactRepository for BridgeContactRepository {
    async fn search(
        &self,
        fields: &[String],
        options: Option<ContactFindOptions>,
    ) -> Result<Vec<Contact>, ContactError> {
        self.client.find(fields, options).await
    }

    async fn search_by_name(&self, query: &str, limit: u32) -> Result<Vec<Contact>, ContactError> {
        let fields: Vec<String> = NAME_FIELDS.iter().map(|f| f.to_string()).collect();
        let options = ContactFindOptions::new(query)
            .with_limit(limit)
            .with_multiple(limit != 1);

        let mut results = self.client.find(&fields, Some(options)).await?;
        // The native store may ignore the limit
        results.truncate(limit as usize);
        Ok(results)
    }

    async fn save(&self, contact: &Contact) -> Result<Contact, ContactError> {
        self.client.save(contact).await
    }

    async fn remove(&self, contact: &Contact) -> Result<(), ContactError> {
        self.client.remove(contact).await
    }
}
