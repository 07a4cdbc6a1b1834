use crate::error::ContactError;
use crate::models::{Contact, ContactFindOptions};
use async_trait::async_trait;

/// Repository for managing device contacts.
///
/// Provides abstraction over contact storage and retrieval,
/// enabling different implementations (native bridge, mock, cached).
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Search contacts, returning the requested fields.
    async fn search(
        &self,
        fields: &[String],
        options: Option<ContactFindOptions>,
    ) -> Result<Vec<Contact>, ContactError>;

    /// Search contacts whose name matches `query`.
    async fn search_by_name(&self, query: &str, limit: u32) -> Result<Vec<Contact>, ContactError>;

    /// Create or update a contact, returning the stored version.
    async fn save(&self, contact: &Contact) -> Result<Contact, ContactError>;

    /// Delete a contact.
    async fn remove(&self, contact: &Contact) -> Result<(), ContactError>;
}
