use async_trait::async_trait;

use crate::core::{
    errors::ItemListResult,
    models::{AccountRecord, Document, Fields},
};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn init(&self) -> ItemListResult<()>;
    async fn list_all(&self, collection: &str) -> ItemListResult<Vec<Document>>;
    async fn create(&self, collection: &str, fields: &Fields) -> ItemListResult<String>;
    /// Merges `fields` into the document. Missing documents are `NotFound`.
    async fn update(&self, collection: &str, id: &str, fields: &Fields) -> ItemListResult<()>;
    async fn delete(&self, collection: &str, id: &str) -> ItemListResult<()>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_account(&self, email: &str) -> ItemListResult<Option<AccountRecord>>;
    async fn insert_account(&self, account: &AccountRecord) -> ItemListResult<()>;
}
