use async_trait::async_trait;

use crate::{
    core::{
        errors::{ItemListError, ItemListResult},
        models::{AccountRecord, Document, Fields},
    },
    storage::{
        mongo::MongoStore,
        postgres::PostgresStore,
        r#trait::{AccountStore, DocumentStore},
        sqlite::SqliteStore,
    },
};

#[derive(Clone)]
pub enum AppStore {
    Sqlite(SqliteStore),
    Postgres(PostgresStore),
    Mongo(MongoStore),
}

impl AppStore {
    pub async fn connect(backend: &str, database_url: &str) -> ItemListResult<Self> {
        match backend {
            "sqlite" => Ok(Self::Sqlite(SqliteStore::connect(database_url).await?)),
            "postgres" => Ok(Self::Postgres(PostgresStore::connect(database_url).await?)),
            "mongo" => Ok(Self::Mongo(MongoStore::connect(database_url).await?)),
            other => Err(ItemListError::UnsupportedBackend(other.to_owned())),
        }
    }
}

#[async_trait]
impl DocumentStore for AppStore {
    async fn init(&self) -> ItemListResult<()> {
        match self {
            AppStore::Sqlite(store) => store.init().await,
            AppStore::Postgres(store) => store.init().await,
            AppStore::Mongo(store) => store.init().await,
        }
    }

    async fn list_all(&self, collection: &str) -> ItemListResult<Vec<Document>> {
        match self {
            AppStore::Sqlite(store) => store.list_all(collection).await,
            AppStore::Postgres(store) => store.list_all(collection).await,
            AppStore::Mongo(store) => store.list_all(collection).await,
        }
    }

    async fn create(&self, collection: &str, fields: &Fields) -> ItemListResult<String> {
        match self {
            AppStore::Sqlite(store) => store.create(collection, fields).await,
            AppStore::Postgres(store) => store.create(collection, fields).await,
            AppStore::Mongo(store) => store.create(collection, fields).await,
        }
    }

    async fn update(&self, collection: &str, id: &str, fields: &Fields) -> ItemListResult<()> {
        match self {
            AppStore::Sqlite(store) => store.update(collection, id, fields).await,
            AppStore::Postgres(store) => store.update(collection, id, fields).await,
            AppStore::Mongo(store) => store.update(collection, id, fields).await,
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> ItemListResult<()> {
        match self {
            AppStore::Sqlite(store) => store.delete(collection, id).await,
            AppStore::Postgres(store) => store.delete(collection, id).await,
            AppStore::Mongo(store) => store.delete(collection, id).await,
        }
    }
}

#[async_trait]
impl AccountStore for AppStore {
    async fn find_account(&self, email: &str) -> ItemListResult<Option<AccountRecord>> {
        match self {
            AppStore::Sqlite(store) => store.find_account(email).await,
            AppStore::Postgres(store) => store.find_account(email).await,
            AppStore::Mongo(store) => store.find_account(email).await,
        }
    }

    async fn insert_account(&self, account: &AccountRecord) -> ItemListResult<()> {
        match self {
            AppStore::Sqlite(store) => store.insert_account(account).await,
            AppStore::Postgres(store) => store.insert_account(account).await,
            AppStore::Mongo(store) => store.insert_account(account).await,
        }
    }
}
