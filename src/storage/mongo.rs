use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{self, Bson, DateTime as BsonDateTime, Document as BsonDocument, doc},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions},
};
use serde_json::Value;
use uuid::Uuid;

use crate::core::{
    errors::{ItemListError, ItemListResult},
    models::{AccountRecord, Document, Fields},
};
use crate::storage::r#trait::{AccountStore, DocumentStore};

const SCHEMA_VERSION: i64 = 1;
const DUPLICATE_KEY_CODE: i32 = 11_000;
const ACCOUNTS_COLLECTION: &str = "accounts";
const METADATA_COLLECTION: &str = "metadata";

#[derive(Clone)]
pub struct MongoStore {
    database: Database,
    accounts: Collection<BsonDocument>,
    metadata: Collection<BsonDocument>,
}

impl MongoStore {
    pub async fn connect(database_url: &str) -> ItemListResult<Self> {
        let mut options = ClientOptions::parse(database_url).await?;
        if options.default_database.is_none() {
            options.default_database = Some("itemlist".to_owned());
        }

        let client = Client::with_options(options)?;
        let database = client
            .default_database()
            .ok_or_else(|| ItemListError::Config("missing mongo database name".to_owned()))?;

        Ok(Self {
            accounts: database.collection(ACCOUNTS_COLLECTION),
            metadata: database.collection(METADATA_COLLECTION),
            database,
        })
    }

    fn documents(&self, collection: &str) -> ItemListResult<Collection<BsonDocument>> {
        Self::check_item_collection(collection)?;
        Ok(self.database.collection(collection))
    }

    // accounts and metadata share the database with the item collections
    fn check_item_collection(collection: &str) -> ItemListResult<()> {
        if collection == ACCOUNTS_COLLECTION || collection == METADATA_COLLECTION {
            return Err(ItemListError::Config(format!(
                "collection name {collection} is reserved"
            )));
        }
        Ok(())
    }

    fn from_document(mut document: BsonDocument) -> ItemListResult<Document> {
        document.remove("_id");
        let id = match document.remove("id") {
            Some(Bson::String(id)) => id,
            _ => return Err(ItemListError::Storage),
        };

        match Bson::Document(document).into_relaxed_extjson() {
            Value::Object(fields) => Ok(Document { id, fields }),
            _ => Err(ItemListError::Storage),
        }
    }

    fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
        matches!(
            err.kind.as_ref(),
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY_CODE
        )
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn init(&self) -> ItemListResult<()> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.accounts.create_index(unique_email).await?;

        self.metadata
            .update_one(
                doc! { "_id": "schema" },
                doc! { "$set": { "version": SCHEMA_VERSION } },
            )
            .upsert(true)
            .await?;

        Ok(())
    }

    async fn list_all(&self, collection: &str) -> ItemListResult<Vec<Document>> {
        let mut cursor = self
            .documents(collection)?
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await?;

        let mut out = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            out.push(Self::from_document(document)?);
        }
        Ok(out)
    }

    async fn create(&self, collection: &str, fields: &Fields) -> ItemListResult<String> {
        let id = Uuid::new_v4().to_string();
        let mut document = bson::to_document(fields)?;
        document.insert("id", id.clone());
        self.documents(collection)?.insert_one(document).await?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: &Fields) -> ItemListResult<()> {
        let result = self
            .documents(collection)?
            .update_one(doc! { "id": id }, doc! { "$set": bson::to_document(fields)? })
            .await?;

        if result.matched_count == 0 {
            return Err(ItemListError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> ItemListResult<()> {
        let result = self.documents(collection)?.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(ItemListError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MongoStore {
    async fn find_account(&self, email: &str) -> ItemListResult<Option<AccountRecord>> {
        let document = self.accounts.find_one(doc! { "email": email }).await?;
        document
            .map(|doc| {
                let created_at = doc
                    .get_datetime("created_at")
                    .map_err(|_| ItemListError::Storage)?
                    .timestamp_millis();
                Ok(AccountRecord {
                    uid: doc
                        .get_str("uid")
                        .map_err(|_| ItemListError::Storage)?
                        .to_owned(),
                    email: doc
                        .get_str("email")
                        .map_err(|_| ItemListError::Storage)?
                        .to_owned(),
                    password_hash: doc
                        .get_str("password_hash")
                        .map_err(|_| ItemListError::Storage)?
                        .to_owned(),
                    created_at: Utc
                        .timestamp_millis_opt(created_at)
                        .single()
                        .ok_or(ItemListError::Storage)?,
                })
            })
            .transpose()
    }

    async fn insert_account(&self, account: &AccountRecord) -> ItemListResult<()> {
        self.accounts
            .insert_one(doc! {
                "uid": &account.uid,
                "email": &account.email,
                "password_hash": &account.password_hash,
                "created_at": Bson::DateTime(BsonDateTime::from_millis(account.created_at.timestamp_millis())),
            })
            .await
            .map_err(|err| {
                if Self::is_duplicate_key(&err) {
                    ItemListError::EmailAlreadyInUse
                } else {
                    ItemListError::from(err)
                }
            })?;
        Ok(())
    }
}
