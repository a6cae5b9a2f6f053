use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::core::{
    errors::{ItemListError, ItemListResult},
    models::{AccountRecord, Document, Fields},
};
use crate::storage::r#trait::{AccountStore, DocumentStore};

const SCHEMA_VERSION: i64 = 1;

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str) -> ItemListResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    fn parse_fields(text: &str) -> ItemListResult<Fields> {
        match serde_json::from_str(text)? {
            Value::Object(map) => Ok(map),
            _ => Err(ItemListError::Storage),
        }
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn init(&self) -> ItemListResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_meta (
                id INTEGER PRIMARY KEY,
                schema_version BIGINT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "INSERT INTO schema_meta (id, schema_version)
             VALUES (1, $1)
             ON CONFLICT(id) DO UPDATE SET schema_version = EXCLUDED.schema_version",
        )
        .bind(SCHEMA_VERSION)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                seq BIGSERIAL PRIMARY KEY,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                fields JSONB NOT NULL,
                UNIQUE (collection, id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS accounts (
                uid TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_all(&self, collection: &str) -> ItemListResult<Vec<Document>> {
        let rows = sqlx::query(
            "SELECT id, fields::text AS fields FROM documents WHERE collection = $1 ORDER BY seq ASC",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let fields_text: String = row.try_get("fields")?;
                Ok(Document {
                    id: row.try_get("id")?,
                    fields: Self::parse_fields(&fields_text)?,
                })
            })
            .collect::<Result<Vec<_>, ItemListError>>()
    }

    async fn create(&self, collection: &str, fields: &Fields) -> ItemListResult<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO documents (collection, id, fields) VALUES ($1, $2, $3::jsonb)")
            .bind(collection)
            .bind(&id)
            .bind(serde_json::to_string(fields)?)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: &Fields) -> ItemListResult<()> {
        let result = sqlx::query(
            "UPDATE documents SET fields = fields || $3::jsonb
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(serde_json::to_string(fields)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ItemListError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> ItemListResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ItemListError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn find_account(&self, email: &str) -> ItemListResult<Option<AccountRecord>> {
        let row = sqlx::query(
            "SELECT uid, email, password_hash, created_at FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let created_at_text: String = r.try_get("created_at")?;
            Ok(AccountRecord {
                uid: r.try_get("uid")?,
                email: r.try_get("email")?,
                password_hash: r.try_get("password_hash")?,
                created_at: DateTime::parse_from_rfc3339(&created_at_text)
                    .map_err(|_| ItemListError::Storage)?
                    .with_timezone(&Utc),
            })
        })
        .transpose()
    }

    async fn insert_account(&self, account: &AccountRecord) -> ItemListResult<()> {
        sqlx::query(
            "INSERT INTO accounts (uid, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&account.uid)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(ItemListError::from_account_insert)?;

        Ok(())
    }
}
