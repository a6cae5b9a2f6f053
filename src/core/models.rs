use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::errors::{ItemListError, ItemListResult};

pub const DEFAULT_COLLECTION: &str = "items";

pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    pub name: String,
    pub date_added: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

/// Documents written by older clients carry only `name`, so the timestamps
/// are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_updated: Option<DateTime<Utc>>,
}

impl Item {
    pub fn from_document(document: Document) -> Self {
        let Document { id, fields } = document;
        Self {
            id,
            name: fields
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            date_added: timestamp(&fields, "dateAdded"),
            date_updated: timestamp(&fields, "dateUpdated"),
        }
    }

    pub fn from_fields(id: String, fields: ItemFields) -> Self {
        Self {
            id,
            name: fields.name,
            date_added: Some(fields.date_added),
            date_updated: Some(fields.date_updated),
        }
    }
}

fn timestamp(fields: &Fields, key: &str) -> Option<DateTime<Utc>> {
    fields
        .get(key)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}

impl ItemFields {
    pub fn new(name: String, now: DateTime<Utc>) -> Self {
        Self {
            name,
            date_added: now,
            date_updated: now,
        }
    }

    pub fn to_fields(&self) -> ItemListResult<Fields> {
        into_fields(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub name: String,
    pub date_updated: DateTime<Utc>,
}

impl ItemPatch {
    pub fn to_fields(&self) -> ItemListResult<Fields> {
        into_fields(self)
    }
}

fn into_fields<T: Serialize>(value: &T) -> ItemListResult<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(ItemListError::Serialization),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub uid: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl AccountRecord {
    pub fn identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }
}
