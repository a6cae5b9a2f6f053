use chrono::Utc;

use itemlist::{
    core::{
        errors::{ItemListError, ItemListResult},
        models::{AccountRecord, Fields},
    },
    storage::{
        app::AppStore,
        r#trait::{AccountStore, DocumentStore},
    },
};

fn account(email: &str) -> AccountRecord {
    AccountRecord {
        uid: uuid::Uuid::new_v4().to_string(),
        email: email.to_owned(),
        password_hash: "$argon2id$placeholder".to_owned(),
        created_at: Utc::now(),
    }
}

fn name_fields(name: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert("name".to_owned(), serde_json::json!(name));
    fields
}

async fn exercise_store(store: &AppStore) -> ItemListResult<()> {
    let collection = format!("items-{}", uuid::Uuid::new_v4());
    let id = store.create(&collection, &name_fields("milk")).await?;
    store.update(&collection, &id, &name_fields("bread")).await?;

    let documents = store.list_all(&collection).await?;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, id);
    assert_eq!(documents[0].fields["name"], "bread");

    store.delete(&collection, &id).await?;
    assert!(store.list_all(&collection).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn app_store_rejects_unknown_backend() {
    let result = AppStore::connect("unknown", "ignored").await;
    assert!(matches!(result, Err(ItemListError::UnsupportedBackend(_))));
}

#[tokio::test]
async fn sqlite_backend_selection_and_account_roundtrip() -> ItemListResult<()> {
    let store = AppStore::connect("sqlite", "sqlite::memory:").await?;
    store.init().await?;

    store.insert_account(&account("a@x.com")).await?;
    let found = store.find_account("a@x.com").await?;
    assert_eq!(found.map(|record| record.email).as_deref(), Some("a@x.com"));
    assert!(store.find_account("b@x.com").await?.is_none());

    exercise_store(&store).await
}

#[tokio::test]
async fn postgres_backend_selection_if_env_configured() -> ItemListResult<()> {
    let Ok(url) = std::env::var("ITEMLIST_TEST_POSTGRES_URL") else {
        return Ok(());
    };

    let store = AppStore::connect("postgres", &url).await?;
    store.init().await?;
    exercise_store(&store).await
}

#[tokio::test]
async fn mongo_backend_selection_if_env_configured() -> ItemListResult<()> {
    let Ok(url) = std::env::var("ITEMLIST_TEST_MONGO_URL") else {
        return Ok(());
    };

    let store = AppStore::connect("mongo", &url).await?;
    store.init().await?;

    let email = format!("{}@x.com", uuid::Uuid::new_v4());
    store.insert_account(&account(&email)).await?;
    let duplicate = store.insert_account(&account(&email)).await;
    assert!(matches!(duplicate, Err(ItemListError::EmailAlreadyInUse)));
    assert!(matches!(
        store.list_all("accounts").await,
        Err(ItemListError::Config(_))
    ));

    exercise_store(&store).await
}
