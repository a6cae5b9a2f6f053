use std::time::Duration;

use secrecy::SecretString;

use itemlist::{
    auth::{
        identity::IdentityProvider,
        local::{LocalIdentityProvider, MemorySessionStore, SessionStore},
    },
    core::{
        errors::{ItemListError, ItemListResult},
        models::{DEFAULT_COLLECTION, Identity},
    },
    storage::{sqlite::SqliteStore, r#trait::DocumentStore},
    view::{
        auth_gate::{AuthGate, View},
        item_list::ItemListView,
        login_form::LoginMode,
    },
};

type Gate = AuthGate<LocalIdentityProvider<SqliteStore, MemorySessionStore>, SqliteStore>;

fn password(value: &str) -> SecretString {
    SecretString::new(value.to_owned().into_boxed_str())
}

async fn build_gate() -> ItemListResult<(SqliteStore, Gate)> {
    let store = SqliteStore::connect("sqlite::memory:").await?;
    store.init().await?;

    let identity = LocalIdentityProvider::new(store.clone(), MemorySessionStore::default());
    let items = ItemListView::new(store.clone(), DEFAULT_COLLECTION);
    let mut gate = AuthGate::new(identity, items).with_timeout(Some(Duration::from_secs(30)));
    gate.sync_identity().await;
    Ok((store, gate))
}

async fn signed_up_gate() -> ItemListResult<(SqliteStore, Gate)> {
    let (store, mut gate) = build_gate().await?;
    let form = gate.login_form_mut();
    form.set_mode(LoginMode::SignUp);
    form.set_email("a@x.com");
    form.set_password(password("secret1"));
    gate.submit_login().await?;
    Ok((store, gate))
}

async fn stored_names(store: &SqliteStore) -> ItemListResult<Vec<String>> {
    Ok(store
        .list_all(DEFAULT_COLLECTION)
        .await?
        .into_iter()
        .filter_map(|document| {
            document
                .fields
                .get("name")
                .and_then(|name| name.as_str())
                .map(str::to_owned)
        })
        .collect())
}

#[tokio::test]
async fn sign_up_create_update_delete_end_to_end() -> ItemListResult<()> {
    let (_store, mut gate) = build_gate().await?;
    assert_eq!(gate.view(), View::Login);
    assert!(matches!(gate.item_list(), Err(ItemListError::NotSignedIn)));

    let form = gate.login_form_mut();
    form.set_mode(LoginMode::SignUp);
    form.set_email("a@x.com");
    form.set_password(password("secret1"));
    let identity = gate.submit_login().await?;
    assert_eq!(identity.email, "a@x.com");
    assert_eq!(gate.view(), View::ItemList);
    assert_eq!(gate.session().email(), Some("a@x.com"));
    assert!(gate.item_list()?.items().is_empty());

    let created = gate
        .item_list_mut()?
        .create("milk")
        .await?
        .expect("non-empty name creates an item");
    let list = gate.item_list()?;
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].name, "milk");
    assert_eq!(created.date_added, created.date_updated);

    tokio::time::sleep(Duration::from_millis(5)).await;
    assert!(gate.item_list_mut()?.update(&created.id, "bread").await?);
    gate.item_list_mut()?.load().await?;
    let list = gate.item_list()?;
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].id, created.id);
    assert_eq!(list.items()[0].name, "bread");
    assert!(list.items()[0].date_updated > list.items()[0].date_added);

    gate.item_list_mut()?.delete(&created.id).await?;
    gate.item_list_mut()?.load().await?;
    assert!(gate.item_list()?.items().is_empty());
    Ok(())
}

#[tokio::test]
async fn create_then_load_yields_one_new_item() -> ItemListResult<()> {
    let (_store, mut gate) = signed_up_gate().await?;
    let created = gate
        .item_list_mut()?
        .create("eggs")
        .await?
        .expect("item created");

    gate.item_list_mut()?.load().await?;
    let list = gate.item_list()?;
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].id, created.id);
    assert_eq!(list.items()[0].name, "eggs");
    assert!(!created.id.is_empty());
    Ok(())
}

#[tokio::test]
async fn blank_names_never_reach_the_store() -> ItemListResult<()> {
    let (store, mut gate) = signed_up_gate().await?;
    let list = gate.item_list_mut()?;
    assert!(list.create("").await?.is_none());
    assert!(list.create("   ").await?.is_none());

    list.set_new_item_input("  ");
    assert!(list.submit_new_item().await?.is_none());
    assert_eq!(list.new_item_input(), "  ");

    assert!(list.items().is_empty());
    assert!(stored_names(&store).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_a_missing_item_fails_and_keeps_the_list() -> ItemListResult<()> {
    let (store, mut gate) = signed_up_gate().await?;
    gate.item_list_mut()?.create("milk").await?;

    let result = gate.item_list_mut()?.delete("does-not-exist").await;
    assert!(matches!(result, Err(ItemListError::NotFound)));
    assert_eq!(gate.item_list()?.items().len(), 1);
    assert_eq!(stored_names(&store).await?, vec!["milk".to_owned()]);
    Ok(())
}

#[tokio::test]
async fn sign_out_clears_items_and_shows_login() -> ItemListResult<()> {
    let (_store, mut gate) = signed_up_gate().await?;
    gate.item_list_mut()?.create("milk").await?;

    gate.logout().await?;
    assert_eq!(gate.view(), View::Login);
    assert!(gate.session().identity().is_none());
    assert!(gate.identity().current().is_none());
    assert!(gate.identity().sessions().load()?.is_none());

    // Notification from the provider is a no-op on already cleared state.
    gate.sync_identity().await;
    assert_eq!(gate.view(), View::Login);
    Ok(())
}

#[tokio::test]
async fn cancelled_edit_leaves_the_stored_item_alone() -> ItemListResult<()> {
    let (store, mut gate) = signed_up_gate().await?;
    let created = gate
        .item_list_mut()?
        .create("milk")
        .await?
        .expect("item created");

    let list = gate.item_list_mut()?;
    assert!(list.begin_edit(&created.id));
    assert!(list.set_draft_name("bread"));
    list.cancel_edit();
    assert!(list.draft().is_none());
    assert!(!list.save_edit().await?);

    assert_eq!(list.items()[0].name, "milk");
    assert_eq!(stored_names(&store).await?, vec!["milk".to_owned()]);
    Ok(())
}

#[tokio::test]
async fn signing_back_in_reloads_the_shared_collection() -> ItemListResult<()> {
    let (_store, mut gate) = signed_up_gate().await?;
    gate.item_list_mut()?.create("milk").await?;
    gate.logout().await?;

    let form = gate.login_form_mut();
    form.set_mode(LoginMode::SignIn);
    form.set_email("A@X.com");
    form.set_password(password("wrong-password"));
    let rejected = gate.submit_login().await;
    assert!(matches!(rejected, Err(ItemListError::InvalidCredentials)));
    assert_eq!(gate.login_form().error(), Some("Invalid email or password."));
    assert_eq!(gate.view(), View::Login);

    gate.login_form_mut().set_password(password("secret1"));
    gate.submit_login().await?;
    assert_eq!(gate.view(), View::ItemList);
    assert_eq!(gate.item_list()?.items().len(), 1);
    assert_eq!(gate.item_list()?.items()[0].name, "milk");
    Ok(())
}

#[tokio::test]
async fn signing_up_twice_shows_the_provider_message() -> ItemListResult<()> {
    let (_store, mut gate) = signed_up_gate().await?;
    gate.logout().await?;

    let form = gate.login_form_mut();
    form.set_mode(LoginMode::SignUp);
    form.set_email("a@x.com");
    form.set_password(password("secret1"));
    let result = gate.submit_login().await;
    assert!(matches!(result, Err(ItemListError::EmailAlreadyInUse)));
    assert_eq!(
        gate.login_form().error(),
        Some("The email address is already in use by another account.")
    );
    assert_eq!(gate.login_form().email(), "a@x.com");
    Ok(())
}

fn temp_db_url() -> (String, std::path::PathBuf) {
    let mut path = std::env::temp_dir();
    path.push(format!("itemlist-flow-{}.db", uuid::Uuid::new_v4()));
    (format!("sqlite://{}?mode=rwc", path.display()), path)
}

#[tokio::test]
async fn name_only_documents_are_listed_alongside_new_items() -> ItemListResult<()> {
    let (url, path) = temp_db_url();
    let store = SqliteStore::connect(&url).await?;
    store.init().await?;

    let pool = sqlx::SqlitePool::connect(&url).await?;
    sqlx::query(
        "INSERT INTO documents (collection, id, fields) VALUES ('items', 'legacy', '{\"name\":\"legacy\"}')",
    )
    .execute(&pool)
    .await?;

    let mut view = ItemListView::new(store.clone(), DEFAULT_COLLECTION);
    view.create("milk").await?;
    view.load().await?;

    let store_ids = store
        .list_all(DEFAULT_COLLECTION)
        .await?
        .into_iter()
        .map(|document| document.id)
        .collect::<Vec<_>>();
    let local_ids = view
        .items()
        .iter()
        .map(|item| item.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(local_ids, store_ids);
    assert_eq!(view.items()[0].name, "legacy");
    assert!(view.items()[0].date_added.is_none());

    let _ = std::fs::remove_file(path);
    Ok(())
}

#[tokio::test]
async fn restored_session_over_unreadable_collection_can_sign_out() -> ItemListResult<()> {
    let (url, path) = temp_db_url();
    let store = SqliteStore::connect(&url).await?;
    store.init().await?;

    let pool = sqlx::SqlitePool::connect(&url).await?;
    sqlx::query("INSERT INTO documents (collection, id, fields) VALUES ('items', 'bad', '[1,2]')")
        .execute(&pool)
        .await?;

    let sessions = MemorySessionStore::default();
    sessions.store(&Identity {
        uid: "uid-1".to_owned(),
        email: "a@x.com".to_owned(),
    })?;
    let identity = LocalIdentityProvider::new(store.clone(), sessions);
    let items = ItemListView::new(store.clone(), DEFAULT_COLLECTION);
    let mut gate = AuthGate::new(identity, items);

    assert!(gate.sync_identity().await);
    assert_eq!(gate.view(), View::ItemList);
    assert_eq!(gate.session().email(), Some("a@x.com"));
    assert!(gate.item_list()?.items().is_empty());

    gate.logout().await?;
    assert_eq!(gate.view(), View::Login);
    assert!(gate.identity().sessions().load()?.is_none());

    let _ = std::fs::remove_file(path);
    Ok(())
}
