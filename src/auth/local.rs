use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    auth::identity::{IdentityProvider, Subscription},
    core::{
        credentials,
        errors::{ItemListError, ItemListResult},
        models::{AccountRecord, Identity},
    },
    storage::r#trait::AccountStore,
};

pub trait SessionStore: Send + Sync {
    fn store(&self, identity: &Identity) -> ItemListResult<()>;
    fn load(&self) -> ItemListResult<Option<Identity>>;
    fn clear(&self) -> ItemListResult<()>;
}

#[derive(Default)]
pub struct MemorySessionStore {
    identity: Mutex<Option<Identity>>,
}

impl SessionStore for MemorySessionStore {
    fn store(&self, identity: &Identity) -> ItemListResult<()> {
        *self
            .identity
            .lock()
            .map_err(|_| ItemListError::KeyringUnavailable)? = Some(identity.clone());
        Ok(())
    }

    fn load(&self) -> ItemListResult<Option<Identity>> {
        Ok(self
            .identity
            .lock()
            .map_err(|_| ItemListError::KeyringUnavailable)?
            .clone())
    }

    fn clear(&self) -> ItemListResult<()> {
        *self
            .identity
            .lock()
            .map_err(|_| ItemListError::KeyringUnavailable)? = None;
        Ok(())
    }
}

pub struct LocalIdentityProvider<A: AccountStore, K: SessionStore> {
    accounts: A,
    sessions: K,
    state: watch::Sender<Option<Identity>>,
}

impl<A: AccountStore, K: SessionStore> LocalIdentityProvider<A, K> {
    pub fn new(accounts: A, sessions: K) -> Self {
        let restored = match sessions.load() {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable persisted session");
                None
            }
        };
        let (state, _) = watch::channel(restored);
        Self {
            accounts,
            sessions,
            state,
        }
    }

    pub fn sessions(&self) -> &K {
        &self.sessions
    }

    fn publish(&self, identity: Identity) -> ItemListResult<Identity> {
        self.sessions.store(&identity)?;
        self.state.send_replace(Some(identity.clone()));
        tracing::info!(email = %identity.email, "signed in");
        Ok(identity)
    }
}

#[async_trait]
impl<A: AccountStore, K: SessionStore> IdentityProvider for LocalIdentityProvider<A, K> {
    fn subscribe(&self) -> Subscription {
        Subscription::new(self.state.subscribe())
    }

    fn current(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }

    async fn sign_in(&self, email: &str, password: &SecretString) -> ItemListResult<Identity> {
        let email = credentials::normalize_email(email)?;
        let account = self
            .accounts
            .find_account(&email)
            .await?
            .ok_or(ItemListError::InvalidCredentials)?;
        credentials::verify_password(password, &account.password_hash)?;
        self.publish(account.identity())
    }

    async fn sign_up(&self, email: &str, password: &SecretString) -> ItemListResult<Identity> {
        let email = credentials::normalize_email(email)?;
        credentials::validate_password(password)?;
        if self.accounts.find_account(&email).await?.is_some() {
            return Err(ItemListError::EmailAlreadyInUse);
        }

        let account = AccountRecord {
            uid: Uuid::new_v4().to_string(),
            email,
            password_hash: credentials::hash_password(password)?,
            created_at: Utc::now(),
        };
        self.accounts.insert_account(&account).await?;
        self.publish(account.identity())
    }

    async fn sign_out(&self) -> ItemListResult<()> {
        self.sessions.clear()?;
        self.state.send_replace(None);
        tracing::info!("signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use secrecy::SecretString;

    use super::{LocalIdentityProvider, MemorySessionStore, SessionStore};
    use crate::{
        auth::identity::IdentityProvider,
        core::{
            errors::{ItemListError, ItemListResult},
            models::{AccountRecord, Identity},
        },
        storage::r#trait::AccountStore,
    };

    #[derive(Clone, Default)]
    struct MemoryAccounts {
        accounts: Arc<Mutex<HashMap<String, AccountRecord>>>,
    }

    #[async_trait]
    impl AccountStore for MemoryAccounts {
        async fn find_account(&self, email: &str) -> ItemListResult<Option<AccountRecord>> {
            Ok(self.accounts.lock().expect("poisoned").get(email).cloned())
        }

        async fn insert_account(&self, account: &AccountRecord) -> ItemListResult<()> {
            let mut accounts = self.accounts.lock().expect("poisoned");
            if accounts.contains_key(&account.email) {
                return Err(ItemListError::EmailAlreadyInUse);
            }
            accounts.insert(account.email.clone(), account.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct StickySessionStore {
        inner: MemorySessionStore,
    }

    impl SessionStore for StickySessionStore {
        fn store(&self, identity: &Identity) -> ItemListResult<()> {
            self.inner.store(identity)
        }

        fn load(&self) -> ItemListResult<Option<Identity>> {
            self.inner.load()
        }

        fn clear(&self) -> ItemListResult<()> {
            Err(ItemListError::KeyringLocked)
        }
    }

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.to_owned().into_boxed_str())
    }

    fn provider() -> LocalIdentityProvider<MemoryAccounts, MemorySessionStore> {
        LocalIdentityProvider::new(MemoryAccounts::default(), MemorySessionStore::default())
    }

    #[tokio::test]
    async fn sign_up_then_sign_in_lifecycle() {
        let provider = provider();
        let mut subscription = provider.subscribe();
        assert_eq!(subscription.take_pending(), Some(None));

        let created = provider
            .sign_up("A@x.com", &secret("secret1"))
            .await
            .expect("sign up should succeed");
        assert_eq!(created.email, "a@x.com");
        assert_eq!(subscription.take_pending(), Some(Some(created.clone())));
        assert_eq!(
            provider.sessions().load().expect("load"),
            Some(created.clone())
        );

        provider.sign_out().await.expect("sign out");
        assert_eq!(subscription.take_pending(), Some(None));
        assert!(provider.current().is_none());

        let signed_in = provider
            .sign_in("a@x.com", &secret("secret1"))
            .await
            .expect("sign in should succeed");
        assert_eq!(signed_in, created);
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_rejected() {
        let provider = provider();
        provider
            .sign_up("a@x.com", &secret("secret1"))
            .await
            .expect("first sign up");
        let result = provider.sign_up("a@x.com", &secret("secret2")).await;
        assert!(matches!(result, Err(ItemListError::EmailAlreadyInUse)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_share_message() {
        let provider = provider();
        provider
            .sign_up("a@x.com", &secret("secret1"))
            .await
            .expect("sign up");
        provider.sign_out().await.expect("sign out");

        let wrong = provider.sign_in("a@x.com", &secret("nope123")).await;
        let unknown = provider.sign_in("b@x.com", &secret("secret1")).await;
        assert!(matches!(wrong, Err(ItemListError::InvalidCredentials)));
        assert!(matches!(unknown, Err(ItemListError::InvalidCredentials)));
        assert!(provider.current().is_none());
    }

    #[tokio::test]
    async fn malformed_email_and_weak_password_fail_before_storage() {
        let provider = provider();
        assert!(matches!(
            provider.sign_up("not-an-email", &secret("secret1")).await,
            Err(ItemListError::InvalidEmail)
        ));
        assert!(matches!(
            provider.sign_up("a@x.com", &secret("123")).await,
            Err(ItemListError::WeakPassword(_))
        ));
    }

    #[tokio::test]
    async fn restores_persisted_session() {
        let sessions = MemorySessionStore::default();
        let identity = Identity {
            uid: "u1".to_owned(),
            email: "a@x.com".to_owned(),
        };
        sessions.store(&identity).expect("store");

        let provider = LocalIdentityProvider::new(MemoryAccounts::default(), sessions);
        assert_eq!(provider.current(), Some(identity.clone()));
        assert_eq!(provider.subscribe().take_pending(), Some(Some(identity)));
    }

    #[tokio::test]
    async fn failed_sign_out_keeps_identity() {
        let provider =
            LocalIdentityProvider::new(MemoryAccounts::default(), StickySessionStore::default());
        provider
            .sign_up("a@x.com", &secret("secret1"))
            .await
            .expect("sign up");

        assert!(matches!(
            provider.sign_out().await,
            Err(ItemListError::KeyringLocked)
        ));
        assert!(provider.current().is_some());
    }
}
