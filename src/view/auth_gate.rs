use std::time::Duration;

use crate::{
    auth::identity::{IdentityProvider, Subscription},
    core::{
        errors::{ItemListError, ItemListResult},
        models::Identity,
        remote,
    },
    storage::r#trait::DocumentStore,
    view::{item_list::ItemListView, login_form::LoginForm, session::SessionContext},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    ItemList,
}

pub struct AuthGate<I: IdentityProvider, S: DocumentStore> {
    identity: I,
    subscription: Option<Subscription>,
    session: SessionContext,
    login: LoginForm,
    items: ItemListView<S>,
    timeout: Option<Duration>,
}

impl<I: IdentityProvider, S: DocumentStore> AuthGate<I, S> {
    pub fn new(identity: I, items: ItemListView<S>) -> Self {
        let subscription = identity.subscribe();
        Self {
            identity,
            subscription: Some(subscription),
            session: SessionContext::default(),
            login: LoginForm::default(),
            items,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn view(&self) -> View {
        if self.session.is_signed_in() {
            View::ItemList
        } else {
            View::Login
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn login_form(&self) -> &LoginForm {
        &self.login
    }

    pub fn login_form_mut(&mut self) -> &mut LoginForm {
        &mut self.login
    }

    pub fn item_list(&self) -> ItemListResult<&ItemListView<S>> {
        if !self.session.is_signed_in() {
            return Err(ItemListError::NotSignedIn);
        }
        Ok(&self.items)
    }

    pub fn item_list_mut(&mut self) -> ItemListResult<&mut ItemListView<S>> {
        if !self.session.is_signed_in() {
            return Err(ItemListError::NotSignedIn);
        }
        Ok(&mut self.items)
    }

    /// Applies the unread identity notification, if any. Returns whether one
    /// was applied. A failed item load leaves the session signed in with an
    /// empty list.
    pub async fn sync_identity(&mut self) -> bool {
        let Some(change) = self
            .subscription
            .as_mut()
            .and_then(Subscription::take_pending)
        else {
            return false;
        };
        self.apply_identity(change).await;
        true
    }

    pub async fn wait_identity_change(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        let Some(change) = subscription.next().await else {
            return false;
        };
        self.apply_identity(change).await;
        true
    }

    async fn apply_identity(&mut self, change: Option<Identity>) {
        self.items.clear();
        match change {
            Some(identity) => {
                tracing::debug!(email = %identity.email, "identity present, loading items");
                self.session.set(identity);
                // load logs its own failure
                let _ = self.items.load().await;
            }
            None => {
                tracing::debug!("identity absent");
                self.session.clear();
            }
        }
    }

    pub async fn submit_login(&mut self) -> ItemListResult<Identity> {
        let identity = self.login.submit(&self.identity, self.timeout).await?;
        self.sync_identity().await;
        Ok(identity)
    }

    /// Signs out remotely, then clears local state whatever the outcome.
    /// A sign-out failure is still returned once local state is cleared.
    pub async fn logout(&mut self) -> ItemListResult<()> {
        let result = remote::call(self.timeout, "sign_out", self.identity.sign_out()).await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "sign-out failed; clearing local session anyway");
        }

        self.session.clear();
        self.items.clear();
        result
    }

    pub fn teardown(&mut self) {
        self.subscription = None;
    }

    pub fn is_torn_down(&self) -> bool {
        self.subscription.is_none()
    }
}
