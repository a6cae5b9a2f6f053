use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::watch;

use crate::core::{errors::ItemListResult, models::Identity};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers a listener. The current state counts as the first notification.
    fn subscribe(&self) -> Subscription;
    fn current(&self) -> Option<Identity>;
    async fn sign_in(&self, email: &str, password: &SecretString) -> ItemListResult<Identity>;
    async fn sign_up(&self, email: &str, password: &SecretString) -> ItemListResult<Identity>;
    async fn sign_out(&self) -> ItemListResult<()>;
}

/// Listener handle for identity changes. Dropping it unsubscribes.
///
/// Only the latest state is kept: several changes between two reads collapse
/// into one notification carrying the newest identity.
#[derive(Debug)]
pub struct Subscription {
    receiver: watch::Receiver<Option<Identity>>,
    initial_pending: bool,
}

impl Subscription {
    pub fn new(receiver: watch::Receiver<Option<Identity>>) -> Self {
        Self {
            receiver,
            initial_pending: true,
        }
    }

    pub fn take_pending(&mut self) -> Option<Option<Identity>> {
        let changed = self.receiver.has_changed().unwrap_or(false);
        if !(self.initial_pending || changed) {
            return None;
        }
        self.initial_pending = false;
        Some(self.receiver.borrow_and_update().clone())
    }

    pub async fn next(&mut self) -> Option<Option<Identity>> {
        if let Some(pending) = self.take_pending() {
            return Some(pending);
        }
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}
