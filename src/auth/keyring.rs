use zeroize::Zeroize;

use crate::{
    auth::local::SessionStore,
    core::{
        errors::{ItemListError, ItemListResult},
        models::Identity,
    },
};

const KEYRING_SERVICE: &str = "itemlist";

pub struct OsSessionStore {
    user: String,
}

impl OsSessionStore {
    pub fn new(database_url: &str) -> Self {
        Self {
            user: format!("session:{database_url}"),
        }
    }

    fn entry(&self) -> ItemListResult<keyring::Entry> {
        Ok(keyring::Entry::new(KEYRING_SERVICE, &self.user)?)
    }
}

impl SessionStore for OsSessionStore {
    fn store(&self, identity: &Identity) -> ItemListResult<()> {
        let mut encoded = serde_json::to_string(identity)?;
        let result = self.entry()?.set_password(&encoded);
        encoded.zeroize();
        result?;
        Ok(())
    }

    fn load(&self) -> ItemListResult<Option<Identity>> {
        let mut encoded = match self.entry()?.get_password() {
            Ok(encoded) => encoded,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let identity = serde_json::from_str::<Identity>(&encoded)
            .map_err(|_| ItemListError::KeyringUnavailable);
        encoded.zeroize();
        identity.map(Some)
    }

    fn clear(&self) -> ItemListResult<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
