use thiserror::Error;

pub type ItemListResult<T> = Result<T, ItemListError>;

#[derive(Debug, Error)]
pub enum ItemListError {
    #[error("The email address is badly formatted.")]
    InvalidEmail,
    #[error("Password should be at least {0} characters.")]
    WeakPassword(usize),
    #[error("The email address is already in use by another account.")]
    EmailAlreadyInUse,
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("{0} is required.")]
    MissingField(&'static str),
    #[error("not signed in")]
    NotSignedIn,
    #[error("document not found")]
    NotFound,
    #[error("remote call timed out: {0}")]
    Timeout(&'static str),
    #[error("keyring unavailable")]
    KeyringUnavailable,
    #[error("keyring locked")]
    KeyringLocked,
    #[error("unsupported backend: {0}")]
    UnsupportedBackend(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("password hashing failed")]
    Crypto,
    #[error("serialization failed")]
    Serialization,
    #[error("storage operation failed")]
    Storage,
}

impl ItemListError {
    /// Errors whose message is meant to be shown to the user as-is.
    pub fn is_identity_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidEmail
                | Self::WeakPassword(_)
                | Self::EmailAlreadyInUse
                | Self::InvalidCredentials
                | Self::MissingField(_)
        )
    }

    pub fn from_account_insert(err: sqlx::Error) -> Self {
        let duplicate = matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation());
        if duplicate {
            Self::EmailAlreadyInUse
        } else {
            Self::from(err)
        }
    }
}

impl From<argon2::password_hash::Error> for ItemListError {
    fn from(_: argon2::password_hash::Error) -> Self {
        Self::Crypto
    }
}

impl From<keyring::Error> for ItemListError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoStorageAccess(_) => Self::KeyringLocked,
            keyring::Error::NoEntry
            | keyring::Error::PlatformFailure(_)
            | keyring::Error::BadEncoding(_)
            | keyring::Error::TooLong(_, _)
            | keyring::Error::Invalid(_, _)
            | keyring::Error::Ambiguous(_)
            | _ => Self::KeyringUnavailable,
        }
    }
}

impl From<serde_json::Error> for ItemListError {
    fn from(_: serde_json::Error) -> Self {
        Self::Serialization
    }
}

impl From<sqlx::Error> for ItemListError {
    fn from(_: sqlx::Error) -> Self {
        Self::Storage
    }
}

impl From<mongodb::error::Error> for ItemListError {
    fn from(_: mongodb::error::Error) -> Self {
        Self::Storage
    }
}

impl From<mongodb::bson::ser::Error> for ItemListError {
    fn from(_: mongodb::bson::ser::Error) -> Self {
        Self::Serialization
    }
}
