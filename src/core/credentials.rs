use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use crate::core::errors::{ItemListError, ItemListResult};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const ARGON2_M_COST: u32 = 19_456;
pub const ARGON2_T_COST: u32 = 2;
pub const ARGON2_P_COST: u32 = 1;

fn argon2_instance() -> ItemListResult<Argon2<'static>> {
    let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, None)
        .map_err(|_| ItemListError::Config("invalid argon2 parameters".to_owned()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn normalize_email(candidate: &str) -> ItemListResult<String> {
    let email = candidate.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ItemListError::InvalidEmail);
    };

    let domain_ok = !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(ItemListError::InvalidEmail);
    }

    Ok(email.to_ascii_lowercase())
}

pub fn validate_password(candidate: &SecretString) -> ItemListResult<()> {
    if candidate.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ItemListError::WeakPassword(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

pub fn hash_password(password: &SecretString) -> ItemListResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2_instance()?
        .hash_password(password.expose_secret().as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &SecretString, password_hash: &str) -> ItemListResult<()> {
    let parsed = PasswordHash::new(password_hash).map_err(|_| ItemListError::InvalidCredentials)?;
    argon2_instance()?
        .verify_password(password.expose_secret().as_bytes(), &parsed)
        .map_err(|_| ItemListError::InvalidCredentials)
}
