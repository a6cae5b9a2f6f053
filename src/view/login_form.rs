use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::identity::IdentityProvider,
    core::{
        errors::{ItemListError, ItemListResult},
        models::Identity,
        remote,
    },
};

fn empty_password() -> SecretString {
    SecretString::new(String::new().into_boxed_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    SignUp,
}

impl LoginMode {
    pub fn title(self) -> &'static str {
        match self {
            LoginMode::SignIn => "Login",
            LoginMode::SignUp => "Sign Up",
        }
    }

    pub fn toggle_hint(self) -> &'static str {
        match self {
            LoginMode::SignIn => "Don't have an account? Sign Up",
            LoginMode::SignUp => "Already have an account? Login",
        }
    }
}

pub struct LoginForm {
    email: String,
    password: SecretString,
    mode: LoginMode,
    error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: empty_password(),
            mode: LoginMode::SignIn,
            error: None,
        }
    }
}

impl LoginForm {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: SecretString) {
        self.password = password;
    }

    pub fn has_password(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }

    pub fn mode(&self) -> LoginMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LoginMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            LoginMode::SignIn => LoginMode::SignUp,
            LoginMode::SignUp => LoginMode::SignIn,
        };
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn submit<I: IdentityProvider>(
        &mut self,
        identity: &I,
        timeout: Option<Duration>,
    ) -> ItemListResult<Identity> {
        self.error = None;
        let result = self.attempt(identity, timeout).await;
        match &result {
            Ok(_) => self.password = empty_password(),
            Err(err) => self.error = Some(err.to_string()),
        }
        result
    }

    async fn attempt<I: IdentityProvider>(
        &self,
        identity: &I,
        timeout: Option<Duration>,
    ) -> ItemListResult<Identity> {
        if self.email.trim().is_empty() {
            return Err(ItemListError::MissingField("Email"));
        }
        if self.password.expose_secret().is_empty() {
            return Err(ItemListError::MissingField("Password"));
        }

        match self.mode {
            LoginMode::SignIn => {
                remote::call(timeout, "sign_in", identity.sign_in(&self.email, &self.password))
                    .await
            }
            LoginMode::SignUp => {
                remote::call(timeout, "sign_up", identity.sign_up(&self.email, &self.password))
                    .await
            }
        }
    }
}
