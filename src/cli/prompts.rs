use std::io::{self, Write};

use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use secrecy::SecretString;

use crate::core::errors::{ItemListError, ItemListResult};

pub fn confirmation_prompt(prompt: &str, default: bool) -> ItemListResult<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|_| ItemListError::Config("unable to read confirmation".to_owned()))
}

pub fn secure_password_prompt(prompt: &str) -> ItemListResult<SecretString> {
    print!("{}", prompt);
    io::stdout()
        .flush()
        .map_err(|_| ItemListError::Config("unable to flush output".to_owned()))?;
    let password = rpassword::read_password()
        .map_err(|_| ItemListError::Config("unable to read password".to_owned()))?;
    Ok(SecretString::new(password.into_boxed_str()))
}

pub fn input(prompt: &str) -> ItemListResult<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|_| ItemListError::Config("unable to read input".to_owned()))
}

pub fn input_with_default(prompt: &str, default: &str) -> ItemListResult<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_initial_text(default)
        .allow_empty(true)
        .interact_text()
        .map_err(|_| ItemListError::Config("unable to read input".to_owned()))
}

pub fn select<T: ToString>(prompt: &str, items: &[T]) -> ItemListResult<usize> {
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(|_| ItemListError::Config("unable to read selection".to_owned()))
}
