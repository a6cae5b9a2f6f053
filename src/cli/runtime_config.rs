use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::core::{
    errors::{ItemListError, ItemListResult},
    models::DEFAULT_COLLECTION,
};

const CONFIG_DIR: &str = ".config/itemlist";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub backend: String,
    pub database_url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_owned()
}

pub fn cli_flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

pub fn load() -> ItemListResult<Option<RuntimeConfig>> {
    load_from(&config_file_path()?)
}

pub fn save(config: &RuntimeConfig) -> ItemListResult<()> {
    save_to(&config_file_path()?, config)
}

fn load_from(path: &Path) -> ItemListResult<Option<RuntimeConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|_| ItemListError::Config("failed to read runtime config".to_owned()))?;
    let config = serde_json::from_str::<RuntimeConfig>(&content)
        .map_err(|_| ItemListError::Config("invalid runtime config format".to_owned()))?;
    Ok(Some(config))
}

fn save_to(path: &Path, config: &RuntimeConfig) -> ItemListResult<()> {
    let Some(parent) = path.parent() else {
        return Err(ItemListError::Config(
            "invalid runtime config path".to_owned(),
        ));
    };

    fs::create_dir_all(parent)
        .map_err(|_| ItemListError::Config("failed to create config directory".to_owned()))?;
    let serialized = serde_json::to_string_pretty(config)
        .map_err(|_| ItemListError::Config("failed to serialize runtime config".to_owned()))?;
    fs::write(path, serialized)
        .map_err(|_| ItemListError::Config("failed to persist runtime config".to_owned()))?;
    Ok(())
}

fn config_file_path() -> ItemListResult<PathBuf> {
    if let Ok(path) = env::var("ITEMLIST_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }

    let home = env::var("HOME")
        .map_err(|_| ItemListError::Config("HOME environment variable is not set".to_owned()))?;
    Ok(PathBuf::from(home).join(CONFIG_DIR).join(CONFIG_FILE))
}
