use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use omok_common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "omok_server_config.yaml";

pub fn default_config_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn get_config_manager(
    path: &Path,
) -> ConfigManager<FileContentConfigProvider, ServerConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(tag = "kind")]
pub enum StorageConfig {
    Memory,
    File { directory: String },
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        match self {
            StorageConfig::Memory => Ok(()),
            StorageConfig::File { directory } if directory.trim().is_empty() => {
                Err("Storage directory must not be empty".to_string())
            }
            StorageConfig::File { .. } => Ok(()),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub storage: StorageConfig,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.address
            .parse()
            .map_err(|e| format!("Invalid address {}: {}", self.address, e))
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        self.socket_addr()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8000".to_string(),
            storage: StorageConfig::File {
                directory: "games".to_string(),
            },
        }
    }
}
