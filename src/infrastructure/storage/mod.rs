#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub mod file;
pub mod memory;

use std::path;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::StorageBox;
use crate::domain::models::StorageName;
use crate::domain::models::WorkflowError;

/// Rejects values larger than `quota` bytes. A quota of 0 disables the check.
fn check_quota(value: &str, quota: usize) -> Result<()> {
    if quota > 0 && value.len() > quota {
        return Err(WorkflowError::QuotaExceeded {
            size: value.len(),
            quota,
        }
        .into());
    }

    return Ok(());
}

pub struct StorageManager {}

impl StorageManager {
    /// Builds the backend named by the `storage` config key.
    pub fn from_config() -> Result<StorageBox> {
        let storage = Config::get(ConfigKey::Storage);
        return match StorageName::parse(storage.to_string()) {
            Some(name) => StorageManager::get(name),
            None => bail!(format!("Unknown storage '{storage}'")),
        };
    }

    pub fn get(name: StorageName) -> Result<StorageBox> {
        let quota_str = Config::get(ConfigKey::StorageQuota);
        let quota = quota_str
            .parse::<usize>()
            .with_context(|| return format!("Invalid storage quota '{quota_str}'"))?;

        if name == StorageName::Memory {
            return Ok(Box::new(memory::MemoryStorage::new(quota)));
        }

        let data_dir = path::PathBuf::from(Config::get(ConfigKey::DataDir));
        return Ok(Box::new(file::FileStorage::new(data_dir, quota)));
    }
}
