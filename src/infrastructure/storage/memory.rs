#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;

use anyhow::Result;
use dashmap::DashMap;

use super::check_quota;
use crate::domain::models::Storage;
use crate::domain::models::StorageName;

/// Process-local storage. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    items: DashMap<String, String>,
    quota: usize,
}

impl MemoryStorage {
    pub fn new(quota: usize) -> MemoryStorage {
        return MemoryStorage {
            items: DashMap::new(),
            quota,
        };
    }
}

impl Storage for MemoryStorage {
    fn name(&self) -> StorageName {
        return StorageName::Memory;
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        return Ok(self.items.get(key).map(|e| return e.value().to_string()));
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        check_quota(value, self.quota)?;
        self.items.insert(key.to_string(), value.to_string());
        return Ok(());
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.remove(key);
        return Ok(());
    }
}
