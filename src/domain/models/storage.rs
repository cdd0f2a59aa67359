use anyhow::Result;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StorageName {
    File,
    Memory,
}

impl StorageName {
    pub fn parse(text: String) -> Option<StorageName> {
        return StorageName::iter().find(|e| return e.to_string() == text);
    }
}

/// Synchronous key/value store holding whole serialized documents. Writes
/// are all-or-nothing per key.
pub trait Storage {
    fn name(&self) -> StorageName;

    /// Returns `None` when nothing is stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value under `key`. Fails without touching the previous
    /// value when the write is rejected, e.g. over quota.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

pub type StorageBox = Box<dyn Storage + Send + Sync>;
