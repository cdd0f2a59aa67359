use anyhow::Result;
use test_utils::temp_data_dir;

use super::StorageManager;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::configuration::TEST_LOCK;
use crate::domain::models::StorageName;
use crate::domain::models::WorkflowError;

fn set_config(storage: &str, data_dir: &str, quota: &str) {
    Config::set(ConfigKey::Storage, storage);
    Config::set(ConfigKey::DataDir, data_dir);
    Config::set(ConfigKey::StorageQuota, quota);
}

#[tokio::test]
async fn it_builds_memory_storage_from_config() -> Result<()> {
    let _lock = TEST_LOCK.lock().await;
    set_config("memory", "", "4");

    let storage = StorageManager::from_config()?;
    assert_eq!(storage.name(), StorageName::Memory);

    let err = storage.set_item("doc", "12345").unwrap_err();
    assert_eq!(
        err.downcast_ref::<WorkflowError>(),
        Some(&WorkflowError::QuotaExceeded { size: 5, quota: 4 })
    );
    return Ok(());
}

#[tokio::test]
async fn it_builds_file_storage_in_the_data_dir() -> Result<()> {
    let _lock = TEST_LOCK.lock().await;
    let dir = temp_data_dir();
    set_config("file", &dir.path().to_string_lossy(), "5242880");

    let storage = StorageManager::from_config()?;
    assert_eq!(storage.name(), StorageName::File);

    storage.set_item("doc", "{}")?;
    assert!(dir.path().join("doc.json").exists());
    return Ok(());
}

#[tokio::test]
async fn it_disables_the_quota_with_zero() -> Result<()> {
    let _lock = TEST_LOCK.lock().await;
    let dir = temp_data_dir();
    set_config("file", &dir.path().to_string_lossy(), "0");

    let storage = StorageManager::from_config()?;
    let payload = "x".repeat(64 * 1024);
    storage.set_item("doc", &payload)?;

    assert_eq!(storage.get_item("doc")?, Some(payload));
    return Ok(());
}

#[tokio::test]
async fn it_rejects_invalid_quotas() {
    let _lock = TEST_LOCK.lock().await;
    set_config("memory", "", "lots");

    let err = StorageManager::from_config().err().unwrap();
    insta::assert_snapshot!(err.to_string(), @"Invalid storage quota 'lots'");
}

#[tokio::test]
async fn it_rejects_unknown_storage_names() {
    let _lock = TEST_LOCK.lock().await;
    set_config("sqlite", "", "0");

    let err = StorageManager::from_config().err().unwrap();
    insta::assert_snapshot!(err.to_string(), @"Unknown storage 'sqlite'");
}
