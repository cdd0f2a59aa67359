#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::fs;
use std::io::Write;
use std::path;

use anyhow::Context;
use anyhow::Result;

use super::check_quota;
use crate::domain::models::Storage;
use crate::domain::models::StorageName;

/// Writes `value` and syncs it to disk before the file is closed.
fn write_synced(path: &path::Path, value: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()?;
    drop(file);

    return Ok(());
}

/// Stores each key as `<dir>/<key>.json`. Writes go to a sibling temp file
/// that is renamed over the target.
pub struct FileStorage {
    pub dir: path::PathBuf,
    quota: usize,
}

impl FileStorage {
    pub fn new(dir: path::PathBuf, quota: usize) -> FileStorage {
        return FileStorage { dir, quota };
    }

    pub fn get_file_path(&self, key: &str) -> path::PathBuf {
        return self.dir.join(format!("{key}.json"));
    }
}

impl Storage for FileStorage {
    fn name(&self) -> StorageName {
        return StorageName::File;
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.get_file_path(key);
        if !file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(&file_path)
            .with_context(|| return format!("Failed to read {}", file_path.display()))?;

        return Ok(Some(payload));
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        check_quota(value, self.quota)?;

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| return format!("Failed to create {}", self.dir.display()))?;
        }

        let file_path = self.get_file_path(key);
        let tmp_path = self.dir.join(format!(".{key}.json.tmp"));
        if let Err(err) = write_synced(&tmp_path, value) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err)
                .with_context(|| return format!("Failed to write {}", tmp_path.display()));
        }

        if let Err(err) = fs::rename(&tmp_path, &file_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err)
                .with_context(|| return format!("Failed to replace {}", file_path.display()));
        }

        tracing::debug!(path = ?file_path, bytes = value.len(), "Saved storage item");
        return Ok(());
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let file_path = self.get_file_path(key);
        if !file_path.exists() {
            return Ok(());
        }

        fs::remove_file(&file_path)
            .with_context(|| return format!("Failed to remove {}", file_path.display()))?;
        return Ok(());
    }
}
