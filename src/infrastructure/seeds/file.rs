#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;

use crate::domain::models::SeedSource;
use crate::domain::models::Session;

pub struct FileSeed {
    path: path::PathBuf,
}

impl FileSeed {
    pub fn new(path: path::PathBuf) -> FileSeed {
        return FileSeed { path };
    }
}

#[async_trait]
impl SeedSource for FileSeed {
    fn describe(&self) -> String {
        return self.path.display().to_string();
    }

    #[allow(clippy::implicit_return)]
    async fn fetch(&self) -> Result<Session> {
        let payload = fs::read_to_string(&self.path).await?;
        let session: Session = serde_json::from_str(&payload)?;

        return Ok(session);
    }
}
