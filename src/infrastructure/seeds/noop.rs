use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::SeedSource;
use crate::domain::models::Session;

/// Always fails, so initialization writes an empty document.
#[derive(Default)]
pub struct NoopSeed {}

#[async_trait]
impl SeedSource for NoopSeed {
    fn describe(&self) -> String {
        return "none".to_string();
    }

    #[allow(clippy::implicit_return)]
    async fn fetch(&self) -> Result<Session> {
        bail!("Seeding is disabled")
    }
}
