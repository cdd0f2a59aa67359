#[cfg(test)]
#[path = "embedded_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use rust_embed::RustEmbed;

use crate::domain::models::SeedSource;
use crate::domain::models::Session;

pub const SAMPLE_FILE: &str = "workflow-log-sample.json";

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// The sample session bundled into the binary.
#[derive(Default)]
pub struct EmbeddedSeed {}

#[async_trait]
impl SeedSource for EmbeddedSeed {
    fn describe(&self) -> String {
        return format!("embedded {SAMPLE_FILE}");
    }

    #[allow(clippy::implicit_return)]
    async fn fetch(&self) -> Result<Session> {
        let file = match Assets::get(SAMPLE_FILE) {
            Some(file) => file,
            None => bail!(format!("{SAMPLE_FILE} is not bundled")),
        };

        let session: Session = serde_json::from_slice(&file.data)?;
        return Ok(session);
    }
}
