#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::SeedSource;
use crate::domain::models::Session;

/// Fetches the seed session from a static JSON resource. No retries, and no
/// timeout beyond the client default.
pub struct HttpSeed {
    url: String,
}

impl HttpSeed {
    pub fn new(url: String) -> HttpSeed {
        return HttpSeed { url };
    }
}

#[async_trait]
impl SeedSource for HttpSeed {
    fn describe(&self) -> String {
        return self.url.to_string();
    }

    #[allow(clippy::implicit_return)]
    async fn fetch(&self) -> Result<Session> {
        let res = reqwest::Client::new().get(&self.url).send().await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                url = %self.url,
                "Failed to load sample data"
            );
            bail!("Failed to load sample data");
        }

        let session = res.json::<Session>().await?;
        return Ok(session);
    }
}
