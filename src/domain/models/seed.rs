use anyhow::Result;
use async_trait::async_trait;

use super::Session;

#[async_trait]
pub trait SeedSource {
    /// Human readable description used in logs and CLI output.
    fn describe(&self) -> String;

    /// Fetches the single sample session used to bootstrap an empty store.
    async fn fetch(&self) -> Result<Session>;
}

pub type SeedBox = Box<dyn SeedSource + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// A valid document already existed.
    AlreadyInitialized,
    /// The seed session was written as the initial document.
    Seeded(String),
    /// The seed could not be loaded, an empty document was written instead.
    Empty,
}
