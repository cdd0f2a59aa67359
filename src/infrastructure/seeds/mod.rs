pub mod embedded;
pub mod file;
pub mod http;
pub mod noop;

use crate::domain::models::SeedBox;

pub struct SeedManager {}

impl SeedManager {
    /// Resolves a seed setting: `embedded`, `none`, an `http(s)://` URL, or
    /// anything else as a local file path.
    pub fn get(source: &str) -> SeedBox {
        if source == "embedded" {
            return Box::<embedded::EmbeddedSeed>::default();
        }

        if source == "none" || source.is_empty() {
            return Box::<noop::NoopSeed>::default();
        }

        if source.starts_with("http://") || source.starts_with("https://") {
            return Box::new(http::HttpSeed::new(source.to_string()));
        }

        return Box::new(file::FileSeed::new(source.into()));
    }
}
