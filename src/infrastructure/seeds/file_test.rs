use anyhow::Result;
use test_utils::seed_session_json;
use test_utils::temp_data_dir;

use super::FileSeed;
use crate::domain::models::SeedSource;

#[tokio::test]
async fn it_reads_a_seed_file() -> Result<()> {
    let dir = temp_data_dir();
    let path = dir.path().join("seed.json");
    std::fs::write(&path, seed_session_json())?;

    let session = FileSeed::new(path).fetch().await?;
    assert_eq!(session.session_id, "2025-11-18-agentos-demo-seed");
    assert_eq!(session.steps.len(), 3);
    return Ok(());
}

#[tokio::test]
async fn it_fails_on_missing_file() {
    let dir = temp_data_dir();
    let res = FileSeed::new(dir.path().join("nope.json")).fetch().await;
    assert!(res.is_err());
}

#[tokio::test]
async fn it_fails_on_invalid_json() -> Result<()> {
    let dir = temp_data_dir();
    let path = dir.path().join("seed.json");
    std::fs::write(&path, "{\"title\": 1}")?;

    assert!(FileSeed::new(path).fetch().await.is_err());
    return Ok(());
}
