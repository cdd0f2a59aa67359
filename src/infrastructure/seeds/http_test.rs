use anyhow::Result;
use test_utils::seed_session_json;

use super::HttpSeed;
use crate::domain::models::SeedSource;

const SEED_PATH: &str = "/data/workflow-log-sample.json";

#[tokio::test]
async fn it_fetches_the_seed_session() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", SEED_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(seed_session_json())
        .create();

    let seed = HttpSeed::new(format!("{}{SEED_PATH}", server.url()));
    let session = seed.fetch().await?;

    assert_eq!(session.session_id, "2025-11-18-agentos-demo-seed");
    assert_eq!(session.steps[0].actor, "Coach C");
    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_fails_on_error_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("GET", SEED_PATH).with_status(404).create();

    let seed = HttpSeed::new(format!("{}{SEED_PATH}", server.url()));
    let err = seed.fetch().await.unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"Failed to load sample data");
    mock.assert();
}

#[tokio::test]
async fn it_fails_on_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", SEED_PATH)
        .with_status(200)
        .with_body("not json")
        .create();

    let seed = HttpSeed::new(format!("{}{SEED_PATH}", server.url()));
    assert!(seed.fetch().await.is_err());
    mock.assert();
}
