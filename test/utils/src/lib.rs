use tempfile::TempDir;

/// The bundled sample session, shaped like a seed resource.
pub fn seed_session_json() -> &'static str {
    return include_str!("../../../assets/workflow-log-sample.json");
}

pub fn temp_data_dir() -> TempDir {
    return tempfile::Builder::new()
        .prefix("stepmap-test")
        .tempdir()
        .unwrap();
}
