//! Secret-file resolution through the live service.
//!
//! The secret is re-read on every request, so rewriting the mounted file
//! rotates the key without a restart.

use auth_gate_test_utils::{
    env_vars, TestAuthGateServer, TestTokenBuilder, OTHER_SECRET, TEST_SECRET,
};
use std::io::Write;

async fn status_for(server: &TestAuthGateServer, token: &str) -> Result<u16, anyhow::Error> {
    let response = reqwest::Client::new()
        .get(format!("{}/validate", server.url()))
        .header("cookie", format!("token={token}"))
        .send()
        .await?;
    Ok(response.status().as_u16())
}

#[tokio::test]
async fn test_secret_read_from_file() -> Result<(), anyhow::Error> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "{TEST_SECRET}")?;
    let path = file.path().to_string_lossy().to_string();

    let server =
        TestAuthGateServer::spawn(env_vars(&[("WEBUI_SECRET_KEY_FILE", path.as_str())])).await?;

    let token = TestTokenBuilder::new().sign(TEST_SECRET);
    assert_eq!(status_for(&server, &token).await?, 200);
    Ok(())
}

#[tokio::test]
async fn test_rotation_takes_effect_without_restart() -> Result<(), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("secret");
    std::fs::write(&path, TEST_SECRET)?;
    let path_str = path.to_string_lossy().to_string();

    let server =
        TestAuthGateServer::spawn(env_vars(&[("WEBUI_SECRET_KEY_FILE", path_str.as_str())]))
            .await?;

    let old_token = TestTokenBuilder::new().sign(TEST_SECRET);
    let new_token = TestTokenBuilder::new().sign(OTHER_SECRET);

    assert_eq!(status_for(&server, &old_token).await?, 200);
    assert_eq!(status_for(&server, &new_token).await?, 401);

    std::fs::write(&path, OTHER_SECRET)?;

    assert_eq!(status_for(&server, &old_token).await?, 401);
    assert_eq!(status_for(&server, &new_token).await?, 200);
    Ok(())
}

#[tokio::test]
async fn test_deleted_secret_file_fails_closed() -> Result<(), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("secret");
    std::fs::write(&path, TEST_SECRET)?;
    let path_str = path.to_string_lossy().to_string();

    let server =
        TestAuthGateServer::spawn(env_vars(&[("WEBUI_SECRET_KEY_FILE", path_str.as_str())]))
            .await?;
    let token = TestTokenBuilder::new().sign(TEST_SECRET);

    assert_eq!(status_for(&server, &token).await?, 200);

    std::fs::remove_file(&path)?;

    let response = reqwest::Client::new()
        .get(format!("{}/validate", server.url()))
        .header("cookie", format!("token={token}"))
        .send()
        .await?;
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "secret missing");
    Ok(())
}

#[tokio::test]
async fn test_direct_variable_wins_over_file() -> Result<(), anyhow::Error> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "{OTHER_SECRET}")?;
    let path = file.path().to_string_lossy().to_string();

    let server = TestAuthGateServer::spawn(env_vars(&[
        ("WEBUI_SECRET_KEY", TEST_SECRET),
        ("WEBUI_SECRET_KEY_FILE", path.as_str()),
    ]))
    .await?;

    let token = TestTokenBuilder::new().sign(TEST_SECRET);
    assert_eq!(status_for(&server, &token).await?, 200);
    Ok(())
}
