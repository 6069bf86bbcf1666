use anyhow::Result;

use super::CredentialStore;
use super::DiskCredentialStore;
use super::MemoryCredentialStore;
use crate::domain::models::Session;

#[tokio::test]
async fn it_round_trips_sessions_on_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = DiskCredentialStore::new(dir.path().join("nested/session.json"));

    assert!(store.load().await?.is_none());

    let session = Session::new("token123", "user@example.com");
    store.save(&session).await?;

    // A fresh store over the same path simulates a restart.
    let reopened = DiskCredentialStore::new(dir.path().join("nested/session.json"));
    let restored = reopened.load().await?;
    assert_eq!(restored, Some(session));

    return Ok(());
}

#[tokio::test]
async fn it_clears_sessions_on_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = DiskCredentialStore::new(dir.path().join("session.json"));

    store
        .save(&Session::new("token123", "user@example.com"))
        .await?;
    store.clear().await?;

    assert!(store.load().await?.is_none());
    return Ok(());
}

#[tokio::test]
async fn it_tolerates_clearing_a_missing_session() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = DiskCredentialStore::new(dir.path().join("session.json"));

    store.clear().await?;
    assert!(store.load().await?.is_none());
    return Ok(());
}

#[tokio::test]
async fn it_round_trips_sessions_in_memory() -> Result<()> {
    let store = MemoryCredentialStore::default();
    let session = Session::new("token123", "user@example.com");

    store.save(&session).await?;
    assert_eq!(store.load().await?, Some(session));

    store.clear().await?;
    assert!(store.load().await?.is_none());
    return Ok(());
}
