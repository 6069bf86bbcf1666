#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use anyhow::Result;

use super::credentials::CredentialStore;
use crate::domain::models::Session;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::api::ClientError;

/// Login lifecycle on top of the credential store. The store is the only
/// place the token lives between runs; the server owns everything else.
pub struct AuthService<S: CredentialStore> {
    store: S,
}

impl<S: CredentialStore> AuthService<S> {
    pub fn new(store: S) -> AuthService<S> {
        return AuthService { store };
    }

    pub async fn restore(&self) -> Option<Session> {
        match self.store.load().await {
            Ok(session) => return session,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted session");
                return None;
            }
        }
    }

    pub async fn register(
        &self,
        client: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        return client.register(email, password).await;
    }

    pub async fn login(&self, client: &ApiClient, email: &str, password: &str) -> Result<Session> {
        let token = client.login(email, password).await?;
        let session = Session::new(&token, email);
        self.store.save(&session).await?;

        return Ok(session);
    }

    /// Best-effort server-side cleanup, then an unconditional local teardown.
    /// A dead network must never leave a stale session behind.
    pub async fn logout(&self, client: &ApiClient) -> Result<()> {
        if let Err(err) = client.logout().await {
            tracing::error!(error = %err, "server-side logout failed, clearing local session anyway");
        }

        self.store.clear().await?;
        return Ok(());
    }
}
