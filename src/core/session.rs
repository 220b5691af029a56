use std::sync::Arc;

use tracing::{info, warn};

use crate::core::ledger_store::LedgerStore;
use crate::errors::{BankError, Result};
use crate::ledger::Client;
use crate::storage::{BlobStore, SESSION_KEY};

/// Remembers which client is logged in, in a single blob slot.
///
/// Operations that need the current client take a `Session` explicitly instead of reading
/// process-wide state.
pub struct Session {
    backend: Arc<dyn BlobStore>,
}

impl Session {
    pub fn new(backend: Arc<dyn BlobStore>) -> Self {
        Self { backend }
    }

    /// Checks credentials and records the username on success.
    pub fn login(&self, store: &LedgerStore, username: &str, secret: &str) -> Result<Client> {
        let client = store
            .find_by_username(username)?
            .filter(|client| client.verify_credential(secret.trim()));
        let Some(client) = client else {
            warn!(username = %username.trim(), "login rejected");
            return Err(BankError::InvalidCredentials);
        };
        self.backend.save(SESSION_KEY, client.username())?;
        info!(username = %client.username(), "client logged in");
        Ok(client)
    }

    pub fn current_user(&self) -> Result<Option<String>> {
        Ok(self
            .backend
            .load(SESSION_KEY)?
            .map(|raw| raw.trim().to_string())
            .filter(|username| !username.is_empty()))
    }

    /// Loads the logged-in client; a session naming a client that no longer exists counts as
    /// logged out.
    pub fn current_client(&self, store: &LedgerStore) -> Result<Client> {
        let username = self.current_user()?.ok_or(BankError::NotLoggedIn)?;
        store
            .find_by_username(&username)?
            .ok_or(BankError::NotLoggedIn)
    }

    pub fn logout(&self) -> Result<()> {
        if let Some(username) = self.current_user()? {
            info!(username = %username, "client logged out");
        }
        self.backend.remove(SESSION_KEY)
    }
}
