use std::collections::HashMap;

use super::{account_number::AccountNumber, client::Client};
use crate::errors::{BankError, Result};

/// The full client collection with lookups by username and by account number.
///
/// Both keys are unique; `insert` refuses duplicates and `replace` swaps a client in place,
/// so positions (and therefore the persisted order) never shift.
#[derive(Debug, Clone, Default)]
pub struct ClientBook {
    clients: Vec<Client>,
    by_username: HashMap<String, usize>,
    by_number: HashMap<AccountNumber, usize>,
}

impl ClientBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes an already-validated collection.
    pub fn from_clients(clients: Vec<Client>) -> Result<Self> {
        let mut book = Self::new();
        for client in clients {
            book.insert(client)?;
        }
        Ok(book)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn into_clients(self) -> Vec<Client> {
        self.clients
    }

    pub fn by_username(&self, username: &str) -> Option<&Client> {
        self.by_username.get(username).map(|&idx| &self.clients[idx])
    }

    pub fn by_account_number(&self, number: &AccountNumber) -> Option<&Client> {
        self.by_number.get(number).map(|&idx| &self.clients[idx])
    }

    pub fn contains_account_number(&self, number: &AccountNumber) -> bool {
        self.by_number.contains_key(number)
    }

    /// Appends a client, refusing a taken username or account number.
    pub fn insert(&mut self, client: Client) -> Result<()> {
        if self.by_username.contains_key(client.username()) {
            return Err(BankError::UsernameTaken(client.username().to_string()));
        }
        if self.by_number.contains_key(client.account_number()) {
            return Err(BankError::CorruptStore(format!(
                "account number `{}` is already assigned",
                client.account_number()
            )));
        }
        let idx = self.clients.len();
        self.by_username.insert(client.username().to_string(), idx);
        self.by_number.insert(client.account_number().clone(), idx);
        self.clients.push(client);
        Ok(())
    }

    /// Swaps in an updated copy of an existing client, matched by username.
    pub fn replace(&mut self, client: Client) -> Result<()> {
        let idx = *self
            .by_username
            .get(client.username())
            .ok_or_else(|| BankError::ClientNotFound(client.username().to_string()))?;
        if self.clients[idx].account_number() != client.account_number() {
            return Err(BankError::CorruptStore(format!(
                "client `{}` cannot change account number",
                client.username()
            )));
        }
        self.clients[idx] = client;
        Ok(())
    }
}
