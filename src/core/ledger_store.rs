use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use crate::errors::{BankError, Result};
use crate::ledger::{
    decode_clients, encode_clients, AccountKind, AccountNumber, AccountNumberSource, Client,
    ClientBook, CollisionFree, Profile, RandomAccountNumbers,
};
use crate::storage::{BlobStore, CLIENTS_KEY};

const DEFAULT_ACCOUNT_NUMBER_ATTEMPTS: u32 = 64;

/// The whole client collection, persisted as one blob.
///
/// Every mutation runs as load → modify → save while holding the store's single lock, so
/// two callers sharing the store cannot write back stale collections over each other.
pub struct LedgerStore {
    backend: Arc<dyn BlobStore>,
    /// The account number generator. Holding this lock is also what serializes every
    /// load → modify → save cycle.
    numbers: Mutex<Box<dyn AccountNumberSource + Send>>,
    account_number_attempts: u32,
}

impl LedgerStore {
    pub fn new(backend: Arc<dyn BlobStore>) -> Self {
        Self {
            backend,
            numbers: Mutex::new(Box::new(RandomAccountNumbers::new())),
            account_number_attempts: DEFAULT_ACCOUNT_NUMBER_ATTEMPTS,
        }
    }

    /// Replaces the account number generator, e.g. with a seeded one.
    pub fn with_account_numbers(mut self, numbers: impl AccountNumberSource + Send + 'static) -> Self {
        self.numbers = Mutex::new(Box::new(numbers));
        self
    }

    pub fn with_account_number_attempts(mut self, attempts: u32) -> Self {
        self.account_number_attempts = attempts.max(1);
        self
    }

    pub fn backend(&self) -> &Arc<dyn BlobStore> {
        &self.backend
    }

    /// Reads every client. An absent blob is an empty store.
    pub fn load_all(&self) -> Result<Vec<Client>> {
        match self.backend.load(CLIENTS_KEY)? {
            Some(blob) => {
                let clients = decode_clients(&blob)?;
                debug!(clients = clients.len(), "client collection loaded");
                Ok(clients)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Overwrites the stored collection with `clients`. A collection with a repeated username
    /// or account number is refused with `CorruptStore` and nothing is written.
    pub fn save_all(&self, clients: &[Client]) -> Result<()> {
        let _guard = self.lock()?;
        self.write(clients)
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<Client>> {
        let username = username.trim();
        Ok(self
            .load_all()?
            .into_iter()
            .find(|client| client.username() == username))
    }

    /// Accepts raw text; anything that is not a well-formed account number finds nothing.
    pub fn find_by_account_number(&self, number: &str) -> Result<Option<Client>> {
        let Ok(number) = AccountNumber::parse(number) else {
            return Ok(None);
        };
        Ok(self
            .load_all()?
            .into_iter()
            .find(|client| *client.account_number() == number))
    }

    /// Creates and persists a client with a new, unused account number.
    pub fn register(&self, profile: Profile, kind: AccountKind) -> Result<Client> {
        let username = profile.username.clone();
        let attempts = self.account_number_attempts;
        let client = self.update_with(|book, numbers| {
            if book.by_username(&profile.username).is_some() {
                return Err(BankError::UsernameTaken(profile.username.clone()));
            }
            let mut unused = CollisionFree::new(
                numbers,
                |candidate: &AccountNumber| book.contains_account_number(candidate),
                attempts,
            );
            let client = Client::register(profile, kind, &mut unused)?;
            book.insert(client.clone())?;
            Ok(client)
        })?;
        info!(
            username = %username,
            account = %client.account_number(),
            kind = %client.account().kind(),
            "client registered"
        );
        Ok(client)
    }

    /// Runs `apply` against a freshly loaded collection and saves it if `apply` succeeds.
    /// On error nothing is written.
    pub fn update<T>(&self, apply: impl FnOnce(&mut ClientBook) -> Result<T>) -> Result<T> {
        self.update_with(|book, _| apply(book))
    }

    fn update_with<T>(
        &self,
        apply: impl FnOnce(&mut ClientBook, &mut (dyn AccountNumberSource + Send)) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self.lock()?;
        let numbers: &mut (dyn AccountNumberSource + Send) = &mut **guard;
        let mut book = ClientBook::from_clients(self.load_all()?)?;
        let outcome = apply(&mut book, numbers)?;
        self.write(book.clients())?;
        Ok(outcome)
    }

    fn write(&self, clients: &[Client]) -> Result<()> {
        let blob = encode_clients(clients)?;
        self.backend.save(CLIENTS_KEY, &blob)?;
        debug!(clients = clients.len(), "client collection saved");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Box<dyn AccountNumberSource + Send>>> {
        self.numbers
            .lock()
            .map_err(|_| BankError::CorruptStore("ledger store lock poisoned".into()))
    }
}
