use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::ledger_store::LedgerStore;
use crate::errors::{BankError, Result};
use crate::ledger::{AccountNumber, Client, ClientBook};

/// Deposit, withdrawal, and transfer against persisted clients.
///
/// Each operation applies to the stored copy of the client inside the store's update cycle
/// and, once saved, refreshes the caller's `Client` with the stored state.
pub struct TransactionService;

impl TransactionService {
    pub fn deposit(
        store: &LedgerStore,
        client: &mut Client,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<()> {
        let updated = store.update(|book| {
            let mut stored = stored_copy(book, client.username())?;
            stored.deposit(amount, description)?;
            book.replace(stored.clone())?;
            Ok(stored)
        });
        let updated = log_failure("deposit", client, updated)?;
        info!(
            account = %updated.account_number(),
            %amount,
            balance = %updated.balance(),
            "deposit applied"
        );
        *client = updated;
        Ok(())
    }

    pub fn withdraw(
        store: &LedgerStore,
        client: &mut Client,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<()> {
        let updated = store.update(|book| {
            let mut stored = stored_copy(book, client.username())?;
            stored.withdraw(amount, description)?;
            book.replace(stored.clone())?;
            Ok(stored)
        });
        let updated = log_failure("withdraw", client, updated)?;
        info!(
            account = %updated.account_number(),
            %amount,
            balance = %updated.balance(),
            "withdrawal applied"
        );
        *client = updated;
        Ok(())
    }

    /// Moves `amount` from `source` to the account numbered `destination`.
    ///
    /// Both legs run on copies; the collection is saved once with both applied, or not at
    /// all if either leg is refused.
    pub fn transfer(
        store: &LedgerStore,
        source: &mut Client,
        destination: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<()> {
        let outcome = store.update(|book| {
            let target_number = AccountNumber::parse(destination)
                .map_err(|_| BankError::DestinationNotFound(destination.trim().to_string()))?;
            let mut target = book
                .by_account_number(&target_number)
                .cloned()
                .ok_or_else(|| BankError::DestinationNotFound(target_number.to_string()))?;
            let mut origin = stored_copy(book, source.username())?;
            if origin.account_number() == target.account_number() {
                return Err(BankError::SameAccountTransfer(target_number.to_string()));
            }

            let outgoing = leg_description("Transfer to", &target_number, description);
            let incoming = leg_description("Transfer from", origin.account_number(), description);
            origin.withdraw(amount, Some(&outgoing))?;
            target.deposit(amount, Some(&incoming))?;

            book.replace(origin.clone())?;
            book.replace(target)?;
            Ok(origin)
        });
        let origin = log_failure("transfer", source, outcome)?;
        info!(
            from = %origin.account_number(),
            to = %destination.trim(),
            %amount,
            balance = %origin.balance(),
            "transfer applied"
        );
        *source = origin;
        Ok(())
    }
}

fn stored_copy(book: &ClientBook, username: &str) -> Result<Client> {
    book.by_username(username)
        .cloned()
        .ok_or_else(|| BankError::ClientNotFound(username.to_string()))
}

fn leg_description(prefix: &str, counterpart: &AccountNumber, note: Option<&str>) -> String {
    match note.map(str::trim).filter(|note| !note.is_empty()) {
        Some(note) => format!("{prefix} {counterpart}: {note}"),
        None => format!("{prefix} {counterpart}"),
    }
}

fn log_failure<T>(operation: &str, client: &Client, outcome: Result<T>) -> Result<T> {
    if let Err(err) = &outcome {
        warn!(operation, username = %client.username(), error = %err, "operation refused");
    }
    outcome
}
