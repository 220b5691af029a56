use thiserror::Error;

/// Failures surfaced by account, store, and session operations.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("Invalid amount: {0} (amounts must be greater than zero)")]
    InvalidAmount(rust_decimal::Decimal),
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: rust_decimal::Decimal,
        available: rust_decimal::Decimal,
    },
    #[error("Overdraft limit exceeded: requested {requested}, at most {available} can be withdrawn")]
    OverdraftExceeded {
        requested: rust_decimal::Decimal,
        available: rust_decimal::Decimal,
    },
    #[error("Amount {amount} would take the balance of {balance} out of range")]
    BalanceOutOfRange {
        amount: rust_decimal::Decimal,
        balance: rust_decimal::Decimal,
    },
    #[error("Destination account `{0}` not found")]
    DestinationNotFound(String),
    #[error("Cannot transfer from account `{0}` to itself")]
    SameAccountTransfer(String),
    #[error("Username `{0}` is already taken")]
    UsernameTaken(String),
    #[error("Client `{0}` not found")]
    ClientNotFound(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("No client is logged in")]
    NotLoggedIn,
    #[error("Invalid account number `{0}` (expected AC followed by 6 digits)")]
    InvalidAccountNumber(String),
    #[error("Could not find a free account number after {0} attempts")]
    AccountNumbersExhausted(u32),
    #[error("Corrupt store: {0}")]
    CorruptStore(String),
    #[error("Unknown account kind `{0}`")]
    UnknownAccountKind(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BankError>;
