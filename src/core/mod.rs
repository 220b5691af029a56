//! Persistence-aware operations: the ledger store, sessions, and transaction services.

pub mod context;
pub mod ledger_store;
pub mod services;
pub mod session;

pub use context::BankContext;
pub use ledger_store::LedgerStore;
pub use services::TransactionService;
pub use session::Session;
