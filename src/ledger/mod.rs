//! Account, client, and movement journal domain models plus their persisted form.

pub mod account;
pub mod account_number;
pub mod client;
pub mod client_book;
pub mod movement;
pub mod record;

pub use account::{Account, AccountKind, WithdrawalPolicy, DEFAULT_OVERDRAFT_LIMIT};
pub use account_number::{AccountNumber, AccountNumberSource, CollisionFree, RandomAccountNumbers};
pub use client::{Client, Profile};
pub use client_book::ClientBook;
pub use movement::{Movement, MovementKind};
pub use record::{decode_clients, encode_clients};
