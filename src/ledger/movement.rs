use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DEPOSIT_DESCRIPTION: &str = "Deposit";
pub const DEFAULT_WITHDRAWAL_DESCRIPTION: &str = "Withdrawal";

/// Direction of a journal entry. Serialized with the labels the persisted store uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MovementKind {
    #[serde(rename = "DEPÓSITO")]
    Deposit,
    #[serde(rename = "RETIRO")]
    Withdrawal,
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MovementKind::Deposit => "DEPOSIT",
            MovementKind::Withdrawal => "WITHDRAWAL",
        };
        f.write_str(label)
    }
}

/// One immutable entry of an account's journal.
///
/// Movements are only produced by a successful deposit or withdrawal; fields are private so
/// nothing outside the ledger can rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movement {
    #[serde(rename = "tipo")]
    kind: MovementKind,
    #[serde(rename = "monto", with = "rust_decimal::serde::arbitrary_precision")]
    amount: Decimal,
    #[serde(rename = "descripcion")]
    description: String,
    #[serde(rename = "fecha")]
    timestamp: DateTime<Utc>,
}

impl Movement {
    pub(crate) fn new(kind: MovementKind, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            kind,
            amount,
            description: description.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn kind(&self) -> MovementKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Signed effect of this movement on the balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            MovementKind::Deposit => self.amount,
            MovementKind::Withdrawal => -self.amount,
        }
    }
}
