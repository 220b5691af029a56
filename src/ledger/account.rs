use std::fmt;

use rust_decimal::Decimal;

use super::{
    account_number::AccountNumber,
    movement::{Movement, MovementKind, DEFAULT_DEPOSIT_DESCRIPTION, DEFAULT_WITHDRAWAL_DESCRIPTION},
};
use crate::errors::{BankError, Result};

/// Overdraft allowance given to checking accounts unless configured otherwise.
pub const DEFAULT_OVERDRAFT_LIMIT: Decimal = Decimal::from_parts(500_000, 0, 0, false, 0);

/// Decides how much may leave an account given its current balance.
pub trait WithdrawalPolicy {
    fn max_withdrawable(&self, balance: Decimal) -> Decimal;

    /// The error reported when `requested` exceeds what the policy allows.
    fn refusal(&self, requested: Decimal, available: Decimal) -> BankError;
}

/// The account variants. Only the withdrawal policy differs between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Savings,
    Checking { overdraft_limit: Decimal },
}

impl AccountKind {
    pub fn checking() -> Self {
        AccountKind::Checking {
            overdraft_limit: DEFAULT_OVERDRAFT_LIMIT,
        }
    }

    pub fn overdraft_limit(&self) -> Decimal {
        match self {
            AccountKind::Savings => Decimal::ZERO,
            AccountKind::Checking { overdraft_limit } => *overdraft_limit,
        }
    }

    /// Parses the labels accepted on the command line and in registration forms.
    pub fn from_label(label: &str, overdraft_limit: Decimal) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "ahorros" | "savings" => Ok(AccountKind::Savings),
            "corriente" | "checking" => Ok(AccountKind::Checking { overdraft_limit }),
            _ => Err(BankError::UnknownAccountKind(label.to_string())),
        }
    }
}

impl WithdrawalPolicy for AccountKind {
    fn max_withdrawable(&self, balance: Decimal) -> Decimal {
        balance.saturating_add(self.overdraft_limit())
    }

    fn refusal(&self, requested: Decimal, available: Decimal) -> BankError {
        match self {
            AccountKind::Savings => BankError::InsufficientFunds {
                requested,
                available,
            },
            AccountKind::Checking { .. } => BankError::OverdraftExceeded {
                requested,
                available,
            },
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::Savings => f.write_str("Savings"),
            AccountKind::Checking { .. } => f.write_str("Checking"),
        }
    }
}

/// Balance and movement journal for one account number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    number: AccountNumber,
    kind: AccountKind,
    balance: Decimal,
    movements: Vec<Movement>,
}

impl Account {
    /// Opens an empty account with a zero balance.
    pub fn open(number: AccountNumber, kind: AccountKind) -> Self {
        Self {
            number,
            kind,
            balance: Decimal::ZERO,
            movements: Vec::new(),
        }
    }

    /// Rebuilds a persisted account. Movements must already be newest first.
    pub(crate) fn restore(
        number: AccountNumber,
        kind: AccountKind,
        balance: Decimal,
        movements: Vec<Movement>,
    ) -> Self {
        Self {
            number,
            kind,
            balance,
            movements,
        }
    }

    pub fn number(&self) -> &AccountNumber {
        &self.number
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Journal entries, newest first.
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn deposit(&mut self, amount: Decimal, description: Option<&str>) -> Result<()> {
        ensure_positive(amount)?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(BankError::BalanceOutOfRange {
                amount,
                balance: self.balance,
            })?;
        self.record(
            MovementKind::Deposit,
            amount,
            description.unwrap_or(DEFAULT_DEPOSIT_DESCRIPTION),
        );
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Decimal, description: Option<&str>) -> Result<()> {
        self.can_withdraw(amount)?;
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(BankError::BalanceOutOfRange {
                amount,
                balance: self.balance,
            })?;
        self.record(
            MovementKind::Withdrawal,
            amount,
            description.unwrap_or(DEFAULT_WITHDRAWAL_DESCRIPTION),
        );
        Ok(())
    }

    /// Checks a withdrawal against the account's policy without touching it.
    pub fn can_withdraw(&self, amount: Decimal) -> Result<()> {
        ensure_positive(amount)?;
        let available = self.kind.max_withdrawable(self.balance);
        if amount > available {
            return Err(self.kind.refusal(amount, available));
        }
        Ok(())
    }

    fn record(&mut self, kind: MovementKind, amount: Decimal, description: &str) {
        self.movements.insert(0, Movement::new(kind, amount, description));
    }
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        Err(BankError::InvalidAmount(amount))
    } else {
        Ok(())
    }
}
