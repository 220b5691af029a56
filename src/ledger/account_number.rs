use std::{fmt, str::FromStr};

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::errors::{BankError, Result};

const PREFIX: &str = "AC";
const DIGITS: usize = 6;
const LOWEST: u32 = 100_000;
const HIGHEST: u32 = 999_999;

/// Account identifier of the form `AC` followed by exactly six ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let valid = trimmed
            .strip_prefix(PREFIX)
            .map(|digits| digits.len() == DIGITS && digits.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(false);
        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(BankError::InvalidAccountNumber(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountNumber {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = BankError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<AccountNumber> for String {
    fn from(value: AccountNumber) -> Self {
        value.0
    }
}

/// Produces candidate account numbers. Candidates are not guaranteed unique; callers
/// holding the full collection check for collisions.
pub trait AccountNumberSource {
    fn next_number(&mut self) -> Result<AccountNumber>;
}

/// Draws numbers uniformly from `AC100000..=AC999999`.
#[derive(Debug)]
pub struct RandomAccountNumbers<R: Rng = StdRng> {
    rng: R,
}

impl RandomAccountNumbers<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for RandomAccountNumbers<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomAccountNumbers<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn next(&mut self) -> AccountNumber {
        let value = self.rng.gen_range(LOWEST..=HIGHEST);
        AccountNumber(format!("{PREFIX}{value:0width$}", width = DIGITS))
    }
}

impl<R: Rng> AccountNumberSource for RandomAccountNumbers<R> {
    fn next_number(&mut self) -> Result<AccountNumber> {
        Ok(self.next())
    }
}

/// Wraps a source and re-rolls candidates that are already taken, giving up after
/// `max_attempts` draws.
pub struct CollisionFree<'a, S: AccountNumberSource + ?Sized, F: Fn(&AccountNumber) -> bool> {
    inner: &'a mut S,
    is_taken: F,
    max_attempts: u32,
}

impl<'a, S, F> CollisionFree<'a, S, F>
where
    S: AccountNumberSource + ?Sized,
    F: Fn(&AccountNumber) -> bool,
{
    pub fn new(inner: &'a mut S, is_taken: F, max_attempts: u32) -> Self {
        Self {
            inner,
            is_taken,
            max_attempts: max_attempts.max(1),
        }
    }
}

impl<S, F> AccountNumberSource for CollisionFree<'_, S, F>
where
    S: AccountNumberSource + ?Sized,
    F: Fn(&AccountNumber) -> bool,
{
    fn next_number(&mut self) -> Result<AccountNumber> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.inner.next_number()?;
            if !(self.is_taken)(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!(%candidate, attempt, "account number collision, drawing again");
        }
        Err(BankError::AccountNumbersExhausted(self.max_attempts))
    }
}
