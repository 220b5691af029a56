use rust_decimal::Decimal;

use super::{
    account::{Account, AccountKind},
    account_number::{AccountNumber, AccountNumberSource},
    movement::Movement,
};
use crate::errors::Result;

/// Identity and credentials captured at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub username: String,
    pub credential_secret: String,
}

impl Profile {
    pub fn new(
        username: impl Into<String>,
        credential_secret: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        national_id: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
            national_id: national_id.into().trim().to_string(),
            username: username.into().trim().to_string(),
            credential_secret: credential_secret.into().trim().to_string(),
        }
    }
}

/// A customer bound to exactly one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    profile: Profile,
    account: Account,
}

impl Client {
    /// Builds a new client with a freshly numbered, empty account. Nothing is persisted.
    pub fn register(
        profile: Profile,
        kind: AccountKind,
        numbers: &mut dyn AccountNumberSource,
    ) -> Result<Self> {
        let number = numbers.next_number()?;
        Ok(Self {
            profile,
            account: Account::open(number, kind),
        })
    }

    pub(crate) fn from_parts(profile: Profile, account: Account) -> Self {
        Self { profile, account }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn username(&self) -> &str {
        &self.profile.username
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.profile.first_name, self.profile.last_name)
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn account_number(&self) -> &AccountNumber {
        self.account.number()
    }

    pub fn verify_credential(&self, secret: &str) -> bool {
        self.profile.credential_secret == secret
    }

    pub fn deposit(&mut self, amount: Decimal, description: Option<&str>) -> Result<()> {
        self.account.deposit(amount, description)
    }

    pub fn withdraw(&mut self, amount: Decimal, description: Option<&str>) -> Result<()> {
        self.account.withdraw(amount, description)
    }

    pub fn balance(&self) -> Decimal {
        self.account.balance()
    }

    pub fn movements(&self) -> &[Movement] {
        self.account.movements()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::account_number::RandomAccountNumbers;
    use rust_decimal_macros::dec;

    fn profile() -> Profile {
        Profile::new(" ana ", "s3cret", "Ana", "Gómez", "1020304050")
    }

    #[test]
    fn register_opens_empty_account_of_requested_kind() {
        let mut numbers = RandomAccountNumbers::new();
        let client = Client::register(profile(), AccountKind::checking(), &mut numbers).unwrap();

        assert_eq!(client.username(), "ana");
        assert_eq!(client.full_name(), "Ana Gómez");
        assert_eq!(client.balance(), Decimal::ZERO);
        assert!(client.movements().is_empty());
        assert_eq!(client.account().kind(), AccountKind::checking());
        assert!(client.account_number().as_str().starts_with("AC"));
    }

    #[test]
    fn delegates_mutations_to_owned_account() {
        let mut numbers = RandomAccountNumbers::new();
        let mut client = Client::register(profile(), AccountKind::Savings, &mut numbers).unwrap();
        client.deposit(dec!(80), None).unwrap();
        client.withdraw(dec!(30), Some("Groceries")).unwrap();

        assert_eq!(client.balance(), dec!(50));
        assert_eq!(client.movements()[0].description(), "Groceries");
        assert!(client.verify_credential("s3cret"));
        assert!(!client.verify_credential("S3CRET"));
    }
}
