use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    errors::{BankError, Result},
    ledger::DEFAULT_OVERDRAFT_LIMIT,
    storage::{BlobStore, JsonFileStore},
    utils::paths,
};

const CONFIG_KEY: &str = "config";
const DEFAULT_ACCOUNT_NUMBER_ATTEMPTS: u32 = 64;

/// User-tunable settings, persisted as `config.json` in the application directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankConfig {
    /// Overrides where blobs are stored. Defaults to `<app dir>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Overdraft allowance given to newly registered checking accounts.
    #[serde(
        default = "BankConfig::default_overdraft_limit",
        with = "rust_decimal::serde::arbitrary_precision"
    )]
    pub overdraft_limit: Decimal,
    #[serde(default = "BankConfig::default_account_number_attempts")]
    pub account_number_attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            overdraft_limit: Self::default_overdraft_limit(),
            account_number_attempts: Self::default_account_number_attempts(),
            log_filter: None,
        }
    }
}

impl BankConfig {
    pub fn default_overdraft_limit() -> Decimal {
        DEFAULT_OVERDRAFT_LIMIT
    }

    pub fn default_account_number_attempts() -> u32 {
        DEFAULT_ACCOUNT_NUMBER_ATTEMPTS
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| paths::data_dir_in(base))
    }

    fn validate(self) -> Result<Self> {
        if self.overdraft_limit < Decimal::ZERO {
            return Err(BankError::InvalidConfig(format!(
                "overdraft_limit must not be negative, got {}",
                self.overdraft_limit
            )));
        }
        if self.account_number_attempts == 0 {
            return Err(BankError::InvalidConfig(
                "account_number_attempts must be at least 1".into(),
            ));
        }
        Ok(self)
    }
}

/// Loads and saves [`BankConfig`] under a base directory.
pub struct ConfigManager {
    base: PathBuf,
    files: JsonFileStore,
}

impl ConfigManager {
    /// Uses `$BANK_CORE_HOME` or `~/.bank_core`.
    pub fn new() -> Result<Self> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        let files = JsonFileStore::new(base.clone())?;
        Ok(Self { base, files })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> PathBuf {
        self.files.blob_path(CONFIG_KEY)
    }

    pub fn load(&self) -> Result<BankConfig> {
        match self.files.load(CONFIG_KEY)? {
            Some(data) => serde_json::from_str::<BankConfig>(&data)
                .map_err(|err| BankError::InvalidConfig(err.to_string()))?
                .validate(),
            None => Ok(BankConfig::default()),
        }
    }

    pub fn save(&self, config: &BankConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| BankError::InvalidConfig(err.to_string()))?;
        self.files.save(CONFIG_KEY, &json)
    }
}
