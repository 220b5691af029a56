use std::{path::PathBuf, sync::Arc};

use crate::config::{BankConfig, ConfigManager};
use crate::core::{ledger_store::LedgerStore, session::Session};
use crate::errors::Result;
use crate::storage::{BlobStore, JsonFileStore};

/// Everything a front end needs to run operations: settings, the client store, and the
/// session slot, all sharing one blob backend.
pub struct BankContext {
    pub config: BankConfig,
    pub store: LedgerStore,
    pub session: Session,
}

impl BankContext {
    /// Opens the application directory (`$BANK_CORE_HOME` or `~/.bank_core`).
    pub fn open_default() -> Result<Self> {
        let manager = ConfigManager::new()?;
        Self::open_with(&manager)
    }

    pub fn open_in(base: PathBuf) -> Result<Self> {
        let manager = ConfigManager::with_base_dir(base)?;
        Self::open_with(&manager)
    }

    fn open_with(manager: &ConfigManager) -> Result<Self> {
        let config = manager.load()?;
        let backend: Arc<dyn BlobStore> =
            Arc::new(JsonFileStore::new(config.resolve_data_dir(manager.base_dir()))?);
        Ok(Self::from_backend(config, backend))
    }

    pub fn from_backend(config: BankConfig, backend: Arc<dyn BlobStore>) -> Self {
        let store = LedgerStore::new(backend.clone())
            .with_account_number_attempts(config.account_number_attempts);
        Self {
            config,
            store,
            session: Session::new(backend),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AccountKind, Profile};
    use tempfile::tempdir;

    #[test]
    fn reopening_sees_previous_state() {
        let dir = tempdir().unwrap();
        {
            let context = BankContext::open_in(dir.path().to_path_buf()).unwrap();
            context
                .store
                .register(Profile::new("ana", "pw", "Ana", "G", "1"), AccountKind::Savings)
                .unwrap();
            context.session.login(&context.store, "ana", "pw").unwrap();
        }
        let context = BankContext::open_in(dir.path().to_path_buf()).unwrap();
        assert_eq!(context.session.current_user().unwrap().as_deref(), Some("ana"));
        assert!(dir.path().join("data").join("banco_clientes.json").exists());
    }
}
