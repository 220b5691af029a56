mod common;

use std::{fs, sync::Arc, thread};

use bank_core::{
    core::{LedgerStore, TransactionService},
    errors::BankError,
    ledger::{AccountKind, Profile},
    storage::{BlobStore, JsonFileStore, CLIENTS_KEY},
};
use common::{register, setup_test_env, temp_base};
use rust_decimal_macros::dec;

const LEGACY_BLOB: &str = r#"[
  {
    "nombre": "Ana",
    "apellido": "Gómez",
    "documento": "1020",
    "usuario": "ana",
    "contrasena": "pw",
    "cuenta": {
      "tipo": "Corriente",
      "numeroCuenta": "AC123456",
      "saldo": -150.5,
      "limiteSobregiro": 500000,
      "movimientos": [
        {"tipo": "RETIRO", "monto": 200.5, "descripcion": "Retiro", "fecha": "2024-03-01T10:00:00.000Z"},
        {"tipo": "DEPÓSITO", "monto": 50, "descripcion": "Depósito", "fecha": "2024-02-01T10:00:00.000Z"}
      ]
    }
  },
  {
    "nombre": "Luis",
    "apellido": "Pérez",
    "documento": "3040",
    "usuario": "luis",
    "contrasena": "pw",
    "cuenta": {"tipo": "Ahorros", "numeroCuenta": "AC654321", "saldo": 0}
  }
]"#;

fn file_store() -> (LedgerStore, Arc<JsonFileStore>) {
    let backend = Arc::new(JsonFileStore::new(temp_base().join("data")).unwrap());
    (LedgerStore::new(backend.clone()), backend)
}

#[test]
fn legacy_blob_loads_with_variants_and_journal() {
    let (store, backend) = file_store();
    backend.save(CLIENTS_KEY, LEGACY_BLOB).unwrap();

    let ana = store.find_by_username("ana").unwrap().unwrap();
    assert_eq!(ana.account().kind(), AccountKind::checking());
    assert_eq!(ana.balance(), dec!(-150.5));
    assert_eq!(ana.movements().len(), 2);
    assert_eq!(ana.movements()[0].amount(), dec!(200.5));

    let luis = store.find_by_account_number(" AC654321 ").unwrap().unwrap();
    assert_eq!(luis.username(), "luis");
    assert_eq!(luis.account().kind(), AccountKind::Savings);
    assert!(luis.movements().is_empty());
    assert!(store.find_by_account_number("AC000000").unwrap().is_none());
    assert!(store.find_by_account_number("nonsense").unwrap().is_none());
}

#[test]
fn saved_blob_uses_legacy_field_names() {
    let (context, base) = setup_test_env();
    let mut ana = register(&context, "ana", AccountKind::checking());
    let luis = register(&context, "luis", AccountKind::Savings);
    TransactionService::deposit(&context.store, &mut ana, dec!(12.5), None).unwrap();

    let raw = fs::read_to_string(base.join("data").join("banco_clientes.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let records = value.as_array().unwrap();
    let ana_record = records.iter().find(|r| r["usuario"] == "ana").unwrap();
    assert_eq!(ana_record["cuenta"]["tipo"], "Corriente");
    assert_eq!(ana_record["cuenta"]["saldo"], 12.5);
    assert_eq!(ana_record["cuenta"]["limiteSobregiro"], 500000.0);
    assert_eq!(ana_record["cuenta"]["movimientos"][0]["tipo"], "DEPÓSITO");

    let luis_record = records.iter().find(|r| r["usuario"] == "luis").unwrap();
    assert_eq!(luis_record["cuenta"]["tipo"], "Ahorros");
    assert_eq!(
        luis_record["cuenta"]["numeroCuenta"],
        luis.account_number().as_str()
    );
    assert!(luis_record["cuenta"].get("limiteSobregiro").is_none());
}

#[test]
fn unknown_account_kind_is_reported() {
    let (store, backend) = file_store();
    backend
        .save(CLIENTS_KEY, &LEGACY_BLOB.replace("\"Ahorros\"", "\"Plazo\""))
        .unwrap();
    assert!(matches!(
        store.load_all(),
        Err(BankError::UnknownAccountKind(kind)) if kind == "Plazo"
    ));
}

#[test]
fn malformed_blob_is_corrupt_and_left_untouched() {
    let (store, backend) = file_store();
    backend.save(CLIENTS_KEY, "{ not json").unwrap();

    assert!(matches!(store.load_all(), Err(BankError::CorruptStore(_))));
    let err = store
        .register(Profile::new("ana", "pw", "Ana", "G", "1"), AccountKind::Savings)
        .unwrap_err();
    assert!(matches!(err, BankError::CorruptStore(_)));
    assert_eq!(backend.load(CLIENTS_KEY).unwrap().as_deref(), Some("{ not json"));
}

#[test]
fn duplicate_account_numbers_on_disk_are_corrupt() {
    let (store, backend) = file_store();
    backend
        .save(CLIENTS_KEY, &LEGACY_BLOB.replace("AC654321", "AC123456"))
        .unwrap();
    assert!(matches!(store.load_all(), Err(BankError::CorruptStore(_))));
}

#[test]
fn save_all_then_load_all_round_trips() {
    let (store, backend) = file_store();
    backend.save(CLIENTS_KEY, LEGACY_BLOB).unwrap();
    let clients = store.load_all().unwrap();

    let (other, _) = file_store();
    other.save_all(&clients).unwrap();
    assert_eq!(other.load_all().unwrap(), clients);
}

#[test]
fn high_precision_balances_survive_a_file_round_trip() {
    let (context, base) = setup_test_env();
    let mut ana = register(&context, "ana", AccountKind::Savings);
    TransactionService::deposit(&context.store, &mut ana, dec!(12345678901234.56789), None)
        .unwrap();

    let reloaded = context.store.load_all().unwrap();
    assert_eq!(reloaded, vec![ana.clone()]);
    assert_eq!(reloaded[0].movements()[0].amount(), dec!(12345678901234.56789));

    let raw = fs::read_to_string(base.join("data").join("banco_clientes.json")).unwrap();
    assert!(raw.contains("\"saldo\": 12345678901234.56789"));
}

#[test]
fn save_all_with_repeated_client_keeps_store_loadable() {
    let (context, _) = setup_test_env();
    let ana = register(&context, "ana", AccountKind::Savings);

    assert!(matches!(
        context.store.save_all(&[ana.clone(), ana.clone()]),
        Err(BankError::CorruptStore(_))
    ));
    assert_eq!(context.store.load_all().unwrap(), vec![ana]);
}

#[test]
fn concurrent_deposits_are_not_lost() {
    let (store, _) = file_store();
    let store = Arc::new(store);
    store
        .register(Profile::new("ana", "pw", "Ana", "G", "1"), AccountKind::Savings)
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut ana = store.find_by_username("ana").unwrap().unwrap();
                for _ in 0..5 {
                    TransactionService::deposit(&store, &mut ana, dec!(1), None).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let ana = store.find_by_username("ana").unwrap().unwrap();
    assert_eq!(ana.balance(), dec!(40));
    assert_eq!(ana.movements().len(), 40);
}
