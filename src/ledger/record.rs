//! Persisted shape of the client collection.
//!
//! The blob is a JSON array of client records with Spanish field names, the layout the
//! browser-based bank has always written, so existing data keeps loading.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    account::{Account, AccountKind, DEFAULT_OVERDRAFT_LIMIT},
    account_number::AccountNumber,
    client::{Client, Profile},
    movement::Movement,
};
use crate::errors::{BankError, Result};

const SAVINGS_TAG: &str = "Ahorros";
const CHECKING_TAG: &str = "Corriente";

#[derive(Debug, Serialize, Deserialize)]
struct ClientRecord {
    nombre: String,
    apellido: String,
    documento: String,
    usuario: String,
    contrasena: String,
    cuenta: AccountRecord,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountRecord {
    tipo: String,
    numero_cuenta: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    saldo: Decimal,
    #[serde(default)]
    movimientos: Option<Vec<Movement>>,
    #[serde(
        default,
        with = "rust_decimal::serde::arbitrary_precision_option",
        skip_serializing_if = "Option::is_none"
    )]
    limite_sobregiro: Option<Decimal>,
}

impl From<&Client> for ClientRecord {
    fn from(client: &Client) -> Self {
        let profile = client.profile();
        let account = client.account();
        let (tipo, limite_sobregiro) = match account.kind() {
            AccountKind::Savings => (SAVINGS_TAG, None),
            AccountKind::Checking { overdraft_limit } => (CHECKING_TAG, Some(overdraft_limit)),
        };
        Self {
            nombre: profile.first_name.clone(),
            apellido: profile.last_name.clone(),
            documento: profile.national_id.clone(),
            usuario: profile.username.clone(),
            contrasena: profile.credential_secret.clone(),
            cuenta: AccountRecord {
                tipo: tipo.to_string(),
                numero_cuenta: account.number().to_string(),
                saldo: account.balance(),
                movimientos: Some(account.movements().to_vec()),
                limite_sobregiro,
            },
        }
    }
}

impl TryFrom<ClientRecord> for Client {
    type Error = BankError;

    fn try_from(record: ClientRecord) -> Result<Self> {
        let ClientRecord {
            nombre,
            apellido,
            documento,
            usuario,
            contrasena,
            cuenta,
        } = record;
        let kind = match cuenta.tipo.as_str() {
            SAVINGS_TAG => AccountKind::Savings,
            CHECKING_TAG => AccountKind::Checking {
                overdraft_limit: cuenta.limite_sobregiro.unwrap_or(DEFAULT_OVERDRAFT_LIMIT),
            },
            other => return Err(BankError::UnknownAccountKind(other.to_string())),
        };
        let number = AccountNumber::parse(&cuenta.numero_cuenta).map_err(|_| {
            BankError::CorruptStore(format!(
                "client `{}` has malformed account number `{}`",
                usuario, cuenta.numero_cuenta
            ))
        })?;
        let movements = cuenta.movimientos.unwrap_or_default();
        if let Some(movement) = movements.iter().find(|m| m.amount() <= Decimal::ZERO) {
            return Err(BankError::CorruptStore(format!(
                "client `{}` has a movement with non-positive amount {}",
                usuario,
                movement.amount()
            )));
        }
        let account = Account::restore(number, kind, cuenta.saldo, movements);
        let profile = Profile {
            first_name: nombre,
            last_name: apellido,
            national_id: documento,
            username: usuario,
            credential_secret: contrasena,
        };
        Ok(Client::from_parts(profile, account))
    }
}

/// Serializes the whole collection into one blob.
/// Refuses collections that could not be decoded again.
pub fn encode_clients(clients: &[Client]) -> Result<String> {
    ensure_unique(clients)?;
    let records: Vec<ClientRecord> = clients.iter().map(ClientRecord::from).collect();
    serde_json::to_string_pretty(&records)
        .map_err(|err| BankError::CorruptStore(format!("unable to encode clients: {err}")))
}

/// Rebuilds the collection, restoring each account as its persisted variant.
pub fn decode_clients(blob: &str) -> Result<Vec<Client>> {
    let records: Vec<ClientRecord> = serde_json::from_str(blob)
        .map_err(|err| BankError::CorruptStore(format!("unable to decode clients: {err}")))?;
    let clients = records
        .into_iter()
        .map(Client::try_from)
        .collect::<Result<Vec<_>>>()?;
    ensure_unique(&clients)?;
    Ok(clients)
}

fn ensure_unique(clients: &[Client]) -> Result<()> {
    let mut usernames = HashSet::new();
    let mut numbers = HashSet::new();
    for client in clients {
        if !usernames.insert(client.username()) {
            return Err(BankError::CorruptStore(format!(
                "username `{}` appears more than once",
                client.username()
            )));
        }
        if !numbers.insert(client.account_number()) {
            return Err(BankError::CorruptStore(format!(
                "account number `{}` appears more than once",
                client.account_number()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::movement::MovementKind;
    use rust_decimal_macros::dec;

    const LEGACY_BLOB: &str = r#"[
        {"nombre":"Ana","apellido":"Gómez","documento":"10203","usuario":"ana","contrasena":"pw",
         "cuenta":{"numeroCuenta":"AC482913","saldo":1500,"movimientos":[
            {"tipo":"RETIRO","monto":500,"descripcion":"Retiro","fecha":"2024-05-02T09:00:00.000Z"},
            {"tipo":"DEPÓSITO","monto":2000,"descripcion":"Depósito","fecha":"2024-05-01T09:00:00.000Z"}
         ],"tipo":"Ahorros"}},
        {"nombre":"Luis","apellido":"Mora","documento":"40506","usuario":"luis","contrasena":"pw",
         "cuenta":{"numeroCuenta":"AC100200","saldo":-20000,"movimientos":[],
                   "tipo":"Corriente","limiteSobregiro":500000}}
    ]"#;

    #[test]
    fn decodes_records_written_by_the_web_front_end() {
        let clients = decode_clients(LEGACY_BLOB).expect("decode legacy blob");
        assert_eq!(clients.len(), 2);

        let ana = &clients[0];
        assert_eq!(ana.account().kind(), AccountKind::Savings);
        assert_eq!(ana.balance(), dec!(1500));
        assert_eq!(ana.movements()[0].kind(), MovementKind::Withdrawal);
        assert_eq!(ana.movements()[1].kind(), MovementKind::Deposit);

        let luis = &clients[1];
        assert_eq!(luis.account().kind(), AccountKind::checking());
        assert_eq!(luis.balance(), dec!(-20000));
    }

    #[test]
    fn missing_movements_and_limit_fall_back_to_defaults() {
        let blob = r#"[{"nombre":"A","apellido":"B","documento":"1","usuario":"a","contrasena":"x",
            "cuenta":{"tipo":"Corriente","numeroCuenta":"AC999999","saldo":0}}]"#;
        let clients = decode_clients(blob).unwrap();
        assert!(clients[0].movements().is_empty());
        assert_eq!(
            clients[0].account().kind().overdraft_limit(),
            DEFAULT_OVERDRAFT_LIMIT
        );
    }

    #[test]
    fn unknown_discriminator_is_rejected() {
        let blob = LEGACY_BLOB.replace("\"Ahorros\"", "\"Inversion\"");
        match decode_clients(&blob) {
            Err(BankError::UnknownAccountKind(kind)) => assert_eq!(kind, "Inversion"),
            other => panic!("expected unknown kind, got {other:?}"),
        }
    }

    #[test]
    fn malformed_blobs_are_corrupt() {
        for blob in ["{not json", "{}", "[{\"nombre\":1}]"] {
            assert!(
                matches!(decode_clients(blob), Err(BankError::CorruptStore(_))),
                "{blob}"
            );
        }
        let bad_number = LEGACY_BLOB.replace("AC482913", "AC48");
        assert!(matches!(
            decode_clients(&bad_number),
            Err(BankError::CorruptStore(_))
        ));
    }

    #[test]
    fn duplicate_usernames_are_corrupt() {
        let blob = LEGACY_BLOB.replace("\"luis\"", "\"ana\"");
        assert!(matches!(
            decode_clients(&blob),
            Err(BankError::CorruptStore(message)) if message.contains("ana")
        ));
    }

    #[test]
    fn non_positive_movement_amounts_are_corrupt() {
        for amount in ["0", "-500"] {
            let blob = LEGACY_BLOB.replace("\"monto\":500,", &format!("\"monto\":{amount},"));
            assert!(
                matches!(
                    decode_clients(&blob),
                    Err(BankError::CorruptStore(message)) if message.contains("non-positive")
                ),
                "{amount}"
            );
        }
    }

    #[test]
    fn encoding_refuses_duplicate_keys() {
        let clients = decode_clients(LEGACY_BLOB).unwrap();
        let doubled = vec![clients[0].clone(), clients[0].clone()];
        assert!(matches!(
            encode_clients(&doubled),
            Err(BankError::CorruptStore(message)) if message.contains("ana")
        ));
    }

    #[test]
    fn high_precision_amounts_survive_encoding() {
        let blob = LEGACY_BLOB.replace("\"saldo\":1500", "\"saldo\":12345678901234.56789");
        let clients = decode_clients(&blob).unwrap();
        assert_eq!(clients[0].balance(), dec!(12345678901234.56789));
        let again = decode_clients(&encode_clients(&clients).unwrap()).unwrap();
        assert_eq!(again, clients);
    }

    #[test]
    fn encoding_writes_kind_tags_and_limit_only_for_checking() {
        let clients = decode_clients(LEGACY_BLOB).unwrap();
        let blob = encode_clients(&clients).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value[0]["cuenta"]["tipo"], "Ahorros");
        assert!(value[0]["cuenta"].get("limiteSobregiro").is_none());
        assert_eq!(value[1]["cuenta"]["tipo"], "Corriente");
        assert_eq!(value[1]["cuenta"]["limiteSobregiro"], 500000.0);
        assert_eq!(value[1]["cuenta"]["numeroCuenta"], "AC100200");
    }
}
