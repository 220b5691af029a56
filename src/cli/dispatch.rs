use std::str::FromStr;

use rust_decimal::Decimal;

use super::{output, CliError};
use crate::{
    core::{BankContext, TransactionService},
    ledger::{AccountKind, Client, Profile},
    utils::build_info,
};

pub(super) const USAGE: &str = "\
Available commands:
  register <user> <password> <first> <last> <national-id> <ahorros|corriente>
  login <user> <password>
  logout
  whoami
  balance
  movements
  deposit <amount> [description]
  withdraw <amount> [description]
  transfer <account-number> <amount> [description]
  version
  help";

/// Executes one command against an opened context.
pub fn dispatch(context: &BankContext, command: &str, args: &[String]) -> Result<(), CliError> {
    match command {
        "register" => register(context, args),
        "login" => {
            let [username, secret] = expect_args::<2>(command, args)?;
            let client = context.session.login(&context.store, username, secret)?;
            output::success(format!("Welcome, {}", client.full_name()));
            print_account_line(&client);
            Ok(())
        }
        "logout" => {
            context.session.logout()?;
            output::success("Logged out.");
            Ok(())
        }
        "whoami" => {
            match context.session.current_user()? {
                Some(username) => output::info(username),
                None => output::warning("Nobody is logged in."),
            }
            Ok(())
        }
        "balance" => {
            let client = context.session.current_client(&context.store)?;
            output::info(format!("Balance: {}", client.balance()));
            Ok(())
        }
        "movements" => {
            let client = context.session.current_client(&context.store)?;
            print_movements(&client);
            Ok(())
        }
        "deposit" | "withdraw" => {
            let (amount, description) = amount_and_note(command, args)?;
            let mut client = context.session.current_client(&context.store)?;
            if command == "deposit" {
                TransactionService::deposit(&context.store, &mut client, amount, description)?;
                output::success("Deposit completed.");
            } else {
                TransactionService::withdraw(&context.store, &mut client, amount, description)?;
                output::success("Withdrawal completed.");
            }
            print_account_line(&client);
            Ok(())
        }
        "transfer" => {
            let Some((destination, rest)) = args.split_first() else {
                return Err(usage(command));
            };
            let (amount, description) = amount_and_note(command, rest)?;
            let mut client = context.session.current_client(&context.store)?;
            TransactionService::transfer(
                &context.store,
                &mut client,
                destination,
                amount,
                description,
            )?;
            output::success(format!("Transferred {amount} to {}.", destination.trim()));
            print_account_line(&client);
            Ok(())
        }
        "version" => {
            output::info(build_info::current().summary());
            Ok(())
        }
        "help" | "--help" | "-h" => {
            output::info(USAGE);
            Ok(())
        }
        other => Err(CliError::Usage(format!(
            "unknown command `{other}`\n{USAGE}"
        ))),
    }
}

fn register(context: &BankContext, args: &[String]) -> Result<(), CliError> {
    let [username, secret, first, last, national_id, kind] = expect_args::<6>("register", args)?;
    let kind = AccountKind::from_label(kind, context.config.overdraft_limit)?;
    let profile = Profile::new(username, secret, first, last, national_id);
    let client = context.store.register(profile, kind)?;
    output::success(format!("Registered {}.", client.username()));
    print_account_line(&client);
    Ok(())
}

fn print_account_line(client: &Client) {
    let account = client.account();
    output::info(format!(
        "Account {} · {} · Balance: {}",
        account.number(),
        account.kind(),
        account.balance()
    ));
}

fn print_movements(client: &Client) {
    output::section(format!("Movements for {}", client.account_number()));
    if client.movements().is_empty() {
        output::info("No movements yet.");
        return;
    }
    for movement in client.movements() {
        output::info(format!(
            "[{}] {} - {} ({})",
            movement.kind(),
            movement.amount(),
            movement.timestamp().format("%Y-%m-%d %H:%M:%S"),
            movement.description()
        ));
    }
}

fn expect_args<'a, const N: usize>(
    command: &str,
    args: &'a [String],
) -> Result<[&'a str; N], CliError> {
    if args.len() != N {
        return Err(usage(command));
    }
    Ok(std::array::from_fn(|idx| args[idx].as_str()))
}

fn amount_and_note<'a>(
    command: &str,
    args: &'a [String],
) -> Result<(Decimal, Option<&'a str>), CliError> {
    let Some((raw, rest)) = args.split_first() else {
        return Err(usage(command));
    };
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| CliError::Usage(format!("`{raw}` is not a valid amount")))?;
    let description = rest.first().map(String::as_str);
    if rest.len() > 1 {
        return Err(usage(command));
    }
    Ok((amount, description))
}

fn usage(command: &str) -> CliError {
    CliError::Usage(format!("wrong arguments for `{command}`\n{USAGE}"))
}
