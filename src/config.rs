//! ATM configuration and seed account loading.

use crate::account::Account;
use crate::amount::Amount;
use crate::error::{AtmError, Result};
use csv::{ReaderBuilder, Trim};
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PIN_FILE: &str = "pin.txt";
pub const DEFAULT_LOG_FILE: &str = "transaction.log";
pub const DEFAULT_CARDHOLDER: &str = "654321";
pub const DEFAULT_RECEIVER: &str = "123456";

/// One opening `(balance, account number)` pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountSeed {
    pub balance: Amount,

    #[serde(rename = "account")]
    pub account_number: String,
}

impl AccountSeed {
    pub fn new(balance: Amount, account_number: impl Into<String>) -> Self {
        AccountSeed {
            balance,
            account_number: account_number.into(),
        }
    }

    pub fn into_account(self) -> Account {
        Account::new(self.balance, self.account_number)
    }
}

impl FromStr for AccountSeed {
    type Err = AtmError;

    /// Parses `balance:account`, e.g. `5000:123456`.
    fn from_str(s: &str) -> Result<Self> {
        let format_err = || AtmError::Format {
            input: s.to_string(),
        };
        let (balance, number) = s.split_once(':').ok_or_else(format_err)?;
        let balance = Amount::from_str(balance).map_err(|_| format_err())?;
        let number = number.trim();
        if number.is_empty() {
            return Err(format_err());
        }
        Ok(AccountSeed::new(balance, number))
    }
}

/// The branch's built-in accounts: the cardholder's and the transfer target.
pub fn default_seeds() -> Vec<AccountSeed> {
    vec![
        AccountSeed::new(Amount::new(Decimal::new(1_000_078, 2)), DEFAULT_CARDHOLDER),
        AccountSeed::new(Amount::from_rupees(5000), DEFAULT_RECEIVER),
    ]
}

/// Reads seed accounts from CSV with a `balance,account` header.
///
/// Unlike transaction input, a bad seed row is an error: the ATM should not
/// start with a partially loaded branch.
pub fn read_seeds<R: Read>(reader: R) -> Result<Vec<AccountSeed>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut seeds = Vec::new();
    for result in csv_reader.deserialize::<AccountSeed>() {
        let seed = result?;
        debug!("Seed account {} with Rs{}", seed.account_number, seed.balance);
        seeds.push(seed);
    }
    Ok(seeds)
}

/// Everything needed to build an [`Atm`](crate::Atm).
#[derive(Debug, Clone)]
pub struct AtmConfig {
    /// File holding the PIN.
    pub pin_file: PathBuf,

    /// Append-only transaction log.
    pub log_file: PathBuf,

    /// Account the authenticated session operates on.
    pub cardholder: String,

    /// Account number that Transfer sends funds to.
    pub transfer_receiver: String,

    /// Lock the session after this many wrong PINs. `None` retries forever.
    pub max_pin_attempts: Option<u32>,

    /// Opening accounts, in order.
    pub seeds: Vec<AccountSeed>,
}

impl Default for AtmConfig {
    fn default() -> Self {
        AtmConfig {
            pin_file: PathBuf::from(DEFAULT_PIN_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            cardholder: DEFAULT_CARDHOLDER.to_string(),
            transfer_receiver: DEFAULT_RECEIVER.to_string(),
            max_pin_attempts: None,
            seeds: default_seeds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_default_seeds_match_branch() {
        let seeds = default_seeds();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].balance.to_string(), "10000.78");
        assert_eq!(seeds[0].account_number, "654321");
        assert_eq!(seeds[1].balance.to_string(), "5000.00");
        assert_eq!(seeds[1].account_number, "123456");
    }

    #[test]
    fn test_read_seeds_from_csv() {
        let csv = "balance, account\n 250.5 , 111\n0,222\n";
        let seeds = read_seeds(Cursor::new(csv)).unwrap();

        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0], AccountSeed::new(Amount::from_str("250.50").unwrap(), "111"));
        assert_eq!(seeds[1].clone().into_account().balance(), Amount::ZERO);
    }

    #[test]
    fn test_read_seeds_rejects_bad_balance() {
        let csv = "balance,account\nlots,111\n";
        assert!(matches!(read_seeds(Cursor::new(csv)), Err(AtmError::Csv(_))));
    }

    #[test]
    fn test_seed_from_str() {
        let seed: AccountSeed = "5000:123456".parse().unwrap();
        assert_eq!(seed.account_number, "123456");
        assert_eq!(seed.balance.to_string(), "5000.00");

        assert!("5000".parse::<AccountSeed>().is_err());
        assert!("x:1".parse::<AccountSeed>().is_err());
        assert!("1:".parse::<AccountSeed>().is_err());
    }
}
