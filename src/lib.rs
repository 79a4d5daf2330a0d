//! # ATM Simulator
//!
//! A single-branch ATM: PIN-gated access to a small set of bank accounts
//! supporting withdrawal, deposit, transfer, balance inquiry, and PIN change,
//! with every completed menu operation appended to a transaction log.
//!
//! ## Design Principles
//!
//! - **Exact amounts**: Balances use 2 decimal places via `rust_decimal`
//! - **Domain errors as values**: `InvalidAmount`/`InsufficientFunds` are returned, never panicked
//! - **Atomic transfers**: sender and receiver change together or not at all
//! - **Abstract console**: sessions run over any `BufRead`/`Write` pair
//!
//! ## Example
//!
//! ```no_run
//! use atm_sim::{Atm, AtmConfig, Console};
//! use std::io::{self, BufReader};
//!
//! let mut atm = Atm::new(AtmConfig::default()).unwrap();
//! let mut console = Console::new(BufReader::new(io::stdin()), io::stdout());
//! atm.run(&mut console).unwrap();
//! ```

pub mod account;
pub mod amount;
pub mod atm;
pub mod config;
pub mod console;
pub mod error;
pub mod journal;
pub mod menu;
pub mod pin;

pub use account::{Account, TransferReceipt};
pub use amount::Amount;
pub use atm::{AccountHandle, Atm, SessionState};
pub use config::{AccountSeed, AtmConfig};
pub use console::Console;
pub use error::{AtmError, Result};
pub use journal::TransactionLog;
pub use menu::{Continuation, MenuOption};
pub use pin::{Pin, PinStore};
