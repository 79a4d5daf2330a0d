//! ATM Simulator CLI
//!
//! Runs one interactive ATM session on stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --pin-file pin.txt --log-file transaction.log
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use atm_sim::config::{self, DEFAULT_CARDHOLDER, DEFAULT_LOG_FILE, DEFAULT_PIN_FILE, DEFAULT_RECEIVER};
use atm_sim::{AccountSeed, Atm, AtmConfig, Console, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "atm-sim", about = "A PIN-gated single-branch ATM simulator")]
struct Args {
    /// File holding the 4-digit PIN
    #[arg(long, default_value = DEFAULT_PIN_FILE)]
    pin_file: PathBuf,

    /// Append-only transaction log
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Account number of the cardholder using the ATM
    #[arg(long, default_value = DEFAULT_CARDHOLDER)]
    cardholder: String,

    /// Account number that Transfer sends funds to
    #[arg(long, default_value = DEFAULT_RECEIVER)]
    receiver: String,

    /// Lock out after this many wrong PINs (unlimited if omitted)
    #[arg(long)]
    max_pin_attempts: Option<u32>,

    /// CSV file of opening accounts with a `balance,account` header
    #[arg(long, conflicts_with = "account")]
    accounts: Option<PathBuf>,

    /// Opening account as `balance:number`; repeat for more accounts
    #[arg(long)]
    account: Vec<AccountSeed>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let seeds = match (&args.accounts, args.account.is_empty()) {
        (Some(path), _) => config::read_seeds(BufReader::new(File::open(path)?))?,
        (None, false) => args.account,
        (None, true) => config::default_seeds(),
    };

    let config = AtmConfig {
        pin_file: args.pin_file,
        log_file: args.log_file,
        cardholder: args.cardholder,
        transfer_receiver: args.receiver,
        max_pin_attempts: args.max_pin_attempts,
        seeds,
    };

    let mut atm = Atm::new(config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    atm.run(&mut console)
}
