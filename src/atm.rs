//! The ATM session: PIN gate, menu loop, and transaction dispatch.
//!
//! A session moves through three states:
//!
//! ```text
//! Locked --(PIN accepted)--> MenuLoop --(Exit / "E" at continuation)--> Terminated
//! ```
//!
//! Every recoverable error is reported on the console and the session keeps
//! going. Only a closed input stream or a failing console ends a session
//! early.

use crate::account::{Account, TransferReceipt};
use crate::amount::Amount;
use crate::config::AtmConfig;
use crate::console::Console;
use crate::error::{AtmError, Result};
use crate::journal::TransactionLog;
use crate::menu::{self, Continuation, MenuOption};
use crate::pin::{Pin, PinStore};
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::io::{BufRead, Write};

pub const BANNER: &str = "-------WELCOME TO HABIB BANK LIMITED-------";
const SEPARATOR: &str = "********************************";

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a valid PIN.
    Locked,
    /// Authenticated; showing the menu and running transactions.
    MenuLoop,
    /// Session over.
    Terminated,
}

/// Stable reference to one of the ATM's accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountHandle(usize);

/// Outcome of dispatching one menu letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    Completed,
    Exit,
}

/// A single-branch ATM owning its accounts, its PIN, and the session state.
pub struct Atm {
    /// Accounts in seed order.
    accounts: Vec<Account>,

    /// The authenticated cardholder's account.
    cardholder: AccountHandle,

    /// Account number that Transfer sends funds to.
    transfer_receiver: String,

    pin: Pin,
    pin_store: PinStore,
    log: TransactionLog,
    max_pin_attempts: Option<u32>,
    state: SessionState,
    last_transaction_time: DateTime<Local>,
}

impl Atm {
    /// Builds an ATM from its configuration, loading the PIN from the PIN file.
    ///
    /// Fails only if the configured cardholder account is not among the seeds.
    pub fn new(config: AtmConfig) -> Result<Self> {
        let pin_store = PinStore::new(config.pin_file);
        let pin = pin_store.load();

        let accounts: Vec<Account> = config
            .seeds
            .into_iter()
            .map(|seed| seed.into_account())
            .collect();

        let cardholder = accounts
            .iter()
            .position(|a| a.number() == config.cardholder)
            .map(AccountHandle)
            .ok_or(AtmError::MissingCardholder {
                account: config.cardholder,
            })?;

        debug!(
            "ATM ready with {} accounts, cardholder at {:?}",
            accounts.len(),
            cardholder
        );

        Ok(Atm {
            accounts,
            cardholder,
            transfer_receiver: config.transfer_receiver,
            pin,
            pin_store,
            log: TransactionLog::new(config.log_file),
            max_pin_attempts: config.max_pin_attempts,
            state: SessionState::Locked,
            last_transaction_time: Local::now(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }

    pub fn last_transaction_time(&self) -> DateTime<Local> {
        self.last_transaction_time
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Resolves a handle. Handles from another ATM may point nowhere.
    pub fn account(&self, handle: AccountHandle) -> Option<&Account> {
        self.accounts.get(handle.0)
    }

    /// Looks up an account by number. The first match wins.
    pub fn find_account(&self, number: &str) -> Option<AccountHandle> {
        self.accounts
            .iter()
            .position(|a| a.number() == number)
            .map(AccountHandle)
    }

    /// The account this session operates on.
    pub fn cardholder(&self) -> &Account {
        &self.accounts[self.cardholder.0]
    }

    /// Balance of the cardholder's account.
    pub fn balance(&self) -> Amount {
        self.cardholder().balance()
    }

    /// Withdraws from the cardholder's account.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount> {
        self.accounts[self.cardholder.0].withdraw(amount)
    }

    /// Deposits into the cardholder's account.
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount> {
        self.accounts[self.cardholder.0].deposit(amount)
    }

    /// Transfers from the cardholder to the configured receiver account.
    ///
    /// Returns [`AtmError::AccountNotFound`] without touching any balance if no
    /// account carries the receiver number.
    pub fn transfer(&mut self, amount: Amount) -> Result<TransferReceipt> {
        let receiver = self
            .find_account(&self.transfer_receiver)
            .ok_or_else(|| AtmError::AccountNotFound {
                account: self.transfer_receiver.clone(),
            })?;

        let sender = self.cardholder;
        if sender == receiver {
            // Moving money to the same account validates the amount and nets to zero.
            let account = &mut self.accounts[sender.0];
            account.withdraw(amount)?;
            let balance = account.deposit(amount)?;
            return Ok(TransferReceipt {
                sender_balance: balance,
                receiver_balance: balance,
            });
        }

        let (from, to) = pair_mut(&mut self.accounts, sender.0, receiver.0);
        from.transfer_funds(to, amount)
    }

    /// Replaces the PIN if `new` and `confirm` agree, then persists it.
    ///
    /// Returns [`AtmError::PinVerification`] and leaves the PIN alone on a
    /// mismatch. Returns [`AtmError::StorageUnavailable`] if the new PIN is
    /// in effect for this session but could not be written to the PIN file.
    pub fn change_pin(&mut self, new: Pin, confirm: Pin) -> Result<()> {
        if new != confirm {
            return Err(AtmError::PinVerification);
        }

        self.pin = new;
        self.pin_store.save(new).map_err(|e| {
            warn!("PIN changed in memory but not persisted: {}", e);
            e
        })?;

        info!("PIN changed");
        Ok(())
    }

    /// Checks a candidate PIN against the current one.
    pub fn check_pin(&self, candidate: Pin) -> Result<()> {
        if candidate == self.pin {
            Ok(())
        } else {
            Err(AtmError::PinMismatch)
        }
    }

    /// Runs a whole session on `console` until it is terminated.
    ///
    /// A closed input stream ends the session cleanly.
    pub fn run<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<()> {
        console.say(BANNER)?;
        console.say("Please insert the card in the machine")?;

        loop {
            let step = match self.state {
                SessionState::Locked => self.validate_pin(console),
                SessionState::MenuLoop => self.handle_transaction(console),
                SessionState::Terminated => return Ok(()),
            };

            match step {
                Ok(()) => {}
                Err(AtmError::InputClosed) => {
                    info!("Input closed, ending session");
                    self.state = SessionState::Terminated;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Prompts for the PIN until it matches, leaving the `Locked` state.
    ///
    /// Retries are unbounded unless `max_pin_attempts` is set, in which case
    /// the session is terminated once that many wrong PINs have been entered.
    pub fn validate_pin<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<()> {
        let mut failures = 0u32;

        loop {
            let candidate = read_pin(console, "Please enter the 4-digit pin: ")?;

            match self.check_pin(candidate) {
                Ok(()) => {
                    console.say("Please wait for the processing")?;
                    console.say("")?;
                    info!("PIN accepted");
                    self.state = SessionState::MenuLoop;
                    return Ok(());
                }
                Err(e) => {
                    console.say(&e)?;
                    failures += 1;
                    debug!("Wrong PIN, {} failure(s)", failures);

                    if self.max_pin_attempts.is_some_and(|max| failures >= max) {
                        warn!("Too many wrong PINs, locking out");
                        console.say("Too many incorrect attempts. Card retained.")?;
                        self.state = SessionState::Terminated;
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs one iteration of the menu loop.
    ///
    /// Shows the menu, dispatches the chosen option, logs it, and asks whether
    /// to continue. The Exit option terminates without logging. Errors raised
    /// while handling an option are reported and the iteration ends without
    /// logging; the menu is shown again on the next call.
    pub fn handle_transaction<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<()> {
        console.prompt(&menu::render())?;
        console.say(SEPARATOR)?;
        console.say("please enter your desired choice")?;
        let letter = console.read_choice()?;
        console.say(SEPARATOR)?;

        match self.dispatch(letter, console) {
            Ok(Dispatch::Exit) => {
                console.say("EXITING. Thank you!")?;
                self.state = SessionState::Terminated;
                return Ok(());
            }
            Ok(Dispatch::Completed) => {}
            Err(e @ (AtmError::InputClosed | AtmError::Io(_))) => return Err(e),
            Err(e) => {
                warn!("Option {} failed: {}", letter, e);
                console.say(format!("Error: {}", e))?;
                return Ok(());
            }
        }

        self.record(letter, console)?;

        console.prompt("Do you want to continue (C) or exit (E)? ")?;
        if Continuation::from_letter(console.read_choice()?) == Continuation::Exit {
            console.say("EXITING. Thank you!")?;
            self.state = SessionState::Terminated;
            return Ok(());
        }

        console.say(BANNER)?;
        Ok(())
    }

    fn dispatch<R: BufRead, W: Write>(
        &mut self,
        letter: char,
        console: &mut Console<R, W>,
    ) -> Result<Dispatch> {
        let option = match MenuOption::from_letter(letter) {
            Some(option) => option,
            None => {
                debug!("Unrecognized option {:?}", letter);
                console.say("INVALID. Please select the correct option.")?;
                return Ok(Dispatch::Completed);
            }
        };

        match option {
            MenuOption::Withdraw => {
                self.amount_loop(console, "Please enter the amount for Withdraw: Rs ", |atm, amount| {
                    let remaining = atm.withdraw(amount)?;
                    Ok(format!("Successful Withdraw. Remaining balance: Rs{}", remaining))
                })?;
            }
            MenuOption::Deposit => {
                self.amount_loop(console, "Please enter the amount to be deposited: Rs ", |atm, amount| {
                    let balance = atm.deposit(amount)?;
                    Ok(format!("Successful deposit. New balance: Rs{}", balance))
                })?;
            }
            MenuOption::BalanceInquiry => {
                console.say(format!(
                    "Current Balance for Account {}: Rs{}",
                    self.cardholder().number(),
                    self.balance()
                ))?;
            }
            MenuOption::Transfer => {
                self.amount_loop(console, "Enter the amount to transfer: Rs ", |atm, amount| {
                    match atm.transfer(amount) {
                        Ok(receipt) => Ok(format!(
                            "Funds transfer successful. Sender's remaining balance: Rs{}\nReceiver's new balance: Rs{}",
                            receipt.sender_balance, receipt.receiver_balance
                        )),
                        // The amount was accepted; there is just nobody to send it to.
                        Err(e @ AtmError::AccountNotFound { .. }) => {
                            warn!("Transfer skipped: {}", e);
                            Ok(format!("Error: {} No funds were transferred.", e))
                        }
                        Err(e) => Err(e),
                    }
                })?;
            }
            MenuOption::ChangePin => self.change_pin_dialog(console)?,
            MenuOption::Exit => return Ok(Dispatch::Exit),
        }

        Ok(Dispatch::Completed)
    }

    /// Prompts for an amount until `op` succeeds.
    ///
    /// Non-numeric input and domain errors are reported and reprompted.
    fn amount_loop<R, W, F>(&mut self, console: &mut Console<R, W>, prompt: &str, mut op: F) -> Result<()>
    where
        R: BufRead,
        W: Write,
        F: FnMut(&mut Self, Amount) -> Result<String>,
    {
        loop {
            console.prompt(prompt)?;

            let amount = match console.read_number::<Amount>() {
                Ok(amount) => amount,
                Err(AtmError::Format { .. }) => {
                    console.say("Invalid input. Please enter a numeric amount.")?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match op(self, amount) {
                Ok(message) => {
                    debug!("Amount Rs{} accepted", amount);
                    console.say(message)?;
                    return Ok(());
                }
                Err(e) if e.is_domain() => {
                    debug!("Amount Rs{} rejected: {}", amount, e);
                    console.say(format!("Error: {}", e))?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn change_pin_dialog<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<()> {
        let new = read_pin(console, "Enter the new 4-digit pin: ")?;
        let confirm = read_pin(console, "Please enter the new pin again to verify: ")?;

        match self.change_pin(new, confirm) {
            Ok(()) => console.say("Congratulations, Your pin has been successfully changed.")?,
            Err(e @ AtmError::PinVerification) => console.say(&e)?,
            Err(e @ AtmError::StorageUnavailable { .. }) => {
                console.say("Your pin has been changed for this session, but could not be saved.")?;
                console.say(format!("Error writing PIN to file: {}", e))?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Appends the log entry and stamps the transaction time.
    fn record<R: BufRead, W: Write>(&mut self, letter: char, console: &mut Console<R, W>) -> Result<()> {
        let now = Local::now();
        if let Err(e) = self.log.append(letter, &now) {
            warn!("Transaction {} not logged: {}", letter, e);
            console.say("Error opening log file.")?;
        }
        self.last_transaction_time = now;
        Ok(())
    }
}

/// Prompts until a well-formed PIN is entered.
fn read_pin<R: BufRead, W: Write>(console: &mut Console<R, W>, prompt: &str) -> Result<Pin> {
    loop {
        console.prompt(prompt)?;
        match console.read_number::<Pin>() {
            Ok(pin) => return Ok(pin),
            Err(AtmError::Format { .. }) => {
                console.say("Invalid input. Please enter a numeric PIN.")?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Borrows two distinct accounts mutably.
fn pair_mut(accounts: &mut [Account], a: usize, b: usize) -> (&mut Account, &mut Account) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = accounts.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = accounts.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
