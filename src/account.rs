//! Bank account model and operations.
//!
//! Maintains the invariant: a balance never drops below zero through
//! `withdraw` or `transfer_funds`.

use crate::amount::Amount;
use crate::error::{AtmError, Result};

const NOT_POSITIVE: &str = "Amount must be greater than zero.";

/// A balance plus the number that identifies it.
///
/// # Invariants
///
/// - Every moved amount satisfies `0 < amount <= balance`
/// - Deposits only accept `amount > 0`
/// - A failed operation leaves every balance it touches unchanged
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Account number, unique within the owning ATM.
    number: String,

    /// Current balance.
    balance: Amount,
}

/// Balances of both parties after a successful transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub sender_balance: Amount,
    pub receiver_balance: Amount,
}

impl Account {
    /// Creates an account with an opening balance.
    pub fn new(balance: Amount, number: impl Into<String>) -> Self {
        Account {
            number: number.into(),
            balance,
        }
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// Withdraws funds from the account.
    ///
    /// Returns the remaining balance, or an error if the amount is not
    /// positive or exceeds the balance.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount> {
        self.check_debit(amount)?;
        self.balance = self.balance.checked_sub(amount)?;
        Ok(self.balance)
    }

    /// Deposits funds into the account and returns the new balance.
    ///
    /// A deposit the balance cannot hold is rejected as `InvalidAmount`.
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount> {
        if !amount.is_positive() {
            return Err(AtmError::InvalidAmount {
                amount,
                reason: NOT_POSITIVE,
            });
        }

        self.balance = self.balance.checked_add(amount)?;
        Ok(self.balance)
    }

    /// Moves `amount` from this account to `receiver`.
    ///
    /// Both balances change or neither does: both new balances are computed
    /// before either is stored, so `self.balance + receiver.balance` is conserved.
    pub fn transfer_funds(&mut self, receiver: &mut Account, amount: Amount) -> Result<TransferReceipt> {
        self.check_debit(amount)?;

        let sender_balance = self.balance.checked_sub(amount)?;
        let receiver_balance = receiver.balance.checked_add(amount)?;
        self.balance = sender_balance;
        receiver.balance = receiver_balance;

        Ok(TransferReceipt {
            sender_balance: self.balance,
            receiver_balance: receiver.balance,
        })
    }

    fn check_debit(&self, amount: Amount) -> Result<()> {
        if !amount.is_positive() {
            return Err(AtmError::InvalidAmount {
                amount,
                reason: NOT_POSITIVE,
            });
        }

        if amount > self.balance {
            return Err(AtmError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }

        Ok(())
    }
}
