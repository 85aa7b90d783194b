use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::Amount;

pub type WalletId = Uuid;

/// A wallet record: identity plus a balance that never goes below zero.
///
/// This is a plain value. Loading and saving go through the repository,
/// which scopes every read-modify-write to a single store transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },

    #[error("balance overflow")]
    Overflow,
}

impl Wallet {
    /// Create a wallet with a fresh id and zero balance.
    pub fn new() -> Self {
        Self::with_balance(Decimal::ZERO)
    }

    pub fn with_balance(balance: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            balance,
        }
    }

    /// Add `amount`. Fails with `Overflow`, balance untouched, if the sum
    /// cannot be represented exactly.
    pub fn deposit(&mut self, amount: Amount) -> Result<(), BalanceError> {
        let new_balance = self
            .balance
            .checked_add(amount.value())
            .ok_or(BalanceError::Overflow)?;
        if new_balance.checked_sub(self.balance) != Some(amount.value()) {
            return Err(BalanceError::Overflow);
        }
        self.balance = new_balance;
        Ok(())
    }

    /// Withdraw `amount`, leaving the balance untouched if it would go negative.
    pub fn withdraw(&mut self, amount: Amount) -> Result<(), BalanceError> {
        if self.balance < amount.value() {
            return Err(BalanceError::InsufficientFunds {
                balance: self.balance,
                requested: amount.value(),
            });
        }
        let new_balance = self
            .balance
            .checked_sub(amount.value())
            .ok_or(BalanceError::Overflow)?;
        if self.balance.checked_sub(new_balance) != Some(amount.value()) {
            return Err(BalanceError::Overflow);
        }
        self.balance = new_balance;
        Ok(())
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}
