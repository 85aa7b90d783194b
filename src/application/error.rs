use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{BalanceError, WalletId};

/// Classification of every failure the service can report. The transport
/// layer maps these to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedPayload,
    MalformedIdentifier,
    MalformedAmount,
    WalletNotFound,
    InsufficientFunds,
    UnsupportedOperation,
    UnexpectedError,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed request: {0}")]
    MalformedPayload(String),

    #[error("Invalid wallet ID '{input}': {reason}")]
    MalformedIdentifier { input: String, reason: String },

    #[error("Invalid amount '{input}': {reason}")]
    MalformedAmount { input: String, reason: String },

    #[error("Wallet not found with ID: {0}")]
    WalletNotFound(WalletId),

    #[error("Insufficient funds in wallet {wallet_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        wallet_id: WalletId,
        balance: Decimal,
        requested: Decimal,
    },

    #[error("Balance of wallet {0} cannot represent the result exactly")]
    BalanceOverflow(WalletId),

    #[error("Unsupported operation type: {0}")]
    UnsupportedOperation(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MalformedPayload(_) => ErrorKind::MalformedPayload,
            AppError::MalformedIdentifier { .. } => ErrorKind::MalformedIdentifier,
            AppError::MalformedAmount { .. } | AppError::BalanceOverflow(_) => {
                ErrorKind::MalformedAmount
            }
            AppError::WalletNotFound(_) => ErrorKind::WalletNotFound,
            AppError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            AppError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            AppError::Database(_) => ErrorKind::UnexpectedError,
        }
    }

    /// Message safe to hand back to a caller. Unexpected failures get a
    /// generic text; their detail goes to the log instead.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::UnexpectedError => "Unexpected error".to_string(),
            _ => self.to_string(),
        }
    }

    pub(crate) fn from_balance(wallet_id: WalletId, err: BalanceError) -> Self {
        match err {
            BalanceError::InsufficientFunds { balance, requested } => AppError::InsufficientFunds {
                wallet_id,
                balance,
                requested,
            },
            BalanceError::Overflow => AppError::BalanceOverflow(wallet_id),
        }
    }
}
