use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Amount, WalletId};

/// The balance mutations a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Deposit,
    Withdraw,
}

impl OperationKind {
    /// Wire name, as accepted in `operationType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Deposit => "DEPOSIT",
            OperationKind::Withdraw => "WITHDRAW",
        }
    }

    /// Human-readable name used in outcome messages.
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Deposit => "Deposit",
            OperationKind::Withdraw => "Withdraw",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned for any operation type outside the known set. Carries the
/// rejected input so it can be echoed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl FromStr for OperationKind {
    type Err = UnknownOperation;

    // Matching is exact: "deposit" is not "DEPOSIT".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(OperationKind::Deposit),
            "WITHDRAW" => Ok(OperationKind::Withdraw),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}

/// A validated request to change a wallet's balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub wallet_id: WalletId,
    pub kind: OperationKind,
    pub amount: Amount,
}

impl OperationRequest {
    /// Outcome message reported after the operation commits.
    pub fn success_message(&self) -> String {
        format!("{} successful. Amount:{}", self.kind.label(), self.amount)
    }
}
