use serde::{Deserialize, Serialize};

use crate::domain::WalletId;

use super::{AppError, ErrorKind};

/// Uniform result returned by both the read and the mutate operations.
///
/// Exactly one of `result` or `error` is set once the response is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<WalletId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip)]
    pub error_kind: Option<ErrorKind>,
}

impl WalletResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(&mut self, result: impl Into<String>) {
        self.result = Some(result.into());
        self.error = None;
        self.error_kind = None;
    }

    pub fn fail(&mut self, err: &AppError) {
        self.result = None;
        self.error = Some(err.public_message());
        self.error_kind = Some(err.kind());
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
