use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::{Amount, OperationKind, OperationRequest, UnknownOperation, WalletId};

use super::{AppError, WalletResponse};

/// A JSON field that may be sent either quoted or as a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeBalancePayload {
    wallet_id: Scalar,
    operation_type: Scalar,
    amount: Scalar,
}

impl ChangeBalancePayload {
    fn from_json(payload: &str) -> Result<Self, AppError> {
        // Going through a map first rejects arrays, which serde would
        // otherwise accept positionally for a struct.
        let fields: Map<String, Value> = serde_json::from_str(payload)
            .map_err(|e| AppError::MalformedPayload(e.to_string()))?;
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| AppError::MalformedPayload(e.to_string()))
    }
}

/// Decode a raw request body. Invalid UTF-8 is a malformed payload like any
/// other unparseable body.
pub fn payload_text(body: &[u8]) -> Result<&str, AppError> {
    std::str::from_utf8(body)
        .map_err(|e| AppError::MalformedPayload(format!("body is not valid UTF-8: {}", e)))
}

pub fn parse_wallet_id(input: &str) -> Result<WalletId, AppError> {
    Uuid::parse_str(input).map_err(|e| AppError::MalformedIdentifier {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_amount(input: &str) -> Result<Amount, AppError> {
    Amount::parse(input).map_err(|e| AppError::MalformedAmount {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Validate a change-balance payload.
///
/// Checks run in order: shape, wallet id, amount, operation type. Each field
/// that validates is echoed into `response` so that a later failure still
/// reports it; an unknown operation type is echoed as submitted.
pub fn parse_request(
    payload: &str,
    response: &mut WalletResponse,
) -> Result<OperationRequest, AppError> {
    let raw = ChangeBalancePayload::from_json(payload)?;

    let wallet_id = parse_wallet_id(&raw.wallet_id.into_text())?;
    response.wallet_id = Some(wallet_id);

    let amount = parse_amount(&raw.amount.into_text())?;

    let operation_type = raw.operation_type.into_text();
    response.operation_type = Some(operation_type.clone());
    let kind = operation_type
        .parse::<OperationKind>()
        .map_err(|UnknownOperation(kind)| AppError::UnsupportedOperation(kind))?;

    Ok(OperationRequest {
        wallet_id,
        kind,
        amount,
    })
}
