// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::fmt::Display;
use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;
use tempfile::TempDir;
use wallet_balance::application::WalletService;
use wallet_balance::domain::{Wallet, WalletId};

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(WalletService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = WalletService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// URL of the database behind [`test_service`], for opening a second
/// connection pool on it
pub fn database_url(temp: &TempDir) -> String {
    format!("sqlite:{}", temp.path().join("test.db").display())
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Provision a wallet with the given opening balance
pub async fn seed_wallet(service: &WalletService, balance: &str) -> Result<Wallet> {
    Ok(service.create_wallet(dec(balance)).await?)
}

/// Build a change-balance payload the way a client would send it
pub fn change_payload(wallet_id: impl Display, operation_type: &str, amount: &str) -> String {
    format!(
        r#"{{"walletId":"{}","operationType":"{}","amount":"{}"}}"#,
        wallet_id, operation_type, amount
    )
}

/// Persisted balance, rendered with its stored scale
pub async fn balance_of(service: &WalletService, id: WalletId) -> Result<String> {
    Ok(service.balance(id).await?.to_string())
}
