mod common;

use anyhow::Result;
use common::{balance_of, change_payload, seed_wallet, test_service};
use uuid::Uuid;
use wallet_balance::application::ErrorKind;
use wallet_balance::domain::{Amount, OperationKind, OperationRequest};

#[tokio::test]
async fn test_deposit_end_to_end() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "100.0").await?;

    let response = service
        .change_balance(&format!(
            r#"{{"walletId":"{}","operationType":"DEPOSIT","amount":"50.0"}}"#,
            wallet.id
        ))
        .await;

    assert_eq!(response.wallet_id, Some(wallet.id));
    assert_eq!(response.operation_type.as_deref(), Some("DEPOSIT"));
    assert_eq!(
        response.result.as_deref(),
        Some("Deposit successful. Amount:50.0")
    );
    assert_eq!(response.error, None);
    assert_eq!(balance_of(&service, wallet.id).await?, "150.0");

    Ok(())
}

#[tokio::test]
async fn test_withdraw_end_to_end() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "100.0").await?;

    let response = service
        .change_balance(&change_payload(wallet.id, "WITHDRAW", "30.0"))
        .await;

    assert_eq!(response.operation_type.as_deref(), Some("WITHDRAW"));
    assert_eq!(
        response.result.as_deref(),
        Some("Withdraw successful. Amount:30.0")
    );
    assert_eq!(balance_of(&service, wallet.id).await?, "70.0");

    Ok(())
}

#[tokio::test]
async fn test_deposit_then_withdraw_round_trip() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "100.0").await?;

    let response = service
        .change_balance(&change_payload(wallet.id, "DEPOSIT", "50.0"))
        .await;
    assert!(response.is_success());
    assert_eq!(balance_of(&service, wallet.id).await?, "150.0");

    let response = service
        .change_balance(&change_payload(wallet.id, "WITHDRAW", "50.0"))
        .await;
    assert!(response.is_success());
    assert_eq!(balance_of(&service, wallet.id).await?, "100.0");

    Ok(())
}

#[tokio::test]
async fn test_withdraw_exact_balance_empties_wallet() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "100.0").await?;

    let response = service
        .change_balance(&change_payload(wallet.id, "WITHDRAW", "100.0"))
        .await;

    assert!(response.is_success());
    assert_eq!(balance_of(&service, wallet.id).await?, "0.0");

    Ok(())
}

#[tokio::test]
async fn test_withdraw_insufficient_funds() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "100.0").await?;

    let response = service
        .change_balance(&change_payload(wallet.id, "WITHDRAW", "150.0"))
        .await;

    assert_eq!(response.error_kind, Some(ErrorKind::InsufficientFunds));
    assert_eq!(
        response.error,
        Some(format!(
            "Insufficient funds in wallet {}: balance 100.0, requested 150.0",
            wallet.id
        ))
    );
    assert_eq!(response.result, None);
    assert_eq!(balance_of(&service, wallet.id).await?, "100.0");

    Ok(())
}

#[tokio::test]
async fn test_withdraw_non_existing_wallet() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let missing = Uuid::new_v4();

    let response = service
        .change_balance(&change_payload(missing, "WITHDRAW", "50.0"))
        .await;

    assert_eq!(response.error_kind, Some(ErrorKind::WalletNotFound));
    assert_eq!(response.wallet_id, Some(missing));
    assert_eq!(response.operation_type.as_deref(), Some("WITHDRAW"));
    assert_eq!(
        response.error,
        Some(format!("Wallet not found with ID: {}", missing))
    );

    Ok(())
}

#[tokio::test]
async fn test_deposit_non_existing_wallet() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let missing = Uuid::new_v4();

    let err = service
        .deposit(missing, Amount::parse("5")?)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WalletNotFound);

    Ok(())
}

#[tokio::test]
async fn test_unsupported_operation_echoes_kind() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "100.0").await?;

    let response = service
        .change_balance(&change_payload(wallet.id, "DASDASDASD", "50.0"))
        .await;

    assert_eq!(response.error_kind, Some(ErrorKind::UnsupportedOperation));
    assert_eq!(response.operation_type.as_deref(), Some("DASDASDASD"));
    assert_eq!(
        response.error.as_deref(),
        Some("Unsupported operation type: DASDASDASD")
    );
    assert_eq!(balance_of(&service, wallet.id).await?, "100.0");

    Ok(())
}

#[tokio::test]
async fn test_missing_amount_is_malformed_payload() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "100.0").await?;

    let response = service
        .change_balance(&format!(
            r#"{{"walletId":"{}","operationType":"DEPOSIT"}}"#,
            wallet.id
        ))
        .await;

    assert_eq!(response.error_kind, Some(ErrorKind::MalformedPayload));
    assert!(response.error.unwrap().starts_with("Malformed request:"));
    assert_eq!(balance_of(&service, wallet.id).await?, "100.0");

    Ok(())
}

#[tokio::test]
async fn test_invalid_json_is_malformed_payload() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let response = service.change_balance("invalid_json").await;

    assert_eq!(response.error_kind, Some(ErrorKind::MalformedPayload));
    assert_eq!(response.wallet_id, None);
    assert_eq!(response.operation_type, None);

    Ok(())
}

#[tokio::test]
async fn test_invalid_uuid_names_wallet_id() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let response = service
        .change_balance(&change_payload("invalid_uuid", "DEPOSIT", "50.0"))
        .await;

    assert_eq!(response.error_kind, Some(ErrorKind::MalformedIdentifier));
    assert!(
        response
            .error
            .unwrap()
            .starts_with("Invalid wallet ID 'invalid_uuid'")
    );

    Ok(())
}

#[tokio::test]
async fn test_invalid_amount_names_amount() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "100.0").await?;

    let response = service
        .change_balance(&change_payload(wallet.id, "DEPOSIT", "invalid_amount"))
        .await;

    assert_eq!(response.error_kind, Some(ErrorKind::MalformedAmount));
    assert_eq!(response.wallet_id, Some(wallet.id));
    assert!(
        response
            .error
            .unwrap()
            .starts_with("Invalid amount 'invalid_amount'")
    );
    assert_eq!(balance_of(&service, wallet.id).await?, "100.0");

    Ok(())
}

#[tokio::test]
async fn test_non_positive_amount_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "100.0").await?;

    for amount in ["0", "-50.0"] {
        let response = service
            .change_balance(&change_payload(wallet.id, "WITHDRAW", amount))
            .await;
        assert_eq!(response.error_kind, Some(ErrorKind::MalformedAmount));
    }
    assert_eq!(balance_of(&service, wallet.id).await?, "100.0");

    Ok(())
}

#[tokio::test]
async fn test_deposit_that_cannot_be_represented_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "79228162514264337593543950000").await?;

    let response = service
        .change_balance(&change_payload(wallet.id, "DEPOSIT", "0.5"))
        .await;

    assert_eq!(response.error_kind, Some(ErrorKind::MalformedAmount));
    assert_eq!(response.result, None);
    assert_eq!(
        balance_of(&service, wallet.id).await?,
        "79228162514264337593543950000"
    );

    Ok(())
}

#[tokio::test]
async fn test_amount_with_too_many_decimals_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "100.0").await?;

    let response = service
        .change_balance(&change_payload(
            wallet.id,
            "DEPOSIT",
            "1.00000000000000000000000000001",
        ))
        .await;

    assert_eq!(response.error_kind, Some(ErrorKind::MalformedAmount));
    assert_eq!(response.wallet_id, Some(wallet.id));
    assert_eq!(balance_of(&service, wallet.id).await?, "100.0");

    Ok(())
}

#[tokio::test]
async fn test_non_utf8_body_is_malformed_payload() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let response = service.change_balance_bytes(&[0xff, 0xfe, b'{']).await;

    assert_eq!(response.error_kind, Some(ErrorKind::MalformedPayload));
    assert!(
        response
            .error
            .unwrap()
            .starts_with("Malformed request: body is not valid UTF-8")
    );
    assert_eq!(response.wallet_id, None);

    Ok(())
}

#[tokio::test]
async fn test_numeric_amount_field() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "10").await?;

    let response = service
        .change_balance(&format!(
            r#"{{"walletId":"{}","operationType":"DEPOSIT","amount":2.5}}"#,
            wallet.id
        ))
        .await;

    assert_eq!(
        response.result.as_deref(),
        Some("Deposit successful. Amount:2.5")
    );
    assert_eq!(balance_of(&service, wallet.id).await?, "12.5");

    Ok(())
}

#[tokio::test]
async fn test_apply_dispatches_on_kind() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let wallet = seed_wallet(&service, "5").await?;

    let request = OperationRequest {
        wallet_id: wallet.id,
        kind: OperationKind::Withdraw,
        amount: Amount::parse("2")?,
    };
    let updated = service.apply(&request).await?;
    assert_eq!(updated.balance.to_string(), "3");

    let request = OperationRequest {
        kind: OperationKind::Deposit,
        ..request
    };
    let updated = service.apply(&request).await?;
    assert_eq!(updated.balance.to_string(), "5");

    Ok(())
}
