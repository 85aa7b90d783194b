use rust_decimal::Decimal;

use crate::domain::{Amount, BalanceError, OperationKind, OperationRequest, Wallet, WalletId};
use crate::storage::Repository;

use super::{
    AppError, ErrorKind, WalletResponse, parse_request, parse_wallet_id, payload_text,
};

/// `operationType` echoed on balance reads.
pub const BALANCE_OPERATION: &str = "Getting balance";

/// Application service for reading and changing wallet balances.
/// This is the primary interface for any client (HTTP, CLI, tests).
#[derive(Clone)]
pub struct WalletService {
    repo: Repository,
}

impl WalletService {
    /// Create a new wallet service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Provisioning
    // ========================

    /// Create a wallet with an opening balance. Not reachable over HTTP.
    pub async fn create_wallet(&self, balance: Decimal) -> Result<Wallet, AppError> {
        if balance < Decimal::ZERO {
            return Err(AppError::MalformedAmount {
                input: balance.to_string(),
                reason: "opening balance must not be negative".to_string(),
            });
        }

        let wallet = Wallet::with_balance(balance);
        self.repo.insert_wallet(&wallet).await?;
        tracing::info!(wallet_id = %wallet.id, balance = %wallet.balance, "wallet created");
        Ok(wallet)
    }

    // ========================
    // Boundary operations
    // ========================

    /// Read a wallet's balance. Every failure is reported in the response.
    pub async fn get_balance(&self, wallet_id: &str) -> WalletResponse {
        let mut response = WalletResponse {
            operation_type: Some(BALANCE_OPERATION.to_string()),
            ..WalletResponse::new()
        };
        match self.try_get_balance(wallet_id, &mut response).await {
            Ok(balance) => response.succeed(balance.to_string()),
            Err(err) => {
                log_failure("get_balance", &err);
                response.fail(&err);
            }
        }
        response
    }

    async fn try_get_balance(
        &self,
        wallet_id: &str,
        response: &mut WalletResponse,
    ) -> Result<Decimal, AppError> {
        let id = parse_wallet_id(wallet_id)?;
        response.wallet_id = Some(id);
        self.balance(id).await
    }

    /// Apply a deposit or withdrawal described by a JSON payload.
    /// Every failure is reported in the response.
    pub async fn change_balance(&self, payload: &str) -> WalletResponse {
        let mut response = WalletResponse::new();
        match self.try_change_balance(payload, &mut response).await {
            Ok(message) => response.succeed(message),
            Err(err) => {
                log_failure("change_balance", &err);
                response.fail(&err);
            }
        }
        response
    }

    /// Same as [`change_balance`](Self::change_balance) for a raw body that
    /// may not be valid UTF-8.
    pub async fn change_balance_bytes(&self, body: &[u8]) -> WalletResponse {
        match payload_text(body) {
            Ok(payload) => self.change_balance(payload).await,
            Err(err) => {
                log_failure("change_balance", &err);
                let mut response = WalletResponse::new();
                response.fail(&err);
                response
            }
        }
    }

    async fn try_change_balance(
        &self,
        payload: &str,
        response: &mut WalletResponse,
    ) -> Result<String, AppError> {
        let request = parse_request(payload, response)?;
        self.apply(&request).await?;
        Ok(request.success_message())
    }

    // ========================
    // Balance operations
    // ========================

    /// Current committed balance of a wallet.
    pub async fn balance(&self, id: WalletId) -> Result<Decimal, AppError> {
        self.repo
            .get_wallet(id)
            .await?
            .map(|wallet| wallet.balance)
            .ok_or(AppError::WalletNotFound(id))
    }

    /// Dispatch a validated request.
    pub async fn apply(&self, request: &OperationRequest) -> Result<Wallet, AppError> {
        match request.kind {
            OperationKind::Deposit => self.deposit(request.wallet_id, request.amount).await,
            OperationKind::Withdraw => self.withdraw(request.wallet_id, request.amount).await,
        }
    }

    pub async fn deposit(&self, id: WalletId, amount: Amount) -> Result<Wallet, AppError> {
        let wallet = self.update_wallet(id, |wallet| wallet.deposit(amount)).await?;
        tracing::info!(wallet_id = %id, %amount, balance = %wallet.balance, "deposit committed");
        Ok(wallet)
    }

    /// Withdraw from a wallet. Fails without touching the balance if funds
    /// are short.
    pub async fn withdraw(&self, id: WalletId, amount: Amount) -> Result<Wallet, AppError> {
        let wallet = self.update_wallet(id, |wallet| wallet.withdraw(amount)).await?;
        tracing::info!(wallet_id = %id, %amount, balance = %wallet.balance, "withdraw committed");
        Ok(wallet)
    }

    /// Lock, load, mutate and save one wallet inside a single transaction.
    /// Any early return drops the transaction, which rolls it back.
    async fn update_wallet<F>(&self, id: WalletId, mutate: F) -> Result<Wallet, AppError>
    where
        F: FnOnce(&mut Wallet) -> Result<(), BalanceError>,
    {
        let mut tx = self.repo.begin().await?;
        let mut wallet = tx
            .lock_wallet(id)
            .await?
            .ok_or(AppError::WalletNotFound(id))?;

        mutate(&mut wallet).map_err(|e| AppError::from_balance(id, e))?;

        tx.save_wallet(&wallet).await?;
        tx.commit().await?;
        Ok(wallet)
    }
}

fn log_failure(operation: &str, err: &AppError) {
    match err.kind() {
        ErrorKind::UnexpectedError => {
            tracing::error!(operation, error = ?err, "request failed unexpectedly")
        }
        kind => tracing::debug!(operation, ?kind, error = %err, "request rejected"),
    }
}
