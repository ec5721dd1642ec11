//! Ledger API client methods

use super::{ApiClient, ClientError, RequestDescriptor};
use crate::types::{BalanceResponse, StatementResponse, TransactionDetailsResponse};
use serde_json::Value as JsonValue;

const LEDGER_PREFIX: &str = "/api/ledger";

impl ApiClient {
    /// Cached balance of an account
    pub async fn balance(&self, account_id: &str) -> Result<BalanceResponse, ClientError> {
        self.execute(RequestDescriptor::get(format!(
            "{LEDGER_PREFIX}/balance/{account_id}"
        )))
        .await
    }

    /// All ledger entries of an account
    pub async fn statement(&self, account_id: &str) -> Result<StatementResponse, ClientError> {
        self.execute(RequestDescriptor::get(format!(
            "{LEDGER_PREFIX}/statement/{account_id}"
        )))
        .await
    }

    /// Ledger entries belonging to one transaction
    pub async fn transaction_details(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionDetailsResponse, ClientError> {
        self.execute(RequestDescriptor::get(format!(
            "{LEDGER_PREFIX}/transaction/{transaction_id}"
        )))
        .await
    }

    /// Compare an account's cached balance with its ledger
    pub async fn verify_account(&self, account_id: &str) -> Result<JsonValue, ClientError> {
        self.execute(RequestDescriptor::post(format!(
            "{LEDGER_PREFIX}/verify/account/{account_id}"
        )))
        .await
    }

    /// Check that a transaction's entries balance to zero
    pub async fn verify_transaction(&self, transaction_id: &str) -> Result<JsonValue, ClientError> {
        self.execute(RequestDescriptor::post(format!(
            "{LEDGER_PREFIX}/verify/transaction/{transaction_id}"
        )))
        .await
    }
}
