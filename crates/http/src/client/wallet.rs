//! Wallet API client methods

use super::{ApiClient, ClientError, RequestDescriptor};
use crate::types::{CardRequest, MessageResponse, Wallet, WalletResponse};

impl ApiClient {
    /// Authenticated greeting, useful as a session probe
    pub async fn welcome(&self) -> Result<MessageResponse, ClientError> {
        self.execute(RequestDescriptor::get("/")).await
    }

    /// Create a wallet for the current user
    pub async fn create_wallet(&self) -> Result<(), ClientError> {
        self.post_empty("/wallets").await.map(|_| ())
    }

    /// Fetch a wallet with its cards
    pub async fn get_wallet(&self, wallet_id: &str) -> Result<Wallet, ClientError> {
        let response: WalletResponse = self
            .execute(RequestDescriptor::get(format!("/wallets/{wallet_id}")))
            .await?;
        Ok(response.wallet)
    }

    /// Attach a card to a wallet
    pub async fn add_card(&self, wallet_id: &str, card: &CardRequest) -> Result<(), ClientError> {
        let req = RequestDescriptor::post(format!("/wallets/{wallet_id}/cards")).with_json(card)?;
        self.send(req).await.map(|_| ())
    }
}
