use alloy_primitives::U256;
use alloy_sol_types::{SolCall, sol};
use std::future::Future;
use thiserror::Error;
use tracing::{debug, info};
use whsk_provider::eth::{self, TransactionReceipt, TransactionRequest};
use whsk_provider::{Provider, ProviderError};
use whsk_types::Address;

pub const WHSK_ADDRESS: &str = "0xCA8aAceEC5Db1e91B9Ed3a344bA026c4a2B3ebF6";

sol! {
    interface IWHSK {
        function balanceOf(address owner) external view returns (uint256 balance);
        function deposit() external payable;
        function withdraw(uint256 amount) external;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("failed to decode {call} result: {detail}")]
    Decode { call: &'static str, detail: String },
    #[error("transaction reverted")]
    Reverted { tx_hash: String },
}

/// Client for the wrapped-HSK token contract, routed through the wallet provider.
pub struct WrappedToken<P> {
    provider: P,
    address: String,
}

impl<P: Provider> WrappedToken<P> {
    pub fn new(provider: P, address: impl Into<String>) -> Self {
        Self {
            provider,
            address: address.into(),
        }
    }

    /// Native HSK balance of `owner`.
    pub async fn native_balance(&self, owner: &Address) -> Result<U256, ContractError> {
        Ok(eth::get_balance(&self.provider, owner).await?)
    }

    /// WHSK balance of `owner` via `balanceOf`.
    pub async fn wrapped_balance(&self, owner: &Address) -> Result<U256, ContractError> {
        let owner_addr = owner
            .as_str()
            .parse::<alloy_primitives::Address>()
            .map_err(|_| ContractError::InvalidAddress(owner.0.clone()))?;
        let data = IWHSK::balanceOfCall { owner: owner_addr }.abi_encode();
        let raw = eth::call(&self.provider, &self.address, &data).await?;
        let decoded = IWHSK::balanceOfCall::abi_decode_returns(&raw, true).map_err(|e| ContractError::Decode {
            call: "balanceOf",
            detail: e.to_string(),
        })?;
        Ok(decoded.balance)
    }

    /// `deposit()` with `value = amount`; returns the transaction hash.
    pub async fn deposit(&self, from: &Address, amount: U256) -> Result<String, ContractError> {
        let data = IWHSK::depositCall {}.abi_encode();
        let tx = TransactionRequest::new(from, &self.address, &data).with_value(amount);
        let hash = eth::send_transaction(&self.provider, &tx).await?;
        info!(%hash, %amount, "deposit submitted");
        Ok(hash)
    }

    /// `withdraw(amount)`; returns the transaction hash.
    pub async fn withdraw(&self, from: &Address, amount: U256) -> Result<String, ContractError> {
        let data = IWHSK::withdrawCall { amount }.abi_encode();
        let tx = TransactionRequest::new(from, &self.address, &data);
        let hash = eth::send_transaction(&self.provider, &tx).await?;
        info!(%hash, %amount, "withdraw submitted");
        Ok(hash)
    }

    /// Poll for the receipt until the transaction is mined. There is no
    /// timeout; `sleep` paces the polling.
    pub async fn wait_for_receipt<S, F>(&self, tx_hash: &str, sleep: S) -> Result<TransactionReceipt, ContractError>
    where
        S: Fn() -> F,
        F: Future<Output = ()>,
    {
        loop {
            if let Some(receipt) = eth::transaction_receipt(&self.provider, tx_hash).await? {
                if !receipt.succeeded() {
                    return Err(ContractError::Reverted {
                        tx_hash: tx_hash.to_owned(),
                    });
                }
                debug!(tx_hash, block = ?receipt.block_number, "receipt received");
                return Ok(receipt);
            }
            sleep().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::cell::Cell;
    use whsk_provider::mock::MockProvider;

    fn owner() -> Address {
        Address("0x1111111111111111111111111111111111111111".to_owned())
    }

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(1_000_000_000_000_000_000u64)
    }

    #[test]
    fn selectors_match_weth_abi() {
        assert_eq!(IWHSK::depositCall::SELECTOR, [0xd0, 0xe3, 0x0d, 0xb0]);
        assert_eq!(IWHSK::withdrawCall::SELECTOR, [0x2e, 0x1a, 0x7d, 0x4d]);
        assert_eq!(IWHSK::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
    }

    #[tokio::test]
    async fn withdraw_encodes_amount_argument() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond("eth_sendTransaction", json!("0xhash"));
        let token = WrappedToken::new(&provider, WHSK_ADDRESS);

        let hash = token.withdraw(&owner(), ether(10)).await?;
        assert_eq!(hash, "0xhash");

        let (_, params) = provider.last_request().expect("request recorded");
        let tx = &params[0];
        assert_eq!(tx["to"], json!(WHSK_ADDRESS));
        assert!(tx.get("value").is_none());
        let data = tx["data"].as_str().unwrap_or_default();
        assert!(data.starts_with("0x2e1a7d4d"));
        assert!(data.ends_with("8ac7230489e80000"));
        Ok(())
    }

    #[tokio::test]
    async fn deposit_attaches_value() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond("eth_sendTransaction", json!("0xhash"));
        let token = WrappedToken::new(&provider, WHSK_ADDRESS);

        token.deposit(&owner(), ether(1)).await?;
        let (_, params) = provider.last_request().expect("request recorded");
        assert_eq!(params[0]["value"], json!("0xde0b6b3a7640000"));
        assert_eq!(params[0]["data"], json!("0xd0e30db0"));
        Ok(())
    }

    #[tokio::test]
    async fn wrapped_balance_decodes_uint256() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond(
            "eth_call",
            json!("0x0000000000000000000000000000000000000000000000001bc16d674ec80000"),
        );
        let token = WrappedToken::new(&provider, WHSK_ADDRESS);

        assert_eq!(token.wrapped_balance(&owner()).await?, ether(2));
        let (method, params) = provider.last_request().expect("request recorded");
        assert_eq!(method, "eth_call");
        assert!(params[0]["data"].as_str().unwrap_or_default().starts_with("0x70a08231"));
        Ok(())
    }

    #[tokio::test]
    async fn wrapped_balance_rejects_malformed_owner() {
        let provider = MockProvider::new();
        let token = WrappedToken::new(&provider, WHSK_ADDRESS);
        let err = token
            .wrapped_balance(&Address("not-an-address".to_owned()))
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidAddress(_)));
        assert_eq!(provider.count("eth_call"), 0);
    }

    #[tokio::test]
    async fn wait_for_receipt_polls_until_mined() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond("eth_getTransactionReceipt", Value::Null);
        provider.respond("eth_getTransactionReceipt", Value::Null);
        provider.respond(
            "eth_getTransactionReceipt",
            json!({ "transactionHash": "0xhash", "status": "0x1" }),
        );
        let token = WrappedToken::new(&provider, WHSK_ADDRESS);
        let sleeps = Cell::new(0);

        let receipt = token
            .wait_for_receipt("0xhash", || {
                sleeps.set(sleeps.get() + 1);
                async {}
            })
            .await?;
        assert_eq!(receipt.transaction_hash, "0xhash");
        assert_eq!(sleeps.get(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn reverted_receipt_is_an_error() {
        let provider = MockProvider::new();
        provider.respond(
            "eth_getTransactionReceipt",
            json!({ "transactionHash": "0xhash", "status": "0x0" }),
        );
        let token = WrappedToken::new(&provider, WHSK_ADDRESS);
        let err = token.wait_for_receipt("0xhash", || async {}).await.unwrap_err();
        assert_eq!(err.to_string(), "transaction reverted");
    }

    #[tokio::test]
    async fn provider_rejection_passes_message_through() {
        let provider = MockProvider::new();
        provider.fail("eth_sendTransaction", ProviderError::rpc("user rejected"));
        let token = WrappedToken::new(&provider, WHSK_ADDRESS);
        let err = token.withdraw(&owner(), ether(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "user rejected");
    }
}
