//! Typed wrappers over the raw `request` dispatch.

use alloy_primitives::{Bytes, U256, hex};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;
use whsk_types::{Address, ChainId};

use crate::{Provider, ProviderError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub data: String,
}

impl TransactionRequest {
    pub fn new(from: &Address, to: &str, data: &[u8]) -> Self {
        Self {
            from: from.0.clone(),
            to: to.to_owned(),
            value: None,
            data: hex::encode_prefixed(data),
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(to_quantity(value));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    /// `0x1` success, `0x0` reverted.
    #[serde(default)]
    pub status: Option<String>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        !matches!(self.status.as_deref(), Some("0x0") | Some("0x00"))
    }
}

/// Hex quantity encoding (`0x0`, `0x85`).
pub fn to_quantity(value: U256) -> String {
    format!("0x{value:x}")
}

pub fn parse_quantity(method: &str, raw: &str) -> Result<U256, ProviderError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16).map_err(|_| ProviderError::invalid(method, format!("bad quantity {raw}")))
}

fn as_str<'a>(method: &str, value: &'a Value) -> Result<&'a str, ProviderError> {
    value
        .as_str()
        .ok_or_else(|| ProviderError::invalid(method, format!("expected string, got {value}")))
}

fn as_accounts(method: &str, value: &Value) -> Result<Vec<Address>, ProviderError> {
    let items = value
        .as_array()
        .ok_or_else(|| ProviderError::invalid(method, format!("expected array, got {value}")))?;
    Ok(items
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| Address(s.to_owned()))
        .collect())
}

/// `eth_requestAccounts`: may prompt the user.
pub async fn request_accounts<P: Provider + ?Sized>(provider: &P) -> Result<Vec<Address>, ProviderError> {
    let method = "eth_requestAccounts";
    let value = provider.request(method, json!([])).await?;
    as_accounts(method, &value)
}

/// `eth_accounts`: already authorized accounts, never prompts.
pub async fn accounts<P: Provider + ?Sized>(provider: &P) -> Result<Vec<Address>, ProviderError> {
    let method = "eth_accounts";
    let value = provider.request(method, json!([])).await?;
    as_accounts(method, &value)
}

pub async fn chain_id<P: Provider + ?Sized>(provider: &P) -> Result<ChainId, ProviderError> {
    let method = "eth_chainId";
    let value = provider.request(method, json!([])).await?;
    let raw = as_str(method, &value)?;
    ChainId::from_hex(raw).map_err(|e| ProviderError::invalid(method, e.to_string()))
}

pub async fn switch_chain<P: Provider + ?Sized>(provider: &P, chain: ChainId) -> Result<(), ProviderError> {
    provider
        .request(
            "wallet_switchEthereumChain",
            json!([{ "chainId": chain.to_hex() }]),
        )
        .await?;
    Ok(())
}

pub async fn get_balance<P: Provider + ?Sized>(provider: &P, account: &Address) -> Result<U256, ProviderError> {
    let method = "eth_getBalance";
    let value = provider.request(method, json!([account.0, "latest"])).await?;
    parse_quantity(method, as_str(method, &value)?)
}

/// Read-only `eth_call` against `to` at the latest block.
pub async fn call<P: Provider + ?Sized>(provider: &P, to: &str, data: &[u8]) -> Result<Bytes, ProviderError> {
    let method = "eth_call";
    let value = provider
        .request(
            method,
            json!([{ "to": to, "data": hex::encode_prefixed(data) }, "latest"]),
        )
        .await?;
    let raw = as_str(method, &value)?;
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| ProviderError::invalid(method, e.to_string()))
}

/// Hand the transaction to the wallet for signing and broadcast; returns the hash.
pub async fn send_transaction<P: Provider + ?Sized>(
    provider: &P,
    tx: &TransactionRequest,
) -> Result<String, ProviderError> {
    let method = "eth_sendTransaction";
    let params = serde_json::to_value(tx).map_err(|e| ProviderError::invalid(method, e.to_string()))?;
    debug!(to = %tx.to, "sending transaction");
    let value = provider.request(method, json!([params])).await?;
    Ok(as_str(method, &value)?.to_owned())
}

/// `None` while the transaction is still unmined.
pub async fn transaction_receipt<P: Provider + ?Sized>(
    provider: &P,
    tx_hash: &str,
) -> Result<Option<TransactionReceipt>, ProviderError> {
    let method = "eth_getTransactionReceipt";
    let value = provider.request(method, json!([tx_hash])).await?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ProviderError::invalid(method, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;

    #[tokio::test]
    async fn chain_id_is_decoded_from_hex() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond("eth_chainId", json!("0x85"));
        assert_eq!(chain_id(&provider).await?, ChainId(133));
        Ok(())
    }

    #[tokio::test]
    async fn switch_chain_sends_hex_id() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond("wallet_switchEthereumChain", Value::Null);
        switch_chain(&provider, ChainId(133)).await?;
        let (method, params) = provider.last_request().expect("request recorded");
        assert_eq!(method, "wallet_switchEthereumChain");
        assert_eq!(params, json!([{ "chainId": "0x85" }]));
        Ok(())
    }

    #[tokio::test]
    async fn balance_and_receipt_decoding() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond("eth_getBalance", json!("0xde0b6b3a7640000"));
        provider.respond("eth_getTransactionReceipt", Value::Null);
        provider.respond(
            "eth_getTransactionReceipt",
            json!({ "transactionHash": "0xabc", "blockNumber": "0x10", "status": "0x0" }),
        );

        let account = Address("0x1111111111111111111111111111111111111111".to_owned());
        assert_eq!(
            get_balance(&provider, &account).await?,
            U256::from(1_000_000_000_000_000_000u64)
        );
        assert_eq!(transaction_receipt(&provider, "0xabc").await?, None);
        let receipt = transaction_receipt(&provider, "0xabc").await?.expect("mined");
        assert!(!receipt.succeeded());
        Ok(())
    }

    #[tokio::test]
    async fn send_transaction_serializes_value_as_quantity() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond("eth_sendTransaction", json!("0xfeed"));
        let from = Address("0x2222222222222222222222222222222222222222".to_owned());
        let tx = TransactionRequest::new(&from, "0xCA8aAceEC5Db1e91B9Ed3a344bA026c4a2B3ebF6", &[0xd0, 0xe3, 0x0d, 0xb0])
            .with_value(U256::from(133u64));

        assert_eq!(send_transaction(&provider, &tx).await?, "0xfeed");
        let (_, params) = provider.last_request().expect("request recorded");
        assert_eq!(params[0]["value"], json!("0x85"));
        assert_eq!(params[0]["data"], json!("0xd0e30db0"));
        Ok(())
    }

    #[tokio::test]
    async fn unexpected_shapes_are_invalid_responses() {
        let provider = MockProvider::new();
        provider.respond("eth_requestAccounts", json!("0xabc"));
        let err = request_accounts(&provider).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse { .. }));
    }
}
