//! Application configuration.
//!
//! Every field has a default matching the production deployment; a partial
//! JSON document only overrides the fields it names.

use serde::{Deserialize, Serialize};
use whsk_contract::WHSK_ADDRESS;
use whsk_storage::{CHAIN_ID_KEY, SessionKeys, WALLET_ADDRESS_KEY};
use whsk_types::ChainId;

pub const TARGET_CHAIN_ID: u64 = 133;
pub const EXPLORER_TX_URL: &str = "https://explorer.hsk.xyz/tx/";
pub const LOGO_URL: &str = "https://hyper-index-dex.4everland.store/hsk-logo.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub contract_address: String,
    pub chain_id: u64,
    pub explorer_tx_url: String,
    pub logo_url: String,
    pub address_storage_key: String,
    pub chain_storage_key: String,
    pub receipt_poll_ms: u32,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            contract_address: WHSK_ADDRESS.to_owned(),
            chain_id: TARGET_CHAIN_ID,
            explorer_tx_url: EXPLORER_TX_URL.to_owned(),
            logo_url: LOGO_URL.to_owned(),
            address_storage_key: WALLET_ADDRESS_KEY.to_owned(),
            chain_storage_key: CHAIN_ID_KEY.to_owned(),
            receipt_poll_ms: 1_500,
            log_level: "info".to_owned(),
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn target_chain(&self) -> ChainId {
        ChainId(self.chain_id)
    }

    pub fn session_keys(&self) -> SessionKeys {
        SessionKeys {
            address: self.address_storage_key.clone(),
            chain_id: self.chain_storage_key.clone(),
        }
    }

    pub fn explorer_link(&self, tx_hash: &str) -> String {
        format!("{}{}", self.explorer_tx_url, tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_hashkey_chain() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.target_chain(), ChainId(133));
        assert_eq!(cfg.target_chain().to_hex(), "0x85");
        assert_eq!(cfg.session_keys(), SessionKeys::default());
        assert_eq!(cfg.explorer_link("0xabc"), "https://explorer.hsk.xyz/tx/0xabc");
    }

    #[test]
    fn partial_json_overrides_named_fields_only() -> Result<(), serde_json::Error> {
        let cfg = AppConfig::from_json(r#"{ "chainId": 177, "logLevel": "debug" }"#)?;
        assert_eq!(cfg.chain_id, 177);
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.contract_address, WHSK_ADDRESS);
        assert_eq!(cfg.receipt_poll_ms, 1_500);
        Ok(())
    }
}
