//! EIP-1193 provider seam.
//!
//! The browser front end implements [`Provider`] over `window.ethereum`; tests
//! use the scripted provider from the `mock` module. Everything above this
//! crate talks to the wallet through the typed helpers in [`eth`].

pub mod eth;
mod events;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use events::{EventSubscription, ProviderEvent, event_channel};

use async_trait::async_trait;
use serde_json::Value;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("no wallet provider found")]
    Missing,
    /// Raw provider failure; `Display` is the provider's message verbatim.
    #[error("{message}")]
    Rpc { code: Option<i64>, message: String },
    #[error("invalid {method} response: {detail}")]
    InvalidResponse { method: String, detail: String },
}

impl ProviderError {
    pub fn rpc(message: impl Into<String>) -> Self {
        ProviderError::Rpc {
            code: None,
            message: message.into(),
        }
    }

    pub fn invalid(method: &str, detail: impl Into<String>) -> Self {
        ProviderError::InvalidResponse {
            method: method.to_owned(),
            detail: detail.into(),
        }
    }
}

#[async_trait(?Send)]
pub trait Provider {
    /// Dispatch one JSON-RPC style request (`{ method, params }`).
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Start receiving `accountsChanged` / `chainChanged` notifications.
    /// Listeners are removed when the returned subscription is dropped.
    fn subscribe(&self) -> Result<EventSubscription, ProviderError>;
}

#[async_trait(?Send)]
impl<P: Provider + ?Sized> Provider for Rc<P> {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        (**self).request(method, params).await
    }

    fn subscribe(&self) -> Result<EventSubscription, ProviderError> {
        (**self).subscribe()
    }
}

#[async_trait(?Send)]
impl<'a, P: Provider + ?Sized> Provider for &'a P {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        (**self).request(method, params).await
    }

    fn subscribe(&self) -> Result<EventSubscription, ProviderError> {
        (**self).subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_displays_raw_message() {
        assert_eq!(ProviderError::rpc("user rejected").to_string(), "user rejected");

        let coded = ProviderError::Rpc {
            code: Some(4001),
            message: "User denied transaction signature.".to_owned(),
        };
        assert_eq!(coded.to_string(), "User denied transaction signature.");
        assert_eq!(
            ProviderError::invalid("eth_chainId", "not a string").to_string(),
            "invalid eth_chainId response: not a string"
        );
    }
}
