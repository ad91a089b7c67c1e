use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use serde_json::Value;
use tracing::warn;
use whsk_types::{Address, ChainId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(ChainId),
}

impl ProviderEvent {
    /// Decode an `accountsChanged` payload (array of address strings).
    pub fn accounts_changed(payload: &Value) -> Option<Self> {
        let Some(items) = payload.as_array() else {
            warn!("accountsChanged payload is not an array: {payload}");
            return None;
        };
        let accounts = items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| Address(s.to_owned()))
            .collect();
        Some(ProviderEvent::AccountsChanged(accounts))
    }

    /// Decode a `chainChanged` payload (hex quantity string).
    pub fn chain_changed(payload: &Value) -> Option<Self> {
        let raw = payload.as_str()?;
        match ChainId::from_hex(raw) {
            Ok(chain) => Some(ProviderEvent::ChainChanged(chain)),
            Err(err) => {
                warn!("ignoring chainChanged: {err}");
                None
            }
        }
    }
}

pub fn event_channel() -> (UnboundedSender<ProviderEvent>, UnboundedReceiver<ProviderEvent>) {
    mpsc::unbounded()
}

/// Receiving end of a provider subscription. Dropping it runs the teardown,
/// which detaches the underlying listeners.
pub struct EventSubscription {
    rx: UnboundedReceiver<ProviderEvent>,
    teardown: Option<Box<dyn FnOnce()>>,
}

impl EventSubscription {
    pub fn new(rx: UnboundedReceiver<ProviderEvent>, teardown: impl FnOnce() + 'static) -> Self {
        Self {
            rx,
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Wait for the next event; `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<ProviderEvent> {
        self.rx.next().await
    }

    /// Take an already queued event without waiting.
    #[cfg(any(test, feature = "mock"))]
    pub fn try_next(&mut self) -> Option<ProviderEvent> {
        futures::FutureExt::now_or_never(self.rx.next()).flatten()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn decodes_payloads() {
        assert_eq!(
            ProviderEvent::accounts_changed(&json!(["0xabc", "0xdef"])),
            Some(ProviderEvent::AccountsChanged(vec![
                Address("0xabc".to_owned()),
                Address("0xdef".to_owned())
            ]))
        );
        assert_eq!(
            ProviderEvent::accounts_changed(&json!([])),
            Some(ProviderEvent::AccountsChanged(vec![]))
        );
        assert_eq!(ProviderEvent::accounts_changed(&json!("0xabc")), None);
        assert_eq!(
            ProviderEvent::chain_changed(&json!("0x85")),
            Some(ProviderEvent::ChainChanged(ChainId(133)))
        );
        assert_eq!(ProviderEvent::chain_changed(&json!("nope")), None);
    }

    #[test]
    fn drop_runs_teardown_once() {
        let detached = Rc::new(Cell::new(0));
        let counter = detached.clone();
        let (tx, rx) = event_channel();
        let mut sub = EventSubscription::new(rx, move || counter.set(counter.get() + 1));

        tx.unbounded_send(ProviderEvent::ChainChanged(ChainId(1))).unwrap();
        assert_eq!(sub.try_next(), Some(ProviderEvent::ChainChanged(ChainId(1))));
        assert_eq!(sub.try_next(), None);

        drop(sub);
        assert_eq!(detached.get(), 1);
    }
}
