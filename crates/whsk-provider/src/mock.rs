//! Scripted in-memory provider for tests.

use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::{EventSubscription, Provider, ProviderError, ProviderEvent, event_channel};

type Reply = Result<Value, ProviderError>;

#[derive(Default)]
pub struct MockProvider {
    replies: RefCell<HashMap<String, VecDeque<Reply>>>,
    requests: RefCell<Vec<(String, Value)>>,
    listeners: Rc<RefCell<Vec<Option<UnboundedSender<ProviderEvent>>>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply for the next `method` request.
    pub fn respond(&self, method: &str, value: Value) {
        self.push(method, Ok(value));
    }

    /// Queue a failure for the next `method` request.
    pub fn fail(&self, method: &str, error: ProviderError) {
        self.push(method, Err(error));
    }

    fn push(&self, method: &str, reply: Reply) {
        self.replies
            .borrow_mut()
            .entry(method.to_owned())
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<(String, Value)> {
        self.requests.borrow().last().cloned()
    }

    pub fn count(&self, method: &str) -> usize {
        self.requests.borrow().iter().filter(|(m, _)| m == method).count()
    }

    /// Deliver an event to every live subscription.
    pub fn emit(&self, event: ProviderEvent) {
        for tx in self.listeners.borrow().iter().flatten() {
            let _ = tx.unbounded_send(event.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().iter().filter(|l| l.is_some()).count()
    }
}

#[async_trait(?Send)]
impl Provider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.requests.borrow_mut().push((method.to_owned(), params));
        let reply = self
            .replies
            .borrow_mut()
            .get_mut(method)
            .and_then(|queue| queue.pop_front());
        reply.unwrap_or_else(|| Err(ProviderError::rpc(format!("no mock reply for {method}"))))
    }

    fn subscribe(&self) -> Result<EventSubscription, ProviderError> {
        let (tx, rx) = event_channel();
        let slot = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.push(Some(tx));
            listeners.len() - 1
        };
        let listeners = self.listeners.clone();
        Ok(EventSubscription::new(rx, move || {
            if let Some(entry) = listeners.borrow_mut().get_mut(slot) {
                *entry = None;
            }
        }))
    }
}
