//! Wallet session: connected account and chain id, mirrored to storage.

use std::cell::RefCell;
use thiserror::Error;
use tracing::{info, warn};
use whsk_provider::{EventSubscription, Provider, ProviderError, ProviderEvent, eth};
use whsk_storage::{KeyValueStore, SessionStore};
use whsk_types::{Address, ChainId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please install MetaMask!")]
    ProviderMissing,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn is_on_chain(&self, target: ChainId) -> bool {
        self.chain_id == Some(target)
    }
}

pub struct SessionManager<P, S> {
    provider: Option<P>,
    store: SessionStore<S>,
    target_chain: ChainId,
    session: RefCell<Session>,
}

impl<P: Provider, S: KeyValueStore> SessionManager<P, S> {
    pub fn new(provider: Option<P>, store: SessionStore<S>, target_chain: ChainId) -> Self {
        Self {
            provider,
            store,
            target_chain,
            session: RefCell::new(Session::default()),
        }
    }

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    pub fn target_chain(&self) -> ChainId {
        self.target_chain
    }

    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn account(&self) -> Option<Address> {
        self.session.borrow().account.clone()
    }

    pub fn chain_id(&self) -> Option<ChainId> {
        self.session.borrow().chain_id
    }

    /// Connected and on the target chain.
    pub fn is_on_target_chain(&self) -> bool {
        let session = self.session.borrow();
        session.is_connected() && session.is_on_chain(self.target_chain)
    }

    /// Load the persisted session without touching the provider.
    pub fn restore(&self) -> Session {
        let stored = self.store.load();
        let mut session = self.session.borrow_mut();
        session.account = stored.account;
        session.chain_id = stored.chain_id;
        session.clone()
    }

    /// Ask the provider for accounts and chain id, then persist both.
    pub async fn connect(&self) -> Result<Session, SessionError> {
        let provider = self.provider.as_ref().ok_or(SessionError::ProviderMissing)?;
        let accounts = eth::request_accounts(provider).await?;
        let chain_id = eth::chain_id(provider).await?;

        let account = accounts.into_iter().next();
        match &account {
            Some(a) => self.store.save_account(a),
            None => self.store.save_account(&Address(String::new())),
        }
        self.store.save_chain_id(chain_id);

        let mut session = self.session.borrow_mut();
        session.account = account;
        session.chain_id = Some(chain_id);
        info!(account = ?session.account, chain_id = %chain_id, "wallet connected");
        Ok(session.clone())
    }

    pub fn disconnect(&self) {
        *self.session.borrow_mut() = Session::default();
        self.store.clear();
        info!("wallet disconnected");
    }

    /// Fold a provider notification into the session.
    pub fn apply_event(&self, event: &ProviderEvent) -> Session {
        match event {
            ProviderEvent::ChainChanged(chain_id) => {
                self.session.borrow_mut().chain_id = Some(*chain_id);
                self.store.save_chain_id(*chain_id);
                info!(chain_id = %chain_id, "chain changed");
            }
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                Some(account) => {
                    self.session.borrow_mut().account = Some(account.clone());
                    self.store.save_account(account);
                    info!(account = %account, "account changed");
                }
                None => {
                    *self.session.borrow_mut() = Session::default();
                    self.store.clear();
                    info!("wallet locked or all accounts revoked");
                }
            },
        }
        self.session()
    }

    pub fn subscribe(&self) -> Result<EventSubscription, SessionError> {
        let provider = self.provider.as_ref().ok_or(SessionError::ProviderMissing)?;
        Ok(provider.subscribe()?)
    }

    /// Request a switch to the target chain. Failures are logged only.
    pub async fn switch_network(&self) -> bool {
        let Some(provider) = self.provider.as_ref() else {
            warn!("failed to switch network: {}", SessionError::ProviderMissing);
            return false;
        };
        match eth::switch_chain(provider, self.target_chain).await {
            Ok(()) => true,
            Err(err) => {
                warn!("failed to switch network: {err}");
                false
            }
        }
    }

    /// First account the provider already authorized, without prompting.
    pub async fn authorized_account(&self) -> Option<Address> {
        let provider = self.provider.as_ref()?;
        match eth::accounts(provider).await {
            Ok(accounts) => accounts.into_iter().next(),
            Err(err) => {
                warn!("eth_accounts failed: {err}");
                None
            }
        }
    }
}
