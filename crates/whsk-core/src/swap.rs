//! Swap form controller.
//!
//! A submission is split into three steps so that UI state is never borrowed
//! across an await point:
//!
//! 1. [`SwapForm::begin`] checks the guards, sets the pending flag and opens
//!    a pending record;
//! 2. [`Submission::execute`] issues the single contract call and waits for
//!    the receipt;
//! 3. [`SwapForm::finish`] settles the record and clears the pending flag.

use std::future::Future;
use thiserror::Error;
use tracing::{info, warn};
use whsk_contract::{ContractError, WrappedToken};
use whsk_provider::Provider;
use whsk_types::{Address, Direction, ParseError, TokenSymbol, format_ether, parse_ether};

use crate::notifier::OperationLog;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error(transparent)]
    Amount(#[from] ParseError),
    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Display balances, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balances {
    pub hsk: String,
    pub whsk: String,
}

impl Default for Balances {
    fn default() -> Self {
        Self {
            hsk: "0".to_owned(),
            whsk: "0".to_owned(),
        }
    }
}

impl Balances {
    pub fn of(&self, token: TokenSymbol) -> &str {
        match token {
            TokenSymbol::Hsk => &self.hsk,
            TokenSymbol::Whsk => &self.whsk,
        }
    }
}

/// Native and wrapped balance of `owner`.
pub async fn fetch_balances<P: Provider>(token: &WrappedToken<P>, owner: &Address) -> Result<Balances, ContractError> {
    let (native, wrapped) = futures::try_join!(token.native_balance(owner), token.wrapped_balance(owner))?;
    Ok(Balances {
        hsk: format_ether(native),
        whsk: format_ether(wrapped),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: &'static str,
    pub disabled: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SwapForm {
    top_amount: String,
    bottom_amount: String,
    direction: Direction,
    pending: bool,
    balances: Balances,
}

impl SwapForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top_amount(&self) -> &str {
        &self.top_amount
    }

    pub fn bottom_amount(&self) -> &str {
        &self.bottom_amount
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Edit the top field; the bottom field mirrors it verbatim.
    pub fn set_top_amount(&mut self, value: &str) {
        self.top_amount = value.to_owned();
        self.bottom_amount = value.to_owned();
    }

    /// Edit the bottom field; the top field mirrors it verbatim.
    pub fn set_bottom_amount(&mut self, value: &str) {
        self.bottom_amount = value.to_owned();
        self.top_amount = value.to_owned();
    }

    /// Swap which token is on top. Amounts are kept.
    pub fn toggle_direction(&mut self) -> Direction {
        self.direction = self.direction.toggled();
        self.direction
    }

    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    pub fn set_balances(&mut self, balances: Balances) {
        self.balances = balances;
    }

    pub fn top_token(&self) -> TokenSymbol {
        self.direction.input_token()
    }

    pub fn bottom_token(&self) -> TokenSymbol {
        self.direction.output_token()
    }

    pub fn top_balance(&self) -> &str {
        self.balances.of(self.top_token())
    }

    pub fn bottom_balance(&self) -> &str {
        self.balances.of(self.bottom_token())
    }

    /// Fill the top field (only) with its token's displayed balance.
    pub fn max_top(&mut self) {
        self.top_amount = self.top_balance().to_owned();
    }

    /// Fill the bottom field (only) with its token's displayed balance.
    pub fn max_bottom(&mut self) {
        self.bottom_amount = self.bottom_balance().to_owned();
    }

    pub fn submit_button(&self, connected: bool) -> SubmitButton {
        if !connected {
            return SubmitButton {
                label: "Connect Wallet",
                disabled: true,
                busy: false,
            };
        }
        if self.top_amount.is_empty() {
            return SubmitButton {
                label: "Enter Amount",
                disabled: true,
                busy: false,
            };
        }
        if self.pending {
            return SubmitButton {
                label: self.direction.progress_label(),
                disabled: true,
                busy: true,
            };
        }
        SubmitButton {
            label: self.direction.action_label(),
            disabled: false,
            busy: false,
        }
    }

    /// Open a submission, or `None` when there is no account, no amount, or
    /// another submission is still pending.
    pub fn begin(&mut self, account: Option<&Address>, log: &mut OperationLog) -> Option<Submission> {
        let account = account?;
        if self.top_amount.is_empty() || self.pending {
            return None;
        }
        self.pending = true;
        let direction = self.direction;
        let amount = self.top_amount.clone();
        let id = log.start(direction.operation_title(), direction.describe(&amount));
        info!(id = %id, ?direction, %amount, "swap submitted");
        Some(Submission {
            id,
            account: account.clone(),
            direction,
            amount,
        })
    }

    /// Settle the record opened by `begin` and release the pending flag.
    pub fn finish(&mut self, log: &mut OperationLog, id: &str, outcome: Result<String, SwapError>) {
        match outcome {
            Ok(tx_hash) => {
                info!(id, %tx_hash, "swap confirmed");
                log.complete(id, tx_hash);
            }
            Err(err) => {
                warn!(id, "swap failed: {err}");
                log.fail(id, err.to_string());
            }
        }
        self.pending = false;
    }
}

/// Snapshot of one submitted swap, detached from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub account: Address,
    pub direction: Direction,
    pub amount: String,
}

impl Submission {
    /// Issue exactly one contract call and wait for it to be mined.
    /// Returns the transaction hash.
    pub async fn execute<P, S, F>(&self, token: &WrappedToken<P>, sleep: S) -> Result<String, SwapError>
    where
        P: Provider,
        S: Fn() -> F,
        F: Future<Output = ()>,
    {
        let wei = parse_ether(&self.amount)?;
        let tx_hash = match self.direction {
            Direction::Wrap => token.deposit(&self.account, wei).await?,
            Direction::Unwrap => token.withdraw(&self.account, wei).await?,
        };
        let receipt = token.wait_for_receipt(&tx_hash, sleep).await?;
        Ok(receipt.transaction_hash)
    }
}
