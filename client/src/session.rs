//! Account session — address-keyed state with a fixed-interval poll loop.
//!
//! The session owns every piece of per-account read state: the lockup
//! aggregate plus the latest balance, allowance, and delegate. Changing the
//! observed address resets all of it unconditionally, so a wallet switch
//! mid-session can never leak another account's data.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use votelock_chain::ContractReader;
use votelock_types::{ContractParams, Timestamp, TokenAmount, WalletAddress};

use crate::aggregator::LockupAggregator;
use crate::error::ClientError;

/// Point-in-time view of the session for display.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub address: Option<WalletAddress>,
    pub balance: Option<TokenAmount>,
    pub allowance: Option<TokenAmount>,
    /// The current delegate, if any. The zero address reads as `None`.
    pub delegate: Option<WalletAddress>,
    pub lockup_count: usize,
    pub total_staked: TokenAmount,
    pub total_votes: TokenAmount,
    pub latest_expiration: Timestamp,
    pub active_indices: Vec<u64>,
    /// Whether the lockup scan is still in flight for this address.
    pub scanning: bool,
}

/// Per-account read state, refreshed by polling.
pub struct AccountSession<C> {
    chain: Arc<C>,
    params: ContractParams,
    address: Option<WalletAddress>,
    aggregator: LockupAggregator,
    balance: Option<TokenAmount>,
    allowance: Option<TokenAmount>,
    delegate: Option<WalletAddress>,
}

impl<C: ContractReader> AccountSession<C> {
    pub fn new(chain: Arc<C>, params: ContractParams) -> Self {
        let aggregator = LockupAggregator::new(params.scan_warn_threshold);
        Self {
            chain,
            params,
            address: None,
            aggregator,
            balance: None,
            allowance: None,
            delegate: None,
        }
    }

    pub fn address(&self) -> Option<WalletAddress> {
        self.address
    }

    pub fn aggregator(&self) -> &LockupAggregator {
        &self.aggregator
    }

    pub fn balance(&self) -> Option<TokenAmount> {
        self.balance
    }

    /// Switch the observed address. Any change discards all previous state;
    /// the next refresh starts the lockup scan from index 0.
    pub fn set_address(&mut self, address: Option<WalletAddress>) {
        if self.address == address {
            return;
        }
        self.address = address;
        self.aggregator.reset();
        self.balance = None;
        self.allowance = None;
        self.delegate = None;
    }

    /// Refresh all read state once.
    ///
    /// The three independent reads run concurrently; a failure in any of
    /// them leaves the previous value in place ("no data yet") and polling
    /// is the only retry. The lockup scan then advances sequentially; its
    /// error is surfaced, with the cursor intact for the next tick.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let Some(address) = self.address else {
            return Ok(());
        };

        let (balance, allowance, delegate) = tokio::join!(
            self.chain.token_balance(address),
            self.chain.token_allowance(address, self.params.voting),
            self.chain.delegate_of(address),
        );
        match balance {
            Ok(value) => self.balance = Some(value),
            Err(e) => tracing::debug!("balance read failed: {e}"),
        }
        match allowance {
            Ok(value) => self.allowance = Some(value),
            Err(e) => tracing::debug!("allowance read failed: {e}"),
        }
        match delegate {
            Ok(value) => self.delegate = Some(value),
            Err(e) => tracing::debug!("delegate read failed: {e}"),
        }

        self.aggregator.scan(self.chain.as_ref(), address).await?;
        Ok(())
    }

    /// Refresh only the token balance (after a successful extension).
    pub async fn refresh_balance(&mut self) -> Result<(), ClientError> {
        let Some(address) = self.address else {
            return Ok(());
        };
        self.balance = Some(self.chain.token_balance(address).await?);
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            address: self.address,
            balance: self.balance,
            allowance: self.allowance,
            delegate: self.delegate.filter(|d| !d.is_zero()),
            lockup_count: self.aggregator.len(),
            total_staked: self.aggregator.total_staked(),
            total_votes: self.aggregator.total_votes(),
            latest_expiration: self.aggregator.latest_expiration(),
            active_indices: self.aggregator.active_indices(),
            scanning: self.address.is_some() && !self.aggregator.is_exhausted(),
        }
    }

    /// The scheduled poll task: refresh at a fixed interval until the
    /// shutdown signal arrives. Read failures are logged and retried on the
    /// next tick; `on_tick` observes the session after every refresh.
    pub async fn run<F>(
        mut self,
        poll_interval: Duration,
        mut shutdown: broadcast::Receiver<()>,
        mut on_tick: F,
    ) where
        F: FnMut(&Self),
    {
        let mut ticker = tokio::time::interval(poll_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.refresh().await {
                        tracing::debug!("refresh failed: {e}");
                    }
                    on_tick(&self);
                }
                _ = shutdown.recv() => {
                    tracing::info!("session poll loop stopped");
                    break;
                }
            }
        }
    }
}
