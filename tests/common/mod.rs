#![allow(dead_code)]

use async_trait::async_trait;
use crowdsale_investors::{chain::ChainReader, errors::InvestorsError, types::InvestmentEvent};
use ethers::types::{Address, U256};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

/// In-memory chain with a fixed set of events and block timestamps.
#[derive(Default)]
pub struct FakeChain {
    pub events: Vec<InvestmentEvent>,
    pub timestamps: HashMap<u64, u64>,
    pub wei_raised: U256,
    pub tokens_sold: Option<U256>,
    pub investor_count: Option<u64>,
    pub lookups: AtomicUsize,
}

impl FakeChain {
    pub fn new(events: Vec<InvestmentEvent>, timestamps: &[(u64, u64)]) -> Self {
        let wei_raised = events
            .iter()
            .fold(U256::zero(), |acc, e| acc + e.wei_amount);
        let tokens_sold = events
            .iter()
            .fold(U256::zero(), |acc, e| acc + e.token_amount);
        Self {
            events,
            timestamps: timestamps.iter().copied().collect(),
            wei_raised,
            tokens_sold: Some(tokens_sold),
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn block_number(&self) -> Result<u64, InvestorsError> {
        Ok(self.timestamps.keys().copied().max().unwrap_or_default())
    }

    async fn wei_raised(&self) -> Result<U256, InvestorsError> {
        Ok(self.wei_raised)
    }

    async fn tokens_sold(&self) -> Result<U256, InvestorsError> {
        self.tokens_sold.ok_or(InvestorsError::ContractCall {
            method: "tokensSold",
            reason: "execution reverted".into(),
        })
    }

    async fn investor_count(&self) -> Result<u64, InvestorsError> {
        self.investor_count.ok_or(InvestorsError::ContractCall {
            method: "investorCount",
            reason: "execution reverted".into(),
        })
    }

    async fn invested_events(&self) -> Result<Vec<InvestmentEvent>, InvestorsError> {
        Ok(self.events.clone())
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64, InvestorsError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.timestamps
            .get(&block)
            .copied()
            .ok_or(InvestorsError::BlockNotFound(block))
    }
}

pub fn ether(amount: u64) -> U256 {
    U256::from(amount) * U256::exp10(18)
}

pub fn invest(investor: Address, wei: U256, tokens: u64, block: u64) -> InvestmentEvent {
    InvestmentEvent::new(investor, wei, U256::from(tokens), block)
}
