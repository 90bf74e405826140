use ethers::types::{Address, H256, U256};
use hashbrown::HashMap;

/// One `Invested` log emitted by the crowdsale contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestmentEvent {
    pub investor: Address,
    pub wei_amount: U256,
    pub token_amount: U256,
    pub customer_id: u128,
    pub block_number: u64,
    pub transaction_hash: H256,
    pub log_index: U256,
}

impl InvestmentEvent {
    pub fn new(investor: Address, wei_amount: U256, token_amount: U256, block_number: u64) -> Self {
        Self {
            investor,
            wei_amount,
            token_amount,
            customer_id: 0,
            block_number,
            transaction_hash: H256::zero(),
            log_index: U256::zero(),
        }
    }
}

/// Everything one address contributed over the lifetime of the sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestorSummary {
    pub address: Address,
    /// Unix seconds of the earliest block holding a payment from this address.
    pub first_payment_at: u64,
    pub invested_wei: U256,
    pub tokens: U256,
    pub payments: usize,
}

impl InvestorSummary {
    fn from_event(event: &InvestmentEvent, timestamp: u64) -> Self {
        Self {
            address: event.investor,
            first_payment_at: timestamp,
            invested_wei: event.wei_amount,
            tokens: event.token_amount,
            payments: 1,
        }
    }

    fn absorb(&mut self, event: &InvestmentEvent, timestamp: u64) {
        if timestamp < self.first_payment_at {
            self.first_payment_at = timestamp;
        }
        self.invested_wei = self.invested_wei.saturating_add(event.wei_amount);
        self.tokens = self.tokens.saturating_add(event.token_amount);
        self.payments += 1;
    }
}

/// Per-investor summaries, iterated in the order addresses were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestorBook {
    entries: Vec<InvestorSummary>,
    index: HashMap<Address, usize>,
}

impl InvestorBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event, already resolved to its block timestamp, into the book.
    pub fn record(&mut self, event: &InvestmentEvent, timestamp: u64) {
        match self.index.get(&event.investor) {
            Some(&slot) => self.entries[slot].absorb(event, timestamp),
            None => {
                self.index.insert(event.investor, self.entries.len());
                self.entries.push(InvestorSummary::from_event(event, timestamp));
            }
        }
    }

    pub fn get(&self, address: &Address) -> Option<&InvestorSummary> {
        self.index.get(address).map(|&slot| &self.entries[slot])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InvestorSummary> {
        self.entries.iter()
    }

    pub fn total_invested_wei(&self) -> U256 {
        self.entries
            .iter()
            .fold(U256::zero(), |acc, s| acc.saturating_add(s.invested_wei))
    }

    pub fn total_tokens(&self) -> U256 {
        self.entries
            .iter()
            .fold(U256::zero(), |acc, s| acc.saturating_add(s.tokens))
    }
}

impl<'a> IntoIterator for &'a InvestorBook {
    type Item = &'a InvestorSummary;
    type IntoIter = std::slice::Iter<'a, InvestorSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
