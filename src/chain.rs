use async_trait::async_trait;
use ethers::{
    contract::LogMeta,
    providers::{Http, Middleware, Provider, Ws},
    types::{Address, BlockId, BlockNumber, U256, U64},
};
use log::{debug, info};
use std::{future::Future, sync::Arc, time::Duration};

use crate::abi::{CrowdsaleContract, InvestedFilter};
use crate::config::{ChainConfig, RuntimeConfig};
use crate::errors::InvestorsError;
use crate::types::InvestmentEvent;

/// Read-only view of a deployed crowdsale and the chain it lives on.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Current chain height. Only used for diagnostics.
    async fn block_number(&self) -> Result<u64, InvestorsError>;

    async fn wei_raised(&self) -> Result<U256, InvestorsError>;

    async fn tokens_sold(&self) -> Result<U256, InvestorsError>;

    async fn investor_count(&self) -> Result<u64, InvestorsError>;

    /// Every `Invested` log emitted by the contract, in the order the node returns them.
    async fn invested_events(&self) -> Result<Vec<InvestmentEvent>, InvestorsError>;

    async fn block_timestamp(&self, block: u64) -> Result<u64, InvestorsError>;
}

pub async fn connect_http(config: &ChainConfig) -> Result<Arc<Provider<Http>>, InvestorsError> {
    let provider = Provider::<Http>::try_from(config.rpc_url.as_str()).map_err(|e| {
        InvestorsError::Connection {
            endpoint: config.rpc_url.clone(),
            reason: e.to_string(),
        }
    })?;
    Ok(Arc::new(provider))
}

pub async fn connect_ws(config: &ChainConfig) -> Result<Arc<Provider<Ws>>, InvestorsError> {
    let ws = Ws::connect(&config.rpc_url)
        .await
        .map_err(|e| InvestorsError::Connection {
            endpoint: config.rpc_url.clone(),
            reason: e.to_string(),
        })?;
    Ok(Arc::new(Provider::new(ws)))
}

pub struct EthersChainReader<M> {
    client: Arc<M>,
    crowdsale: CrowdsaleContract<M>,
    from_block: u64,
    timeout: Duration,
}

impl<M: Middleware + 'static> EthersChainReader<M> {
    pub fn new(client: Arc<M>, crowdsale: Address, runtime: &RuntimeConfig) -> Self {
        Self {
            crowdsale: CrowdsaleContract::new(crowdsale, client.clone()),
            client,
            from_block: runtime.from_block,
            timeout: runtime.request_timeout,
        }
    }

    pub fn contract_address(&self) -> Address {
        self.crowdsale.address()
    }

    async fn timed<F: Future>(&self, operation: &'static str, call: F) -> Result<F::Output, InvestorsError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| InvestorsError::Timeout {
                operation,
                secs: self.timeout.as_secs(),
            })
    }
}

#[async_trait]
impl<M: Middleware + 'static> ChainReader for EthersChainReader<M> {
    async fn block_number(&self) -> Result<u64, InvestorsError> {
        let height = self
            .timed("eth_blockNumber", self.client.get_block_number())
            .await?
            .map_err(|e| InvestorsError::Connection {
                endpoint: "eth_blockNumber".into(),
                reason: e.to_string(),
            })?;
        Ok(height.as_u64())
    }

    async fn wei_raised(&self) -> Result<U256, InvestorsError> {
        let call = self.crowdsale.wei_raised();
        self.timed("weiRaised", call.call())
            .await?
            .map_err(|e| InvestorsError::ContractCall {
                method: "weiRaised",
                reason: e.to_string(),
            })
    }

    async fn tokens_sold(&self) -> Result<U256, InvestorsError> {
        let call = self.crowdsale.tokens_sold();
        self.timed("tokensSold", call.call())
            .await?
            .map_err(|e| InvestorsError::ContractCall {
                method: "tokensSold",
                reason: e.to_string(),
            })
    }

    async fn investor_count(&self) -> Result<u64, InvestorsError> {
        let call = self.crowdsale.investor_count();
        let count = self
            .timed("investorCount", call.call())
            .await?
            .map_err(|e| InvestorsError::ContractCall {
                method: "investorCount",
                reason: e.to_string(),
            })?;
        u64::try_from(count).map_err(|_| InvestorsError::ContractCall {
            method: "investorCount",
            reason: format!("count {} does not fit in 64 bits", count),
        })
    }

    async fn invested_events(&self) -> Result<Vec<InvestmentEvent>, InvestorsError> {
        info!(
            "Getting Invested events of {:?} from block {}",
            self.contract_address(),
            self.from_block
        );
        let filter = self
            .crowdsale
            .invested_filter()
            .from_block(self.from_block)
            .to_block(BlockNumber::Latest);
        let logs = self
            .timed("eth_getLogs", filter.query_with_meta())
            .await?
            .map_err(|e| InvestorsError::EventQuery(e.to_string()))?;

        Ok(logs.into_iter().map(|(log, meta)| to_investment(log, meta)).collect())
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64, InvestorsError> {
        debug!("Resolving timestamp of block {}", block);
        let id = BlockId::Number(BlockNumber::Number(U64::from(block)));
        let header = self
            .timed("eth_getBlockByNumber", self.client.get_block(id))
            .await?
            .map_err(|e| InvestorsError::BlockLookup {
                block,
                reason: e.to_string(),
            })?
            .ok_or(InvestorsError::BlockNotFound(block))?;
        Ok(header.timestamp.low_u64())
    }
}

fn to_investment(log: InvestedFilter, meta: LogMeta) -> InvestmentEvent {
    InvestmentEvent {
        investor: log.investor,
        wei_amount: log.wei_amount,
        token_amount: log.token_amount,
        customer_id: log.customer_id,
        block_number: meta.block_number.as_u64(),
        transaction_hash: meta.transaction_hash,
        log_index: meta.log_index,
    }
}
