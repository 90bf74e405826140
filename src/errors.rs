use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvestorsError {
    #[error("no RPC endpoint configured for chain `{chain}` (set {env_key} or pass --rpc-url)")]
    UnknownChain { chain: String, env_key: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to connect to {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    #[error("contract call {method}() failed: {reason}")]
    ContractCall { method: &'static str, reason: String },

    #[error("failed to fetch Invested events: {0}")]
    EventQuery(String),

    #[error("block {0} not found")]
    BlockNotFound(u64),

    #[error("failed to look up block {block}: {reason}")]
    BlockLookup { block: u64, reason: String },

    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: &'static str, secs: u64 },

    #[error("block timestamp {0} is out of range")]
    InvalidTimestamp(u64),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
