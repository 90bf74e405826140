use ethers::types::Address;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr, time::Duration};
use validator::{Validate, ValidationError};

use crate::errors::InvestorsError;

pub const DEFAULT_CHAIN: &str = "mainnet";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChainConfig {
    pub name: String,
    #[validate(custom = "validate_rpc_url")]
    pub rpc_url: String,
}

impl ChainConfig {
    /// An explicit endpoint wins; otherwise `<CHAIN>_RPC_URL` is read from the environment.
    pub fn resolve(chain: &str, rpc_override: Option<String>) -> Result<Self, InvestorsError> {
        let rpc_url = match rpc_override.filter(|url| !url.trim().is_empty()) {
            Some(url) => url,
            None => {
                let env_key = Self::env_key(chain);
                env::var(&env_key).map_err(|_| InvestorsError::UnknownChain {
                    chain: chain.to_string(),
                    env_key,
                })?
            }
        };

        let config = Self {
            name: chain.to_string(),
            rpc_url: rpc_url.trim().to_string(),
        };
        config.validate_all()?;
        Ok(config)
    }

    pub fn env_key(chain: &str) -> String {
        format!("{}_RPC_URL", chain.trim().to_uppercase().replace('-', "_"))
    }

    pub fn validate_all(&self) -> Result<(), InvestorsError> {
        if self.name.trim().is_empty() {
            return Err(InvestorsError::InvalidConfig("chain name is empty".into()));
        }
        self.validate().map_err(|e| {
            InvestorsError::InvalidConfig(format!("chain `{}`: {}", self.name, e))
        })
    }

    pub fn is_websocket(&self) -> bool {
        self.rpc_url.starts_with("ws://") || self.rpc_url.starts_with("wss://")
    }
}

fn validate_rpc_url(url: &str) -> Result<(), ValidationError> {
    const SCHEMES: [&str; 4] = ["http://", "https://", "ws://", "wss://"];
    if !SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        return Err(ValidationError::new("invalid_rpc_url"));
    }
    Ok(())
}

pub fn parse_contract_address(raw: &str) -> Result<Address, InvestorsError> {
    let address = Address::from_str(raw.trim())
        .map_err(|_| InvestorsError::InvalidConfig(format!("`{}` is not a contract address", raw)))?;
    if address == Address::zero() {
        return Err(InvestorsError::InvalidConfig("contract address is zero".into()));
    }
    Ok(address)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub from_block: u64,
    pub request_timeout: Duration,
    pub log_level: LevelFilter,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            from_block: 0,
            request_timeout: Duration::from_secs(30),
            log_level: LevelFilter::Info,
        }
    }
}
