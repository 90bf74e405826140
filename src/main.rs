use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use std::{path::PathBuf, str::FromStr, time::Duration};

use crowdsale_investors::{
    chain::{connect_http, connect_ws, EthersChainReader},
    config::{parse_contract_address, ChainConfig, RuntimeConfig, DEFAULT_CHAIN},
    extract::extract_investors,
    report::ReportSink,
    utils::setup_logger,
};

#[derive(Parser, Debug)]
#[command(about = "Extract crowdsale contract investors into a CSV report", long_about = None)]
struct Cli {
    /// Chain to read from; resolved through <CHAIN>_RPC_URL
    #[arg(long, default_value = DEFAULT_CHAIN)]
    chain: String,

    /// Crowdsale contract address to scan
    #[arg(long)]
    address: String,

    /// CSV file to write, stdout when omitted
    #[arg(long)]
    csv_file: Option<PathBuf>,

    #[arg(long, env = "RPC_URL")]
    rpc_url: Option<String>,

    #[arg(long, default_value_t = 0)]
    from_block: u64,

    /// Timeout for each RPC call, in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info", value_parser = LevelFilter::from_str)]
    log_level: LevelFilter,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let runtime = RuntimeConfig {
        from_block: cli.from_block,
        request_timeout: Duration::from_secs(cli.timeout_secs),
        log_level: cli.log_level,
    };
    setup_logger(runtime.log_level)?;

    let chain = ChainConfig::resolve(&cli.chain, cli.rpc_url)?;
    let crowdsale = parse_contract_address(&cli.address)?;
    let sink = ReportSink::from_path(cli.csv_file);
    let show_progress = sink != ReportSink::Stdout;

    info!("Web3 provider is {} ({})", chain.rpc_url, chain.name);

    let outcome = if chain.is_websocket() {
        let provider = connect_ws(&chain).await?;
        let reader = EthersChainReader::new(provider, crowdsale, &runtime);
        extract_investors(&reader, &sink, show_progress).await
    } else {
        let provider = connect_http(&chain).await?;
        let reader = EthersChainReader::new(provider, crowdsale, &runtime);
        extract_investors(&reader, &sink, show_progress).await
    };
    outcome.with_context(|| format!("failed to extract investors of {:?}", crowdsale))?;

    Ok(())
}
