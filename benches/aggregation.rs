use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crowdsale_investors::{
    aggregator::aggregate_investors,
    chain::ChainReader,
    errors::InvestorsError,
    report::render_report,
    types::InvestmentEvent,
};
use ethers::types::{Address, U256};

/// Every block's timestamp is derived from its number.
struct SyntheticChain;

#[async_trait]
impl ChainReader for SyntheticChain {
    async fn block_number(&self) -> Result<u64, InvestorsError> {
        Ok(0)
    }

    async fn wei_raised(&self) -> Result<U256, InvestorsError> {
        Ok(U256::zero())
    }

    async fn tokens_sold(&self) -> Result<U256, InvestorsError> {
        Ok(U256::zero())
    }

    async fn investor_count(&self) -> Result<u64, InvestorsError> {
        Ok(0)
    }

    async fn invested_events(&self) -> Result<Vec<InvestmentEvent>, InvestorsError> {
        Ok(Vec::new())
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64, InvestorsError> {
        Ok(1_500_000_000 + block * 13)
    }
}

fn synthetic_events(count: u64, investors: usize) -> Vec<InvestmentEvent> {
    let addresses: Vec<Address> = (0..investors).map(|_| Address::random()).collect();
    (0..count)
        .map(|i| {
            InvestmentEvent::new(
                addresses[i as usize % investors],
                U256::exp10(16) * (i % 50 + 1),
                U256::from(i * 100),
                4_000_000 + (count - i) / 3,
            )
        })
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let events = synthetic_events(10_000, 1_500);

    c.bench_function("aggregate 10k events", |b| {
        b.iter(|| {
            runtime
                .block_on(aggregate_investors(&SyntheticChain, black_box(&events)))
                .expect("aggregation")
        })
    });

    let book = runtime
        .block_on(aggregate_investors(&SyntheticChain, &events))
        .expect("aggregation");
    c.bench_function("render 1.5k investors", |b| {
        b.iter(|| render_report(black_box(&book)).expect("render"))
    });
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
