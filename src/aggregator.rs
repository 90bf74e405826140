use hashbrown::HashMap;
use indicatif::ProgressBar;
use log::debug;

use crate::chain::ChainReader;
use crate::errors::InvestorsError;
use crate::types::{InvestmentEvent, InvestorBook};

/// Folds raw `Invested` events into one summary per investor.
///
/// Logs are not guaranteed to arrive in block order, so the first payment of an
/// investor is always the minimum of the resolved block timestamps rather than
/// the timestamp of the first event seen.
pub struct Aggregator<'a, R: ?Sized> {
    reader: &'a R,
    timestamps: HashMap<u64, u64>,
    progress: ProgressBar,
}

impl<'a, R: ChainReader + ?Sized> Aggregator<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            timestamps: HashMap::new(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub async fn aggregate(&mut self, events: &[InvestmentEvent]) -> Result<InvestorBook, InvestorsError> {
        let mut book = InvestorBook::new();
        for event in events {
            let timestamp = self.block_timestamp(event.block_number).await?;
            book.record(event, timestamp);
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        debug!(
            "Folded {} events into {} investors using {} block lookups",
            events.len(),
            book.len(),
            self.timestamps.len()
        );
        Ok(book)
    }

    /// Number of distinct blocks resolved so far.
    pub fn resolved_blocks(&self) -> usize {
        self.timestamps.len()
    }

    async fn block_timestamp(&mut self, block: u64) -> Result<u64, InvestorsError> {
        if let Some(timestamp) = self.timestamps.get(&block) {
            return Ok(*timestamp);
        }
        let timestamp = self.reader.block_timestamp(block).await?;
        self.timestamps.insert(block, timestamp);
        Ok(timestamp)
    }
}

pub async fn aggregate_investors<R: ChainReader + ?Sized>(
    reader: &R,
    events: &[InvestmentEvent],
) -> Result<InvestorBook, InvestorsError> {
    Aggregator::new(reader).aggregate(events).await
}
