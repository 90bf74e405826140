use ethers::types::U256;
use log::{info, warn};

use crate::aggregator::Aggregator;
use crate::chain::ChainReader;
use crate::errors::InvestorsError;
use crate::report::{write_report, ReportSink};
use crate::types::InvestorBook;
use crate::utils::{progress_bar, wei_to_ether_string};

/// Runs the full report: contract state, event scan, aggregation, output.
///
/// The report is only published once every event has been folded, so any
/// failure along the way leaves the destination untouched.
pub async fn extract_investors<R: ChainReader + ?Sized>(
    reader: &R,
    sink: &ReportSink,
    show_progress: bool,
) -> Result<InvestorBook, InvestorsError> {
    info!("Block number is {}", reader.block_number().await?);

    let raised = reader.wei_raised().await?;
    info!("Total amount raised is {} ether", wei_to_ether_string(raised));

    info!("Getting events");
    let events = reader.invested_events().await?;
    info!("Analysing {} raw events", events.len());

    let mut aggregator = Aggregator::new(reader);
    if show_progress {
        aggregator = aggregator.with_progress(progress_bar(events.len() as u64, "Resolving blocks"));
    }
    let book = aggregator.aggregate(&events).await?;

    cross_check(reader, &book, raised).await;

    write_report(&book, sink)?;

    info!("Total {} investors", book.len());
    info!("All done! Enjoy your decentralized future.");
    Ok(book)
}

/// A disagreement between the folded events and the contract's own counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    WeiRaised { events: U256, contract: U256 },
    TokensSold { events: U256, contract: U256 },
    InvestorCount { events: u64, contract: u64 },
}

/// Compares the book against `weiRaised()`, `tokensSold()` and `investorCount()`.
/// Mismatches are logged and returned, never fatal. A counter the contract
/// does not expose is skipped.
pub async fn cross_check<R: ChainReader + ?Sized>(
    reader: &R,
    book: &InvestorBook,
    raised: U256,
) -> Vec<Discrepancy> {
    let mut found = Vec::new();

    let invested = book.total_invested_wei();
    if invested != raised {
        warn!(
            "Invested events sum to {} ether but the contract reports {} ether raised",
            wei_to_ether_string(invested),
            wei_to_ether_string(raised)
        );
        found.push(Discrepancy::WeiRaised {
            events: invested,
            contract: raised,
        });
    }

    match reader.tokens_sold().await {
        Ok(sold) if sold != book.total_tokens() => {
            warn!(
                "Invested events issued {} tokens but the contract reports {} sold",
                book.total_tokens(),
                sold
            );
            found.push(Discrepancy::TokensSold {
                events: book.total_tokens(),
                contract: sold,
            });
        }
        Ok(_) => {}
        Err(e) => warn!("Skipping tokens sold check: {}", e),
    }

    let investors = book.len() as u64;
    match reader.investor_count().await {
        Ok(count) if count != investors => {
            warn!(
                "Found {} investors in events but the contract counts {}",
                investors, count
            );
            found.push(Discrepancy::InvestorCount {
                events: investors,
                contract: count,
            });
        }
        Ok(_) => {}
        Err(e) => warn!("Skipping investor count check: {}", e),
    }

    found
}
