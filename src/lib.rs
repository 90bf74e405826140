pub mod abi;
pub mod aggregator;  // Folds events into per-investor summaries
pub mod chain;       // Node connection and contract reads
pub mod config;
pub mod errors;
pub mod extract;
pub mod report;      // CSV rendering and output sink
pub mod types;
pub mod utils;
