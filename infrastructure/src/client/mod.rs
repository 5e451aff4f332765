//! Remote aggregator client
//!
//! Lets the chat front-end run against an `ai-fiesta serve` instance instead
//! of calling providers in-process.

mod http_aggregator;

pub use http_aggregator::HttpAggregatorClient;
