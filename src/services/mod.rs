//! Collaborators that supply price history to the optimizer.

pub mod market_data;
pub mod snapshot;
pub mod synthetic;

pub use market_data::{
    FallbackPriceHistoryProvider, HttpPriceHistoryProvider, MarketDataError, PriceHistoryProvider,
};
pub use snapshot::{PriceSnapshot, SnapshotStore};
pub use synthetic::SyntheticPriceGenerator;
