//! Price history port trait.

use crate::domain::error::StockSageError;
use crate::domain::market::BarInterval;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    /// Bars covering the last `lookback_days`, oldest first. An empty vector
    /// means the provider had nothing for this ticker.
    fn fetch_series(
        &self,
        ticker: &str,
        lookback_days: u32,
        interval: BarInterval,
    ) -> Result<Vec<OhlcvBar>, StockSageError>;

    /// Human-readable company name, if the provider knows one.
    fn company_name(&self, ticker: &str) -> Option<String>;
}
