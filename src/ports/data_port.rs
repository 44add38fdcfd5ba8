//! Price history port trait.

use crate::domain::error::ScanError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub trait DataPort {
    /// Daily bars for one instrument within `[start_date, end_date]`, in date order.
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScanError>;

    /// Fetches every code, keeping only instruments that returned at least one bar.
    /// Per-code failures are logged and skipped.
    fn fetch_many(
        &self,
        codes: &[String],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> BTreeMap<String, Vec<OhlcvBar>> {
        let mut series = BTreeMap::new();
        for code in codes {
            log::info!("Fetching data for {}", code);
            match self.fetch_ohlcv(code, start_date, end_date) {
                Ok(bars) if bars.is_empty() => {
                    log::warn!("No data found for {} between {} and {}", code, start_date, end_date);
                }
                Ok(bars) => {
                    series.insert(code.clone(), bars);
                }
                Err(e) => {
                    log::warn!("Could not fetch data for {}: {}", code, e);
                }
            }
        }
        if series.is_empty() {
            log::warn!("No data was fetched for any instrument");
        }
        series
    }
}
