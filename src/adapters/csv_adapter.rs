//! CSV file price data adapter.
//!
//! Reads `<base_path>/<CODE>.csv` with a header row. Columns are matched by
//! name, case-insensitively: `Date, Open, High, Low, Close, Volume` are
//! required, `Adj Close` (or `adj_close`) is optional. A blank adjusted close
//! falls back to close.

use crate::domain::error::ScanError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    adj_close: Option<usize>,
    volume: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, ScanError> {
        let find = |names: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim().to_lowercase();
                names.iter().any(|n| *n == h)
            })
        };
        let require = |name: &str| {
            find(&[name]).ok_or_else(|| ScanError::Data {
                reason: format!("missing {} column", name),
            })
        };

        Ok(Columns {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            adj_close: find(&["adj close", "adj_close", "adjclose"]),
            volume: require("volume")?,
        })
    }
}

fn field<'r>(record: &'r csv::StringRecord, index: usize, name: &str) -> Result<&'r str, ScanError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| ScanError::Data {
            reason: format!("missing {} value", name),
        })
}

fn parse_f64(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, ScanError> {
    field(record, index, name)?
        .parse()
        .map_err(|e| ScanError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

fn parse_volume(record: &csv::StringRecord, index: usize) -> Result<i64, ScanError> {
    let raw = field(record, index, "volume")?;
    raw.parse::<i64>()
        .or_else(|_| raw.parse::<f64>().map(|v| v as i64))
        .map_err(|e| ScanError::Data {
            reason: format!("invalid volume value: {}", e),
        })
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScanError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| ScanError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| ScanError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let cols = Columns::from_headers(headers)?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| ScanError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = field(&record, cols.date, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                ScanError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let adj_close = match cols.adj_close {
                Some(i) if !field(&record, i, "adj close")?.is_empty() => {
                    Some(parse_f64(&record, i, "adj close")?)
                }
                _ => None,
            };

            bars.push(OhlcvBar {
                code: code.to_string(),
                date,
                open: parse_f64(&record, cols.open, "open")?,
                high: parse_f64(&record, cols.high, "high")?,
                low: parse_f64(&record, cols.low, "low")?,
                close: parse_f64(&record, cols.close, "close")?,
                adj_close,
                volume: parse_volume(&record, cols.volume)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
