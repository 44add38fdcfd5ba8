#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use signalscan::domain::error::ScanError;
pub use signalscan::domain::ohlcv::OhlcvBar;
use signalscan::ports::data_port::DataPort;
use signalscan::ports::notify_port::NotifyPort;
use signalscan::ports::sheet_port::{SheetPort, SheetRow};
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        code: &str,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScanError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(ScanError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(code).cloned().unwrap_or_default())
    }
}

/// Notifier that records every message it is asked to send.
pub struct RecordingNotifier {
    pub configured: bool,
    pub succeed: bool,
    pub messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn configured() -> Self {
        Self {
            configured: true,
            succeed: true,
            messages: RefCell::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::configured()
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            ..Self::configured()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl NotifyPort for RecordingNotifier {
    fn notify(&self, message: &str) -> bool {
        if !self.configured {
            return false;
        }
        self.messages.borrow_mut().push(message.to_string());
        self.succeed
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

/// Sheet sink that keeps the last rows written to each section.
pub struct RecordingSheet {
    pub configured: bool,
    pub sections: RefCell<Vec<(String, Vec<SheetRow>)>>,
}

impl RecordingSheet {
    pub fn configured() -> Self {
        Self {
            configured: true,
            sections: RefCell::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            sections: RefCell::new(Vec::new()),
        }
    }

    pub fn section(&self, name: &str) -> Option<Vec<SheetRow>> {
        self.sections
            .borrow()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, rows)| rows.clone())
    }

    pub fn section_names(&self) -> Vec<String> {
        self.sections.borrow().iter().map(|(n, _)| n.clone()).collect()
    }
}

impl SheetPort for RecordingSheet {
    fn log_rows(&self, section: &str, rows: &[SheetRow]) -> bool {
        if !self.configured {
            return false;
        }
        self.sections
            .borrow_mut()
            .push((section.to_string(), rows.to_vec()));
        true
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

pub fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
}

pub fn scan_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(9, 30, 15)
        .unwrap()
}

pub fn make_bars(code: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            code: code.to_string(),
            date: day(i),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            adj_close: None,
            volume: 1000 + (i as i64 % 7) * 100,
        })
        .collect()
}

/// Steady decline of 0.1 per bar from 200 with a one-day dip to 50 at bar 60.
///
/// The dip leaving the 20-bar window at bar 80 lifts SMA(20) over SMA(50)
/// while every recent move is a loss (RSI 0), so the engine buys at 192.0.
/// The dip leaving the 50-bar window at bar 110 drops SMA(50) back over
/// SMA(20) and the engine sells at 189.0.
pub fn dip_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| if i == 60 { 50.0 } else { 200.0 - 0.1 * i as f64 })
        .collect()
}

/// Closed round trip: buy bar 80, sell bar 110.
pub fn round_trip_bars(code: &str) -> Vec<OhlcvBar> {
    make_bars(code, &dip_closes(120))
}

/// Buy at bar 80 still open at the last bar.
pub fn open_position_bars(code: &str) -> Vec<OhlcvBar> {
    make_bars(code, &dip_closes(100))
}

/// Alternating series with no crossover under oversold RSI.
pub fn quiet_bars(code: &str, n: usize) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..n)
        .map(|i| 100.0 + if i % 2 == 0 { 1.0 } else { -1.0 })
        .collect();
    make_bars(code, &closes)
}
