//! Scan cycle orchestration: fetch -> engine -> scorer -> reporting.
//!
//! Each instrument is processed independently; a failure in one never stops
//! the others. A cycle where no instrument yields data ends before any
//! notification or sheet logging.

use crate::domain::metrics::TradeSummary;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::scorer::train_and_score;
use crate::domain::signal::run_strategy;
use crate::domain::trade::{ScoreResult, Trade, TradeBatch, latest_open};
use crate::domain::universe::admit_series;
use crate::ports::data_port::DataPort;
use crate::ports::notify_port::NotifyPort;
use crate::ports::sheet_port::{SheetPort, SheetRow};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

pub const DEFAULT_LOOKBACK_MONTHS: u32 = 6;
pub const DAYS_PER_MONTH: i64 = 30;

pub const TRADE_LOG_SECTION: &str = "Trade Log";
pub const SUMMARY_SECTION: &str = "Summary P&L";
pub const ANALYTICS_SECTION: &str = "ML Analytics";

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub codes: Vec<String>,
    pub lookback_months: u32,
}

impl ScanConfig {
    /// Fetch window ending on `today`, `lookback_months * 30` days long.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let days = self.lookback_months as i64 * DAYS_PER_MONTH;
        (today - Duration::days(days), today)
    }
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    pub instruments_analyzed: usize,
    pub skipped: Vec<String>,
    pub trades: TradeBatch,
    pub scores: Vec<ScoreResult>,
    pub summary: TradeSummary,
    pub alerts_sent: usize,
}

pub struct Scanner<'a> {
    config: ScanConfig,
    data: &'a dyn DataPort,
    notifier: &'a dyn NotifyPort,
    sheet: &'a dyn SheetPort,
}

impl<'a> Scanner<'a> {
    pub fn new(
        config: ScanConfig,
        data: &'a dyn DataPort,
        notifier: &'a dyn NotifyPort,
        sheet: &'a dyn SheetPort,
    ) -> Self {
        Self {
            config,
            data,
            notifier,
            sheet,
        }
    }

    /// Runs one scan cycle as of `now`. Returns `None`, before any notification,
    /// when no instrument has a usable series.
    pub fn run(&self, now: NaiveDateTime) -> Option<ScanReport> {
        log::info!("Starting scan of {} instruments", self.config.codes.len());

        let (start, end) = self.config.window(now.date());
        let fetched = self.data.fetch_many(&self.config.codes, start, end);

        let mut skipped = Vec::new();
        let mut series = Vec::with_capacity(fetched.len());
        for (code, bars) in fetched {
            match admit_series(&code, &bars) {
                Ok(()) => series.push((code, bars)),
                Err(e) => {
                    log::warn!("Skipping {}: {}", code, e);
                    skipped.push(code);
                }
            }
        }
        if series.is_empty() {
            log::error!("No usable price data available, ending scan");
            return None;
        }

        if self.notifier.is_configured() {
            self.send(&startup_message(now, self.config.codes.len()));
        }

        let mut trades = TradeBatch::new();
        let mut scores = Vec::new();
        let mut alerts_sent = 0usize;

        for (code, bars) in &series {
            log::info!("Analyzing {} ({} bars)", code, bars.len());
            let instrument = analyze_instrument(code, bars);

            if !instrument.trades.is_empty() {
                log::info!("Found {} trades for {}", instrument.trades.len(), code);
                for (i, trade) in instrument.trades.iter().enumerate() {
                    log::info!("  Trade {}: {}", i + 1, describe_trade(trade));
                }

                if let Some(open) = latest_open(&instrument.trades) {
                    let alert = buy_alert_message(open, now.time());
                    if self.notifier.is_configured() {
                        if self.send(&alert) {
                            alerts_sent += 1;
                        }
                    } else {
                        log::info!("Alert (demo): {}", alert.replace('\n', " | "));
                    }
                }

                trades.insert(code.clone(), instrument.trades);
            }

            log::info!(
                "Prediction accuracy for {}: {:.2}%",
                code,
                instrument.score.accuracy_pct
            );
            scores.push(instrument.score);
        }

        let summary = TradeSummary::compute(&trades);
        self.report(&trades, &summary, &scores);

        let instruments_analyzed = series.len();
        if self.notifier.is_configured() {
            self.send(&completion_message(instruments_analyzed, alerts_sent, now.time()));
        }

        log::info!("Scan complete");
        Some(ScanReport {
            instruments_analyzed,
            skipped,
            trades,
            scores,
            summary,
            alerts_sent,
        })
    }

    fn send(&self, message: &str) -> bool {
        let sent = self.notifier.notify(message);
        if sent {
            log::info!("Notification sent");
        } else {
            log::warn!("Failed to send notification");
        }
        sent
    }

    fn report(&self, trades: &TradeBatch, summary: &TradeSummary, scores: &[ScoreResult]) {
        if trades.is_empty() {
            return;
        }

        if !self.sheet.is_configured() {
            log_demo_report(trades, summary, scores);
            return;
        }

        let trade_rows = trade_log_rows(trades);
        if trade_rows.is_empty() {
            log::warn!("No completed trades to log");
        } else {
            if !self.sheet.log_rows(TRADE_LOG_SECTION, &trade_rows) {
                log::warn!("Failed to log {}", TRADE_LOG_SECTION);
            }
            if !self.sheet.log_rows(SUMMARY_SECTION, &summary_rows(summary)) {
                log::warn!("Failed to log {}", SUMMARY_SECTION);
            }
        }

        if !scores.is_empty() && !self.sheet.log_rows(ANALYTICS_SECTION, &analytics_rows(scores)) {
            log::warn!("Failed to log {}", ANALYTICS_SECTION);
        }
    }
}

/// Engine and scorer output for one instrument.
#[derive(Debug, Clone)]
pub struct InstrumentResult {
    pub trades: Vec<Trade>,
    pub score: ScoreResult,
}

/// Runs the signal engine and the scorer independently over the same bars.
pub fn analyze_instrument(code: &str, bars: &[OhlcvBar]) -> InstrumentResult {
    let trades = run_strategy(code, bars);
    let accuracy_pct = train_and_score(code, bars);
    InstrumentResult {
        trades,
        score: ScoreResult {
            code: code.to_string(),
            accuracy_pct,
        },
    }
}

pub fn describe_trade(trade: &Trade) -> String {
    match (trade.sell_date, trade.sell_price, trade.pnl()) {
        (Some(sell_date), Some(sell_price), Some(pnl)) => format!(
            "buy at {:.2} on {}, sell at {:.2} on {}, P&L {:.2}",
            trade.buy_price, trade.buy_date, sell_price, sell_date, pnl
        ),
        _ => format!(
            "buy at {:.2} on {} (open position)",
            trade.buy_price, trade.buy_date
        ),
    }
}

pub fn buy_alert_message(trade: &Trade, time: NaiveTime) -> String {
    format!(
        "*{}* Buy Signal Alert!\nBuy Price: {:.2}\nDate: {}\nTime: {}",
        trade.code,
        trade.buy_price,
        trade.buy_date.format("%Y-%m-%d"),
        time.format("%H:%M:%S")
    )
}

pub fn startup_message(now: NaiveDateTime, instruments: usize) -> String {
    format!(
        "Signal scan started\nTime: {}\nAnalyzing {} instruments",
        now.format("%Y-%m-%d %H:%M:%S"),
        instruments
    )
}

pub fn completion_message(analyzed: usize, alerts_sent: usize, time: NaiveTime) -> String {
    format!(
        "Scan complete\nAnalyzed {} instruments\nSent {} alerts\nTime: {}",
        analyzed,
        alerts_sent,
        time.format("%H:%M:%S")
    )
}

/// One row per completed trade.
pub fn trade_log_rows(trades: &TradeBatch) -> Vec<SheetRow> {
    let mut rows = Vec::new();
    for (code, list) in trades {
        for trade in list {
            let (Some(sell_date), Some(sell_price), Some(pnl)) =
                (trade.sell_date, trade.sell_price, trade.pnl())
            else {
                continue;
            };
            rows.push(
                SheetRow::new()
                    .cell("Ticker", code)
                    .cell("Buy Date", trade.buy_date.format("%Y-%m-%d"))
                    .cell("Buy Price", format!("{:.2}", trade.buy_price))
                    .cell("Sell Date", sell_date.format("%Y-%m-%d"))
                    .cell("Sell Price", format!("{:.2}", sell_price))
                    .cell("P&L", format!("{:.2}", pnl)),
            );
        }
    }
    rows
}

pub fn summary_rows(summary: &TradeSummary) -> Vec<SheetRow> {
    let metric = |name: &str, value: String| {
        SheetRow::new()
            .cell("Metric", name)
            .cell("Value", value)
    };
    vec![
        metric("Total P&L", format!("{:.2}", summary.total_pnl)),
        metric("Total Trades", summary.completed_trades.to_string()),
        metric("Win Ratio (%)", format!("{:.2}", summary.win_ratio_pct)),
        metric("Winning Trades", summary.winning_trades.to_string()),
    ]
}

pub fn analytics_rows(scores: &[ScoreResult]) -> Vec<SheetRow> {
    scores
        .iter()
        .map(|s| {
            SheetRow::new()
                .cell("Ticker", &s.code)
                .cell("Prediction Accuracy (%)", format!("{:.2}", s.accuracy_pct))
        })
        .collect()
}

fn log_demo_report(trades: &TradeBatch, summary: &TradeSummary, scores: &[ScoreResult]) {
    log::info!("Sheet log (demo), would log:");
    log::info!("  {}:", TRADE_LOG_SECTION);
    for row in trade_log_rows(trades) {
        let line: Vec<String> = row.cells.iter().map(|(c, v)| format!("{}: {}", c, v)).collect();
        log::info!("    {}", line.join(" | "));
    }
    log::info!("  {}:", SUMMARY_SECTION);
    log::info!("    Total Trades: {}", summary.total_trades);
    log::info!("    Completed Trades: {}", summary.completed_trades);
    log::info!("  {}:", ANALYTICS_SECTION);
    for score in scores {
        log::info!("    {}: {:.2}% accuracy", score.code, score.accuracy_pct);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn batch() -> TradeBatch {
        let mut batch = TradeBatch::new();
        batch.insert(
            "TCS.NS".into(),
            vec![
                Trade::open("TCS.NS", d(3), 3500.0).close(d(10), 3612.25),
                Trade::open("TCS.NS", d(12), 3550.0),
            ],
        );
        batch
    }

    #[test]
    fn window_spans_lookback_months() {
        let config = ScanConfig {
            codes: vec![],
            lookback_months: 6,
        };
        let (start, end) = config.window(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!((end - start).num_days(), 180);
    }

    #[test]
    fn alert_message_contents() {
        let trade = Trade::open("TCS.NS", d(12), 3550.0);
        let msg = buy_alert_message(&trade, NaiveTime::from_hms_opt(9, 30, 5).unwrap());
        assert_eq!(
            msg,
            "*TCS.NS* Buy Signal Alert!\nBuy Price: 3550.00\nDate: 2024-06-12\nTime: 09:30:05"
        );
    }

    #[test]
    fn completion_message_counts() {
        let msg = completion_message(4, 2, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert!(msg.contains("Analyzed 4 instruments"));
        assert!(msg.contains("Sent 2 alerts"));
    }

    #[test]
    fn trade_log_rows_skip_open_positions() {
        let rows = trade_log_rows(&batch());
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].columns(),
            vec!["Ticker", "Buy Date", "Buy Price", "Sell Date", "Sell Price", "P&L"]
        );
        assert_eq!(rows[0].get("Ticker"), Some("TCS.NS"));
        assert_eq!(rows[0].get("Sell Date"), Some("2024-06-10"));
        assert_eq!(rows[0].get("P&L"), Some("112.25"));
    }

    #[test]
    fn summary_rows_layout() {
        let rows = summary_rows(&TradeSummary::compute(&batch()));
        let metrics: Vec<&str> = rows.iter().filter_map(|r| r.get("Metric")).collect();
        assert_eq!(
            metrics,
            vec!["Total P&L", "Total Trades", "Win Ratio (%)", "Winning Trades"]
        );
        assert_eq!(rows[0].get("Value"), Some("112.25"));
        assert_eq!(rows[1].get("Value"), Some("1"));
        assert_eq!(rows[2].get("Value"), Some("100.00"));
    }

    #[test]
    fn analytics_rows_format_accuracy() {
        let rows = analytics_rows(&[ScoreResult {
            code: "INFY.NS".into(),
            accuracy_pct: 53.8461,
        }]);
        assert_eq!(rows[0].get("Prediction Accuracy (%)"), Some("53.85"));
    }

    #[test]
    fn describe_open_and_closed() {
        let b = batch();
        let trades = &b["TCS.NS"];
        assert!(describe_trade(&trades[0]).contains("P&L 112.25"));
        assert!(describe_trade(&trades[1]).ends_with("(open position)"));
    }
}
