//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod indicator_frame;
pub mod trade;
pub mod signal;
pub mod scorer;
pub mod metrics;
pub mod universe;
pub mod scan;
pub mod config_validation;
pub mod error;
