//! Instrument list parsing and per-instrument data admission.

use crate::domain::error::ScanError;
use crate::domain::ohlcv::{OhlcvBar, validate_series};
use std::collections::HashSet;

pub const MIN_OHLCV_BARS: usize = 50;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty code list")]
    Empty,

    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    if input.trim().is_empty() {
        return Err(UniverseError::Empty);
    }

    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

/// Checks that a fetched series is usable for a scan: non-empty, strictly
/// increasing dates and at least [`MIN_OHLCV_BARS`] bars.
pub fn admit_series(code: &str, bars: &[OhlcvBar]) -> Result<(), ScanError> {
    if bars.is_empty() {
        return Err(ScanError::NoData {
            code: code.to_string(),
        });
    }
    validate_series(code, bars)?;
    if bars.len() < MIN_OHLCV_BARS {
        return Err(ScanError::InsufficientData {
            code: code.to_string(),
            bars: bars.len(),
            minimum: MIN_OHLCV_BARS,
        });
    }
    Ok(())
}
