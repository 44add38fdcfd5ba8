//! Configuration validation.
//!
//! Validates the scan config before any data is fetched.

use crate::domain::error::ScanError;
use crate::domain::universe::parse_codes;
use crate::ports::config_port::ConfigPort;

pub const MAX_LOOKBACK_MONTHS: i64 = 120;

const PLACEHOLDERS: &[&str] = &[
    "your_bot_token_here",
    "your_chat_id_here",
    "path_to_output_dir",
];

/// A credential or target value that is present, non-blank and not a template placeholder.
pub fn is_configured_value(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => !PLACEHOLDERS.contains(&v),
        _ => false,
    }
}

pub fn validate_scan_config(config: &dyn ConfigPort) -> Result<(), ScanError> {
    validate_codes(config)?;
    validate_lookback(config)?;
    validate_telegram_timeout(config)?;
    Ok(())
}

fn validate_codes(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let codes = config
        .get_string("scan", "codes")
        .ok_or_else(|| ScanError::ConfigMissing {
            section: "scan".to_string(),
            key: "codes".to_string(),
        })?;
    parse_codes(&codes).map_err(|e| ScanError::ConfigInvalid {
        section: "scan".to_string(),
        key: "codes".to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let value = config.get_int("scan", "lookback_months", 6);
    if !(1..=MAX_LOOKBACK_MONTHS).contains(&value) {
        return Err(ScanError::ConfigInvalid {
            section: "scan".to_string(),
            key: "lookback_months".to_string(),
            reason: format!("lookback_months must be between 1 and {}", MAX_LOOKBACK_MONTHS),
        });
    }
    Ok(())
}

fn validate_telegram_timeout(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let value = config.get_int("telegram", "timeout_secs", 10);
    if value <= 0 {
        return Err(ScanError::ConfigInvalid {
            section: "telegram".to_string(),
            key: "timeout_secs".to_string(),
            reason: "timeout_secs must be positive".to_string(),
        });
    }
    Ok(())
}
