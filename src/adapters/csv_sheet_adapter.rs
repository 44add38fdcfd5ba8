//! Spreadsheet sink backed by one CSV file per section.
//!
//! `log_rows("Trade Log", ..)` writes `<output_dir>/trade_log.csv`, replacing
//! any previous contents. The header row is taken from the first row's columns.

use crate::domain::config_validation::is_configured_value;
use crate::domain::error::ScanError;
use crate::ports::config_port::ConfigPort;
use crate::ports::sheet_port::{SheetPort, SheetRow};
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvSheetAdapter {
    output_dir: Option<PathBuf>,
}

pub fn section_file_name(section: &str) -> String {
    let mut name = String::with_capacity(section.len());
    for c in section.trim().chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }
    let name = name.trim_matches('_');
    if name.is_empty() {
        "section.csv".to_string()
    } else {
        format!("{}.csv", name)
    }
}

fn sheet_error(e: csv::Error) -> ScanError {
    ScanError::Sheet {
        reason: e.to_string(),
    }
}

fn write_section(dir: &Path, path: &Path, rows: &[SheetRow]) -> Result<(), ScanError> {
    fs::create_dir_all(dir)?;
    let mut writer = csv::Writer::from_path(path).map_err(sheet_error)?;
    if let Some(first) = rows.first() {
        let columns = first.columns();
        writer.write_record(&columns).map_err(sheet_error)?;
        for row in rows {
            let record: Vec<&str> = columns
                .iter()
                .map(|column| row.get(column).unwrap_or(""))
                .collect();
            writer.write_record(&record).map_err(sheet_error)?;
        }
    }
    writer.flush()?;
    Ok(())
}

impl CsvSheetAdapter {
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self { output_dir }
    }

    /// Reads `[sheets] output_dir`; blank or placeholder values leave the sink unconfigured.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let output_dir = config
            .get_string("sheets", "output_dir")
            .filter(|dir| is_configured_value(Some(dir)))
            .map(|dir| PathBuf::from(dir.trim()));
        Self::new(output_dir)
    }

    pub fn section_path(&self, section: &str) -> Option<PathBuf> {
        self.output_dir
            .as_ref()
            .map(|dir| dir.join(section_file_name(section)))
    }
}

impl SheetPort for CsvSheetAdapter {
    fn log_rows(&self, section: &str, rows: &[SheetRow]) -> bool {
        let (Some(dir), Some(path)) = (self.output_dir.as_ref(), self.section_path(section)) else {
            return false;
        };

        match write_section(dir, &path, rows) {
            Ok(()) => {
                log::debug!("wrote {} rows to {}", rows.len(), path.display());
                true
            }
            Err(e) => {
                log::warn!("failed to write sheet section '{}': {}", section, e);
                false
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.output_dir.is_some()
    }
}
