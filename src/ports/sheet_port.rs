//! Spreadsheet logging port trait.

/// One tabular row as ordered (column, value) cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    pub cells: Vec<(String, String)>,
}

impl SheetRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, column: &str, value: impl ToString) -> Self {
        self.cells.push((column.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn columns(&self) -> Vec<&str> {
        self.cells.iter().map(|(c, _)| c.as_str()).collect()
    }
}

/// Writes rows to a named section, creating it if absent and replacing its
/// previous contents. Implementations must not panic.
pub trait SheetPort {
    fn log_rows(&self, section: &str, rows: &[SheetRow]) -> bool;

    fn is_configured(&self) -> bool;
}
