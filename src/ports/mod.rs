//! Port traits for the scanner's external collaborators.

pub mod config_port;
pub mod data_port;
pub mod notify_port;
pub mod sheet_port;
