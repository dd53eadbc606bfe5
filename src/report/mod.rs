//! Reporting: plain-text tables and messages for the terminal.

pub mod format;

pub use format::*;
