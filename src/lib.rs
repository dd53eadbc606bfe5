//! `retail-insights` library crate.
//!
//! The binary (`ri`) is a thin wrapper around this library so that:
//!
//! - loading, querying and forecasting are testable without spawning processes
//! - the store and analysis code can be reused outside the CLI

pub mod analysis;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod store;
