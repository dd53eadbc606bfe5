//! Input/output helpers.
//!
//! - Latin-1 CSV loading (`ingest`)
//! - typing and date normalization (`normalize`)
//! - result exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;
pub mod normalize;

pub use export::*;
pub use ingest::*;
pub use normalize::*;
