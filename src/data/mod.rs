//! Synthetic input data for demos and tests.

pub mod sample;

pub use sample::{SampleConfig, SampleSummary, generate_sample_csv, write_sample_csv};
