//! Krishi advisory engine: traditional farming knowledge blended with soil-test science.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
