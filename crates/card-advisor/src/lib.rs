//! Credit card recommendation engine: catalog loading, tier classification,
//! filtering, weighted scoring and per-tier fallback selection.

pub mod catalog;
pub mod config;
pub mod error;
pub mod recommend;
pub mod telemetry;
