//! Query execution and result shaping for taxi-glance.
//!
//! This module isolates the lookup, execution and chart derivation pipeline
//! from the web layer.

pub mod chart;
pub mod executor;

pub use chart::{derive_chart, ChartRule, ChartSpec, CHART_RULES};
pub use executor::{QueryExecutor, RenderModel};
