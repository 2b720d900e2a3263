//! taxi-glance - A small analytic dashboard over NYC taxi trips.
//!
//! This library exposes the core modules for the binary and integration tests.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod output;
pub mod query;
pub mod web;
