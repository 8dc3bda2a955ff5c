#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for mongo-metrics
//!
//! This library runs a single MongoDB query and turns every result document
//! into a flat metric record that Telegraf (or any JSON-lines consumer) can ingest.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface, configuration, and orchestration
//! - [`source`]: Document source abstraction and the MongoDB implementation
//! - [`executor`]: Query execution and the line-per-record output loop
//! - [`metrics`]: Document-to-metric conversion

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod executor;
#[cfg(not(any(debug_assertions, test)))]
mod executor;

#[cfg(any(debug_assertions, test))]
pub mod metrics;
#[cfg(not(any(debug_assertions, test)))]
mod metrics;

#[cfg(any(debug_assertions, test))]
pub mod source;
#[cfg(not(any(debug_assertions, test)))]
mod source;

pub use crate::commands::{Host, run};
