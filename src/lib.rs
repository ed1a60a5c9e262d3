//! Topsheet - Terminal-based production budget top sheet calculator
//!
//! This library provides the core functionality for the topsheet
//! application. It models the top sheet of a production budget: groups of
//! categories, sheet-level fees, and a contingency line, with a
//! recalculation engine that keeps the whole tree reconciled against a
//! target total as individual lines are edited.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, percentages, categories, groups, fees, sheets)
//! - `services`: The recalculation engine, sheet construction, and CSV import
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `display`: Terminal output formatting
//! - `export`: CSV/JSON/YAML export
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use topsheet::config::{paths::TopsheetPaths, settings::Settings};
//!
//! let paths = TopsheetPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{TopsheetError, TopsheetResult};
