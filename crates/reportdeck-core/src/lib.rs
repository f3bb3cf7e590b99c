//! Reportdeck Core Library
//!
//! Scanning, indexing and rendering of agent evaluation reports, plus the
//! client for the external run-control service.

pub mod bundle;
pub mod config;
pub mod detail;
pub mod error;
pub mod html;
pub mod index;
pub mod logging;
pub mod paths;
pub mod poll;
pub mod report;
pub mod run_control;
pub mod scan;
pub mod service;
pub mod summary;
pub mod view;
