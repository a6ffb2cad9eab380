//! TC Gas Station - buy TC gas packages and track purchases.
//!
//! This library provides:
//! - The package catalog and pay types served by the gas station
//! - Validation and visible-field rules of the purchase form
//! - The purchase and status-check form sessions
//! - An HTTP client for the gas-station API

pub mod config;
pub mod domain;
pub mod infra;
