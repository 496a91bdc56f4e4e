//! PIAWE Payment Engine
//!
//! This crate computes weekly Pre-Injury Average Weekly Earnings (PIAWE)
//! payments for injured workers from a roster of people and a table of
//! time-banded payment rules.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod validation;
