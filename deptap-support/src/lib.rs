//! # Deptap Support
//!
//! Shared helpers for the deptap crates.
//!
//! This crate provides:
//! - Text rendering for resolution chains and diagnostics
//! - "Did you mean?" suggestions for unknown registry keys

pub mod rendering;
