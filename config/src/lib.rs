//! # Config Crate
//!
//! Centralized configuration constants for the building reconstruction
//! pipeline. All magic numbers and tunable parameters are defined here to
//! ensure consistency across crates and easy configuration management.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON, SLOPE_VERTICAL_SNAP_DEG};
//!
//! // Use EPSILON for floating-point comparisons
//! let value: f64 = 1e-11;
//! assert!(value.abs() < EPSILON);
//!
//! // Snap near-vertical authored slopes to exactly vertical
//! let slope = 89.5_f64;
//! let snapped = if slope > SLOPE_VERTICAL_SNAP_DEG { 90.0 } else { slope };
//! assert_eq!(snapped, 90.0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **No Platform Dependencies**: Plain numeric values only
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
