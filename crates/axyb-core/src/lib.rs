//! Core math and parameter-layout primitives for `axyb-rs`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Mat3`, ...),
//! - homogeneous-transform assembly helpers,
//! - the [`ParamLayout`] offset table that fixes the ordering of the
//!   calibration unknowns inside the flat optimization vector.
//!
//! The layout is the single source of truth for that ordering: both the LMI
//! construction and the solution unpacking go through it, so the two sides
//! cannot silently disagree about which slice holds which block.

/// Linear algebra type aliases and helpers.
pub mod math;

/// Named-field layout of the flat parameter vector.
pub mod layout;

pub use layout::*;
pub use math::*;
