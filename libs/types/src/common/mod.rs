//! Common building blocks shared by every portfolio crate

pub mod errors;
pub mod fixed_point;
pub mod identifiers;
pub mod wide;
