//! Snapshot-level validation that runs alongside analysis.

pub mod structural;

pub use structural::validate_structural;
