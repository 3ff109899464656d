//! Chip identification and geometry
//!
//! This module provides the density codes, chip variants and resolved
//! geometry for the AT45DB D-series family, plus the parser for the
//! 4-byte identification read.

mod id;
mod types;

pub use id::DataflashId;
pub use types::*;
