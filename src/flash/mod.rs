//! High-level DataFlash operations
//!
//! This module provides the [`Dataflash`] driver value and every
//! read/write/erase operation it supports.

mod device;
mod operations;

pub use device::{identify, Dataflash, GeometrySource, PollConfig, Status};
pub use operations::Buffer;
