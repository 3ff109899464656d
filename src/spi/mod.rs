//! SPI command structures and address encoding
//!
//! This module provides the types that describe a single DataFlash
//! command transaction, the AT45DB opcode set, and the per-density
//! on-wire address encoding.

pub mod address;
mod command;
pub mod opcodes;

pub use command::SpiCommand;
