//! dataflash - Driver library for AT45DB-series SPI DataFlash chips
//!
//! This crate translates high-level DataFlash operations (read a page,
//! stage data in an SRAM buffer, erase a sector, detect the chip) into
//! the exact command byte sequences of the AT45DB protocol. It is
//! designed to be `no_std` compatible for use in embedded environments.
//!
//! The physical SPI transport is supplied by the caller as a [`SpiBus`]
//! implementation; the driver only decides *which* bytes cross the bus
//! and in what framing.
//!
//! # Features
//!
//! - `std` - Enable standard library support (serde derives on chip
//!   types, `std::error::Error` on the error type)
//!
//! # Example
//!
//! ```ignore
//! use dataflash::{flash::Dataflash, bus::SpiBus};
//!
//! fn dump_first_page<B: SpiBus>(bus: &mut B) {
//!     let mut flash = Dataflash::open(bus).unwrap();
//!     let mut page = [0u8; 528];
//!     let len = flash.geometry().page_size as usize;
//!     flash.read_page(0, 0, &mut page[..len]).unwrap();
//! }
//! ```
//!
//! [`SpiBus`]: bus::SpiBus

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod bus;
pub mod chip;
pub mod error;
pub mod flash;
pub mod spi;

pub use error::{Error, Result};
