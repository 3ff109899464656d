//! Error types for the dataflash driver
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Detection errors
    /// Byte 0 of the identification read is not the Atmel manufacturer code
    ManufacturerMismatch {
        /// The manufacturer byte that was read
        found: u8,
    },
    /// The family field of the identification read is not the DataFlash family
    FamilyMismatch {
        /// The family field that was read (already shifted down)
        found: u8,
    },
    /// The density field of the identification read is not a known density code
    UnknownDensity {
        /// The density field that was read (already masked)
        found: u8,
    },

    // Operation errors
    /// The chip did not report ready within the configured poll window
    Timeout,

    // Bus errors
    /// SPI transfer failed
    Transfer,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManufacturerMismatch { found } => {
                write!(f, "manufacturer not detected: read 0x{:02X}", found)
            }
            Self::FamilyMismatch { found } => {
                write!(f, "DataFlash family not detected: read 0x{:02X}", found)
            }
            Self::UnknownDensity { found } => {
                write!(f, "unknown density code 0x{:02X}", found)
            }
            Self::Timeout => write!(f, "chip did not become ready in time"),
            Self::Transfer => write!(f, "SPI transfer failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the crate Error type
pub type Result<T> = core::result::Result<T, Error>;
