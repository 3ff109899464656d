//! Identification read parsing
//!
//! All AT45DB chips answer the JEDEC read-ID opcode with the same
//! 4-byte layout: manufacturer code, device ID byte (family field in
//! the top 3 bits, density field in the low 4), a second device ID
//! byte, and the extended-device-information length.

use crate::chip::Density;
use crate::error::{Error, Result};
use crate::spi::opcodes;

/// Parsed 4-byte identification read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataflashId {
    /// JEDEC manufacturer code (0x1F for Atmel/Adesto)
    pub manufacturer: u8,
    /// Family field of the device ID byte (0b001 for DataFlash)
    pub family: u8,
    /// Density field of the device ID byte
    pub density_code: u8,
    /// Extended device information string length
    pub extended_info_len: u8,
}

impl DataflashId {
    /// Split the raw identification bytes into their fields
    ///
    /// No validation happens here; use [`DataflashId::density`] to
    /// check the fields against the expected values.
    pub const fn parse(raw: [u8; 4]) -> DataflashId {
        DataflashId {
            manufacturer: raw[0],
            family: raw[1] >> opcodes::FAMILY_SHIFT,
            density_code: raw[1] & opcodes::DENSITY_MASK,
            extended_info_len: raw[3],
        }
    }

    /// Validate the identification and resolve the density
    ///
    /// Checks manufacturer first, then the family field, then the
    /// density field; the error names the first field that failed and
    /// carries the value that was read.
    pub fn density(&self) -> Result<Density> {
        if self.manufacturer != opcodes::MANUFACTURER_ATMEL {
            return Err(Error::ManufacturerMismatch {
                found: self.manufacturer,
            });
        }
        if self.family != opcodes::FAMILY_DATAFLASH {
            return Err(Error::FamilyMismatch { found: self.family });
        }
        Density::from_code(self.density_code).ok_or(Error::UnknownDensity {
            found: self.density_code,
        })
    }
}
