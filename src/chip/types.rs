//! Chip density, variant and geometry definitions

/// Pages per erase block, fixed across the whole AT45DB family
pub const PAGES_PER_BLOCK: u32 = 8;

/// Chip density code as reported in the identification read
///
/// The values are the raw 4-bit density field of the device ID byte;
/// the family starts at 0x02. Every other field value is a detection
/// failure, not a density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Density {
    /// 1 Mbit (AT45DB011D)
    Mbit1 = 0x02,
    /// 2 Mbit (AT45DB021D)
    Mbit2 = 0x03,
    /// 4 Mbit (AT45DB041D)
    Mbit4 = 0x04,
    /// 8 Mbit (AT45DB081D)
    Mbit8 = 0x05,
    /// 16 Mbit (AT45DB161D)
    Mbit16 = 0x06,
    /// 32 Mbit (AT45DB321D)
    Mbit32 = 0x07,
    /// 64 Mbit (AT45DB642D)
    Mbit64 = 0x08,
}

impl Density {
    /// All known density codes, in ascending order
    pub const ALL: [Density; 7] = [
        Density::Mbit1,
        Density::Mbit2,
        Density::Mbit4,
        Density::Mbit8,
        Density::Mbit16,
        Density::Mbit32,
        Density::Mbit64,
    ];

    /// Map a raw density field value to a known code
    pub const fn from_code(code: u8) -> Option<Density> {
        match code {
            0x02 => Some(Density::Mbit1),
            0x03 => Some(Density::Mbit2),
            0x04 => Some(Density::Mbit4),
            0x05 => Some(Density::Mbit8),
            0x06 => Some(Density::Mbit16),
            0x07 => Some(Density::Mbit32),
            0x08 => Some(Density::Mbit64),
            _ => None,
        }
    }

    /// Raw density field value of this code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether chip erase is unreliable on this density
    ///
    /// The two largest densities carry a silicon erratum that makes the
    /// chip-erase opcode sequence unreliable; erasing block by block is
    /// the documented substitute.
    pub const fn chip_erase_erratum(self) -> bool {
        matches!(self, Density::Mbit32 | Density::Mbit64)
    }
}

/// Chip variant (part number), for fixed geometry selection
///
/// Selecting a variant bypasses detection entirely; the geometry is
/// taken from the variant's known density instead of the chip's
/// identification read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// AT45DB011D, 1 Mbit
    At45db011d,
    /// AT45DB021D, 2 Mbit
    At45db021d,
    /// AT45DB041D, 4 Mbit
    At45db041d,
    /// AT45DB081D, 8 Mbit
    At45db081d,
    /// AT45DB161D, 16 Mbit
    At45db161d,
    /// AT45DB321D, 32 Mbit
    At45db321d,
    /// AT45DB642D, 64 Mbit
    At45db642d,
}

impl Variant {
    /// Density code of this part number
    pub const fn density(self) -> Density {
        match self {
            Variant::At45db011d => Density::Mbit1,
            Variant::At45db021d => Density::Mbit2,
            Variant::At45db041d => Density::Mbit4,
            Variant::At45db081d => Density::Mbit8,
            Variant::At45db161d => Density::Mbit16,
            Variant::At45db321d => Density::Mbit32,
            Variant::At45db642d => Density::Mbit64,
        }
    }

    /// Resolved geometry of this part number
    pub const fn geometry(self) -> ChipGeometry {
        ChipGeometry::for_density(self.density())
    }
}

/// Storage geometry of one chip density
///
/// Resolved once (by detection or by explicit variant selection) and
/// read-only afterwards. All address arithmetic the driver performs is
/// derived from this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ChipGeometry {
    /// Density this geometry was resolved for
    pub density: Density,
    /// Number of bits in a page index
    pub page_addr_bits: u8,
    /// Number of bits that address a byte within a page
    pub byte_offset_bits: u8,
    /// Page size in bytes (standard DataFlash page, not binary)
    pub page_size: u16,
    /// Number of 8-page blocks per sector
    pub blocks_per_sector: u16,
    /// Number of sectors on the chip
    pub sectors: u16,
}

impl ChipGeometry {
    /// Resolve the geometry for a density code
    pub const fn for_density(density: Density) -> ChipGeometry {
        let (page_addr_bits, byte_offset_bits, page_size, blocks_per_sector, sectors) =
            match density {
                Density::Mbit1 => (9, 9, 264, 16, 4),
                Density::Mbit2 => (10, 9, 264, 16, 8),
                Density::Mbit4 => (11, 9, 264, 32, 8),
                Density::Mbit8 => (12, 9, 264, 32, 16),
                Density::Mbit16 => (12, 10, 528, 32, 16),
                Density::Mbit32 => (13, 10, 528, 16, 64),
                Density::Mbit64 => (13, 11, 1056, 32, 32),
            };
        ChipGeometry {
            density,
            page_addr_bits,
            byte_offset_bits,
            page_size,
            blocks_per_sector,
            sectors,
        }
    }

    /// Pages per erase block (8 on every variant)
    pub const fn pages_per_block(&self) -> u32 {
        PAGES_PER_BLOCK
    }

    /// Total number of pages
    pub const fn pages(&self) -> u32 {
        1 << self.page_addr_bits
    }

    /// Total number of erase blocks
    pub const fn blocks(&self) -> u32 {
        self.blocks_per_sector as u32 * self.sectors as u32
    }

    /// Total capacity in bytes
    pub const fn bytes(&self) -> u32 {
        self.page_size as u32 * self.pages()
    }

    /// Erase block containing a page
    pub const fn page_to_block(&self, page: u16) -> u16 {
        page / PAGES_PER_BLOCK as u16
    }

    /// Sector containing a page
    pub const fn page_to_sector(&self, page: u16) -> u16 {
        page / (self.blocks_per_sector * PAGES_PER_BLOCK as u16)
    }

    /// Sector containing an erase block
    pub const fn block_to_sector(&self, block: u16) -> u16 {
        block / self.blocks_per_sector
    }

    /// First page of an erase block
    pub const fn block_first_page(&self, block: u16) -> u16 {
        block * PAGES_PER_BLOCK as u16
    }

    /// First page of a sector
    pub const fn sector_first_page(&self, sector: u16) -> u16 {
        sector * self.blocks_per_sector * PAGES_PER_BLOCK as u16
    }
}
