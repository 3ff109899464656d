//! AT45DB DataFlash command opcodes
//!
//! This module defines the command opcodes shared by the AT45DB
//! D-series DataFlash chips, checked for compatibility across the whole
//! family (AT45DB011D through AT45DB642D).

// ============================================================================
// Identification and status
// ============================================================================

/// Read Manufacturer and Device ID (JEDEC read-ID methodology)
pub const READ_ID: u8 = 0x9F;
/// Status Register Read
pub const STATUS_READ: u8 = 0xD7;
/// Security Register Read
pub const SECURITY_READ: u8 = 0x77;

// ============================================================================
// Main memory read
// ============================================================================

/// Main Memory Page Read (stays within one page)
pub const PAGE_READ: u8 = 0xD2;
/// Continuous Array Read, low frequency (crosses page boundaries)
pub const CONTINUOUS_READ_LF: u8 = 0x03;

// ============================================================================
// SRAM buffer read/write
// ============================================================================

/// Buffer 1 Read
pub const BUF1_READ: u8 = 0xD4;
/// Buffer 2 Read
pub const BUF2_READ: u8 = 0xD6;
/// Buffer 1 Write
pub const BUF1_WRITE: u8 = 0x84;
/// Buffer 2 Write
pub const BUF2_WRITE: u8 = 0x87;

// ============================================================================
// Buffer <-> main memory transfers
// ============================================================================

/// Buffer 1 to Main Memory Page Program with Built-in Erase
pub const BUF1_TO_PAGE_ERASE: u8 = 0x83;
/// Buffer 2 to Main Memory Page Program with Built-in Erase
pub const BUF2_TO_PAGE_ERASE: u8 = 0x86;
/// Buffer 1 to Main Memory Page Program without Built-in Erase
pub const BUF1_TO_PAGE_NO_ERASE: u8 = 0x88;
/// Buffer 2 to Main Memory Page Program without Built-in Erase
pub const BUF2_TO_PAGE_NO_ERASE: u8 = 0x89;
/// Main Memory Page to Buffer 1 Transfer
pub const PAGE_TO_BUF1: u8 = 0x53;
/// Main Memory Page to Buffer 2 Transfer
pub const PAGE_TO_BUF2: u8 = 0x55;
/// Main Memory Page Program through Buffer 1 (write then program)
pub const PAGE_PROGRAM_BUF1: u8 = 0x82;
/// Main Memory Page Program through Buffer 2 (write then program)
pub const PAGE_PROGRAM_BUF2: u8 = 0x85;
/// Main Memory Page to Buffer 1 Compare
pub const PAGE_COMPARE_BUF1: u8 = 0x60;
/// Main Memory Page to Buffer 2 Compare
pub const PAGE_COMPARE_BUF2: u8 = 0x61;
/// Auto Page Rewrite through Buffer 1
pub const PAGE_REWRITE_BUF1: u8 = 0x58;
/// Auto Page Rewrite through Buffer 2
pub const PAGE_REWRITE_BUF2: u8 = 0x59;

// ============================================================================
// Erase
// ============================================================================

/// Page Erase
pub const PAGE_ERASE: u8 = 0x81;
/// Block Erase (8 pages)
pub const BLOCK_ERASE: u8 = 0x50;
/// Sector Erase
pub const SECTOR_ERASE: u8 = 0x7C;
/// Chip Erase opcode sequence (all four bytes are required)
pub const CHIP_ERASE: [u8; 4] = [0xC7, 0x94, 0x80, 0x9A];

// ============================================================================
// Power management
// ============================================================================

/// Deep Power-down
pub const DEEP_POWER_DOWN: u8 = 0xB9;
/// Resume from Deep Power-down
pub const RESUME_POWER_DOWN: u8 = 0xAB;

// ============================================================================
// Status register bit definitions
// ============================================================================

/// Status: Ready (1) / Busy (0)
pub const STATUS_READY: u8 = 0x80;
/// Status: last compare found a mismatch
pub const STATUS_COMP: u8 = 0x40;
/// Status: density field mask (bits 5..=2)
pub const STATUS_DENSITY_MASK: u8 = 0x3C;
/// Status: sector protection enabled
pub const STATUS_PROTECT: u8 = 0x02;
/// Status: chip configured for binary (power-of-two) page size
pub const STATUS_BINARY_PAGE: u8 = 0x01;

// ============================================================================
// Identification byte fields
// ============================================================================

/// JEDEC manufacturer code for Atmel/Adesto
pub const MANUFACTURER_ATMEL: u8 = 0x1F;
/// Family code for DataFlash (top 3 bits of the device ID byte)
pub const FAMILY_DATAFLASH: u8 = 0x01;
/// Shift that isolates the family field of the device ID byte
pub const FAMILY_SHIFT: u8 = 5;
/// Mask that isolates the density field of the device ID byte
pub const DENSITY_MASK: u8 = 0x0F;
