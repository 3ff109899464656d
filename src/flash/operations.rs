//! DataFlash read, write, erase and compare operations
//!
//! Every operation here is the same transaction pattern specialized
//! with one opcode and one framing: reads clock data out in the same
//! transaction, while program and erase commands close the transaction
//! and then busy-wait for the chip's internal cycle.

use crate::bus::SpiBus;
use crate::error::Result;
use crate::flash::device::{Dataflash, GeometrySource};
use crate::spi::{address, opcodes, SpiCommand};

/// Number of don't-care bytes after the address of a buffer read
const BUFFER_READ_DUMMY: u8 = 1;
/// Number of don't-care bytes after the address of a main memory page read
const PAGE_READ_DUMMY: u8 = 4;
/// Number of don't-care bytes after the security register read opcode
const SECURITY_READ_DUMMY: u8 = 3;

/// Selector for the chip's two SRAM staging buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    /// SRAM buffer 1
    One,
    /// SRAM buffer 2
    Two,
}

impl Buffer {
    const fn read_opcode(self) -> u8 {
        match self {
            Buffer::One => opcodes::BUF1_READ,
            Buffer::Two => opcodes::BUF2_READ,
        }
    }

    const fn write_opcode(self) -> u8 {
        match self {
            Buffer::One => opcodes::BUF1_WRITE,
            Buffer::Two => opcodes::BUF2_WRITE,
        }
    }

    const fn to_page_erase_opcode(self) -> u8 {
        match self {
            Buffer::One => opcodes::BUF1_TO_PAGE_ERASE,
            Buffer::Two => opcodes::BUF2_TO_PAGE_ERASE,
        }
    }

    const fn to_page_no_erase_opcode(self) -> u8 {
        match self {
            Buffer::One => opcodes::BUF1_TO_PAGE_NO_ERASE,
            Buffer::Two => opcodes::BUF2_TO_PAGE_NO_ERASE,
        }
    }

    const fn from_page_opcode(self) -> u8 {
        match self {
            Buffer::One => opcodes::PAGE_TO_BUF1,
            Buffer::Two => opcodes::PAGE_TO_BUF2,
        }
    }

    const fn program_opcode(self) -> u8 {
        match self {
            Buffer::One => opcodes::PAGE_PROGRAM_BUF1,
            Buffer::Two => opcodes::PAGE_PROGRAM_BUF2,
        }
    }

    const fn compare_opcode(self) -> u8 {
        match self {
            Buffer::One => opcodes::PAGE_COMPARE_BUF1,
            Buffer::Two => opcodes::PAGE_COMPARE_BUF2,
        }
    }

    const fn rewrite_opcode(self) -> u8 {
        match self {
            Buffer::One => opcodes::PAGE_REWRITE_BUF1,
            Buffer::Two => opcodes::PAGE_REWRITE_BUF2,
        }
    }
}

impl<B: SpiBus + ?Sized> Dataflash<'_, B> {
    // =========================================================================
    // SRAM buffer access (no busy-wait: the buffers are plain SRAM)
    // =========================================================================

    /// Read bytes from an SRAM buffer
    pub fn buffer_read(&mut self, buffer: Buffer, offset: u16, buf: &mut [u8]) -> Result<()> {
        let addr = address::buffer_address(offset, self.geometry.byte_offset_bits);
        SpiCommand::read(buffer.read_opcode(), addr, BUFFER_READ_DUMMY, buf).run(self.bus)
    }

    /// Read one byte from an SRAM buffer
    pub fn buffer_read_byte(&mut self, buffer: Buffer, offset: u16) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.buffer_read(buffer, offset, &mut buf)?;
        Ok(buf[0])
    }

    /// Write bytes into an SRAM buffer
    pub fn buffer_write(&mut self, buffer: Buffer, offset: u16, data: &[u8]) -> Result<()> {
        let addr = address::buffer_address(offset, self.geometry.byte_offset_bits);
        SpiCommand::write(buffer.write_opcode(), addr, data).run(self.bus)
    }

    /// Write one byte into an SRAM buffer
    pub fn buffer_write_byte(&mut self, buffer: Buffer, offset: u16, data: u8) -> Result<()> {
        self.buffer_write(buffer, offset, &[data])
    }

    // =========================================================================
    // Buffer <-> main memory transfers
    // =========================================================================

    /// Program a page from an SRAM buffer, erasing the page first
    pub fn buffer_to_page(&mut self, buffer: Buffer, page: u16) -> Result<()> {
        self.page_command(buffer.to_page_erase_opcode(), page)?;
        self.wait_ready(self.poll.program_timeout_us)
    }

    /// Program a previously erased page from an SRAM buffer
    ///
    /// The target page must already be erased; programming can only
    /// clear bits.
    pub fn buffer_to_page_no_erase(&mut self, buffer: Buffer, page: u16) -> Result<()> {
        self.page_command(buffer.to_page_no_erase_opcode(), page)?;
        self.wait_ready(self.poll.program_timeout_us)
    }

    /// Copy a main memory page into an SRAM buffer
    pub fn page_to_buffer(&mut self, page: u16, buffer: Buffer) -> Result<()> {
        self.page_command(buffer.from_page_opcode(), page)?;
        self.wait_ready(self.poll.program_timeout_us)
    }

    /// Write data through an SRAM buffer and program it into a page
    ///
    /// Single-command combination of a buffer write starting at
    /// `offset` and a buffer-to-page program with built-in erase. Bytes
    /// of the buffer that the data does not cover are programmed with
    /// whatever the buffer held before the command.
    pub fn program_page(
        &mut self,
        buffer: Buffer,
        page: u16,
        offset: u16,
        data: &[u8],
    ) -> Result<()> {
        let addr = address::full_address(page, offset, self.geometry.byte_offset_bits);
        SpiCommand::write(buffer.program_opcode(), addr, data).run(self.bus)?;
        self.wait_ready(self.poll.program_timeout_us)
    }

    /// Refresh a page in place through an SRAM buffer
    ///
    /// The chip reads the page into the buffer and programs it back,
    /// restoring margin on pages in a block that is rewritten
    /// repeatedly.
    pub fn rewrite_page(&mut self, buffer: Buffer, page: u16) -> Result<()> {
        self.page_command(buffer.rewrite_opcode(), page)?;
        self.wait_ready(self.poll.program_timeout_us)
    }

    /// Compare a main memory page against an SRAM buffer
    ///
    /// Returns `true` when the page and the buffer hold identical data.
    pub fn compare_page(&mut self, buffer: Buffer, page: u16) -> Result<bool> {
        self.page_command(buffer.compare_opcode(), page)?;
        self.wait_ready(self.poll.program_timeout_us)?;
        Ok(!self.status()?.compare_mismatch())
    }

    // =========================================================================
    // Main memory reads (no busy-wait: pure reads do not block)
    // =========================================================================

    /// Read bytes from one main memory page, bypassing the buffers
    ///
    /// The read wraps within the addressed page; use
    /// [`Dataflash::read_array`] to cross page boundaries.
    pub fn read_page(&mut self, page: u16, offset: u16, buf: &mut [u8]) -> Result<()> {
        let addr = address::full_address(page, offset, self.geometry.byte_offset_bits);
        SpiCommand::read(opcodes::PAGE_READ, addr, PAGE_READ_DUMMY, buf).run(self.bus)
    }

    /// Read bytes from main memory, crossing page boundaries
    pub fn read_array(&mut self, page: u16, offset: u16, buf: &mut [u8]) -> Result<()> {
        let addr = address::full_address(page, offset, self.geometry.byte_offset_bits);
        SpiCommand::read(opcodes::CONTINUOUS_READ_LF, addr, 0, buf).run(self.bus)
    }

    /// Read bytes from the security register
    pub fn read_security_register(&mut self, buf: &mut [u8]) -> Result<()> {
        SpiCommand::read_reg(opcodes::SECURITY_READ, buf)
            .with_dummy_bytes(SECURITY_READ_DUMMY)
            .run(self.bus)
    }

    // =========================================================================
    // Erase
    // =========================================================================

    /// Erase one page
    pub fn erase_page(&mut self, page: u16) -> Result<()> {
        self.page_command(opcodes::PAGE_ERASE, page)?;
        self.wait_ready(self.poll.erase_timeout_us)
    }

    /// Erase one 8-page block
    pub fn erase_block(&mut self, block: u16) -> Result<()> {
        let page = self.geometry.block_first_page(block);
        self.page_command(opcodes::BLOCK_ERASE, page)?;
        self.wait_ready(self.poll.erase_timeout_us)
    }

    /// Erase one sector
    ///
    /// The sector is addressed by its first page. Note that the chips
    /// split sector 0 into two sub-sectors (0a: the first block, 0b:
    /// the remainder); erasing sector 0 by number covers sub-sector 0a
    /// only on real hardware, per the datasheet addressing.
    pub fn erase_sector(&mut self, sector: u16) -> Result<()> {
        let page = self.geometry.sector_first_page(sector);
        self.page_command(opcodes::SECTOR_ERASE, page)?;
        self.wait_ready(self.poll.erase_timeout_us)
    }

    /// Erase the whole chip
    ///
    /// Emits the 4-byte chip-erase opcode sequence, except on detected
    /// chips whose density carries the chip-erase erratum: those are
    /// erased block by block instead. With a fixed variant the sequence
    /// is always emitted and avoiding the erratum is the caller's
    /// responsibility.
    pub fn erase_chip(&mut self) -> Result<()> {
        if self.source == GeometrySource::Detected && self.geometry.density.chip_erase_erratum() {
            let blocks = self.geometry.blocks() as u16;
            log::warn!(
                "chip erase is unreliable on {:?}, erasing {} blocks instead",
                self.geometry.density,
                blocks
            );
            for block in 0..blocks {
                self.erase_block(block)?;
            }
            return Ok(());
        }

        SpiCommand::sequence(opcodes::CHIP_ERASE[0], &opcodes::CHIP_ERASE[1..]).run(self.bus)?;
        self.wait_ready(self.poll.chip_erase_timeout_us)
    }

    /// Issue a page-addressed command (erase, transfer, compare, rewrite)
    fn page_command(&mut self, opcode: u8, page: u16) -> Result<()> {
        let addr = address::page_address(page, self.geometry.byte_offset_bits);
        SpiCommand::addressed(opcode, addr).run(self.bus)
    }
}
