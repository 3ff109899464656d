//! SPI command structure and transaction executor

use crate::bus::SpiBus;
use crate::error::Result;
use crate::spi::address;

/// A single DataFlash command transaction
///
/// Designed to avoid allocation - uses slices for data. The lifetime
/// parameter `'a` ties the command to the buffers it references.
///
/// On the wire a command is always: opcode, then the 3-byte address
/// field (if the command has one), then any don't-care bytes the
/// command framing requires, then the data phase (payload bytes out,
/// or one exchanged byte per byte to be read).
pub struct SpiCommand<'a> {
    /// The opcode byte
    pub opcode: u8,

    /// 24-bit on-wire address (if any), sent MSB first
    pub address: Option<u32>,

    /// Number of don't-care bytes clocked between address and data
    pub dummy_bytes: u8,

    /// Data to write after opcode/address/dummy
    pub write_data: &'a [u8],

    /// Buffer to read into (mutable)
    pub read_buf: &'a mut [u8],
}

impl<'a> SpiCommand<'a> {
    /// Create a command that is an opcode and nothing else (e.g. deep power-down)
    pub fn simple(opcode: u8) -> Self {
        Self {
            opcode,
            address: None,
            dummy_bytes: 0,
            write_data: &[],
            read_buf: &mut [],
        }
    }

    /// Create a multi-byte opcode sequence command (e.g. chip erase)
    pub fn sequence(opcode: u8, tail: &'a [u8]) -> Self {
        Self {
            opcode,
            address: None,
            dummy_bytes: 0,
            write_data: tail,
            read_buf: &mut [],
        }
    }

    /// Create a register read with no address (e.g. status, read-ID)
    pub fn read_reg(opcode: u8, buf: &'a mut [u8]) -> Self {
        Self {
            opcode,
            address: None,
            dummy_bytes: 0,
            write_data: &[],
            read_buf: buf,
        }
    }

    /// Create a command that carries only an address (erase, buffer transfer)
    pub fn addressed(opcode: u8, addr: u32) -> Self {
        Self {
            opcode,
            address: Some(addr),
            dummy_bytes: 0,
            write_data: &[],
            read_buf: &mut [],
        }
    }

    /// Create an addressed read with the given number of don't-care bytes
    pub fn read(opcode: u8, addr: u32, dummy_bytes: u8, buf: &'a mut [u8]) -> Self {
        Self {
            opcode,
            address: Some(addr),
            dummy_bytes,
            write_data: &[],
            read_buf: buf,
        }
    }

    /// Create an addressed write
    pub fn write(opcode: u8, addr: u32, data: &'a [u8]) -> Self {
        Self {
            opcode,
            address: Some(addr),
            dummy_bytes: 0,
            write_data: data,
            read_buf: &mut [],
        }
    }

    /// Set the number of don't-care bytes for this command
    pub fn with_dummy_bytes(mut self, bytes: u8) -> Self {
        self.dummy_bytes = bytes;
        self
    }

    /// Run this command as one bus transaction
    ///
    /// Select and the transaction are released in reverse order even
    /// when an exchange fails mid-transfer, so a failed command never
    /// leaves the chip selected.
    pub fn run<B: SpiBus + ?Sized>(&mut self, bus: &mut B) -> Result<()> {
        bus.begin_transaction()?;
        bus.select_assert()?;

        let transferred = self.transfer(bus);

        let deselected = bus.select_deassert();
        let ended = bus.end_transaction();

        transferred.and(deselected).and(ended)
    }

    fn transfer<B: SpiBus + ?Sized>(&mut self, bus: &mut B) -> Result<()> {
        bus.exchange(self.opcode)?;

        if let Some(addr) = self.address {
            for byte in address::encode(addr) {
                bus.exchange(byte)?;
            }
        }

        for _ in 0..self.dummy_bytes {
            bus.exchange(0x00)?;
        }

        for &byte in self.write_data {
            bus.exchange(byte)?;
        }

        for byte in self.read_buf.iter_mut() {
            *byte = bus.exchange(0x00)?;
        }

        Ok(())
    }
}
