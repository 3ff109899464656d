//! SPI bus trait definition
//!
//! The driver consumes the bus through this trait; it never owns the
//! SPI peripheral or the chip-select pin directly. Clock mode, bit
//! order and clock speed are configuration of the implementation and
//! are opaque to the driver (DataFlash chips accept SPI modes 0 and 3,
//! MSB first).

use crate::error::Result;

/// Byte-level SPI transport used by the driver
///
/// A command is always framed as: `begin_transaction` →
/// `select_assert` → a sequence of `exchange` calls → `select_deassert`
/// → `end_transaction`. The chip-select line must be driven low by
/// `select_assert` and high by `select_deassert`; implementations that
/// bundle select handling into transaction bracketing can make the
/// select methods no-ops.
///
/// The driver issues exactly one transaction at a time and never nests
/// them.
///
/// # Example
///
/// ```ignore
/// impl SpiBus for MySpi {
///     fn begin_transaction(&mut self) -> Result<()> {
///         self.configure(MODE_0, MSB_FIRST, self.clock_hz);
///         Ok(())
///     }
///
///     fn exchange(&mut self, byte: u8) -> Result<u8> {
///         self.transfer(byte).map_err(|_| Error::Transfer)
///     }
///     // ...
/// }
/// ```
pub trait SpiBus {
    /// Acquire and configure the bus for one command transaction
    fn begin_transaction(&mut self) -> Result<()>;

    /// Release the bus after a command transaction
    fn end_transaction(&mut self) -> Result<()>;

    /// Drive the chip-select line low
    fn select_assert(&mut self) -> Result<()>;

    /// Drive the chip-select line high
    fn select_deassert(&mut self) -> Result<()>;

    /// Full-duplex single-byte exchange
    ///
    /// Shifts `byte` out and returns the byte shifted in during the
    /// same clock cycles.
    fn exchange(&mut self, byte: u8) -> Result<u8>;

    /// Delay for the specified number of microseconds
    ///
    /// Used to pace status polling and to satisfy the chip's wake-up
    /// timing, which is not observable through the status register.
    fn delay_us(&mut self, us: u32);
}
