//! DataFlash driver value: construction, status and power control

use bitflags::bitflags;

use crate::bus::SpiBus;
use crate::chip::{ChipGeometry, DataflashId, Density, Variant};
use crate::error::{Error, Result};
use crate::spi::{opcodes, SpiCommand};

/// Delay the chip needs after resume from deep power-down, in
/// microseconds. The wake transition is not observable through the
/// status register.
const RESUME_DELAY_US: u32 = 35;

bitflags! {
    /// Decoded status register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Ready (1) / busy (0)
        const READY = opcodes::STATUS_READY;
        /// The last compare operation found a mismatch
        const COMP = opcodes::STATUS_COMP;
        /// Density field (bits 5..=2)
        const DENSITY = opcodes::STATUS_DENSITY_MASK;
        /// Sector protection is enabled
        const PROTECT = opcodes::STATUS_PROTECT;
        /// Chip is configured for binary (power-of-two) page size
        const BINARY_PAGE = opcodes::STATUS_BINARY_PAGE;
    }
}

impl Status {
    /// Whether the chip is ready for the next program/erase command
    pub fn is_ready(&self) -> bool {
        self.contains(Status::READY)
    }

    /// Whether the last compare operation found a mismatch
    pub fn compare_mismatch(&self) -> bool {
        self.contains(Status::COMP)
    }

    /// Raw density field of the status register
    pub fn density_field(&self) -> u8 {
        (self.bits() & opcodes::STATUS_DENSITY_MASK) >> 2
    }
}

/// Busy-wait policy
///
/// Program and erase commands run inside the chip after the bus
/// transaction closes; the driver polls the status register until the
/// ready bit is set. The iteration bound is `timeout / poll_delay` for
/// the timeout class of the command.
///
/// Defaults are derived from the slowest datasheet figures across the
/// family: buffer-to-page programming completes within 40 ms, page and
/// block erases within 100 ms, sector erases within 6.5 s, and a full
/// chip erase within 208 s on the largest part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PollConfig {
    /// Delay between status polls, in microseconds (0 polls back-to-back)
    pub poll_delay_us: u32,
    /// Timeout for buffer-to-page transfers and page programs
    pub program_timeout_us: u32,
    /// Timeout for page, block and sector erases
    pub erase_timeout_us: u32,
    /// Timeout for a whole-chip erase
    pub chip_erase_timeout_us: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_delay_us: 100,
            program_timeout_us: 100_000,
            erase_timeout_us: 10_000_000,
            chip_erase_timeout_us: 240_000_000,
        }
    }
}

/// How the driver's geometry was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometrySource {
    /// Resolved from the chip's identification read
    Detected,
    /// Taken from an explicitly selected [`Variant`]
    Fixed,
}

/// Identify the chip on the bus
///
/// Issues the identification read and validates manufacturer, family
/// and density. Idempotent and side-effect free; safe to call
/// repeatedly.
pub fn identify<B: SpiBus + ?Sized>(bus: &mut B) -> Result<Density> {
    let mut raw = [0u8; 4];
    SpiCommand::read_reg(opcodes::READ_ID, &mut raw).run(bus)?;
    let id = DataflashId::parse(raw);
    log::debug!("identification read {:02X?} -> {:?}", raw, id);
    id.density()
}

/// Driver for one DataFlash chip
///
/// Owns the resolved geometry and polling policy, and borrows the bus
/// for its lifetime. Geometry is resolved exactly once, at
/// construction, and is read-only afterwards.
pub struct Dataflash<'a, B: SpiBus + ?Sized> {
    pub(crate) bus: &'a mut B,
    pub(crate) geometry: ChipGeometry,
    pub(crate) source: GeometrySource,
    pub(crate) poll: PollConfig,
}

impl<'a, B: SpiBus + ?Sized> Dataflash<'a, B> {
    /// Open the chip with detection enabled
    ///
    /// On a detection failure the error carries the offending byte and
    /// the bus borrow ends, so the caller can fall back to
    /// [`Dataflash::with_variant`] with a manually selected part.
    pub fn open(bus: &'a mut B) -> Result<Self> {
        let density = identify(bus)?;
        let geometry = ChipGeometry::for_density(density);
        log::debug!(
            "detected {:?}: {} pages of {} bytes",
            density,
            geometry.pages(),
            geometry.page_size
        );
        Ok(Self {
            bus,
            geometry,
            source: GeometrySource::Detected,
            poll: PollConfig::default(),
        })
    }

    /// Open the chip with detection disabled, trusting the given variant
    ///
    /// No identification read is issued. The caller is responsible for
    /// the variant actually matching the wired chip, including avoiding
    /// the chip-erase erratum on the affected parts.
    pub fn with_variant(bus: &'a mut B, variant: Variant) -> Self {
        Self {
            bus,
            geometry: variant.geometry(),
            source: GeometrySource::Fixed,
            poll: PollConfig::default(),
        }
    }

    /// Replace the busy-wait policy
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Replace the busy-wait policy in place
    pub fn set_poll_config(&mut self, poll: PollConfig) {
        self.poll = poll;
    }

    /// The resolved chip geometry
    pub fn geometry(&self) -> ChipGeometry {
        self.geometry
    }

    /// How the geometry was resolved
    pub fn geometry_source(&self) -> GeometrySource {
        self.source
    }

    /// Page size in bytes
    pub fn page_size(&self) -> usize {
        self.geometry.page_size as usize
    }

    /// Total capacity in bytes
    pub fn total_bytes(&self) -> u32 {
        self.geometry.bytes()
    }

    /// Access the underlying bus
    pub fn bus(&mut self) -> &mut B {
        self.bus
    }

    /// End the driver borrow and hand the bus back
    pub fn release(self) -> &'a mut B {
        self.bus
    }

    /// Read the raw 4-byte identification
    pub fn read_id(&mut self) -> Result<[u8; 4]> {
        let mut raw = [0u8; 4];
        SpiCommand::read_reg(opcodes::READ_ID, &mut raw).run(self.bus)?;
        Ok(raw)
    }

    /// Read and decode the status register
    pub fn status(&mut self) -> Result<Status> {
        let mut buf = [0u8; 1];
        SpiCommand::read_reg(opcodes::STATUS_READ, &mut buf).run(self.bus)?;
        Ok(Status::from_bits_retain(buf[0]))
    }

    /// Poll the status register until the chip reports ready
    ///
    /// Bounded by `timeout_us / poll_delay_us` polls; returns
    /// [`Error::Timeout`] if the ready bit never appears.
    pub(crate) fn wait_ready(&mut self, timeout_us: u32) -> Result<()> {
        let poll_delay_us = self.poll.poll_delay_us;
        let max_polls = if poll_delay_us > 0 {
            timeout_us / poll_delay_us
        } else {
            timeout_us // fall back to one poll per microsecond of timeout
        };

        for _ in 0..max_polls {
            if self.status()?.is_ready() {
                return Ok(());
            }
            if poll_delay_us > 0 {
                self.bus.delay_us(poll_delay_us);
            }
        }

        Err(Error::Timeout)
    }

    /// Enter deep power-down
    ///
    /// No wait: the transition completes on its own and the chip
    /// ignores everything except resume while powered down.
    pub fn power_down(&mut self) -> Result<()> {
        SpiCommand::simple(opcodes::DEEP_POWER_DOWN).run(self.bus)
    }

    /// Resume from deep power-down
    ///
    /// Enforces the chip's wake-up time by delaying before returning,
    /// since readiness after resume cannot be polled.
    pub fn resume(&mut self) -> Result<()> {
        SpiCommand::simple(opcodes::RESUME_POWER_DOWN).run(self.bus)?;
        self.bus.delay_us(RESUME_DELAY_US);
        Ok(())
    }
}
