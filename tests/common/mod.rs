//! In-memory DataFlash emulator for testing
//!
//! Emulates one AT45DB chip at the wire level: bytes exchanged during a
//! transaction are collected, responses are produced in the same clock
//! slots a real chip would use, and the command is applied when
//! chip-select deasserts. Every completed command is logged so tests
//! can assert on the exact traffic.

use dataflash::bus::SpiBus;
use dataflash::chip::{ChipGeometry, Density, PAGES_PER_BLOCK};
use dataflash::error::Result;

const OP_READ_ID: u8 = 0x9F;
const OP_STATUS: u8 = 0xD7;
const OP_SECURITY_READ: u8 = 0x77;
const OP_PAGE_READ: u8 = 0xD2;
const OP_CONTINUOUS_READ: u8 = 0x03;
const OP_BUF_READ: [u8; 2] = [0xD4, 0xD6];
const OP_BUF_WRITE: [u8; 2] = [0x84, 0x87];
const OP_BUF_TO_PAGE_ERASE: [u8; 2] = [0x83, 0x86];
const OP_BUF_TO_PAGE_NO_ERASE: [u8; 2] = [0x88, 0x89];
const OP_PAGE_TO_BUF: [u8; 2] = [0x53, 0x55];
const OP_PAGE_PROGRAM: [u8; 2] = [0x82, 0x85];
const OP_PAGE_COMPARE: [u8; 2] = [0x60, 0x61];
const OP_PAGE_REWRITE: [u8; 2] = [0x58, 0x59];
const OP_PAGE_ERASE: u8 = 0x81;
const OP_BLOCK_ERASE: u8 = 0x50;
const OP_SECTOR_ERASE: u8 = 0x7C;
const OP_CHIP_ERASE: u8 = 0xC7;
const OP_POWER_DOWN: u8 = 0xB9;
const OP_RESUME: u8 = 0xAB;

const ERASED: u8 = 0xFF;

pub struct EmulatedChip {
    geometry: ChipGeometry,
    id: [u8; 4],
    main: Vec<u8>,
    buffers: [Vec<u8>; 2],
    security: Vec<u8>,
    /// Number of busy status polls reported after each internal cycle
    pub busy_polls: u32,
    /// Never report ready again (simulates a hung chip)
    pub stuck_busy: bool,
    busy: u32,
    compare_mismatch: bool,
    powered_down: bool,
    selected: bool,
    in_transaction: bool,
    tx: Vec<u8>,
    /// Completed commands as (opcode, 24-bit address field)
    pub commands: Vec<(u8, u32)>,
    /// Number of completed 4-byte chip-erase sequences
    pub chip_erases: u32,
    /// Every delay_us call, in order
    pub delays: Vec<u32>,
}

impl EmulatedChip {
    pub fn new(density: Density) -> Self {
        let code = density as u8;
        Self::with_id(density, [0x1F, (0x01 << 5) | code, 0x00, 0x00])
    }

    /// Emulate a chip of the given size that answers with arbitrary ID
    /// bytes; used for detection failure tests.
    pub fn with_id(density: Density, id: [u8; 4]) -> Self {
        let geometry = ChipGeometry::for_density(density);
        let page_size = geometry.page_size as usize;
        Self {
            geometry,
            id,
            main: vec![ERASED; geometry.bytes() as usize],
            buffers: [vec![ERASED; page_size], vec![ERASED; page_size]],
            security: (0..128).map(|i| i as u8).collect(),
            busy_polls: 2,
            stuck_busy: false,
            busy: 0,
            compare_mismatch: false,
            powered_down: false,
            selected: false,
            in_transaction: false,
            tx: Vec::new(),
            commands: Vec::new(),
            chip_erases: 0,
            delays: Vec::new(),
        }
    }

    pub fn page(&self, page: u16) -> &[u8] {
        let size = self.geometry.page_size as usize;
        let start = page as usize * size;
        &self.main[start..start + size]
    }

    fn page_size(&self) -> usize {
        self.geometry.page_size as usize
    }

    fn offset_mask(&self) -> u32 {
        (1 << self.geometry.byte_offset_bits) - 1
    }

    fn address_field(&self) -> u32 {
        if self.tx.len() >= 4 {
            ((self.tx[1] as u32) << 16) | ((self.tx[2] as u32) << 8) | self.tx[3] as u32
        } else {
            0
        }
    }

    fn decode_page(&self, addr: u32) -> usize {
        ((addr >> self.geometry.byte_offset_bits) as usize) % self.geometry.pages() as usize
    }

    fn decode_offset(&self, addr: u32) -> usize {
        ((addr & self.offset_mask()) as usize) % self.page_size()
    }

    fn status_byte(&self) -> u8 {
        let mut status = 0u8;
        if self.busy == 0 && !self.stuck_busy {
            status |= 0x80;
        }
        if self.compare_mismatch {
            status |= 0x40;
        }
        status
    }

    fn start_internal_cycle(&mut self) {
        self.busy = self.busy_polls;
    }

    /// Response the chip shifts out while receiving the next byte,
    /// based on everything received so far in this transaction.
    fn response_byte(&self) -> u8 {
        let Some(&opcode) = self.tx.first() else {
            return ERASED;
        };
        if self.powered_down {
            return ERASED;
        }
        let index = self.tx.len();

        match opcode {
            OP_STATUS => self.status_byte(),
            OP_READ_ID => *self.id.get(index - 1).unwrap_or(&0x00),
            OP_SECURITY_READ if index >= 4 => {
                let i = index - 4;
                self.security[i % self.security.len()]
            }
            OP_PAGE_READ if index >= 8 => {
                let addr = self.address_field();
                let page = self.decode_page(addr);
                let offset = self.decode_offset(addr);
                // page reads wrap within the addressed page
                let i = (offset + (index - 8)) % self.page_size();
                self.main[page * self.page_size() + i]
            }
            OP_CONTINUOUS_READ if index >= 4 => {
                let addr = self.address_field();
                let start = self.decode_page(addr) * self.page_size() + self.decode_offset(addr);
                self.main[(start + (index - 4)) % self.main.len()]
            }
            op if op == OP_BUF_READ[0] || op == OP_BUF_READ[1] => {
                if index < 5 {
                    return ERASED;
                }
                let buffer = &self.buffers[usize::from(op == OP_BUF_READ[1])];
                let offset = self.decode_offset(self.address_field());
                buffer[(offset + (index - 5)) % buffer.len()]
            }
            _ => ERASED,
        }
    }

    /// Apply the completed command. Runs when chip-select deasserts.
    fn finish_command(&mut self) {
        let Some(&opcode) = self.tx.first() else {
            return;
        };
        let addr = self.address_field();
        self.commands.push((opcode, addr));

        if self.powered_down {
            if opcode == OP_RESUME {
                self.powered_down = false;
            }
            self.tx.clear();
            return;
        }

        let page_size = self.page_size();
        match opcode {
            OP_STATUS => {
                if self.busy > 0 {
                    self.busy -= 1;
                }
            }
            op if op == OP_BUF_WRITE[0] || op == OP_BUF_WRITE[1] => {
                let which = usize::from(op == OP_BUF_WRITE[1]);
                let offset = self.decode_offset(addr);
                for (i, &byte) in self.tx[4..].iter().enumerate() {
                    let len = self.buffers[which].len();
                    self.buffers[which][(offset + i) % len] = byte;
                }
            }
            op if op == OP_BUF_TO_PAGE_ERASE[0] || op == OP_BUF_TO_PAGE_ERASE[1] => {
                let which = usize::from(op == OP_BUF_TO_PAGE_ERASE[1]);
                let start = self.decode_page(addr) * page_size;
                let buffer = self.buffers[which].clone();
                self.main[start..start + page_size].copy_from_slice(&buffer);
                self.start_internal_cycle();
            }
            op if op == OP_BUF_TO_PAGE_NO_ERASE[0] || op == OP_BUF_TO_PAGE_NO_ERASE[1] => {
                let which = usize::from(op == OP_BUF_TO_PAGE_NO_ERASE[1]);
                let start = self.decode_page(addr) * page_size;
                for i in 0..page_size {
                    // programming can only clear bits
                    self.main[start + i] &= self.buffers[which][i];
                }
                self.start_internal_cycle();
            }
            op if op == OP_PAGE_TO_BUF[0] || op == OP_PAGE_TO_BUF[1] => {
                let which = usize::from(op == OP_PAGE_TO_BUF[1]);
                let start = self.decode_page(addr) * page_size;
                let page = self.main[start..start + page_size].to_vec();
                self.buffers[which].copy_from_slice(&page);
                self.start_internal_cycle();
            }
            op if op == OP_PAGE_PROGRAM[0] || op == OP_PAGE_PROGRAM[1] => {
                let which = usize::from(op == OP_PAGE_PROGRAM[1]);
                let offset = self.decode_offset(addr);
                for (i, &byte) in self.tx[4..].iter().enumerate() {
                    let len = self.buffers[which].len();
                    self.buffers[which][(offset + i) % len] = byte;
                }
                let start = self.decode_page(addr) * page_size;
                let buffer = self.buffers[which].clone();
                self.main[start..start + page_size].copy_from_slice(&buffer);
                self.start_internal_cycle();
            }
            op if op == OP_PAGE_COMPARE[0] || op == OP_PAGE_COMPARE[1] => {
                let which = usize::from(op == OP_PAGE_COMPARE[1]);
                let start = self.decode_page(addr) * page_size;
                self.compare_mismatch =
                    self.main[start..start + page_size] != self.buffers[which][..];
                self.start_internal_cycle();
            }
            op if op == OP_PAGE_REWRITE[0] || op == OP_PAGE_REWRITE[1] => {
                let which = usize::from(op == OP_PAGE_REWRITE[1]);
                let start = self.decode_page(addr) * page_size;
                let page = self.main[start..start + page_size].to_vec();
                self.buffers[which].copy_from_slice(&page);
                self.start_internal_cycle();
            }
            OP_PAGE_ERASE => {
                let start = self.decode_page(addr) * page_size;
                self.main[start..start + page_size].fill(ERASED);
                self.start_internal_cycle();
            }
            OP_BLOCK_ERASE => {
                let start = self.decode_page(addr) * page_size;
                let len = page_size * PAGES_PER_BLOCK as usize;
                let end = (start + len).min(self.main.len());
                self.main[start..end].fill(ERASED);
                self.start_internal_cycle();
            }
            OP_SECTOR_ERASE => {
                let start = self.decode_page(addr) * page_size;
                let len =
                    page_size * PAGES_PER_BLOCK as usize * self.geometry.blocks_per_sector as usize;
                let end = (start + len).min(self.main.len());
                self.main[start..end].fill(ERASED);
                self.start_internal_cycle();
            }
            OP_CHIP_ERASE if self.tx == [0xC7, 0x94, 0x80, 0x9A] => {
                self.main.fill(ERASED);
                self.chip_erases += 1;
                self.start_internal_cycle();
            }
            OP_POWER_DOWN => {
                self.powered_down = true;
            }
            _ => {}
        }

        self.tx.clear();
    }
}

impl SpiBus for EmulatedChip {
    fn begin_transaction(&mut self) -> Result<()> {
        assert!(!self.in_transaction, "transaction nested");
        self.in_transaction = true;
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<()> {
        assert!(self.in_transaction, "end without begin");
        assert!(!self.selected, "transaction ended while selected");
        self.in_transaction = false;
        Ok(())
    }

    fn select_assert(&mut self) -> Result<()> {
        assert!(self.in_transaction, "select outside a transaction");
        self.selected = true;
        Ok(())
    }

    fn select_deassert(&mut self) -> Result<()> {
        assert!(self.selected, "deselect while not selected");
        self.selected = false;
        self.finish_command();
        Ok(())
    }

    fn exchange(&mut self, byte: u8) -> Result<u8> {
        assert!(self.selected, "exchange while not selected");
        let response = self.response_byte();
        self.tx.push(byte);
        Ok(response)
    }

    fn delay_us(&mut self, us: u32) {
        self.delays.push(us);
    }
}
