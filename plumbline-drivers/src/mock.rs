//! Register-level simulation of the controller window with a scripted
//! ADXL345 behind it
//!
//! The simulation covers exactly what the drivers exercise: the enable
//! handshake (with selectable compliance), the DATA_CMD address and
//! read-token protocol with an auto-incrementing register pointer, the
//! RX FIFO level, and a 256-byte register file standing in for the
//! device. Every write lands in a log so tests can assert framing
//! order.

use embedded_hal::delay::DelayNs;
use heapless::{Deque, Vec};
use plumbline_hal::RegisterBus;

use crate::adxl345::reg::DATAX0;
use crate::i2c::{reg, READ_CMD, START_FLAG};

/// How the simulated ENABLE_STATUS follows enable requests
#[derive(Debug, Clone, Copy)]
pub(crate) enum EnableBehavior {
    /// Status follows on the first write
    Immediate,
    /// Status follows once the same request has been written n times
    AfterWrites(u32),
    /// Status never follows
    Never,
}

/// Fake controller window with a simulated device behind it
pub(crate) struct MockWindow {
    /// Device register file, indexed by register address
    pub(crate) device_regs: [u8; 256],
    /// Every write in arrival order, as (word offset, value)
    pub(crate) writes: Vec<(usize, u32), 1024>,
    /// Simulated enabled bit, readable through ENABLE_STATUS
    pub(crate) enabled: bool,
    /// Samples served into the data registers, one per burst start
    sample_stream: Deque<[u8; 6], 64>,
    behavior: EnableBehavior,
    /// Device register pointer, latched by START writes
    pointer: u8,
    /// RX FIFO fed by read tokens
    fifo: Deque<u8, 64>,
    /// Backing store for plain controller registers
    control: [u32; 0x28],
    enable_request: u32,
    enable_writes: u32,
}

impl MockWindow {
    pub(crate) fn new(behavior: EnableBehavior) -> Self {
        Self {
            device_regs: [0; 256],
            writes: Vec::new(),
            enabled: false,
            sample_stream: Deque::new(),
            behavior,
            pointer: 0,
            fifo: Deque::new(),
            control: [0; 0x28],
            enable_request: 0,
            enable_writes: 0,
        }
    }

    /// Queue one three-axis sample for a future data-register burst
    pub(crate) fn push_sample(&mut self, x: i16, y: i16, z: i16) {
        let [xl, xh] = x.to_le_bytes();
        let [yl, yh] = y.to_le_bytes();
        let [zl, zh] = z.to_le_bytes();
        let _ = self.sample_stream.push_back([xl, xh, yl, yh, zl, zh]);
    }

    /// Queued samples not yet served
    pub(crate) fn samples_left(&self) -> usize {
        self.sample_stream.len()
    }

    fn latch_pointer(&mut self, address: u8) {
        self.pointer = address;
        // A burst starting at the data block consumes the next scripted
        // sample; with the script empty the registers keep their values
        if address == DATAX0 {
            if let Some(block) = self.sample_stream.pop_front() {
                let start = usize::from(address);
                self.device_regs[start..start + 6].copy_from_slice(&block);
            }
        }
    }

    fn handle_enable_write(&mut self, value: u32) {
        if value == self.enable_request {
            self.enable_writes += 1;
        } else {
            self.enable_request = value;
            self.enable_writes = 1;
        }

        let flips = match self.behavior {
            EnableBehavior::Immediate => true,
            EnableBehavior::AfterWrites(n) => self.enable_writes >= n,
            EnableBehavior::Never => false,
        };
        if flips {
            match value {
                1 => self.enabled = true,
                2 => self.enabled = false,
                _ => {}
            }
        }
    }

    fn handle_data_cmd_write(&mut self, value: u32) {
        if value & START_FLAG != 0 {
            self.latch_pointer((value & 0xFF) as u8);
        } else if value == READ_CMD {
            let byte = self.device_regs[usize::from(self.pointer)];
            let _ = self.fifo.push_back(byte);
            self.pointer = self.pointer.wrapping_add(1);
        } else {
            self.device_regs[usize::from(self.pointer)] = (value & 0xFF) as u8;
            self.pointer = self.pointer.wrapping_add(1);
        }
    }
}

impl RegisterBus for MockWindow {
    fn read(&mut self, offset: usize) -> u32 {
        match offset {
            reg::ENABLE_STATUS => u32::from(self.enabled),
            reg::RXFLR => self.fifo.len() as u32,
            reg::DATA_CMD => u32::from(self.fifo.pop_front().unwrap_or(0)),
            _ => self.control.get(offset).copied().unwrap_or(0),
        }
    }

    fn write(&mut self, offset: usize, value: u32) {
        let _ = self.writes.push((offset, value));
        match offset {
            reg::ENABLE => self.handle_enable_write(value),
            reg::DATA_CMD => self.handle_data_cmd_write(value),
            _ => {
                if let Some(slot) = self.control.get_mut(offset) {
                    *slot = value;
                }
            }
        }
    }
}

/// Collapse the DATA_CMD stream into (device register, value) pairs,
/// dropping read tokens
pub(crate) fn device_writes(writes: &[(usize, u32)]) -> Vec<(u8, u8), 64> {
    let mut out = Vec::new();
    let mut target = 0u8;
    for &(offset, value) in writes {
        if offset != reg::DATA_CMD {
            continue;
        }
        if value & START_FLAG != 0 {
            target = (value & 0xFF) as u8;
        } else if value != READ_CMD {
            let _ = out.push((target, (value & 0xFF) as u8));
            target = target.wrapping_add(1);
        }
    }
    out
}

/// Delay source that counts calls instead of sleeping, one count per
/// invocation whatever the unit
#[derive(Debug, Default)]
pub(crate) struct CountingDelay {
    pub(crate) sleeps: u32,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, _ns: u32) {
        self.sleeps += 1;
    }

    fn delay_ms(&mut self, _ms: u32) {
        self.sleeps += 1;
    }
}
