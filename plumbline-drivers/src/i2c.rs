//! HPS I2C0 master controller
//!
//! The controller is a memory-mapped I2C master with a combined
//! command/data FIFO register. Software drives whole transactions with
//! three kinds of DATA_CMD writes:
//!
//! - `address | 0x400` issues a START and selects the remote register,
//! - `0x100` clocks in one read byte,
//! - anything else sends its low byte as write data.
//!
//! Received bytes queue in the RX FIFO; RXFLR counts them and reads of
//! DATA_CMD pop them. Enabling or disabling the controller is its own
//! handshake: software writes the request code to ENABLE and polls
//! ENABLE_STATUS until bit 0 follows.

use embedded_hal::delay::DelayNs;
use plumbline_hal::{RegisterBus, WindowDesc};

/// I2C0 controller window the host must map
pub const WINDOW: WindowDesc = WindowDesc {
    base: 0xFFC0_4000,
    span: 0x100,
};

/// Controller register word offsets
pub mod reg {
    /// Master configuration
    pub const CON: usize = 0x00;
    /// Target slave address
    pub const TAR: usize = 0x01;
    /// Combined command/data FIFO
    pub const DATA_CMD: usize = 0x04;
    /// Fast-mode SCL high period, in controller clock ticks
    pub const FS_SCL_HCNT: usize = 0x07;
    /// Fast-mode SCL low period, in controller clock ticks
    pub const FS_SCL_LCNT: usize = 0x08;
    /// Enable/disable request
    pub const ENABLE: usize = 0x1B;
    /// Receive FIFO level
    pub const RXFLR: usize = 0x1E;
    /// Enable handshake status
    pub const ENABLE_STATUS: usize = 0x27;
}

/// DATA_CMD flag: issue a START and address the given remote register
pub const START_FLAG: u32 = 0x400;

/// DATA_CMD token: clock in one read byte
pub const READ_CMD: u32 = 0x100;

/// CON value: master mode, slave disabled, restart enabled, fast mode
/// (400 kb/s), 7-bit addressing
const CON_MASTER_FAST_7BIT: u32 = 0x65;

/// Requested controller state for the enable handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnableState {
    Enabled,
    Disabled,
}

impl EnableState {
    /// Request code written to ENABLE
    fn command(self) -> u32 {
        match self {
            Self::Enabled => 1,
            Self::Disabled => 2,
        }
    }

    /// ENABLE_STATUS bit 0 while the request has not taken effect yet
    fn stale_status(self) -> u32 {
        (self.command() - 1) & 0x1
    }
}

/// Controller configuration
///
/// The defaults talk to an ADXL345 on the DE1-SoC at fast-mode timing.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// 7-bit target slave address
    pub target_address: u8,
    /// SCL high period in controller clock ticks
    ///
    /// Fast mode needs at least 0.6 us high; 60 ticks cover that and
    /// 30 more add margin.
    pub scl_high_count: u32,
    /// SCL low period in controller clock ticks
    ///
    /// At least 1.3 us low, with the same 0.3 us margin on top.
    pub scl_low_count: u32,
    /// Sleep between enable handshake polls, in milliseconds
    pub poll_interval_ms: u32,
    /// Polls within which a handshake counts as clean
    pub enable_poll_budget: u32,
    /// Polls after which a handshake is abandoned
    pub enable_poll_ceiling: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            target_address: 0x53, // ADXL345 with ALT ADDRESS low
            scl_high_count: 60 + 30,
            scl_low_count: 130 + 30,
            poll_interval_ms: 1,
            enable_poll_budget: 10,
            enable_poll_ceiling: 100,
        }
    }
}

/// Controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// The enable handshake did not settle inside the poll budget
    HandshakeTimeout {
        /// State that was being requested
        requested: EnableState,
        /// Polls spent before giving up
        polls: u32,
    },
}

/// Software master over the memory-mapped controller window
pub struct I2cController<B, D> {
    bus: B,
    delay: D,
    config: ControllerConfig,
}

impl<B: RegisterBus, D: DelayNs> I2cController<B, D> {
    /// Wrap a mapped controller window
    pub fn new(bus: B, delay: D, config: ControllerConfig) -> Self {
        Self { bus, delay, config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Request the enabled or disabled state and poll until it takes
    ///
    /// The request is rewritten on every poll, one sleep apart, up to
    /// the hard ceiling. Only a flip inside the much smaller budget
    /// counts as clean; a late flip still reports a timeout, because a
    /// controller that slow has something else wrong with it.
    pub fn set_enable(&mut self, state: EnableState) -> Result<(), I2cError> {
        let command = state.command();
        let stale = state.stale_status();
        let mut polls = 0;

        self.bus.write(reg::ENABLE, command);
        while (self.bus.read(reg::ENABLE_STATUS) & 0x1) == stale
            && polls < self.config.enable_poll_ceiling
        {
            polls += 1;
            self.delay.delay_ms(self.config.poll_interval_ms);
            self.bus.write(reg::ENABLE, command);
        }

        if polls < self.config.enable_poll_budget {
            Ok(())
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("i2c: enable handshake stuck after {} polls", polls);
            Err(I2cError::HandshakeTimeout {
                requested: state,
                polls,
            })
        }
    }

    /// Configure the controller and bring it up
    ///
    /// The config registers only latch while the controller is
    /// disabled, so this disables it, programs master mode, the target
    /// address and the SCL counts, then re-enables it.
    pub fn init(&mut self) -> Result<(), I2cError> {
        self.set_enable(EnableState::Disabled)?;

        self.bus.write(reg::CON, CON_MASTER_FAST_7BIT);
        self.bus
            .write(reg::TAR, u32::from(self.config.target_address));
        self.bus.write(reg::FS_SCL_HCNT, self.config.scl_high_count);
        self.bus.write(reg::FS_SCL_LCNT, self.config.scl_low_count);

        self.set_enable(EnableState::Enabled)
    }

    /// Read one byte from a remote register
    ///
    /// Blocks until the RX FIFO delivers the byte; with the controller
    /// enabled the hardware always completes the transfer.
    pub fn read_register(&mut self, address: u8) -> u8 {
        self.bus
            .write(reg::DATA_CMD, u32::from(address) | START_FLAG);
        self.bus.write(reg::DATA_CMD, READ_CMD);

        while self.bus.read(reg::RXFLR) == 0 {}
        (self.bus.read(reg::DATA_CMD) & 0xFF) as u8
    }

    /// Write one byte to a remote register
    ///
    /// Fire and forget; the controller does not report slave acks.
    pub fn write_register(&mut self, address: u8, value: u8) {
        self.bus
            .write(reg::DATA_CMD, u32::from(address) | START_FLAG);
        self.bus.write(reg::DATA_CMD, u32::from(value));
    }

    /// Read a block of consecutive remote registers
    ///
    /// All read tokens are queued before draining. Clocking bytes one
    /// at a time leaves gaps on the wire, and the multi-byte data
    /// registers are only coherent when read back to back.
    pub fn read_burst(&mut self, address: u8, buf: &mut [u8]) {
        self.bus
            .write(reg::DATA_CMD, u32::from(address) | START_FLAG);

        for _ in 0..buf.len() {
            self.bus.write(reg::DATA_CMD, READ_CMD);
        }

        for slot in buf.iter_mut() {
            while self.bus.read(reg::RXFLR) == 0 {}
            *slot = (self.bus.read(reg::DATA_CMD) & 0xFF) as u8;
        }
    }

    /// Hand back the window and the delay source
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }
}
