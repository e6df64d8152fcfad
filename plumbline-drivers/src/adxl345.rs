//! ADXL345 three-axis accelerometer protocol
//!
//! Register protocol on top of the I2C controller: identification, the
//! default measurement setup, activity-gated data-ready polling,
//! six-byte sample bursts and offset self-calibration.
//!
//! # Data-ready gating
//!
//! Polling DATA_READY alone rereads the same sample over and over, so
//! the poll is gated on the activity interrupt: only after the device
//! reports motion is INT_SOURCE read a second time and DATA_READY
//! honored. Calibration bypasses the gate (the board is deliberately
//! held still) but keeps the double read.

use embedded_hal::delay::DelayNs;
use plumbline_core::math::rounded_div;
use plumbline_core::sample::AccelSample;
use plumbline_core::traits::{Accelerometer, ConfigError};
use plumbline_hal::RegisterBus;

use crate::i2c::{I2cController, I2cError};

/// 7-bit bus address with the ALT ADDRESS pin low
pub const I2C_ADDRESS: u8 = 0x53;

/// Value the DEVID register reads on a genuine part
pub const DEVICE_ID: u8 = 0xE5;

/// ADXL345 register addresses
pub mod reg {
    /// Device ID
    pub const DEVID: u8 = 0x00;
    /// X-axis offset trim
    pub const OFSX: u8 = 0x1E;
    /// Y-axis offset trim
    pub const OFSY: u8 = 0x1F;
    /// Z-axis offset trim
    pub const OFSZ: u8 = 0x20;
    /// Activity threshold, 62.5 mg per LSB
    pub const THRESH_ACT: u8 = 0x24;
    /// Inactivity threshold, 62.5 mg per LSB
    pub const THRESH_INACT: u8 = 0x25;
    /// Inactivity time, 1 s per LSB
    pub const TIME_INACT: u8 = 0x26;
    /// Axis participation for activity/inactivity detection
    pub const ACT_INACT_CTL: u8 = 0x27;
    /// Output data rate
    pub const BW_RATE: u8 = 0x2C;
    /// Power and measurement mode
    pub const POWER_CTL: u8 = 0x2D;
    /// Interrupt mask
    pub const INT_ENABLE: u8 = 0x2E;
    /// Interrupt source flags
    pub const INT_SOURCE: u8 = 0x30;
    /// Resolution and range
    pub const DATA_FORMAT: u8 = 0x31;
    /// X-axis data low byte, start of the 6-byte sample block
    pub const DATAX0: u8 = 0x32;
}

/// INT_SOURCE flag bits
pub mod int_src {
    /// New sample waiting in the data registers
    pub const DATA_READY: u8 = 0x80;
    /// Activity event latched
    pub const ACTIVITY: u8 = 0x10;
    /// Inactivity event latched
    pub const INACTIVITY: u8 = 0x08;
}

/// POWER_CTL values the driver uses
mod power {
    /// Standby, measurements halted
    pub const STANDBY: u8 = 0x00;
    /// Measurement mode
    pub const MEASURE: u8 = 0x08;
}

/// Configuration applied by [`Adxl345::init_defaults`]
mod defaults {
    /// ±16 g range, 10-bit resolution
    pub const DATA_FORMAT: u8 = 0x03;
    /// 12.5 Hz output data rate
    pub const BW_RATE: u8 = 0x07;
    /// Activity above 250 mg
    pub const THRESH_ACT: u8 = 0x04;
    /// Inactivity below 125 mg
    pub const THRESH_INACT: u8 = 0x02;
    /// Two seconds of stillness before inactivity latches
    pub const TIME_INACT: u8 = 0x02;
    /// All axes participate, AC-coupled
    pub const ACT_INACT_CTL: u8 = 0xFF;
    /// Activity and inactivity interrupts unmasked
    pub const INT_ENABLE: u8 = 0x18;
}

/// Offset self-calibration parameters
mod cal {
    /// Samples averaged per axis
    pub const SAMPLE_COUNT: i32 = 32;
    /// 100 Hz output data rate while sampling
    pub const BW_RATE: u8 = 0x0A;
    /// Full resolution, ±16 g while sampling
    pub const DATA_FORMAT: u8 = 0x0B;
    /// Raw data LSB per offset-trim LSB in full resolution
    pub const LSB_PER_TRIM: i32 = 4;
    /// Resting target per axis: level, with 1 g (256 LSB) on Z
    pub const TARGET: [i32; 3] = [0, 0, 256];
}

/// Output data rate per BW_RATE code, in hundredths of Hz
///
/// Indexed by rate code 0..=15. Kept public for host diagnostics when
/// a rate command is rejected.
pub const RATE_CODES_HZ_X100: [u32; 16] = [
    10, 20, 39, 78, 156, 313, 625, 1_250, 2_500, 5_000, 10_000, 20_000, 40_000, 80_000, 160_000,
    320_000,
];

/// Map a range argument to its DATA_FORMAT range code
///
/// Arguments are the squares of the ± g limits: 4 means ±2 g, up
/// through 256 for ±16 g.
fn range_code(range: u16) -> Option<u8> {
    match range {
        4 => Some(0),
        16 => Some(1),
        64 => Some(2),
        256 => Some(3),
        _ => None,
    }
}

/// ADXL345 protocol driver over the I2C controller
pub struct Adxl345<B, D> {
    i2c: I2cController<B, D>,
    calibrating: bool,
}

impl<B: RegisterBus, D: DelayNs> Adxl345<B, D> {
    /// Wrap a controller
    pub fn new(i2c: I2cController<B, D>) -> Self {
        Self {
            i2c,
            calibrating: false,
        }
    }

    /// Bring the chain up: controller init, defaults, ID probe
    ///
    /// Returns the probed ID. An unexpected ID is logged and otherwise
    /// ignored; only a controller handshake failure aborts bring-up.
    pub fn start(&mut self) -> Result<u8, I2cError> {
        self.i2c.init()?;
        self.init_defaults();

        let id = self.read_device_id();
        if id != DEVICE_ID {
            #[cfg(feature = "defmt")]
            defmt::warn!("adxl345: unexpected device id {=u8:#x}", id);
        }
        Ok(id)
    }

    /// Read the DEVID register
    pub fn read_device_id(&mut self) -> u8 {
        self.i2c.read_register(reg::DEVID)
    }

    /// Apply the default measurement configuration
    ///
    /// Ends with a standby/measure pair so measurement restarts from a
    /// known mode edge whatever state the part was in.
    pub fn init_defaults(&mut self) {
        self.i2c
            .write_register(reg::DATA_FORMAT, defaults::DATA_FORMAT);
        self.i2c.write_register(reg::BW_RATE, defaults::BW_RATE);

        // Activity/inactivity detection feeds the data-ready gate
        self.i2c
            .write_register(reg::THRESH_ACT, defaults::THRESH_ACT);
        self.i2c
            .write_register(reg::THRESH_INACT, defaults::THRESH_INACT);
        self.i2c
            .write_register(reg::TIME_INACT, defaults::TIME_INACT);
        self.i2c
            .write_register(reg::ACT_INACT_CTL, defaults::ACT_INACT_CTL);
        self.i2c
            .write_register(reg::INT_ENABLE, defaults::INT_ENABLE);

        self.i2c.write_register(reg::POWER_CTL, power::STANDBY);
        self.i2c.write_register(reg::POWER_CTL, power::MEASURE);
    }

    /// Poll for a fresh sample
    pub fn poll_data_ready(&mut self) -> bool {
        let status = self.i2c.read_register(reg::INT_SOURCE);
        if status & int_src::ACTIVITY == 0 && !self.calibrating {
            return false;
        }
        // DATA_READY is only trusted on a second, fresh status read
        let status = self.i2c.read_register(reg::INT_SOURCE);
        status & int_src::DATA_READY != 0
    }

    /// Burst-read and assemble the three axis registers
    pub fn read_axes(&mut self) -> AccelSample {
        let mut raw = [0u8; 6];
        self.i2c.read_burst(reg::DATAX0, &mut raw);
        AccelSample::from_le_bytes(&raw)
    }

    /// Select resolution and range
    pub fn apply_format(&mut self, resolution: u8, range: u16) -> Result<(), ConfigError> {
        if resolution > 1 {
            #[cfg(feature = "defmt")]
            defmt::warn!("adxl345: resolution {=u8} is not 0 or 1", resolution);
            return Err(ConfigError::Resolution(resolution));
        }
        let code = match range_code(range) {
            Some(code) => code,
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("adxl345: range {=u16} is not 4, 16, 64 or 256", range);
                return Err(ConfigError::Range(range));
            }
        };

        self.i2c
            .write_register(reg::DATA_FORMAT, (resolution << 3) | code);
        Ok(())
    }

    /// Select the output data rate code
    ///
    /// See [`RATE_CODES_HZ_X100`] for what each code means in Hz.
    pub fn apply_rate(&mut self, code: u8) -> Result<(), ConfigError> {
        if code > 0x0F {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "adxl345: rate code {=u8} out of range, valid codes run 0 (0.10 Hz) to 15 (3200 Hz)",
                code
            );
            return Err(ConfigError::Rate(code));
        }
        self.i2c.write_register(reg::BW_RATE, code);
        Ok(())
    }

    /// Average 32 resting samples and move the offset trims toward the
    /// level-and-1g target
    ///
    /// The board must rest still and level for the duration. Rate and
    /// format are forced to the trim-friendly calibration values while
    /// sampling and restored afterwards; the whole sequence brackets
    /// its register changes in standby. Sampling blocks until all 32
    /// samples have arrived; there is no abort path once it starts.
    pub fn run_calibration(&mut self) {
        self.i2c.write_register(reg::POWER_CTL, power::STANDBY);

        let offsets = [
            self.i2c.read_register(reg::OFSX) as i8,
            self.i2c.read_register(reg::OFSY) as i8,
            self.i2c.read_register(reg::OFSZ) as i8,
        ];
        let saved_rate = self.i2c.read_register(reg::BW_RATE);
        let saved_format = self.i2c.read_register(reg::DATA_FORMAT);

        // 100 Hz, full resolution: one trim LSB is exactly four data LSB
        self.i2c.write_register(reg::BW_RATE, cal::BW_RATE);
        self.i2c.write_register(reg::DATA_FORMAT, cal::DATA_FORMAT);
        self.i2c.write_register(reg::POWER_CTL, power::MEASURE);

        self.calibrating = true;
        let mut sums = [0i32; 3];
        let mut collected = 0;
        while collected < cal::SAMPLE_COUNT {
            if !self.poll_data_ready() {
                continue;
            }
            let sample = self.read_axes();
            sums[0] += i32::from(sample.x);
            sums[1] += i32::from(sample.y);
            sums[2] += i32::from(sample.z);
            collected += 1;
        }
        self.calibrating = false;

        self.i2c.write_register(reg::POWER_CTL, power::STANDBY);

        let mut trimmed = [0u8; 3];
        for axis in 0..3 {
            let average = rounded_div(sums[axis], cal::SAMPLE_COUNT);
            let delta = rounded_div(cal::TARGET[axis] - average, cal::LSB_PER_TRIM) as i8;
            trimmed[axis] = offsets[axis].wrapping_add(delta) as u8;
        }
        self.i2c.write_register(reg::OFSX, trimmed[0]);
        self.i2c.write_register(reg::OFSY, trimmed[1]);
        self.i2c.write_register(reg::OFSZ, trimmed[2]);

        self.i2c.write_register(reg::BW_RATE, saved_rate);
        self.i2c.write_register(reg::DATA_FORMAT, saved_format);
        self.i2c.write_register(reg::POWER_CTL, power::MEASURE);
    }

    /// Hand the controller back
    pub fn release(self) -> I2cController<B, D> {
        self.i2c
    }
}

impl<B: RegisterBus, D: DelayNs> Accelerometer for Adxl345<B, D> {
    fn device_id(&mut self) -> u8 {
        self.read_device_id()
    }

    fn init(&mut self) {
        self.init_defaults();
    }

    fn calibrate(&mut self) {
        self.run_calibration();
    }

    fn set_format(&mut self, resolution: u8, range: u16) -> Result<(), ConfigError> {
        self.apply_format(resolution, range)
    }

    fn set_rate(&mut self, code: u8) -> Result<(), ConfigError> {
        self.apply_rate(code)
    }

    fn is_data_ready(&mut self) -> bool {
        self.poll_data_ready()
    }

    fn read_sample(&mut self) -> AccelSample {
        self.read_axes()
    }
}
