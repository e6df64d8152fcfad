//! Accelerometer trait the command console dispatches through

use crate::sample::AccelSample;

/// Errors from rejected configuration arguments
///
/// Each variant carries the offending value. Nothing is written to the
/// device when one of these comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Resolution must be 0 (10-bit) or 1 (full resolution)
    Resolution(u8),
    /// Range must be 4, 16, 64 or 256 (g squared, so ±2 to ±16 g)
    Range(u16),
    /// Rate code must be 0..=15
    Rate(u8),
}

/// A three-axis accelerometer, as the command console sees it
///
/// The console drives exactly this surface: identification, the fixed
/// default configuration, self-calibration, the two runtime settings
/// and polled sampling. The I2C driver implements it for hardware;
/// tests implement it with a recording fake.
pub trait Accelerometer {
    /// Read the device ID register (0xE5 on a genuine part)
    fn device_id(&mut self) -> u8;

    /// Apply the default measurement configuration
    fn init(&mut self);

    /// Run offset self-calibration
    ///
    /// Returns once the trim registers are written and the previous
    /// rate and format are restored.
    fn calibrate(&mut self);

    /// Select resolution (0 or 1) and g range (4, 16, 64 or 256)
    fn set_format(&mut self, resolution: u8, range: u16) -> Result<(), ConfigError>;

    /// Select the output data rate code (0..=15)
    fn set_rate(&mut self, code: u8) -> Result<(), ConfigError>;

    /// Poll whether a fresh sample is waiting
    fn is_data_ready(&mut self) -> bool;

    /// Read and assemble the three-axis data registers
    fn read_sample(&mut self) -> AccelSample;
}

// Forwarding impl so a console can borrow a driver instead of owning it.
impl<T: Accelerometer + ?Sized> Accelerometer for &mut T {
    fn device_id(&mut self) -> u8 {
        T::device_id(self)
    }

    fn init(&mut self) {
        T::init(self)
    }

    fn calibrate(&mut self) {
        T::calibrate(self)
    }

    fn set_format(&mut self, resolution: u8, range: u16) -> Result<(), ConfigError> {
        T::set_format(self, resolution, range)
    }

    fn set_rate(&mut self, code: u8) -> Result<(), ConfigError> {
        T::set_rate(self, code)
    }

    fn is_data_ready(&mut self) -> bool {
        T::is_data_ready(self)
    }

    fn read_sample(&mut self) -> AccelSample {
        T::read_sample(self)
    }
}
