//! Pin multiplexer routing for I2C0
//!
//! On the Cyclone V HPS the accelerometer hangs off I2C0, but out of
//! reset the controller is routed to the FPGA fabric and the GENERALIO
//! pads carry GPIO. Three system manager registers hand the bus to the
//! HPS pads wired to the sensor.

use plumbline_hal::{RegisterBus, WindowDesc};

/// System manager window the host must map
pub const WINDOW: WindowDesc = WindowDesc {
    base: 0xFFD0_8000,
    span: 0x800,
};

/// System manager register word offsets
pub mod reg {
    /// Pin mux for the GENERALIO7 pad (I2C0 SDA)
    pub const GENERALIO7: usize = 0x127;
    /// Pin mux for the GENERALIO8 pad (I2C0 SCL)
    pub const GENERALIO8: usize = 0x128;
    /// Routes I2C0 to the FPGA fabric instead of the HPS pads
    pub const I2C0USEFPGA: usize = 0x1C1;
}

/// Pin-mux block of the system manager
pub struct SystemManager<B> {
    bus: B,
}

impl<B: RegisterBus> SystemManager<B> {
    /// Take ownership of the system manager window
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Route I2C0 to the HPS pads wired to the accelerometer
    ///
    /// Side effect only; there is no status to poll. Must run once
    /// before the controller is configured.
    pub fn route_i2c0_to_hps(&mut self) {
        self.bus.write(reg::I2C0USEFPGA, 0);
        self.bus.write(reg::GENERALIO7, 1);
        self.bus.write(reg::GENERALIO8, 1);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "pinmux: generalio7={} generalio8={} i2c0usefpga={}",
            self.bus.read(reg::GENERALIO7),
            self.bus.read(reg::GENERALIO8),
            self.bus.read(reg::I2C0USEFPGA)
        );
    }

    /// Hand the window back
    pub fn release(self) -> B {
        self.bus
    }
}
