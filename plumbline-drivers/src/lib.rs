//! DE1-SoC hardware drivers for the Plumbline accelerometer stack
//!
//! Concrete drivers over the [`plumbline_hal::RegisterBus`] windows:
//!
//! - Pin multiplexer routing (system manager window)
//! - The HPS I2C0 master controller (enable handshake, FIFO framing)
//! - The ADXL345 accelerometer protocol on top of the controller
//!
//! Bring-up order matters: route the pins first, then initialize the
//! controller, then configure the device. [`adxl345::Adxl345::start`]
//! does the latter two in one call.

#![no_std]
#![deny(unsafe_code)]

pub mod adxl345;
pub mod i2c;
pub mod pinmux;

#[cfg(test)]
mod mock;
