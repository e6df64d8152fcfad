//! Board-agnostic core logic for the Plumbline accelerometer stack
//!
//! This crate contains the logic that does not depend on the concrete
//! I2C controller:
//!
//! - Raw sample assembly and mg conversion
//! - The accelerometer trait the console dispatches through
//! - Rounded integer division used by offset calibration
//! - The command console (dispatch plus the one-line read side)

#![no_std]
#![deny(unsafe_code)]

pub mod console;
pub mod math;
pub mod sample;
pub mod traits;
