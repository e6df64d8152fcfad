//! Textual protocol for the Plumbline accelerometer stack
//!
//! The stack talks to its host through one-line text exchanges: command
//! lines in, reading lines out.
//!
//! Write side, one line per invocation:
//! ```text
//! device                   queue the device ID for the next read
//! init                     re-apply the default configuration
//! calibrate                run offset self-calibration
//! format <res> <range>     res 0|1, range 4|16|64|256
//! rate <code>              output data rate code 0..15
//! ```
//!
//! Read side, one line per poll:
//! ```text
//! <new_data> <x> <y> <z> <scale>
//! ```
//!
//! This crate owns both directions and nothing else: it does no I/O and
//! touches no hardware, so everything above it can be tested on the host.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod reply;

pub use command::{parse_line, Command, ParseError};
pub use reply::{device_id_line, reading_line, ReplyLine, MAX_REPLY_LEN};
