//! Plumbline Hardware Abstraction Layer
//!
//! This crate defines the register-access traits the rest of the stack
//! programs against. How a peripheral window actually gets mapped is the
//! host's business (ioremap in a kernel module, /dev/mem in user space,
//! a plain array in tests); the stack only ever pokes 32-bit registers
//! at word offsets inside one.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  Host (kernel module, mmap tool, tests)  │  implements RegisterBus
//! └──────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌──────────────────────────────────────────┐
//! │  plumbline-hal (this crate - traits)     │
//! └──────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌──────────────────────────────────────────┐
//! │  plumbline-drivers (pinmux, I2C, ADXL)   │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`bus::RegisterBus`] - Word-granular access to a mapped register window

#![no_std]
#![deny(unsafe_code)]

pub mod bus;

// Re-export key traits at crate root for convenience
pub use bus::{RegisterBus, WindowDesc};
