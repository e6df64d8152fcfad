//! Register window abstractions
//!
//! Provides the seam between the driver stack and whatever environment
//! hosts it. Each peripheral block (I2C controller, system manager) is
//! presented as its own window value.

/// Word-granular access to one mapped register window
///
/// Offsets are in units of the platform's 4-byte register width, not in
/// bytes: offset 1 addresses the register 4 bytes past the window base.
/// Every register-offset constant in this workspace follows that rule.
///
/// Reads and writes are plain MMIO pokes and cannot fail here; protocol
/// failures (a handshake that never completes, a device that never
/// answers) are detected and reported by the layers above.
pub trait RegisterBus {
    /// Read the 32-bit register `offset` words past the window base
    fn read(&mut self, offset: usize) -> u32;

    /// Write the 32-bit register `offset` words past the window base
    fn write(&mut self, offset: usize, value: u32);
}

// Forwarding impl: lets a host or a test lend its bus by &mut instead
// of moving it into the driver.
impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    fn read(&mut self, offset: usize) -> u32 {
        T::read(self, offset)
    }

    fn write(&mut self, offset: usize, value: u32) {
        T::write(self, offset, value)
    }
}

/// Physical extent of a register window the host must map
///
/// Drivers publish one of these per peripheral block so the host knows
/// what to map before handing over a [`RegisterBus`] for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WindowDesc {
    /// Physical base address of the window
    pub base: u32,
    /// Length of the window in bytes
    pub span: u32,
}
