//! Raw acceleration samples and mg conversion

/// Default conversion factor in mg per least significant bit
///
/// This is the reported scale for the power-on format (10-bit, ±16 g
/// range). It is a plain constant, not recomputed when the host changes
/// format: the read line always names the factor it scaled by, and a
/// host that reconfigures the device does its own scaling from there.
pub const MG_PER_LSB: u8 = 3;

/// One raw three-axis sample, sign-extended to 16 bits per axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl AccelSample {
    /// Assemble a sample from the 6-byte data register block
    ///
    /// Bytes arrive low-then-high per axis, in X, Y, Z order.
    pub fn from_le_bytes(raw: &[u8; 6]) -> Self {
        Self {
            x: i16::from_le_bytes([raw[0], raw[1]]),
            y: i16::from_le_bytes([raw[2], raw[3]]),
            z: i16::from_le_bytes([raw[4], raw[5]]),
        }
    }

    /// Scale each axis to mg with the given factor
    ///
    /// The multiply wraps at 16 bits, the width of the values the read
    /// line carries.
    pub fn to_milli_g(&self, mg_per_lsb: u8) -> [i16; 3] {
        let scale = i16::from(mg_per_lsb);
        [
            self.x.wrapping_mul(scale),
            self.y.wrapping_mul(scale),
            self.z.wrapping_mul(scale),
        ]
    }
}
