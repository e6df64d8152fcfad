//! Integer helpers shared by the calibration routine

/// Signed division rounded half away from zero
///
/// `rounded_div(7, 2)` is 4 and `rounded_div(-7, 2)` is -4, where
/// truncating division would give 3 and -3. Offset averaging uses this
/// so small constant biases do not vanish in the division.
pub fn rounded_div(n: i32, d: i32) -> i32 {
    if (n < 0) ^ (d < 0) {
        (n - d / 2) / d
    } else {
        (n + d / 2) / d
    }
}
