//! Integer scaling helpers shared by the combat formulas.
//!
//! All formulas work on whole points of life, mana, and shield: values are
//! multiplied in `f64` and floored back to integers.

/// Returns `floor(value * factor)`, clamped at 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn scale(value: u32, factor: f64) -> u32 {
    floor_to_u32(f64::from(value) * factor)
}

/// Floors a non-negative float to `u32`, clamping negatives to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn floor_to_u32(value: f64) -> u32 {
    if value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value.floor() as u32
    }
}

/// Converts a point amount to the signed form used in action results.
pub(crate) fn signed(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
