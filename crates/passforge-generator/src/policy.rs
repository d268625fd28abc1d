//! Password length policy.
//!
//! The generator itself accepts any length. These bounds describe the range
//! a front end should offer (a slider from 8 to 32 with step 1) and the value
//! it starts at.

/// Shortest length offered to users.
pub const MIN_LENGTH: usize = 8;

/// Longest length offered to users.
pub const MAX_LENGTH: usize = 32;

/// Initial length before the user adjusts anything.
pub const DEFAULT_LENGTH: usize = 12;

/// Clamp a requested length into `MIN_LENGTH..=MAX_LENGTH`.
pub fn clamp_length(length: usize) -> usize {
    length.clamp(MIN_LENGTH, MAX_LENGTH)
}

/// Whether `length` lies inside the offered range.
pub fn is_valid_length(length: usize) -> bool {
    (MIN_LENGTH..=MAX_LENGTH).contains(&length)
}
