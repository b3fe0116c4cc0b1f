//! Bit-width arithmetic for sizing generated signals and literals.

/// Returns `ceil(log2(n))`, with `clog2(0) == clog2(1) == 0`.
pub fn clog2(n: u64) -> u32 {
    if n <= 1 {
        0
    } else {
        64 - (n - 1).leading_zeros()
    }
}

/// Width of a select signal able to address `inputs` choices.
///
/// This is the minimal binary width covering `inputs - 1`, never less than
/// one bit: 2 inputs need 1 bit, 4 need 2, 5 through 8 need 3.
pub fn select_width(inputs: u32) -> u32 {
    clog2(u64::from(inputs)).max(1)
}

/// Output width of a binary-to-one-hot decoder with a `bandwidth`-bit input.
pub fn decoded_width(bandwidth: u32) -> u32 {
    1u32.checked_shl(bandwidth).unwrap_or(u32::MAX)
}

/// Output width of a one-hot-to-binary encoder with a `bandwidth`-bit input.
pub fn encoded_width(bandwidth: u32) -> u32 {
    clog2(u64::from(bandwidth)).max(1)
}

/// Formats `value` as exactly `width` binary digits, most significant first.
///
/// Bits above position 63 are always zero.
pub fn binary_digits(value: u64, width: u32) -> String {
    (0..width)
        .rev()
        .map(|bit| {
            if bit < 64 && (value >> bit) & 1 == 1 {
                '1'
            } else {
                '0'
            }
        })
        .collect()
}
