//! Four-digit vault codes

/// Number of digits in a vault code
pub const CODE_LENGTH: usize = 4;

/// A vault code, most significant digit first, each digit in `0..=9`
pub type Code = [u8; CODE_LENGTH];

/// Largest value representable by a code
pub const MAX_CODE_VALUE: u16 = 9999;

/// Split a decimal value into its four code digits
///
/// Values above 9999 keep only their four lowest digits.
pub fn decode_code(value: u16) -> Code {
    [
        (value / 1000 % 10) as u8,
        (value / 100 % 10) as u8,
        (value / 10 % 10) as u8,
        (value % 10) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_pads_short_values() {
        assert_eq!(decode_code(7), [0, 0, 0, 7]);
        assert_eq!(decode_code(42), [0, 0, 4, 2]);
        assert_eq!(decode_code(1234), [1, 2, 3, 4]);
        assert_eq!(decode_code(0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_keeps_low_digits() {
        assert_eq!(decode_code(12345), [2, 3, 4, 5]);
    }

    proptest! {
        #[test]
        fn prop_decode_digits_in_range(value in 0u16..=MAX_CODE_VALUE) {
            let code = decode_code(value);
            prop_assert!(code.iter().all(|&d| d <= 9));
            prop_assert_eq!(code[3], (value % 10) as u8);
            prop_assert_eq!(code[0], (value / 1000) as u8);
        }
    }
}
