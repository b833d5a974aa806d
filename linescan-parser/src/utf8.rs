//! Lenient UTF-8 decoding.
//!
//! Decoding is table driven and never fails. Malformed sequences are not rejected: a truncated
//! sequence or a stray continuation byte simply yields whatever value the bytes assemble to.

use crate::matchers::is_continuation_byte;

/// Number of continuation bytes announced by each lead byte.
#[rustfmt::skip]
const TRAILING_BYTES: [u8; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5,
];

/// Marker bits accumulated while shifting in a sequence of `index + 1` bytes.
const OFFSETS: [u32; 6] = [
    0x0000_0000,
    0x0000_3080,
    0x000E_2080,
    0x03C8_2080,
    0xFA08_2080,
    0x8208_2080,
];

/// Decode the code point starting at `cursor` and advance the cursor past it.
///
/// Returns 0 without moving the cursor once the end of `bytes` is reached.
pub fn next_codepoint(bytes: &[u8], cursor: &mut usize) -> u32 {
    let Some(&lead) = bytes.get(*cursor) else {
        return 0;
    };

    *cursor += 1;

    let mut ch = u32::from(lead);
    let mut consumed = 0;

    for _ in 0..TRAILING_BYTES[usize::from(lead)] {
        match bytes.get(*cursor) {
            Some(&b) if is_continuation_byte(b) => {
                ch = (ch << 6).wrapping_add(u32::from(b));
                *cursor += 1;
                consumed += 1;
            }

            // Truncated sequence, keep what we have.
            _ => break,
        }
    }

    ch.wrapping_sub(OFFSETS[consumed])
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn it_should_decode_ascii() {
        let mut cursor = 0;
        assert_that!(next_codepoint(b"ab", &mut cursor), eq(u32::from(b'a')));
        assert_that!(cursor, eq(1));
        assert_that!(next_codepoint(b"ab", &mut cursor), eq(u32::from(b'b')));
        assert_that!(cursor, eq(2));
    }

    #[test]
    fn it_should_decode_multi_byte_sequences() {
        let mut cursor = 0;
        assert_that!(next_codepoint(&[0xC3, 0xA9], &mut cursor), eq(0xE9));
        assert_that!(cursor, eq(2));

        let mut cursor = 0;
        assert_that!(next_codepoint("€".as_bytes(), &mut cursor), eq(0x20AC));
        assert_that!(cursor, eq(3));

        let mut cursor = 0;
        assert_that!(next_codepoint("😀".as_bytes(), &mut cursor), eq(0x1F600));
        assert_that!(cursor, eq(4));
    }

    #[test]
    fn it_should_return_zero_at_the_end() {
        let mut cursor = 0;
        assert_that!(next_codepoint(&[], &mut cursor), eq(0));
        assert_that!(cursor, eq(0));

        let mut cursor = 1;
        assert_that!(next_codepoint(b"a", &mut cursor), eq(0));
        assert_that!(cursor, eq(1));
    }

    #[test]
    fn it_should_decode_malformed_input_leniently() {
        // Lead byte announcing one continuation byte, followed by ASCII.
        let mut cursor = 0;
        assert_that!(next_codepoint(&[0xC3, b'a'], &mut cursor), eq(0xC3));
        assert_that!(cursor, eq(1));

        // Stray continuation byte.
        let mut cursor = 0;
        assert_that!(next_codepoint(&[0xA9, b'a'], &mut cursor), eq(0xA9));
        assert_that!(cursor, eq(1));
    }
}
