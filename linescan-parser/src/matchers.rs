//! Character classification and digit-run conversion.
//!
//! Everything here is a pure function over raw bytes. None of these functions know about the
//! scanner position; the [`Scanner`](crate::scanner::Scanner) pre-scans a run with the
//! predicates and hands it to the converters.

/// Evaluate if the byte may appear inside an identifier (ASCII letter, digit, `_` or `:`).
///
/// The colon allows namespaced identifiers such as `a:b`.
#[inline(always)]
pub fn is_identifier_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_' || ch == b':'
}

/// Evaluate if the byte is one of the caller-supplied delimiters. Only ASCII delimiters are
/// considered, so a delimiter can never split a multi-byte character.
#[inline(always)]
pub fn is_delimiter(ch: u8, delims: &[u8]) -> bool {
    ch.is_ascii() && delims.contains(&ch)
}

/// Evaluate if the byte may appear inside a bare (unquoted) string.
pub fn is_string_char(ch: u8, delims: &[u8]) -> bool {
    if ch <= b' ' || ch == b'"' || ch == b'\'' {
        return false;
    }

    !is_delimiter(ch, delims)
}

/// Evaluate if the byte at `index` of a run may belong to an integer literal.
#[inline(always)]
pub fn is_int_char(index: usize, ch: u8) -> bool {
    ch.is_ascii_digit() || (index == 0 && matches!(ch, b'+' | b'-'))
}

/// Evaluate if the byte at `index` of a run may belong to a float literal.
pub fn is_float_char(index: usize, ch: u8) -> bool {
    match ch {
        b'0'..=b'9' | b'.' => true,

        // The `f` suffix, never in first position.
        b'f' => index > 0,

        // Sign, only in first position.
        b'+' | b'-' => index == 0,

        _ => false,
    }
}

/// Evaluate if the byte is a hexadecimal digit.
#[inline(always)]
pub fn is_hex_digit(ch: u8) -> bool {
    ch.is_ascii_hexdigit()
}

/// Evaluate if the byte is a UTF-8 continuation byte (`10xxxxxx`).
#[inline(always)]
pub fn is_continuation_byte(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Get the value of `ch` as a digit of `base`. Bases from 2 to 16 are supported, letters may
/// be upper or lower case.
pub fn digit_value(ch: u8, base: u32) -> Option<u32> {
    if !(2..=16).contains(&base) {
        return None;
    }

    char::from(ch).to_digit(base)
}

mod sealed {
    pub trait Sealed {}
}

/// Defines a fixed-width integer that [`match_integer`] can produce.
pub trait Integer: Copy + sealed::Sealed {
    /// The value zero.
    const ZERO: Self;

    /// The value one.
    const ONE: Self;

    /// Convert a small unsigned value (digit or base) into `Self`.
    fn from_small(value: u32) -> Option<Self>;

    /// Checked negation, `None` for unsigned types unless the value is zero.
    fn checked_neg(self) -> Option<Self>;

    /// Checked multiplication.
    fn checked_mul(self, rhs: Self) -> Option<Self>;

    /// Checked addition.
    fn checked_add(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Integer for $ty {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline(always)]
                fn from_small(value: u32) -> Option<Self> {
                    Self::try_from(value).ok()
                }

                #[inline(always)]
                fn checked_neg(self) -> Option<Self> {
                    <$ty>::checked_neg(self)
                }

                #[inline(always)]
                fn checked_mul(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_mul(self, rhs)
                }

                #[inline(always)]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_add(self, rhs)
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

/// Split an optional leading sign from a run. Returns `None` for an empty run.
fn split_sign(run: &[u8]) -> Option<(bool, &[u8])> {
    match run.split_first()? {
        (&b'-', rest) => Some((true, rest)),
        (&b'+', rest) => Some((false, rest)),
        _ => Some((false, run)),
    }
}

/// Convert a run of digits in the given base into an integer of type `T`.
///
/// Digits are processed from right to left. The multiplier for each position is kept as long as
/// it fits in `T`; once it has overflowed only zero digits are accepted, so redundant leading
/// zeros parse fine while genuinely out-of-range values fail.
pub fn match_integer<T: Integer>(run: &[u8], base: u32) -> Option<T> {
    let (negative, digits) = split_sign(run)?;
    if digits.is_empty() {
        return None;
    }

    let radix = T::from_small(base)?;

    // Negative values are accumulated downwards so that `T::MIN` is reachable. For unsigned
    // types the negation fails, hence a leading `-` is rejected.
    let mut multiplier = Some(if negative {
        T::ONE.checked_neg()?
    } else {
        T::ONE
    });

    let mut value = T::ZERO;

    for &ch in digits.iter().rev() {
        let digit = digit_value(ch, base)?;

        if digit != 0 {
            let addend = multiplier?.checked_mul(T::from_small(digit)?)?;
            value = value.checked_add(addend)?;
        }

        multiplier = multiplier.and_then(|m| m.checked_mul(radix));
    }

    Some(value)
}

/// Convert a run of decimal digits with an optional point, sign and `f` suffix into a float.
///
/// Precision is whatever repeated multiplication and division by ten give; there is no
/// overflow or underflow detection.
pub fn match_float(run: &[u8]) -> Option<f64> {
    let (negative, body) = split_sign(run)?;
    let body = body.strip_suffix(b"f").unwrap_or(body);

    let (whole, fraction) = match body.iter().position(|&ch| ch == b'.') {
        Some(point) => (&body[..point], &body[point + 1..]),
        None => (body, &body[body.len()..]),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut value = 0.0f64;

    let mut multiplier = 1.0f64;
    for &ch in whole.iter().rev() {
        value += f64::from(digit_value(ch, 10)?) * multiplier;
        multiplier *= 10.0;
    }

    let mut multiplier = 0.1f64;
    for &ch in fraction {
        value += f64::from(digit_value(ch, 10)?) * multiplier;
        multiplier /= 10.0;
    }

    Some(if negative { -value } else { value })
}
