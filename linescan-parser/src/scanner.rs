//! A scanner for extracting flat tokens from loosely-structured text.

use alloc::borrow::Cow;
use alloc::string::String;

use crate::matchers::{
    is_delimiter, is_float_char, is_hex_digit, is_identifier_char, is_int_char, is_string_char,
    match_float, match_integer,
};
use crate::utf8::next_codepoint;

/// Defines a `Scanner` that recognizes tokens from a borrowed text buffer.
///
/// Each recognizer skips leading whitespace (except the line-oriented ones and
/// [`Scanner::codepoint`]) and either consumes a whole token or leaves the scanner exactly where it
/// was, line counter included. Recognizers can therefore be chained as alternatives without any
/// manual bookkeeping.
///
/// Lines are counted from 1.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scanner<'a> {
    text: &'a str,
    cursor: usize,
    line: u32,
}

/// Generates a narrow integer recognizer on top of a 64-bit one.
macro_rules! narrow_integer {
    ($(#[$meta:meta])* $name:ident, $wide:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $name(&mut self) -> Option<$ty> {
            self.attempt(|s| s.$wide().and_then(|value| <$ty>::try_from(value).ok()))
        }
    };
}

impl<'a> Scanner<'a> {
    /// Create a new scanner at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Scanner {
            text,
            cursor: 0,
            line: 1,
        }
    }

    /// Current byte offset into the text.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Current line, starting at 1.
    #[inline(always)]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The text that has not been consumed yet.
    #[inline(always)]
    pub fn remaining(&self) -> &'a str {
        self.slice(self.cursor, self.text.len())
    }

    /// Evaluate if the whole text has been consumed.
    #[inline(always)]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.text.len()
    }

    /// Run a recognizer as a transaction: if it returns `None`, the cursor and the line counter
    /// are restored to their values before the call.
    pub fn attempt<T>(&mut self, recognize: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let (cursor, line) = (self.cursor, self.line);

        let result = recognize(self);
        if result.is_none() {
            self.cursor = cursor;
            self.line = line;
        }

        result
    }

    /// Skip whitespace (every byte up to and including space) and count new lines. Returns true
    /// if there is input left afterwards.
    pub fn whitespace(&mut self) -> bool {
        while self.peek().is_some_and(|ch| ch <= b' ') {
            self.bump();
        }

        !self.is_exhausted()
    }

    /// Evaluate if [`Scanner::keyword`] would match, without moving.
    pub fn test_keyword(&self, keyword: &str) -> bool {
        self.clone().keyword(keyword)
    }

    /// Match the exact literal `keyword` after whitespace.
    pub fn keyword(&mut self, keyword: &str) -> bool {
        self.attempt(|s| {
            if !s.whitespace() || !s.remaining().starts_with(keyword) {
                return None;
            }

            s.advance(keyword.len());
            Some(())
        })
        .is_some()
    }

    /// Match an identifier: a letter, `_` or `:` followed by letters, digits, `_` or `:`.
    /// Letters and digits outside ASCII are accepted as well.
    pub fn identifier(&mut self) -> Option<&'a str> {
        self.attempt(|s| {
            if !s.whitespace() {
                return None;
            }

            let rest = s.remaining();

            let first = rest.chars().next()?;
            if !(first == '_' || first == ':' || first.is_alphabetic()) {
                return None;
            }

            let len = rest
                .char_indices()
                .find(|&(_, ch)| !is_identifier_continue(ch))
                .map_or(rest.len(), |(i, _)| i);

            s.cursor += len;
            Some(&rest[..len])
        })
    }

    /// Match a quoted string (`"..."` or `'...'`, no escapes) or a bare run of string
    /// characters stopping at whitespace, quotes or any of the ASCII `delims`.
    ///
    /// Quoted content may span lines. A missing closing quote is a failure. A bare run may be
    /// empty.
    pub fn string(&mut self, delims: &str) -> Option<&'a str> {
        self.attempt(|s| {
            if !s.whitespace() {
                return None;
            }

            let Some(quote) = s.peek().filter(|&ch| is_quote(ch)) else {
                return Some(s.bare(delims.as_bytes()));
            };

            s.bump();
            let start = s.cursor;

            while s.bump()? != quote {}

            Some(s.slice(start, s.cursor - 1))
        })
    }

    /// Same as [`Scanner::string`], but quoted content is unescaped: `\n`, `\r`, `\b`, `\t`,
    /// `\"` and `\'` are translated, any other escaped character is kept without its backslash.
    /// Bare runs are returned as-is.
    pub fn escaped_string(&mut self, delims: &str) -> Option<Cow<'a, str>> {
        self.attempt(|s| {
            if !s.whitespace() {
                return None;
            }

            let Some(quote) = s.peek().filter(|&ch| is_quote(ch)) else {
                return Some(Cow::Borrowed(s.bare(delims.as_bytes())));
            };

            s.bump();
            let quote = char::from(quote);

            let mut out = String::new();
            loop {
                let ch = match s.next_char()? {
                    ch if ch == quote => break,
                    '\\' => match s.next_char()? {
                        'n' => '\n',
                        'r' => '\r',
                        'b' => '\u{8}',
                        't' => '\t',
                        other => other,
                    },
                    ch => ch,
                };

                out.push(ch);
            }

            Some(Cow::Owned(out))
        })
    }

    /// Match the rest of the current line, stopping at a new line or at one of the ASCII
    /// `delims`. The terminator is consumed but not returned.
    ///
    /// An empty line gives an empty string. Reaching the end of the text without any content
    /// is a failure.
    pub fn line_until(&mut self, delims: &str, skip_leading: bool) -> Option<&'a str> {
        self.attempt(|s| {
            if skip_leading {
                while s.peek().is_some_and(|ch| ch <= b' ' && ch != b'\n') {
                    s.bump();
                }
            }

            let start = s.cursor;

            while let Some(ch) = s.peek() {
                if ch == b'\n' || is_delimiter(ch, delims.as_bytes()) {
                    let content = s.slice(start, s.cursor);
                    s.bump();
                    return Some(content);
                }

                s.bump();
            }

            (s.cursor > start).then(|| s.slice(start, s.cursor))
        })
    }

    /// Skip past the next new line (or to the end of the text). Returns the non-whitespace
    /// span found on the way, which is empty for a blank line.
    pub fn rest_of_line(&mut self) -> &'a str {
        let mut span: Option<(usize, usize)> = None;

        while let Some(ch) = self.bump() {
            if ch == b'\n' {
                break;
            }

            if ch > b' ' {
                let end = self.cursor;
                span = Some(span.map_or((end - 1, end), |(start, _)| (start, end)));
            }
        }

        span.map_or("", |(start, end)| self.slice(start, end))
    }

    /// Decode one code point at the cursor, without skipping whitespace.
    ///
    /// Fails at the end of the text, and on a NUL character which cannot be told apart from it.
    pub fn codepoint(&mut self) -> Option<u32> {
        let mut cursor = self.cursor;

        let ch = next_codepoint(self.text.as_bytes(), &mut cursor);
        if ch == 0 {
            return None;
        }

        self.cursor = cursor;
        if ch == u32::from(b'\n') {
            self.line += 1;
        }

        Some(ch)
    }

    /// Match a run of hexadecimal digits, at most `max_digits` long when given.
    pub fn hex(&mut self, max_digits: Option<usize>) -> Option<u64> {
        self.hex_digits(max_digits).map(|(value, _)| value)
    }

    /// Same as [`Scanner::hex`], also returning how many digits were consumed, so that `05` and
    /// `5` can be told apart in fixed-width fields.
    pub fn hex_digits(&mut self, max_digits: Option<usize>) -> Option<(u64, usize)> {
        self.attempt(|s| {
            if !s.whitespace() {
                return None;
            }

            let limit = max_digits.unwrap_or(usize::MAX);
            let run = s.take_while(|index, ch| index < limit && is_hex_digit(ch));

            Some((match_integer(run, 16)?, run.len()))
        })
    }

    /// Match a signed decimal integer.
    pub fn int64(&mut self) -> Option<i64> {
        self.attempt(|s| {
            if !s.whitespace() {
                return None;
            }

            match_integer(s.take_while(is_int_char), 10)
        })
    }

    /// Match an unsigned decimal integer. A leading `+` is accepted, a leading `-` is not.
    pub fn uint64(&mut self) -> Option<u64> {
        self.attempt(|s| {
            if !s.whitespace() {
                return None;
            }

            match_integer(s.take_while(is_int_char), 10)
        })
    }

    narrow_integer!(
        /// Match a signed decimal integer that fits in 8 bits.
        int8, int64, i8
    );

    narrow_integer!(
        /// Match a signed decimal integer that fits in 16 bits.
        int16, int64, i16
    );

    narrow_integer!(
        /// Match a signed decimal integer that fits in 32 bits.
        int32, int64, i32
    );

    narrow_integer!(
        /// Match an unsigned decimal integer that fits in 8 bits.
        uint8, uint64, u8
    );

    narrow_integer!(
        /// Match an unsigned decimal integer that fits in 16 bits.
        uint16, uint64, u16
    );

    narrow_integer!(
        /// Match an unsigned decimal integer that fits in 32 bits.
        uint32, uint64, u32
    );

    /// Match a decimal float such as `-1.5`, `2.` or `0.25f`. No exponent notation.
    pub fn float64(&mut self) -> Option<f64> {
        self.attempt(|s| {
            if !s.whitespace() {
                return None;
            }

            match_float(s.take_while(is_float_char))
        })
    }

    /// Same as [`Scanner::float64`], narrowed to single precision.
    pub fn float32(&mut self) -> Option<f32> {
        self.float64().map(|value| value as f32)
    }

    /// Match `true` or `false`, or else an integer where anything but zero is true.
    pub fn boolean(&mut self) -> Option<bool> {
        if self.keyword("true") {
            return Some(true);
        }

        if self.keyword("false") {
            return Some(false);
        }

        self.int64().map(|value| value != 0)
    }

    #[inline(always)]
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.cursor).copied()
    }

    /// Consume one byte, counting new lines.
    fn bump(&mut self) -> Option<u8> {
        let ch = self.peek()?;

        self.cursor += 1;
        if ch == b'\n' {
            self.line += 1;
        }

        Some(ch)
    }

    fn advance(&mut self, count: usize) {
        for _ in 0..count {
            self.bump();
        }
    }

    /// Consume one whole character, counting new lines.
    fn next_char(&mut self) -> Option<char> {
        let ch = self.remaining().chars().next()?;

        self.cursor += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
        }

        Some(ch)
    }

    /// Consume a bare string run.
    fn bare(&mut self, delims: &[u8]) -> &'a str {
        let start = self.cursor;

        while self.peek().is_some_and(|ch| is_string_char(ch, delims)) {
            self.cursor += 1;
        }

        self.slice(start, self.cursor)
    }

    /// Consume bytes while `accept(index_in_run, byte)` holds. Never crosses a new line since
    /// every caller only accepts printable ASCII.
    fn take_while(&mut self, mut accept: impl FnMut(usize, u8) -> bool) -> &'a [u8] {
        let bytes = self.text.as_bytes();
        let start = self.cursor;

        while let Some(&ch) = bytes.get(self.cursor) {
            if !accept(self.cursor - start, ch) {
                break;
            }

            self.cursor += 1;
        }

        &bytes[start..self.cursor]
    }

    /// Every cursor move stops on an ASCII byte, at the end of a whole character or at the end
    /// of the text, so both bounds are always character boundaries.
    #[inline(always)]
    fn slice(&self, start: usize, end: usize) -> &'a str {
        debug_assert!(start <= end && end <= self.text.len());
        debug_assert!(self.text.is_char_boundary(start) && self.text.is_char_boundary(end));

        &self.text[start..end]
    }
}

#[inline(always)]
fn is_quote(ch: u8) -> bool {
    ch == b'"' || ch == b'\''
}

fn is_identifier_continue(ch: char) -> bool {
    match u8::try_from(ch) {
        Ok(b) if b.is_ascii() => is_identifier_char(b),
        _ => ch.is_alphanumeric(),
    }
}
