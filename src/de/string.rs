/*!
The string lexer.

Strings decode in place: a write cursor trails the read cursor through the
literal, and every decoded form is no longer than its source form (two-byte
escapes shrink to one byte, `\uXXXX` is six bytes for at most three, and a
surrogate pair is twelve bytes for exactly four). The decoded byte range is
what the string node stores; the stale bytes between the decoded end and
the closing quote are simply never referenced again.

The lexer also owns UTF-8 validation, byte by byte as it copies. Overlong
forms, surrogates, and codepoints past U+10FFFF are rejected through the
constrained second byte of each sequence, so every span the parser stores
is valid UTF-8 and the reader can hand out `&str` without checking.
*/

use crate::{error::ErrorCode, std_ext};

use super::{alloc::Alloc, Abort, Parser};

impl<'a, A: Alloc> Parser<'a, A> {
    /**
    Lex the string literal starting at the cursor, decoding it in place.

    The cursor is on the opening `"` when this is called and ends up just
    past the closing `"`. Returns the byte range of the decoded string.
    */
    pub(super) fn lex_string(&mut self) -> Result<(usize, usize), Abort> {
        let len = self.input.len();

        self.at += 1;
        let start = self.at;
        let mut write = start;

        loop {
            if self.at == len {
                return Err(self.abort_at(ErrorCode::UnexpectedEnd, len));
            }

            let b = self.input[self.at];

            match b {
                b'"' => {
                    self.at += 1;

                    return Ok((start, write));
                }
                b'\\' => {
                    self.at += 1;
                    self.escape(&mut write)?;
                }
                0x00..=0x1F => {
                    let mut abort = self.abort(ErrorCode::IllegalCodepoint);
                    abort.argument = b as i32;

                    return Err(abort);
                }
                0x20..=0x7F => {
                    self.input[write] = b;
                    write += 1;
                    self.at += 1;
                }
                _ => self.multibyte(&mut write)?,
            }
        }
    }

    /**
    Decode the escape after a `\`. The cursor is on the escape character.
    */
    fn escape(&mut self, write: &mut usize) -> Result<(), Abort> {
        if self.at == self.input.len() {
            return Err(self.abort_at(ErrorCode::UnexpectedEnd, self.input.len()));
        }

        let decoded = match self.input[self.at] {
            b @ (b'"' | b'\\' | b'/') => b,
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                self.at += 1;

                return self.unicode_escape(write);
            }
            _ => return Err(self.abort(ErrorCode::UnknownEscape)),
        };

        self.at += 1;
        self.write_decoded(write, decoded);

        Ok(())
    }

    /**
    Decode a `\uXXXX` escape, combining surrogate pairs. The cursor is on
    the first hex digit.
    */
    fn unicode_escape(&mut self, write: &mut usize) -> Result<(), Abort> {
        let len = self.input.len();
        let lead_at = self.at;

        let lead = self.hex4(ErrorCode::UnexpectedEnd)?;

        if (0xD800..=0xDBFF).contains(&lead) {
            // a lead surrogate must be followed immediately by the escaped
            // trail half
            if self.at == len {
                return Err(self.abort_at(ErrorCode::UnexpectedEndOfUtf16, len));
            }
            if self.input[self.at] != b'\\' {
                return Err(self.abort(ErrorCode::ExpectedU));
            }
            self.at += 1;

            if self.at == len {
                return Err(self.abort_at(ErrorCode::UnexpectedEndOfUtf16, len));
            }
            if self.input[self.at] != b'u' {
                return Err(self.abort(ErrorCode::ExpectedU));
            }
            self.at += 1;

            let trail_at = self.at;
            let trail = self.hex4(ErrorCode::UnexpectedEndOfUtf16)?;

            if !(0xDC00..=0xDFFF).contains(&trail) {
                return Err(self.abort_at(ErrorCode::InvalidUtf16TrailSurrogate, trail_at));
            }

            let decoded = std_ext::char::from_utf16_surrogate_pair(lead, trail);
            self.write_char(write, decoded);

            return Ok(());
        }

        if (0xDC00..=0xDFFF).contains(&lead) {
            // a trail half on its own doesn't encode anything
            return Err(self.abort_at(ErrorCode::InvalidUtf16TrailSurrogate, lead_at));
        }

        let decoded = char::from_u32(lead as u32).expect("non-surrogate BMP codepoint");
        self.write_char(write, decoded);

        Ok(())
    }

    fn hex4(&mut self, end_of_input: ErrorCode) -> Result<u16, Abort> {
        let mut value = 0u16;

        for _ in 0..4 {
            if self.at == self.input.len() {
                return Err(self.abort_at(end_of_input, self.input.len()));
            }

            let digit = match self.input[self.at] {
                b @ b'0'..=b'9' => b - b'0',
                b @ b'a'..=b'f' => b - b'a' + 10,
                b @ b'A'..=b'F' => b - b'A' + 10,
                _ => return Err(self.abort(ErrorCode::InvalidUnicodeEscape)),
            };

            value = (value << 4) | digit as u16;
            self.at += 1;
        }

        Ok(value)
    }

    /**
    Validate and copy one multi-byte UTF-8 sequence. The cursor is on the
    lead byte.
    */
    fn multibyte(&mut self, write: &mut usize) -> Result<(), Abort> {
        let len = self.input.len();
        let lead = self.input[self.at];

        // the second byte of a sequence carries the overlong, surrogate,
        // and upper-bound constraints
        let (width, second_min, second_max) = match lead {
            0xC2..=0xDF => (2, 0x80, 0xBF),
            0xE0 => (3, 0xA0, 0xBF),
            0xE1..=0xEC | 0xEE..=0xEF => (3, 0x80, 0xBF),
            0xED => (3, 0x80, 0x9F),
            0xF0 => (4, 0x90, 0xBF),
            0xF1..=0xF3 => (4, 0x80, 0xBF),
            0xF4 => (4, 0x80, 0x8F),
            _ => return Err(self.abort(ErrorCode::InvalidUtf8)),
        };

        for i in 1..width {
            if self.at + i == len {
                return Err(self.abort_at(ErrorCode::UnexpectedEnd, len));
            }

            let b = self.input[self.at + i];

            let valid = if i == 1 {
                b >= second_min && b <= second_max
            } else {
                (0x80..=0xBF).contains(&b)
            };

            if !valid {
                return Err(self.abort_at(ErrorCode::InvalidUtf8, self.at + i));
            }
        }

        for i in 0..width {
            let b = self.input[self.at + i];
            self.input[*write] = b;
            *write += 1;
        }

        self.at += width;

        Ok(())
    }

    #[inline]
    fn write_decoded(&mut self, write: &mut usize, byte: u8) {
        // a decoded newline is a line break like any other once it's in
        // the buffer
        if byte == b'\n' {
            self.line += 1;
            self.line_start = *write + 1;
        }

        self.input[*write] = byte;
        *write += 1;
    }

    fn write_char(&mut self, write: &mut usize, decoded: char) {
        let width = decoded.len_utf8();

        decoded.encode_utf8(&mut self.input[*write..*write + width]);

        if decoded == '\n' {
            self.line += 1;
            self.line_start = *write + 1;
        }

        *write += width;
    }
}
