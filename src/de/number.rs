/*!
The number lexer.

Digits accumulate into a checked `i64` while the lexer walks the literal.
A literal with no fraction, no exponent, and a value that fits a signed
32-bit integer becomes an integer node; everything else re-parses its
validated span through `f64::from_str`, which performs the correctly
rounded decimal-to-binary conversion, and becomes a double node.

A leading `0` ends the integer part on its own. `[01]` therefore fails in
the after-value state with `ExpectedComma`, which is the historical code
for that input.
*/

use crate::error::ErrorCode;

use super::{alloc::Alloc, Abort, Parser};

pub(super) enum Number {
    Integer(i32),
    Double(f64),
}

impl<'a, A: Alloc> Parser<'a, A> {
    /**
    Lex the number starting at the cursor.

    The cursor is on `-` or a digit when this is called and ends up on the
    first byte past the literal.
    */
    pub(super) fn lex_number(&mut self) -> Result<Number, Abort> {
        let len = self.input.len();
        let start = self.at;

        let negative = self.input[self.at] == b'-';
        if negative {
            self.at += 1;

            if self.at == len {
                return Err(self.abort_at(ErrorCode::UnexpectedEnd, len));
            }
        }

        let mut magnitude = 0i64;
        let mut big = false;

        match self.input[self.at] {
            // a leading zero is the whole integer part
            b'0' => self.at += 1,
            b'1'..=b'9' => {
                while self.at < len {
                    let digit = match self.input[self.at] {
                        b @ b'0'..=b'9' => (b - b'0') as i64,
                        _ => break,
                    };

                    match magnitude
                        .checked_mul(10)
                        .and_then(|m| m.checked_add(digit))
                    {
                        Some(m) => magnitude = m,
                        None => big = true,
                    }

                    self.at += 1;
                }
            }
            _ => return Err(self.abort(ErrorCode::ExpectedValue)),
        }

        let mut double = false;

        if self.at < len && self.input[self.at] == b'.' {
            double = true;
            self.at += 1;

            if self.at == len {
                return Err(self.abort_at(ErrorCode::UnexpectedEnd, len));
            }

            while self.at < len && self.input[self.at].is_ascii_digit() {
                self.at += 1;
            }
        }

        if self.at < len && matches!(self.input[self.at], b'e' | b'E') {
            double = true;
            self.at += 1;

            if self.at == len {
                return Err(self.abort_at(ErrorCode::UnexpectedEnd, len));
            }

            if matches!(self.input[self.at], b'+' | b'-') {
                self.at += 1;

                if self.at == len {
                    return Err(self.abort_at(ErrorCode::UnexpectedEnd, len));
                }
            }

            if !self.input[self.at].is_ascii_digit() {
                return Err(self.abort(ErrorCode::MissingExponent));
            }

            while self.at < len && self.input[self.at].is_ascii_digit() {
                self.at += 1;
            }
        }

        if !double && !big {
            let value = if negative { -magnitude } else { magnitude };

            if value >= i32::MIN as i64 && value <= i32::MAX as i64 {
                return Ok(Number::Integer(value as i32));
            }
        }

        // SAFETY: the lexed span is ASCII
        let text = from_utf8_unchecked!(&self.input[start..self.at]);

        // the span matches the JSON number grammar, which is a subset of
        // what `f64::from_str` accepts
        let value = text.parse().expect("lexed number failed to convert");

        Ok(Number::Double(value))
    }
}
