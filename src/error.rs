/*!
Parse diagnostics.

A failed parse is described by a single [`ParseError`]: the code, the
1-based line and column of the offending byte, and an integer argument that
only [`ErrorCode::IllegalCodepoint`] uses to carry the codepoint it rejected.
*/

use std::fmt;

use thiserror::Error;

/**
The reason a parse failed.

The `Display` text of each code is fixed; positional context lives on
[`ParseError`].
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorCode {
    #[error("no error")]
    Success,
    #[error("out of memory")]
    OutOfMemory,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("missing root element")]
    MissingRootElement,
    #[error("document root must be object or array")]
    BadRoot,
    #[error("expected ,")]
    ExpectedComma,
    #[error("missing object key")]
    MissingObjectKey,
    #[error("expected :")]
    ExpectedColon,
    #[error("expected end of input")]
    ExpectedEndOfInput,
    #[error("unexpected comma")]
    UnexpectedComma,
    #[error("expected value")]
    ExpectedValue,
    #[error("expected 'null'")]
    ExpectedNull,
    #[error("expected 'false'")]
    ExpectedFalse,
    #[error("expected 'true'")]
    ExpectedTrue,
    #[error("missing exponent")]
    MissingExponent,
    #[error("illegal unprintable codepoint in string")]
    IllegalCodepoint,
    #[error("invalid character in unicode escape")]
    InvalidUnicodeEscape,
    #[error("unexpected end of input during UTF-16 surrogate pair")]
    UnexpectedEndOfUtf16,
    #[error("expected \\u")]
    ExpectedU,
    #[error("invalid UTF-16 trail surrogate")]
    InvalidUtf16TrailSurrogate,
    #[error("unknown escape")]
    UnknownEscape,
    #[error("invalid UTF-8")]
    InvalidUtf8,
}

impl ErrorCode {
    /**
    The fixed message for this code.
    */
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Success => "no error",
            ErrorCode::OutOfMemory => "out of memory",
            ErrorCode::UnexpectedEnd => "unexpected end of input",
            ErrorCode::MissingRootElement => "missing root element",
            ErrorCode::BadRoot => "document root must be object or array",
            ErrorCode::ExpectedComma => "expected ,",
            ErrorCode::MissingObjectKey => "missing object key",
            ErrorCode::ExpectedColon => "expected :",
            ErrorCode::ExpectedEndOfInput => "expected end of input",
            ErrorCode::UnexpectedComma => "unexpected comma",
            ErrorCode::ExpectedValue => "expected value",
            ErrorCode::ExpectedNull => "expected 'null'",
            ErrorCode::ExpectedFalse => "expected 'false'",
            ErrorCode::ExpectedTrue => "expected 'true'",
            ErrorCode::MissingExponent => "missing exponent",
            ErrorCode::IllegalCodepoint => "illegal unprintable codepoint in string",
            ErrorCode::InvalidUnicodeEscape => "invalid character in unicode escape",
            ErrorCode::UnexpectedEndOfUtf16 => {
                "unexpected end of input during UTF-16 surrogate pair"
            }
            ErrorCode::ExpectedU => "expected \\u",
            ErrorCode::InvalidUtf16TrailSurrogate => "invalid UTF-16 trail surrogate",
            ErrorCode::UnknownEscape => "unknown escape",
            ErrorCode::InvalidUtf8 => "invalid UTF-8",
        }
    }
}

/**
A positioned parse failure.

`line` and `column` are 1-based and refer to the input buffer as it stood
when the parse stopped; string decoding rewrites the buffer in place, so a
decoded newline counts as a line break just like a literal one.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
    pub argument: i32,
}

impl std::error::Error for ParseError {}

impl ParseError {
    /**
    The message for this error, including the argument where the code
    carries one.
    */
    pub fn message(&self) -> String {
        match self.code {
            ErrorCode::IllegalCodepoint => format!("{}: {}", self.code.as_str(), self.argument),
            _ => self.code.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at {}:{}", self.message(), self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_fixed_per_code() {
        assert_eq!("no error", ErrorCode::Success.as_str());
        assert_eq!("expected ,", ErrorCode::ExpectedComma.as_str());
        assert_eq!("expected \\u", ErrorCode::ExpectedU.as_str());
        assert_eq!("invalid UTF-8", ErrorCode::InvalidUtf8.as_str());

        // the thiserror display and the fixed table agree
        assert_eq!(
            ErrorCode::BadRoot.as_str(),
            ErrorCode::BadRoot.to_string()
        );
        assert_eq!(
            ErrorCode::UnexpectedEndOfUtf16.as_str(),
            ErrorCode::UnexpectedEndOfUtf16.to_string()
        );
    }

    #[test]
    fn illegal_codepoint_message_carries_the_argument() {
        let err = ParseError {
            code: ErrorCode::IllegalCodepoint,
            line: 1,
            column: 3,
            argument: 25,
        };

        assert_eq!("illegal unprintable codepoint in string: 25", err.message());
        assert_eq!(
            "illegal unprintable codepoint in string: 25 at 1:3",
            err.to_string()
        );
    }
}
