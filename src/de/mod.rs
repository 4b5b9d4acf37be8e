/*!
Parsing for whole JSON documents.

The parser makes a single pass over a mutable byte buffer and packs the
document into a flat arena of machine words. It isn't recursive: open
containers are marker frames on a temp stack, and each completed value
inside a container is a packed reference cell on the same stack. When a
container closes it's *reified*: its accumulated entries move into the
arena behind a count word, child references are rewritten from absolute
arena addresses to offsets relative to the new payload, and object keys are
sorted so lookups can binary search.

String values are decoded in place. Escapes only ever shrink, so the
decoded form is written back over the opening of its own literal and the
node just remembers the decoded byte range. That's also why the parser
needs the buffer mutably: the document that comes out of a parse borrows
the same buffer for as long as it lives.

There are two entry points, one per allocation strategy:

- [`parse_single`] works out of one allocation sized at a word per input
  byte, shared by the arena and the temp stack from opposite ends.
- [`parse_dynamic`] grows the arena and stack separately and reports
  allocation failure as [`ErrorCode::OutOfMemory`].

Both produce word-for-word identical arenas for the same input.
*/

mod alloc;
mod document;
mod number;
mod string;

use std::cmp::Ordering;

use crate::error::{ErrorCode, ParseError};

use self::alloc::{Alloc, DynamicAlloc, SingleAlloc};

pub use self::document::*;

/**
The type code of a value, packed into the low 3 bits of a reference cell.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Integer = 0,
    Double = 1,
    Null = 2,
    False = 3,
    True = 4,
    String = 5,
    Array = 6,
    Object = 7,
}

impl Tag {
    #[inline]
    pub(crate) fn from_bits(bits: usize) -> Tag {
        match bits & 0b111 {
            0 => Tag::Integer,
            1 => Tag::Double,
            2 => Tag::Null,
            3 => Tag::False,
            4 => Tag::True,
            5 => Tag::String,
            6 => Tag::Array,
            _ => Tag::Object,
        }
    }
}

/**
Pack an offset and a tag into a reference cell.
*/
#[inline]
pub(crate) fn pack(offset: usize, tag: Tag) -> usize {
    (offset << 3) | tag as usize
}

/**
Split a reference cell into its offset and tag.
*/
#[inline]
pub(crate) fn unpack(cell: usize) -> (usize, Tag) {
    (cell >> 3, Tag::from_bits(cell))
}

/**
View an object payload's key table as 3-word records.

Each record is `[key_start, key_end, value_ref]`.
*/
#[inline]
pub(crate) fn object_entries(tree: &[usize], payload: usize, count: usize) -> &[[usize; 3]] {
    let words = &tree[payload + 1..payload + 1 + 3 * count];

    // SAFETY: `[usize; 3]` is layout identical to three consecutive words,
    // and the slice length is a multiple of three
    unsafe { std::slice::from_raw_parts(words.as_ptr().cast(), count) }
}

#[inline]
fn object_entries_mut(tree: &mut [usize], payload: usize, count: usize) -> &mut [[usize; 3]] {
    let words = &mut tree[payload + 1..payload + 1 + 3 * count];

    // SAFETY: as `object_entries`
    unsafe { std::slice::from_raw_parts_mut(words.as_mut_ptr().cast(), count) }
}

/**
Parse a JSON document out of one allocation sized at a word per input byte.

This is the fastest mode: the arena and the parse stack share the
allocation from opposite ends and no reallocation ever happens. The
returned document borrows `input`, which the parser has overwritten with
decoded string bytes.
*/
pub fn parse_single(input: &mut [u8]) -> Document<'_> {
    let alloc = SingleAlloc::new(input.len());
    parse(input, alloc)
}

/**
Parse a JSON document with separately growing arena and stack buffers.

Around 10% slower than [`parse_single`], but memory use follows the
document's shape instead of its size, and allocation failure comes back as
[`ErrorCode::OutOfMemory`] instead of aborting.
*/
pub fn parse_dynamic(input: &mut [u8]) -> Document<'_> {
    parse(input, DynamicAlloc::new())
}

fn parse<A: Alloc>(input: &mut [u8], alloc: A) -> Document<'_> {
    let mut parser = Parser {
        input,
        at: 0,
        line: 1,
        line_start: 0,
        alloc,
    };

    match parser.run() {
        Ok(root) => {
            let Parser { input, alloc, .. } = parser;
            Document::valid(input, alloc.into_ast(), root)
        }
        Err(abort) => {
            test_assert!(abort.at >= parser.line_start);

            let error = ParseError {
                code: abort.code,
                line: parser.line,
                column: abort.at - parser.line_start + 1,
                argument: abort.argument,
            };

            Document::invalid(parser.input, error)
        }
    }
}

/**
An abandoned parse: the code and the byte position it stopped at.

The position becomes a line and column on the way out; tracking bytes in
the meantime keeps the hot path free of bookkeeping.
*/
pub(crate) struct Abort {
    code: ErrorCode,
    at: usize,
    argument: i32,
}

impl Abort {
    #[inline]
    fn oom(at: usize) -> Self {
        Abort {
            code: ErrorCode::OutOfMemory,
            at,
            argument: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Element { first: bool },
    Key { first: bool },
    AfterValue,
}

enum Closed {
    Root(usize),
    Value,
}

pub(crate) struct Parser<'a, A> {
    input: &'a mut [u8],
    at: usize,
    line: usize,
    /**
    The byte offset of the current line's first byte.

    String decoding can write a newline into the buffer behind the cursor;
    the writer updates this the same as the whitespace skipper, so columns
    always agree with a scan of the buffer as it now stands.
    */
    line_start: usize,
    alloc: A,
}

impl<'a, A: Alloc> Parser<'a, A> {
    fn run(&mut self) -> Result<usize, Abort> {
        let root = match self.skip_whitespace() {
            Some(b'[') => Tag::Array,
            Some(b'{') => Tag::Object,
            Some(_) => return Err(self.abort(ErrorCode::BadRoot)),
            None => {
                return Err(self.abort_at(ErrorCode::MissingRootElement, self.input.len()));
            }
        };

        self.at += 1;

        let mut frame = 0;
        let mut kind = root;
        self.push_stack(pack(0, root))?;

        let mut state = match root {
            Tag::Array => State::Element { first: true },
            _ => State::Key { first: true },
        };

        loop {
            match state {
                State::Element { first } => {
                    let b = self.next_token()?;

                    if first && b == b']' {
                        self.at += 1;

                        state = match self.close(&mut frame, &mut kind)? {
                            Closed::Root(root) => return Ok(root),
                            Closed::Value => State::AfterValue,
                        };
                    } else {
                        state = self.value(b, &mut frame, &mut kind)?;
                    }
                }
                State::Key { first } => {
                    let b = self.next_token()?;

                    match b {
                        b'}' if first => {
                            self.at += 1;

                            state = match self.close(&mut frame, &mut kind)? {
                                Closed::Root(root) => return Ok(root),
                                Closed::Value => State::AfterValue,
                            };
                        }
                        b'"' => {
                            let (key_start, key_end) = self.lex_string()?;
                            self.push_stack(key_start)?;
                            self.push_stack(key_end)?;

                            if self.next_token()? != b':' {
                                return Err(self.abort(ErrorCode::ExpectedColon));
                            }
                            self.at += 1;

                            let b = self.next_token()?;
                            state = self.value(b, &mut frame, &mut kind)?;
                        }
                        _ => return Err(self.abort(ErrorCode::MissingObjectKey)),
                    }
                }
                State::AfterValue => {
                    let b = self.next_token()?;

                    match (b, kind) {
                        (b',', Tag::Array) => {
                            self.at += 1;
                            state = State::Element { first: false };
                        }
                        (b',', _) => {
                            self.at += 1;
                            state = State::Key { first: false };
                        }
                        (b']', Tag::Array) | (b'}', Tag::Object) => {
                            self.at += 1;

                            state = match self.close(&mut frame, &mut kind)? {
                                Closed::Root(root) => return Ok(root),
                                Closed::Value => State::AfterValue,
                            };
                        }
                        _ => return Err(self.abort(ErrorCode::ExpectedComma)),
                    }
                }
            }
        }
    }

    /**
    Parse a single value starting at the non-whitespace byte `b`.

    Scalars land in the arena immediately and leave a reference cell on the
    stack; containers push a marker frame and hand control back to the
    element or key state.
    */
    fn value(&mut self, b: u8, frame: &mut usize, kind: &mut Tag) -> Result<State, Abort> {
        match b {
            b'[' => {
                self.at += 1;
                self.open(Tag::Array, frame, kind)?;

                Ok(State::Element { first: true })
            }
            b'{' => {
                self.at += 1;
                self.open(Tag::Object, frame, kind)?;

                Ok(State::Key { first: true })
            }
            b'"' => {
                let (start, end) = self.lex_string()?;

                let payload = self.alloc.ast_len();
                self.push_ast(start)?;
                self.push_ast(end)?;
                self.push_stack(pack(payload, Tag::String))?;

                Ok(State::AfterValue)
            }
            b'-' | b'0'..=b'9' => {
                let payload = match self.lex_number()? {
                    number::Number::Integer(value) => {
                        let payload = self.alloc.ast_len();
                        self.push_ast(value as u32 as usize)?;

                        pack(payload, Tag::Integer)
                    }
                    number::Number::Double(value) => {
                        let bits = value.to_bits();

                        let payload = self.alloc.ast_len();
                        self.push_ast((bits & 0xFFFF_FFFF) as usize)?;
                        self.push_ast((bits >> 32) as usize)?;

                        pack(payload, Tag::Double)
                    }
                };

                self.push_stack(payload)?;

                Ok(State::AfterValue)
            }
            b't' => {
                self.literal(b"true", ErrorCode::ExpectedTrue)?;
                self.push_stack(pack(0, Tag::True))?;

                Ok(State::AfterValue)
            }
            b'f' => {
                self.literal(b"false", ErrorCode::ExpectedFalse)?;
                self.push_stack(pack(0, Tag::False))?;

                Ok(State::AfterValue)
            }
            b'n' => {
                self.literal(b"null", ErrorCode::ExpectedNull)?;
                self.push_stack(pack(0, Tag::Null))?;

                Ok(State::AfterValue)
            }
            b',' => Err(self.abort(ErrorCode::UnexpectedComma)),
            _ => Err(self.abort(ErrorCode::ExpectedValue)),
        }
    }

    fn open(&mut self, tag: Tag, frame: &mut usize, kind: &mut Tag) -> Result<(), Abort> {
        self.push_stack(pack(*frame, tag))?;

        *frame = self.alloc.stack_len() - 1;
        *kind = tag;

        Ok(())
    }

    /**
    Reify the container whose marker is at `frame`.

    The accumulated entries move off the stack into the arena behind a
    count word, with child references rewritten to be relative to the new
    payload address. Object keys are sorted here, once the triples are in
    their final position.
    */
    fn close(&mut self, frame: &mut usize, kind: &mut Tag) -> Result<Closed, Abort> {
        let marker = self.alloc.stack_word(*frame);
        let top = self.alloc.stack_len();
        let payload = self.alloc.ast_len();
        let tag = *kind;

        let count = match tag {
            Tag::Array => {
                for slot in *frame + 1..top {
                    let cell = self.alloc.stack_word(slot);
                    self.alloc.set_stack_word(slot, relative(cell, payload));
                }

                top - *frame - 1
            }
            _ => {
                // every third stack word of an object frame is the value
                // reference of its `(key_start, key_end, value)` triple
                let mut slot = *frame + 3;
                while slot < top {
                    let cell = self.alloc.stack_word(slot);
                    self.alloc.set_stack_word(slot, relative(cell, payload));
                    slot += 3;
                }

                (top - *frame - 1) / 3
            }
        };

        let at = self.at;
        let payload = self
            .alloc
            .reify(*frame, count)
            .map_err(|_| Abort::oom(at))?;

        if tag == Tag::Object {
            let input = &*self.input;
            let entries = object_entries_mut(self.alloc.ast_mut(), payload, count);

            entries.sort_unstable_by(|a, b| key_order(input, *a, *b));
        }

        if self.alloc.stack_len() == 0 {
            // the root container just closed; nothing but whitespace may
            // follow it
            if self.skip_whitespace().is_some() {
                return Err(self.abort(ErrorCode::ExpectedEndOfInput));
            }

            return Ok(Closed::Root(pack(payload, tag)));
        }

        let parent = marker >> 3;
        *kind = Tag::from_bits(self.alloc.stack_word(parent));
        *frame = parent;

        self.push_stack(pack(payload, tag))?;

        Ok(Closed::Value)
    }

    fn literal(&mut self, expected: &'static [u8], mismatch: ErrorCode) -> Result<(), Abort> {
        if self.input.len() - self.at < expected.len() {
            return Err(self.abort(ErrorCode::UnexpectedEnd));
        }

        if &self.input[self.at..self.at + expected.len()] != expected {
            return Err(self.abort(mismatch));
        }

        self.at += expected.len();

        Ok(())
    }

    /**
    Skip to the next non-whitespace byte without consuming it.
    */
    fn skip_whitespace(&mut self) -> Option<u8> {
        while self.at < self.input.len() {
            match self.input[self.at] {
                b'\n' => {
                    self.at += 1;
                    self.line += 1;
                    self.line_start = self.at;
                }
                b' ' | b'\t' | b'\r' => self.at += 1,
                b => return Some(b),
            }
        }

        None
    }

    fn next_token(&mut self) -> Result<u8, Abort> {
        let at_end = self.input.len();

        self.skip_whitespace()
            .ok_or_else(|| self.abort_at(ErrorCode::UnexpectedEnd, at_end))
    }

    #[inline]
    fn push_ast(&mut self, word: usize) -> Result<(), Abort> {
        let at = self.at;
        self.alloc.push_ast(word).map_err(|_| Abort::oom(at))
    }

    #[inline]
    fn push_stack(&mut self, word: usize) -> Result<(), Abort> {
        let at = self.at;
        self.alloc.push_stack(word).map_err(|_| Abort::oom(at))
    }

    #[inline]
    fn abort(&self, code: ErrorCode) -> Abort {
        self.abort_at(code, self.at)
    }

    #[inline]
    fn abort_at(&self, code: ErrorCode, at: usize) -> Abort {
        Abort {
            code,
            at,
            argument: 0,
        }
    }
}

/**
Rewrite a stack cell holding an absolute payload address into a reference
cell relative to `payload`.

Children always reify before their container, so the relative form is the
(non-negative) distance back down the arena.
*/
#[inline]
fn relative(cell: usize, payload: usize) -> usize {
    match Tag::from_bits(cell) {
        // no payload to point at
        Tag::Null | Tag::False | Tag::True => cell,
        tag => {
            let (address, _) = unpack(cell);
            test_assert!(address < payload);

            pack(payload - address, tag)
        }
    }
}

fn key_order(input: &[u8], a: [usize; 3], b: [usize; 3]) -> Ordering {
    let a = &input[a[0]..a[1]];
    let b = &input[b[0]..b[1]];

    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
