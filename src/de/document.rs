use std::{collections::HashMap, fmt};

use crate::error::{ErrorCode, ParseError};

use super::{object_entries, unpack, Tag};

/**
A parsed JSON document that's borrowed from an input buffer.

The document owns the arena its tree is packed into and borrows the buffer
the parse decoded strings into. Reading is lazy: nothing is decoded until a
[`Value`] accessor asks for it, and strings come back as slices of the
buffer.

A valid document's root is always an array or an object. An invalid
document carries a single [`ParseError`] and nothing else; no partial tree
is ever exposed.
*/
pub struct Document<'input> {
    input: &'input [u8],
    tree: Vec<usize>,
    root: usize,
    error: Option<ParseError>,
}

impl<'input> Document<'input> {
    #[inline]
    pub(super) fn valid(input: &'input [u8], tree: Vec<usize>, root: usize) -> Self {
        Document {
            input,
            tree,
            root,
            error: None,
        }
    }

    #[inline]
    pub(super) fn invalid(input: &'input [u8], error: ParseError) -> Self {
        Document {
            input,
            tree: Vec::new(),
            root: 0,
            error: Some(error),
        }
    }

    /**
    Whether the parse produced a document.

    When this is `false` the error accessors describe what went wrong and
    [`Document::root`] must not be called.
    */
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /**
    The parse failure, if there was one.
    */
    #[inline]
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    #[inline]
    pub fn error_code(&self) -> ErrorCode {
        self.error.map(|e| e.code).unwrap_or(ErrorCode::Success)
    }

    /**
    The 1-based line of the parse failure, or `0` for a valid document.
    */
    #[inline]
    pub fn error_line(&self) -> usize {
        self.error.map(|e| e.line).unwrap_or(0)
    }

    /**
    The 1-based column of the parse failure, or `0` for a valid document.
    */
    #[inline]
    pub fn error_column(&self) -> usize {
        self.error.map(|e| e.column).unwrap_or(0)
    }

    /**
    The integer argument of the parse failure; the codepoint for
    [`ErrorCode::IllegalCodepoint`], `0` otherwise.
    */
    #[inline]
    pub fn error_argument(&self) -> i32 {
        self.error.map(|e| e.argument).unwrap_or(0)
    }

    /**
    The fixed message for the failure's code.
    */
    #[inline]
    pub fn error_text(&self) -> &'static str {
        self.error_code().as_str()
    }

    /**
    The failure's message with its argument folded in, like
    `illegal unprintable codepoint in string: 25`.
    */
    pub fn error_message(&self) -> String {
        self.error
            .map(|e| e.message())
            .unwrap_or_else(|| ErrorCode::Success.as_str().to_owned())
    }

    /**
    The root value of the document.

    # Panics

    Panics if the document is invalid. Check [`Document::is_valid`] first.
    */
    #[inline]
    pub fn root(&self) -> Value<'input, '_> {
        assert!(self.is_valid(), "root() called on an invalid document");

        let (address, tag) = unpack(self.root);

        Value {
            input: self.input,
            tree: &self.tree,
            tag,
            address,
        }
    }
}

#[cfg(test)]
impl<'input> Document<'input> {
    pub(crate) fn tree_words(&self) -> &[usize] {
        &self.tree
    }

    pub(crate) fn root_cell(&self) -> usize {
        self.root
    }
}

impl<'input> fmt::Debug for Document<'input> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut debug = f.debug_struct("Document");

        debug.field("input", &String::from_utf8_lossy(self.input));

        match self.error {
            Some(ref error) => debug.field("error", error).finish(),
            None => debug.field("root", &self.root()).finish(),
        }
    }
}

/**
The kind of a value, with its decoded contents.
*/
#[derive(Debug, Clone, Copy)]
pub enum Kind<'input, 'tree> {
    Integer(i32),
    Double(f64),
    Bool(bool),
    Null,
    Str(&'input str),
    Arr(Arr<'input, 'tree>),
    Obj(Obj<'input, 'tree>),
}

/**
A single value within a document.

A `Value` is a tagged address into the document's arena. Decoding happens
on access: [`Value::kind`] produces the discriminated form, and the `as_*`
accessors skip the discrimination when the caller already knows the tag.
The `as_*` accessors treat a tag mismatch as a caller bug and panic;
malformed *input* never gets this far.
*/
#[derive(Clone, Copy)]
pub struct Value<'input, 'tree> {
    input: &'input [u8],
    tree: &'tree [usize],
    tag: Tag,
    address: usize,
}

impl<'input, 'tree> Value<'input, 'tree> {
    /**
    The type code of this value.
    */
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /**
    Decode this value one level.
    */
    #[inline]
    pub fn kind(&self) -> Kind<'input, 'tree> {
        match self.tag {
            Tag::Integer => Kind::Integer(self.read_integer()),
            Tag::Double => Kind::Double(self.read_double()),
            Tag::Null => Kind::Null,
            Tag::False => Kind::Bool(false),
            Tag::True => Kind::Bool(true),
            Tag::String => Kind::Str(self.read_str()),
            Tag::Array => Kind::Arr(self.as_array()),
            Tag::Object => Kind::Obj(self.as_object()),
        }
    }

    /**
    The value as a 32-bit integer. Panics unless integer-tagged.
    */
    #[inline]
    pub fn as_integer(&self) -> i32 {
        assert!(self.tag == Tag::Integer, "expected an integer value");

        self.read_integer()
    }

    /**
    The value as a double. Panics unless double-tagged.
    */
    #[inline]
    pub fn as_double(&self) -> f64 {
        assert!(self.tag == Tag::Double, "expected a double value");

        self.read_double()
    }

    /**
    Either numeric encoding, widened to a double. Panics unless numeric.
    */
    #[inline]
    pub fn as_number(&self) -> f64 {
        match self.tag {
            Tag::Integer => self.read_integer() as f64,
            Tag::Double => self.read_double(),
            _ => panic!("expected a numeric value"),
        }
    }

    /**
    The decoded string, borrowed from the input buffer. Panics unless
    string-tagged.

    Callers that outlive the document copy out with `to_owned`.
    */
    #[inline]
    pub fn as_str(&self) -> &'input str {
        assert!(self.tag == Tag::String, "expected a string value");

        self.read_str()
    }

    /**
    The value as an array handle. Panics unless array-tagged.
    */
    #[inline]
    pub fn as_array(&self) -> Arr<'input, 'tree> {
        assert!(self.tag == Tag::Array, "expected an array value");

        Arr {
            input: self.input,
            tree: self.tree,
            address: self.address,
        }
    }

    /**
    The value as an object handle. Panics unless object-tagged.
    */
    #[inline]
    pub fn as_object(&self) -> Obj<'input, 'tree> {
        assert!(self.tag == Tag::Object, "expected an object value");

        Obj {
            input: self.input,
            tree: self.tree,
            address: self.address,
        }
    }

    /**
    The value as an exact 64-bit integer, if it is one.

    Integer-tagged values always convert. Double-tagged values convert
    when they're finite, integral, and within `±2^53` inclusive, the range
    where a double still distinguishes neighboring integers. Anything else
    (including non-numeric tags) is `None`.
    */
    pub fn int53(&self) -> Option<i64> {
        const LIMIT: f64 = (1i64 << 53) as f64;

        match self.tag {
            Tag::Integer => Some(self.read_integer() as i64),
            Tag::Double => {
                let value = self.read_double();

                // NaN fails both comparisons
                if !(value >= -LIMIT && value <= LIMIT) {
                    return None;
                }

                let truncated = value as i64;

                (truncated as f64 == value).then_some(truncated)
            }
            _ => None,
        }
    }

    #[inline]
    fn read_integer(&self) -> i32 {
        *get_unchecked!(self.tree, self.address) as u32 as i32
    }

    #[inline]
    fn read_double(&self) -> f64 {
        let low = *get_unchecked!(self.tree, self.address) as u64;
        let high = *get_unchecked!(self.tree, self.address + 1) as u64;

        f64::from_bits((low & 0xFFFF_FFFF) | (high << 32))
    }

    #[inline]
    fn read_str(&self) -> &'input str {
        let start = *get_unchecked!(self.tree, self.address);
        let end = *get_unchecked!(self.tree, self.address + 1);

        // SAFETY: the parser validated the decoded span
        from_utf8_unchecked!(&self.input[start..end])
    }

    #[inline]
    fn child(&self, cell: usize) -> Value<'input, 'tree> {
        let (offset, tag) = unpack(cell);

        Value {
            input: self.input,
            tree: self.tree,
            tag,
            // children sit below their container in the arena
            address: self.address - offset,
        }
    }
}

impl<'input, 'tree> fmt::Debug for Value<'input, 'tree> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            Kind::Integer(value) => value.fmt(f),
            Kind::Double(value) => value.fmt(f),
            Kind::Bool(value) => value.fmt(f),
            Kind::Null => f.write_str("null"),
            Kind::Str(value) => value.fmt(f),
            Kind::Arr(value) => value.fmt(f),
            Kind::Obj(value) => value.fmt(f),
        }
    }
}

/**
An array within a document.
*/
#[derive(Clone, Copy)]
pub struct Arr<'input, 'tree> {
    input: &'input [u8],
    tree: &'tree [usize],
    address: usize,
}

impl<'input, 'tree> Arr<'input, 'tree> {
    /**
    The number of elements.
    */
    #[inline]
    pub fn len(&self) -> usize {
        *get_unchecked!(self.tree, self.address)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /**
    The element at `index`.

    # Panics

    Panics if `index` is out of range.
    */
    #[inline]
    pub fn get(&self, index: usize) -> Value<'input, 'tree> {
        assert!(index < self.len(), "array index out of bounds");

        let cell = *get_unchecked!(self.tree, self.address + 1 + index);

        self.value().child(cell)
    }

    /**
    Iterate through the elements.
    */
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Value<'input, 'tree>> {
        let arr = *self;

        (0..arr.len()).map(move |index| arr.get(index))
    }

    #[inline]
    fn value(&self) -> Value<'input, 'tree> {
        Value {
            input: self.input,
            tree: self.tree,
            tag: Tag::Array,
            address: self.address,
        }
    }
}

impl<'input, 'tree> fmt::Debug for Arr<'input, 'tree> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/**
An object within a document.

Entries are stored sorted by key, ascending by length and then by byte
content, which is what makes [`Obj::find_key`] a binary search. Positional
accessors see that sorted order, not the order keys were written in.
*/
#[derive(Clone, Copy)]
pub struct Obj<'input, 'tree> {
    input: &'input [u8],
    tree: &'tree [usize],
    address: usize,
}

impl<'input, 'tree> Obj<'input, 'tree> {
    /**
    The number of entries.
    */
    #[inline]
    pub fn len(&self) -> usize {
        *get_unchecked!(self.tree, self.address)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /**
    The key of the entry at `index`.

    # Panics

    Panics if `index` is out of range.
    */
    #[inline]
    pub fn key(&self, index: usize) -> &'input str {
        let [start, end, _] = self.entry_record(index);

        // SAFETY: the parser validated the decoded span
        from_utf8_unchecked!(&self.input[start..end])
    }

    /**
    The value of the entry at `index`.

    # Panics

    Panics if `index` is out of range.
    */
    #[inline]
    pub fn value(&self, index: usize) -> Value<'input, 'tree> {
        let [_, _, cell] = self.entry_record(index);

        self.container_value().child(cell)
    }

    /**
    The key and value of the entry at `index`.

    # Panics

    Panics if `index` is out of range.
    */
    #[inline]
    pub fn entry(&self, index: usize) -> (&'input str, Value<'input, 'tree>) {
        (self.key(index), self.value(index))
    }

    /**
    Iterate through the entries in key order.
    */
    #[inline]
    pub fn entries(&self) -> impl Iterator<Item = (&'input str, Value<'input, 'tree>)> {
        let obj = *self;

        (0..obj.len()).map(move |index| obj.entry(index))
    }

    /**
    Binary search for `key`.

    Returns the index of the matching entry, or `len()` when the key isn't
    present; callers must check the bound before indexing with the result.
    */
    pub fn find_key(&self, key: &str) -> usize {
        let count = self.len();
        let key = key.as_bytes();

        object_entries(self.tree, self.address, count)
            .binary_search_by(|&[start, end, _]| {
                let stored = &self.input[start..end];

                // length first: keys of different lengths never reach the
                // byte compare
                (stored.len(), stored).cmp(&(key.len(), key))
            })
            .unwrap_or(count)
    }

    /**
    Look up the value stored under `key`.
    */
    pub fn get(&self, key: &str) -> Option<Value<'input, 'tree>> {
        let index = self.find_key(key);

        (index < self.len()).then(|| self.value(index))
    }

    /**
    Materialize the object as a key-to-value map.

    This allocates; prefer [`Obj::get`] or [`Obj::entries`] unless the same
    object is probed many times with unpredictable keys.
    */
    pub fn to_map(&self) -> HashMap<&'input str, Value<'input, 'tree>> {
        self.entries().collect()
    }

    #[inline]
    fn entry_record(&self, index: usize) -> [usize; 3] {
        assert!(index < self.len(), "object index out of bounds");

        let at = self.address + 1 + 3 * index;

        [
            *get_unchecked!(self.tree, at),
            *get_unchecked!(self.tree, at + 1),
            *get_unchecked!(self.tree, at + 2),
        ]
    }

    #[inline]
    fn container_value(&self) -> Value<'input, 'tree> {
        Value {
            input: self.input,
            tree: self.tree,
            tag: Tag::Object,
            address: self.address,
        }
    }
}

impl<'input, 'tree> fmt::Debug for Obj<'input, 'tree> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

#[cfg(any(test, feature = "serde_json"))]
impl<'input> Document<'input> {
    /**
    Convert a valid document into a [`serde_json::Value`].

    # Panics

    Panics if the document is invalid.
    */
    pub fn to_value(&self) -> serde_json::Value {
        fn to_value(value: &Value) -> serde_json::Value {
            match value.kind() {
                Kind::Integer(value) => serde_json::Value::from(value as i64),
                Kind::Double(value) => serde_json::Number::from_f64(value)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
                Kind::Bool(value) => serde_json::Value::Bool(value),
                Kind::Null => serde_json::Value::Null,
                Kind::Str(value) => serde_json::Value::String(value.to_owned()),
                Kind::Arr(arr) => {
                    serde_json::Value::Array(arr.iter().map(|e| to_value(&e)).collect())
                }
                Kind::Obj(obj) => serde_json::Value::Object(
                    obj.entries()
                        .map(|(k, v)| (k.to_owned(), to_value(&v)))
                        .collect(),
                ),
            }
        }

        to_value(&self.root())
    }
}
