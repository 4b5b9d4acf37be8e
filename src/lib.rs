/*!
# `packed-json`

A whole-document JSON parser that packs a random-access AST into a flat word
arena. This library is optimized for parsing a document once and then reading
fragments of it lazily, without ever building a pointer graph.

The parser decodes strings in place, overwriting the input buffer with their
decoded bytes, and encodes every node as machine words whose child references
are self-relative offsets. That makes the arena position independent and lets
the fastest allocation mode service an entire parse out of one allocation
sized at a word per input byte.

## ⚠️ CAREFUL

The reader hands out `&str` slices backed by unchecked conversions over spans
the parser validated. Any change to string decoding or arena layout needs to
be tested in `checked` mode (set the `PACKEDJSON_CHECKED` environment
variable) so the unchecked operations in `macros` assert instead of trusting
the parser.

## Usage

```
let mut buf = br#"{"target":"db-01","elapsed":34.25}"#.to_vec();

let document = packed_json::parse_single(&mut buf);
assert!(document.is_valid());

let root = document.root().as_object();
assert_eq!(34.25, root.get("elapsed").unwrap().as_double());
```
*/

#[macro_use]
mod macros;

pub(crate) mod std_ext;

mod error;

pub mod de;

pub use self::{
    de::{parse_dynamic, parse_single, Arr, Document, Kind, Obj, Tag, Value},
    error::{ErrorCode, ParseError},
};
