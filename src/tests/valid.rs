use crate::{Kind, Tag};

use serde_json::json;

#[test]
fn empty_array() {
    parse_each!(b"[]", |document| {
        assert!(document.is_valid());

        let root = document.root().as_array();
        assert_eq!(Tag::Array, document.root().tag());
        assert_eq!(0, root.len());
        assert!(root.is_empty());
    });
}

#[test]
fn array_whitespace() {
    parse_each!(b" [ ] ", |document| {
        assert!(document.is_valid());
        assert_eq!(0, document.root().as_array().len());
    });
}

#[test]
fn array_zero() {
    parse_each!(b"[0]", |document| {
        assert!(document.is_valid());

        let root = document.root().as_array();
        assert_eq!(1, root.len());

        let element = root.get(0);
        assert_eq!(Tag::Integer, element.tag());
        assert_eq!(0, element.as_integer());
        assert_eq!(0.0, element.as_number());
    });
}

#[test]
fn nested_array() {
    parse_each!(b"[[]]", |document| {
        let root = document.root().as_array();
        assert_eq!(1, root.len());

        let inner = root.get(0).as_array();
        assert_eq!(0, inner.len());
    });
}

#[test]
fn packed_arrays() {
    parse_each!(b"[0,[0,[0],0],0]", |document| {
        let root = document.root().as_array();
        assert_eq!(3, root.len());

        assert_eq!(0, root.get(0).as_integer());
        assert_eq!(0, root.get(2).as_integer());

        let mid = root.get(1).as_array();
        assert_eq!(3, mid.len());
        assert_eq!(0, mid.get(0).as_integer());
        assert_eq!(0, mid.get(2).as_integer());

        let inner = mid.get(1).as_array();
        assert_eq!(1, inner.len());
        assert_eq!(0, inner.get(0).as_integer());
    });
}

#[test]
fn deep_nesting() {
    parse_each!(b"[[[[]]]]", |document| {
        let mut arr = document.root().as_array();

        for _ in 0..3 {
            assert_eq!(1, arr.len());
            arr = arr.get(0).as_array();
        }

        assert_eq!(0, arr.len());
    });
}

#[test]
fn deeply_nested_integer() {
    parse_each!(b"[[[[0]]]]", |document| {
        let mut arr = document.root().as_array();

        for _ in 0..3 {
            assert_eq!(1, arr.len());
            arr = arr.get(0).as_array();
        }

        assert_eq!(1, arr.len());
        assert_eq!(0, arr.get(0).as_integer());
    });
}

#[test]
fn negative_and_positive_integers() {
    parse_each!(b" [ 0, -1, 22] ", |document| {
        let root = document.root().as_array();
        assert_eq!(3, root.len());

        for (index, expected) in [0, -1, 22].into_iter().enumerate() {
            let element = root.get(index);
            assert_eq!(Tag::Integer, element.tag());
            assert_eq!(expected, element.as_integer());
            assert_eq!(expected as f64, element.as_number());
        }
    });
}

#[test]
fn integers() {
    parse_each!(b"[0,1,2,3,4,5,6,7,8,9,10]", |document| {
        let root = document.root().as_array();
        assert_eq!(11, root.len());

        for (index, element) in root.iter().enumerate() {
            assert_eq!(Tag::Integer, element.tag());
            assert_eq!(index as i32, element.as_integer());
        }
    });
}

#[test]
fn integer_whitespace() {
    parse_each!(b" [ 0 , 0 ] ", |document| {
        let root = document.root().as_array();
        assert_eq!(2, root.len());
        assert_eq!(0, root.get(1).as_integer());
    });
}

#[test]
fn unit_types() {
    parse_each!(b"[ true , false , null ]", |document| {
        let root = document.root().as_array();
        assert_eq!(3, root.len());

        assert_eq!(Tag::True, root.get(0).tag());
        assert_eq!(Tag::False, root.get(1).tag());
        assert_eq!(Tag::Null, root.get(2).tag());

        assert!(matches!(root.get(0).kind(), Kind::Bool(true)));
        assert!(matches!(root.get(1).kind(), Kind::Bool(false)));
        assert!(matches!(root.get(2).kind(), Kind::Null));
    });
}

#[test]
fn negative_doubles() {
    parse_each!(b"[-0,-1,-34.25]", |document| {
        let root = document.root().as_array();
        assert_eq!(3, root.len());

        let e0 = root.get(0);
        assert_eq!(Tag::Integer, e0.tag());
        assert_eq!(0, e0.as_integer());

        let e1 = root.get(1);
        assert_eq!(Tag::Integer, e1.tag());
        assert_eq!(-1, e1.as_integer());

        let e2 = root.get(2);
        assert_eq!(Tag::Double, e2.tag());
        assert_eq!(-34.25, e2.as_double());
    });
}

#[test]
fn large_number() {
    parse_each!(b"[1496756396000]", |document| {
        let root = document.root().as_array();
        assert_eq!(1, root.len());

        let element = root.get(0);
        assert_eq!(Tag::Double, element.tag());
        assert_eq!(1496756396000.0, element.as_double());
        assert_eq!(Some(1496756396000), element.int53());
    });
}

#[test]
fn exponents() {
    parse_each!(b"[2e+3,0.5E-5,10E+22]", |document| {
        let root = document.root().as_array();

        assert_eq!(2000.0, root.get(0).as_double());
        assert_eq!(0.000005, root.get(1).as_double());
        assert_eq!(10e22, root.get(2).as_double());
    });
}

#[test]
fn long_integers_without_exponents() {
    parse_each!(b"[9999999999,99999999999]", |document| {
        let root = document.root().as_array();

        let e0 = root.get(0);
        assert_eq!(Tag::Double, e0.tag());
        assert_eq!(9999999999.0, e0.as_double());

        let e1 = root.get(1);
        assert_eq!(Tag::Double, e1.tag());
        assert_eq!(99999999999.0, e1.as_double());
    });
}

#[test]
fn exponent_offset() {
    parse_each!(b"[0.005e3]", |document| {
        let root = document.root().as_array();
        assert_eq!(5.0, root.get(0).as_double());
    });
}

#[test]
fn thirty_two_bit_boundaries() {
    parse_each!(
        b"[2147483647,-2147483648,2147483648,-2147483649]",
        |document| {
            let root = document.root().as_array();

            let max = root.get(0);
            assert_eq!(Tag::Integer, max.tag());
            assert_eq!(i32::MAX, max.as_integer());

            let min = root.get(1);
            assert_eq!(Tag::Integer, min.tag());
            assert_eq!(i32::MIN, min.as_integer());

            let above = root.get(2);
            assert_eq!(Tag::Double, above.tag());
            assert_eq!(2147483648.0, above.as_double());

            let below = root.get(3);
            assert_eq!(Tag::Double, below.tag());
            assert_eq!(-2147483649.0, below.as_double());
        }
    );
}

#[test]
fn trailing_fraction_dot() {
    // a fraction with no digits decodes as if the dot wasn't there
    parse_each!(b"[1.]", |document| {
        assert!(document.is_valid());

        let element = document.root().as_array().get(0);
        assert_eq!(Tag::Double, element.tag());
        assert_eq!(1.0, element.as_double());
    });
}

#[test]
fn strings() {
    parse_each!(br#"["", "foobar"]"#, |document| {
        let root = document.root().as_array();
        assert_eq!(2, root.len());

        let e0 = root.get(0);
        assert_eq!(Tag::String, e0.tag());
        assert_eq!("", e0.as_str());

        let e1 = root.get(1);
        assert_eq!(Tag::String, e1.tag());
        assert_eq!(6, e1.as_str().len());
        assert_eq!("foobar", e1.as_str());
    });
}

#[test]
fn common_escapes() {
    parse_each!(br#"["\"\\\/\b\f\n\r\t"]"#, |document| {
        let element = document.root().as_array().get(0);

        assert_eq!(8, element.as_str().len());
        assert_eq!("\"\\/\u{8}\u{c}\n\r\t", element.as_str());
    });
}

#[test]
fn escape_midstring() {
    parse_each!(br#"["foo\tbar"]"#, |document| {
        let element = document.root().as_array().get(0);

        assert_eq!(7, element.as_str().len());
        assert_eq!("foo\tbar", element.as_str());
    });
}

#[test]
fn unicode_escapes() {
    parse_each!(br#"["\u0041\u00e9\u4e2d"]"#, |document| {
        let element = document.root().as_array().get(0);
        assert_eq!("Aé中", element.as_str());
    });
}

#[test]
fn utf16_surrogate_pair() {
    parse_each!(br#"["\ud950\uDf21"]"#, |document| {
        let element = document.root().as_array().get(0);

        assert_eq!(4, element.as_str().len());
        assert_eq!("\u{64321}", element.as_str());
        assert_eq!(b"\xf1\xa4\x8c\xa1" as &[u8], element.as_str().as_bytes());
    });
}

#[test]
fn multibyte_utf8_after_escape() {
    parse_each!(b"[\"\\n\xc2\x80\xe0\xa0\x80\xf0\x90\x80\x80\"]", |document| {
        let element = document.root().as_array().get(0);

        assert_eq!(10, element.as_str().len());
        assert_eq!("\n\u{80}\u{800}\u{10000}", element.as_str());
    });
}

#[test]
fn empty_object() {
    parse_each!(b"{}", |document| {
        assert!(document.is_valid());

        let root = document.root().as_object();
        assert_eq!(Tag::Object, document.root().tag());
        assert_eq!(0, root.len());
        assert!(root.is_empty());
    });
}

#[test]
fn nested_object() {
    parse_each!(br#"{"a":{"b":{}}} "#, |document| {
        let root = document.root().as_object();
        assert_eq!(1, root.len());
        assert_eq!("a", root.key(0));

        let inner = root.value(0).as_object();
        assert_eq!("b", inner.key(0));

        let innermost = inner.value(0).as_object();
        assert_eq!(0, innermost.len());
    });
}

#[test]
fn object_whitespace() {
    parse_each!(br#" { "a" : 0 } "#, |document| {
        let root = document.root().as_object();
        assert_eq!(1, root.len());
        assert_eq!("a", root.key(0));
        assert_eq!(0, root.value(0).as_integer());
    });
}

#[test]
fn object_keys_are_sorted() {
    parse_each!(br#" { "b" : 1 , "a" : 0 } "#, |document| {
        let root = document.root().as_object();
        assert_eq!(2, root.len());

        assert_eq!(("a", 0), (root.key(0), root.value(0).as_integer()));
        assert_eq!(("b", 1), (root.key(1), root.value(1).as_integer()));
    });
}

#[test]
fn object_keys_are_sorted_length_first() {
    parse_each!(br#"{"b":1,"aa":0}"#, |document| {
        let root = document.root().as_object();
        assert_eq!(2, root.len());

        // "b" is shorter than "aa", so it sorts first despite 'b' > 'a'
        assert_eq!(("b", 1), (root.key(0), root.value(0).as_integer()));
        assert_eq!(("aa", 0), (root.key(1), root.value(1).as_integer()));
    });
}

#[test]
fn array_of_objects() {
    parse_each!(br#"[{ "a": 123456 }, { "a": 7890 }]"#, |document| {
        let root = document.root().as_array();
        assert_eq!(2, root.len());

        let first = root.get(0).as_object();
        let index = first.find_key("a");
        assert_eq!(123456.0, first.value(index).as_number());

        let second = root.get(1).as_object();
        let index = second.find_key("a");
        assert_eq!(7890.0, second.value(index).as_number());
    });
}

#[test]
fn strategies_produce_identical_arenas() {
    let cases: &[&[u8]] = &[
        b"[]",
        b"{}",
        b"[0]",
        br#"{"b":1,"aa":0}"#,
        br#"[0,[0,[0],0],{"k":[true,false,null]},"text",-34.25]"#,
        br#"{"logger":"app","message":"started \u2714","elapsed":1.25,"tags":["a","b"]}"#,
    ];

    for case in cases {
        let mut single_buf = case.to_vec();
        let single = crate::parse_single(&mut single_buf);

        let mut dynamic_buf = case.to_vec();
        let dynamic = crate::parse_dynamic(&mut dynamic_buf);

        assert!(single.is_valid());
        assert!(dynamic.is_valid());

        assert_eq!(
            single.tree_words(),
            dynamic.tree_words(),
            "arena mismatch for {:?}",
            case
        );
        assert_eq!(single.root_cell(), dynamic.root_cell());
    }
}

#[test]
fn matches_serde_json() {
    let input = br#"{"@t":"2026-08-02T12:00:00Z","@mt":"started {app}","pid":4242,"elapsed":34.25,"flags":[true,false,null],"ctx":{"host":"db-01","region":"eu\/west","note":"multi\nline \u2714"}}"#;

    parse_each!(input, |document| {
        assert!(document.is_valid());

        let expected: serde_json::Value = serde_json::from_slice(input).unwrap();

        assert_eq!(expected, document.to_value());
    });
}

#[test]
fn to_value_round_trips_a_small_event() {
    let expected = json!({
        "a": [{}, {}, {}],
        "b": 123,
    });

    let input = serde_json::to_vec(&expected).unwrap();

    parse_each!(&input, |document| {
        assert_eq!(expected, document.to_value());
    });
}
