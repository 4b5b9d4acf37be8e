#![cfg(unstable)]
#![feature(test)]
extern crate test;

/**
Synthesize a minified array of event-shaped objects.
*/
fn events(count: usize) -> Vec<u8> {
    let mut buf = Vec::new();

    buf.push(b'[');

    for i in 0..count {
        if i > 0 {
            buf.push(b',');
        }

        buf.extend_from_slice(
            format!(
                concat!(
                    "{{\"@t\":\"2026-08-02T12:00:{:02}Z\",",
                    "\"@mt\":\"request {{path}} handled\",",
                    "\"path\":\"\\/api\\/items\\/{}\",",
                    "\"elapsed\":{}.25,",
                    "\"status\":200,",
                    "\"cached\":{},",
                    "\"tags\":[\"api\",\"items\",null]}}"
                ),
                i % 60,
                i,
                i,
                i % 2 == 0
            )
            .as_bytes(),
        );
    }

    buf.push(b']');

    buf
}

/**
Synthesize a single object with one large escaped string in it.
*/
fn stacktrace(lines: usize) -> Vec<u8> {
    let mut buf = Vec::new();

    buf.extend_from_slice(b"{\"@mt\":\"it broke\",\"trace\":\"");

    for i in 0..lines {
        buf.extend_from_slice(
            format!("  at handler::invoke(layer {}) \\u2192 next\\n", i).as_bytes(),
        );
    }

    buf.extend_from_slice(b"\"}");

    buf
}

#[bench]
fn parse_100_events_single(b: &mut test::Bencher) {
    let input = events(100);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut buf = input.clone();
        packed_json::parse_single(&mut buf)
    })
}

#[bench]
fn parse_100_events_dynamic(b: &mut test::Bencher) {
    let input = events(100);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut buf = input.clone();
        packed_json::parse_dynamic(&mut buf)
    })
}

#[bench]
fn parse_100_events_serde_json(b: &mut test::Bencher) {
    let input = events(100);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let value: serde_json::Value = serde_json::from_slice(&input).unwrap();
        value
    })
}

#[bench]
fn parse_escaped_string_single(b: &mut test::Bencher) {
    let input = stacktrace(200);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut buf = input.clone();
        packed_json::parse_single(&mut buf)
    })
}

#[bench]
fn parse_escaped_string_dynamic(b: &mut test::Bencher) {
    let input = stacktrace(200);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut buf = input.clone();
        packed_json::parse_dynamic(&mut buf)
    })
}

#[bench]
fn read_hot_key_after_parse(b: &mut test::Bencher) {
    let mut buf = events(100);
    let document = packed_json::parse_single(&mut buf);
    let root = document.root().as_array();

    b.iter(|| {
        let mut total = 0.0;

        for element in root.iter() {
            total += element.as_object().get("elapsed").unwrap().as_number();
        }

        total
    })
}

#[bench]
fn to_str_unescaped(b: &mut test::Bencher) {
    let mut buf = stacktrace(200);
    let document = packed_json::parse_single(&mut buf);
    let root = document.root().as_object();

    b.iter(|| {
        let trace = root.get("trace").unwrap().as_str();
        trace.len()
    })
}
