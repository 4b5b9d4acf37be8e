pub fn parse(input: &[u8]) {
    // Make sure we don't panic while parsing arbitrary bytes
    let mut single_buf = input.to_vec();
    let single = packed_json::parse_single(&mut single_buf);

    let mut dynamic_buf = input.to_vec();
    let dynamic = packed_json::parse_dynamic(&mut dynamic_buf);

    // The strategies must agree on validity, the diagnostic, and the
    // decoded tree
    match (single.error(), dynamic.error()) {
        (None, None) => {
            assert_eq!(single.to_value(), dynamic.to_value());
        }
        (single_err, dynamic_err) => {
            assert_eq!(single_err, dynamic_err);
        }
    }
}
