/**
Combine a UTF-16 surrogate pair into the character it encodes.

Callers must have already checked that `high` is a lead surrogate
(`0xD800..=0xDBFF`) and `low` is a trail surrogate (`0xDC00..=0xDFFF`).
Every such pair maps into `U+10000..=U+10FFFF`, which is always a valid
`char`.
*/
pub(crate) fn from_utf16_surrogate_pair(high: u16, low: u16) -> char {
    debug_assert!((0xD800..=0xDBFF).contains(&high));
    debug_assert!((0xDC00..=0xDFFF).contains(&low));

    let code = (((high as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00) + 0x1_0000;

    // the ranges above place `code` in the supplementary planes,
    // outside the surrogate range and below 0x110000
    char::from_u32(code).expect("surrogate pair out of range")
}
