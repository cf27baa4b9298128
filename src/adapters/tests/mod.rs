//! Hex adapter formatting and comparison.

use crate::adapters::{hex, hex_bytes};
use crate::render;

#[test]
fn byte_array_dump() {
    let array: [u8; 16] = [
        0xa4, 0x4a, 0x82, 0x66, 0xee, 0x1c, 0x8e, 0xb0, 0xc8, 0xb5, 0xd4, 0xcf, 0x5a, 0xe9, 0xf1,
        0x9a,
    ];
    assert_eq!(
        hex(&array).to_string(),
        "0xa4 4a 82 66 ee 1c 8e b0 c8 b5 d4 cf 5a e9 f1 9a"
    );
}

#[test]
fn wide_elements_pad_to_their_width() {
    let values: Vec<u32> = vec![1, 0xdeadbeef];
    assert_eq!(hex(&values).to_string(), "0x00000001 deadbeef");

    let signed: [i16; 2] = [-1, 2];
    assert_eq!(hex(&signed).to_string(), "0xffff 0002");
}

#[test]
fn empty_sequence_is_bare_prefix() {
    let empty: [u64; 0] = [];
    assert_eq!(hex(&empty).to_string(), "0x");
    assert_eq!(hex_bytes(&[]), "0x");
}

#[test]
fn equality_follows_contents() {
    let a = vec![0x00u8, 0x11, 0x22];
    let b = a.clone();
    let c = vec![0x00u8, 0x11, 0x23];
    assert_eq!(hex(&a), hex(&b));
    assert_ne!(hex(&a), hex(&c));
}

#[test]
fn diagnostics_use_the_hex_form() {
    let a = [0x0fu8, 0xf0];
    assert_eq!(render!(hex(&a)), "0x0f f0");
}
