#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_form_urlencoded::percent::{
    decode_component, decode_component_bytes, encode_component,
};

fuzz_target!(|data: &[u8]| {
    // 任意のバイト列でパニックしない
    let decoded = decode_component(data);
    assert!(decode_component_bytes(data).len() <= data.len());

    // エンコードしてデコードすると元に戻る
    let encoded = encode_component(&decoded);
    assert_eq!(decode_component(encoded.as_bytes()), decoded);
});
