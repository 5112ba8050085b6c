#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_form_urlencoded::{FormDecoder, FormLimits, PairProgress, parse_form};

#[derive(Arbitrary, Debug)]
struct FuzzLimits {
    key_count_limit: u8,
    key_length_limit: u16,
    value_length_limit: u16,
    data: Vec<u8>,
}

fn build_limits(input: &FuzzLimits) -> FormLimits {
    FormLimits {
        key_count_limit: input.key_count_limit as usize,
        key_length_limit: input.key_length_limit as usize,
        value_length_limit: input.value_length_limit as usize,
    }
}

fuzz_target!(|input: FuzzLimits| {
    let limits = build_limits(&input);

    // パニックしなければ OK、成功したら制限を守っていること
    if let Ok(form) = parse_form(&input.data, &limits) {
        assert!(form.len() <= limits.key_count_limit);
        for (key, values) in &form {
            assert!(key.len() <= limits.key_length_limit);
            assert!(values.iter().all(|v| v.len() <= limits.value_length_limit));
        }
    }

    let mut decoder = FormDecoder::from_bytes(&input.data, FormLimits::unlimited());
    while let Ok(PairProgress::Pair { key, value }) = decoder.decode_pair() {
        assert!(!key.is_empty() || !value.is_empty());
    }
    assert_eq!(decoder.decode_pair(), Ok(PairProgress::End));
});
