#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_form_urlencoded::{FormAccumulator, FormDecoder, FormLimits, parse_form};

#[derive(Arbitrary, Debug)]
struct FuzzChunked {
    chunk_sizes: Vec<u8>,
    key_count_limit: u8,
    value_length_limit: u8,
    data: Vec<u8>,
}

fuzz_target!(|input: FuzzChunked| {
    let limits = FormLimits::default()
        .with_key_count_limit(input.key_count_limit as usize)
        .with_value_length_limit(input.value_length_limit as usize);

    let buffered = parse_form(&input.data, &limits);

    // 同じデータを分割して feed しても結果は変わらない
    let mut decoder = FormDecoder::with_limits(limits.clone());
    let mut accumulator = FormAccumulator::new(limits.key_count_limit);
    let mut rest = &input.data[..];
    let mut sizes = input.chunk_sizes.iter().cycle();
    let mut chunked = Ok(());
    while !rest.is_empty() && chunked.is_ok() {
        let n = sizes
            .next()
            .map_or(rest.len(), |&n| (n as usize).max(1))
            .min(rest.len());
        let (chunk, tail) = rest.split_at(n);
        decoder.feed(chunk);
        rest = tail;
        chunked = accumulator.drain(&mut decoder).map(|_| ());
    }
    let chunked = chunked.and_then(|()| {
        decoder.mark_eof();
        accumulator.drain(&mut decoder)?;
        Ok(accumulator.finish())
    });

    assert_eq!(buffered, chunked);
});
