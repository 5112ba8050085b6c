//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// フォームボディ生成
// ========================================

/// キーや値になる任意の文字列 (区切り文字や `%`、`+`、非 ASCII を含む)
pub fn form_component() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_]{0,12}".prop_map(|s| s),
        "[a-z&=%+ 日本語]{0,12}".prop_map(|s| s),
        "\\PC{0,8}".prop_map(|s| s),
    ]
}

/// キーと値のペア列
pub fn form_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec((form_component(), form_component()), 0..16)
}

/// 区切り文字やエスケープが出やすい生のボディ
pub fn raw_form_body() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        prop_oneof![
            Just(b'&'),
            Just(b'='),
            Just(b'%'),
            Just(b'+'),
            b'0'..=b'9',
            b'a'..=b'f',
            b'A'..=b'Z',
            any::<u8>(),
        ],
        0..256,
    )
}

/// ボディを分割するチャンクサイズ列
pub fn chunk_sizes() -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(1usize..16, 1..8)
}

/// chunk_sizes を繰り返し使ってボディを分割する
pub fn split_body<'a>(body: &'a [u8], sizes: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut rest = body;
    let mut i = 0;
    while !rest.is_empty() {
        let n = sizes[i % sizes.len()].min(rest.len());
        let (chunk, tail) = rest.split_at(n);
        chunks.push(chunk);
        rest = tail;
        i += 1;
    }
    chunks
}
