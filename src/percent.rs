//! application/x-www-form-urlencoded のコンポーネント単位のエンコード/デコード
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_form_urlencoded::percent::{decode_component, encode_component};
//!
//! assert_eq!(decode_component(b"hello+world%21"), "hello world!");
//! assert_eq!(encode_component("hello world!"), "hello+world%21");
//!
//! // 不正なエスケープはそのまま残る
//! assert_eq!(decode_component(b"100%zz"), "100%zz");
//! ```

/// パーセントエンコーディング対象外の文字 (unreserved characters)
fn is_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'.' || c == b'_' || c == b'~'
}

/// コンポーネントをエンコード
///
/// unreserved 文字はそのまま、空白は `+`、それ以外は `%XY` (大文字) にする。
pub fn encode_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        if is_unreserved(byte) {
            result.push(byte as char);
        } else if byte == b' ' {
            result.push('+');
        } else {
            result.push('%');
            result.push(to_hex_char(byte >> 4));
            result.push(to_hex_char(byte & 0x0F));
        }
    }
    result
}

fn to_hex_char(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        10..=15 => (b'A' + nibble - 10) as char,
        _ => unreachable!(),
    }
}

/// コンポーネントをデコード
///
/// `+` は空白に、`%XY` はバイトに戻す。
/// `XY` が 16 進数でない、または入力が途中で終わるエスケープはそのまま残す。
/// 最後に UTF-8 としてデコードし、不正なシーケンスは U+FFFD に置き換える。
/// 失敗することはない。
pub fn decode_component(input: &[u8]) -> String {
    let bytes = decode_component_bytes(input);
    String::from_utf8_lossy(&bytes).into_owned()
}

/// コンポーネントをデコード (バイト列として)
pub fn decode_component_bytes(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        match input[i] {
            b'+' => result.push(b' '),
            b'%' => {
                let escaped = input
                    .get(i + 1)
                    .and_then(|&h| from_hex_char(h))
                    .zip(input.get(i + 2).and_then(|&l| from_hex_char(l)));
                match escaped {
                    Some((high, low)) => {
                        result.push((high << 4) | low);
                        i += 2;
                    }
                    None => result.push(b'%'),
                }
            }
            b => result.push(b),
        }
        i += 1;
    }

    result
}

fn from_hex_char(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}
