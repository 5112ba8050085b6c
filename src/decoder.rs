//! application/x-www-form-urlencoded ペアデコーダー (Sans I/O)
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_form_urlencoded::{FormDecoder, PairProgress};
//!
//! let mut decoder = FormDecoder::new();
//! decoder.feed(b"name=taro&lang=j");
//!
//! // `&` まで届いたペアはすぐに取り出せる
//! let PairProgress::Pair { key, value } = decoder.decode_pair().unwrap() else {
//!     panic!("pair expected");
//! };
//! assert_eq!((key.as_str(), value.as_str()), ("name", "taro"));
//!
//! // 区切りが来るまで最後のペアは確定しない
//! assert_eq!(decoder.decode_pair().unwrap(), PairProgress::NeedMoreData);
//!
//! decoder.feed(b"a");
//! decoder.mark_eof();
//! let PairProgress::Pair { key, value } = decoder.decode_pair().unwrap() else {
//!     panic!("pair expected");
//! };
//! assert_eq!((key.as_str(), value.as_str()), ("lang", "ja"));
//!
//! assert_eq!(decoder.decode_pair().unwrap(), PairProgress::End);
//! assert_eq!(decoder.decode_pair().unwrap(), PairProgress::End);
//! ```

use crate::error::Error;
use crate::limits::FormLimits;
use crate::percent::decode_component;

/// パーセントエスケープ 1 つ (`%XY`) がデコード後 1 バイトになるので、
/// 生のバイト数がこの倍率を超えたらデコード後も必ず制限を超える
const MAX_ESCAPE_EXPANSION: usize = 3;

/// ペアのデコード状況
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairProgress {
    /// デコード済みのペア
    Pair { key: String, value: String },
    /// 次の区切りを見つけるにはデータが足りない
    NeedMoreData,
    /// ストリーム終端 (以降は常に End)
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DecodePhase {
    /// セグメント読み取り中
    Reading,
    /// 完了
    Complete,
    /// 制限超過で停止
    Failed(Error),
}

/// フォームペアデコーダー
///
/// `feed()` で受け取ったバイト列から `&` 区切りのセグメントを探し、
/// キーと値をデコードして 1 ペアずつ返す。
/// 入力全体をまとめて渡しても、細かく分けて渡しても結果は同じになる。
#[derive(Debug, Clone)]
pub struct FormDecoder {
    /// 受け取ったバイト列 (start より前は消費済み)
    buf: Vec<u8>,
    /// 現在のセグメントの先頭位置
    start: usize,
    /// buf のうち区切りを探し終えた位置
    scanned: usize,
    /// 現在のセグメントで最初に見つかった `=` の位置
    equals: Option<usize>,
    /// mark_eof() が呼ばれたか
    eof: bool,
    phase: DecodePhase,
    limits: FormLimits,
}

impl Default for FormDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormDecoder {
    /// 新しいデコーダーを作成
    pub fn new() -> Self {
        Self::with_limits(FormLimits::default())
    }

    /// 制限付きでデコーダーを作成
    pub fn with_limits(limits: FormLimits) -> Self {
        Self {
            buf: Vec::new(),
            start: 0,
            scanned: 0,
            equals: None,
            eof: false,
            phase: DecodePhase::Reading,
            limits,
        }
    }

    /// バッファ済みのボディ全体からデコーダーを作成
    ///
    /// `feed()` と `mark_eof()` をまとめて行う。
    pub fn from_bytes(body: &[u8], limits: FormLimits) -> Self {
        let mut decoder = Self::with_limits(limits);
        decoder.feed(body);
        decoder.mark_eof();
        decoder
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &FormLimits {
        &self.limits
    }

    /// データを追加
    ///
    /// `mark_eof()` の後や、終端・エラーに達した後のデータは無視する。
    pub fn feed(&mut self, data: &[u8]) {
        if self.eof || self.phase != DecodePhase::Reading {
            return;
        }
        self.compact();
        self.buf.extend_from_slice(data);
    }

    /// ストリーム終端を通知
    pub fn mark_eof(&mut self) {
        self.eof = true;
    }

    /// 終端に達したかどうか
    pub fn is_finished(&self) -> bool {
        self.phase == DecodePhase::Complete
    }

    /// 未消費のバイト数
    pub fn buffered_len(&self) -> usize {
        self.buf.len() - self.start
    }

    /// 次のペアをデコード
    ///
    /// キーも値も空のセグメント (`&&` や先頭の `&`、`=` だけのもの) は読み飛ばす。
    /// 制限を超えた場合はエラーを返し、以降も同じエラーを返し続ける。
    pub fn decode_pair(&mut self) -> Result<PairProgress, Error> {
        loop {
            match &self.phase {
                DecodePhase::Reading => {}
                DecodePhase::Complete => return Ok(PairProgress::End),
                DecodePhase::Failed(e) => return Err(e.clone()),
            }

            let (segment_end, consumed) = match self.scan() {
                Some(pos) => (pos, pos + 1),
                None if !self.eof => {
                    if let Err(e) = self.check_incomplete_segment() {
                        return Err(self.fail(e));
                    }
                    return Ok(PairProgress::NeedMoreData);
                }
                None if self.start == self.buf.len() => {
                    self.phase = DecodePhase::Complete;
                    return Ok(PairProgress::End);
                }
                None => (self.buf.len(), self.buf.len()),
            };

            let (raw_key, raw_value) = match self.equals {
                Some(eq) => (&self.buf[self.start..eq], &self.buf[eq + 1..segment_end]),
                None => (&self.buf[self.start..segment_end], &[][..]),
            };
            let key = decode_component(raw_key);
            let value = decode_component(raw_value);

            self.start = consumed;
            self.scanned = consumed;
            self.equals = None;

            if key.is_empty() && value.is_empty() {
                continue;
            }

            if key.len() > self.limits.key_length_limit
                || value.len() > self.limits.value_length_limit
            {
                let e = self.length_error();
                return Err(self.fail(e));
            }

            return Ok(PairProgress::Pair { key, value });
        }
    }

    /// 消費済みの部分を捨てる
    ///
    /// 消費済みの部分が未消費の部分以上になった時だけ詰めるので、
    /// 移動するバイト数の合計は入力の長さで抑えられる。
    fn compact(&mut self) {
        if self.start == 0 || self.start < self.buf.len() - self.start {
            return;
        }
        self.buf.drain(..self.start);
        self.scanned -= self.start;
        self.equals = self.equals.map(|eq| eq - self.start);
        self.start = 0;
    }

    /// 未走査部分から `&` を探す
    ///
    /// 途中で見つけた最初の `=` は equals に記録する。
    fn scan(&mut self) -> Option<usize> {
        while self.scanned < self.buf.len() {
            let pos = self.scanned;
            self.scanned += 1;
            match self.buf[pos] {
                b'&' => return Some(pos),
                b'=' if self.equals.is_none() => self.equals = Some(pos),
                _ => {}
            }
        }
        None
    }

    /// 区切り待ちのセグメントが既に制限を超えることが確定していないか
    fn check_incomplete_segment(&self) -> Result<(), Error> {
        let (raw_key_len, raw_value_len) = match self.equals {
            Some(eq) => (eq - self.start, self.scanned - eq - 1),
            None => (self.scanned - self.start, 0),
        };
        let key_bound = self
            .limits
            .key_length_limit
            .saturating_mul(MAX_ESCAPE_EXPANSION);
        let value_bound = self
            .limits
            .value_length_limit
            .saturating_mul(MAX_ESCAPE_EXPANSION);
        if raw_key_len > key_bound || raw_value_len > value_bound {
            return Err(self.length_error());
        }
        Ok(())
    }

    /// キー長と値長の超過はどちらも値長の制限値で報告する
    ///
    /// 値長が無制限の場合だけキー長の制限値を使う。
    fn length_error(&self) -> Error {
        let limit = if self.limits.value_length_limit == usize::MAX {
            self.limits.key_length_limit
        } else {
            self.limits.value_length_limit
        };
        Error::KeyOrValueLengthLimitExceeded { limit }
    }

    fn fail(&mut self, e: Error) -> Error {
        self.buf = Vec::new();
        self.start = 0;
        self.scanned = 0;
        self.equals = None;
        self.phase = DecodePhase::Failed(e.clone());
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> PairProgress {
        PairProgress::Pair {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn decode_all(decoder: &mut FormDecoder) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        loop {
            match decoder.decode_pair().unwrap() {
                PairProgress::Pair { key, value } => pairs.push((key, value)),
                PairProgress::NeedMoreData => panic!("unexpected NeedMoreData"),
                PairProgress::End => return pairs,
            }
        }
    }

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let mut decoder = FormDecoder::from_bytes(b"", FormLimits::default());
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::End);
        assert!(decoder.is_finished());
    }

    #[test]
    fn test_simple_pairs() {
        let mut decoder = FormDecoder::from_bytes(b"foo=bar&baz=2", FormLimits::default());
        assert_eq!(decoder.decode_pair().unwrap(), pair("foo", "bar"));
        assert_eq!(decoder.decode_pair().unwrap(), pair("baz", "2"));
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::End);
    }

    #[test]
    fn test_empty_key_and_value() {
        let mut decoder = FormDecoder::from_bytes(b"=bar", FormLimits::default());
        assert_eq!(decode_all(&mut decoder), pairs(&[("", "bar")]));

        let mut decoder = FormDecoder::from_bytes(b"foo=", FormLimits::default());
        assert_eq!(decode_all(&mut decoder), pairs(&[("foo", "")]));
    }

    #[test]
    fn test_key_without_equals() {
        let mut decoder = FormDecoder::from_bytes(b"foo&bar=1&baz", FormLimits::default());
        assert_eq!(
            decode_all(&mut decoder),
            pairs(&[("foo", ""), ("bar", "1"), ("baz", "")])
        );
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let mut decoder = FormDecoder::from_bytes(b"&&a=1&&=&b=2&", FormLimits::default());
        assert_eq!(decode_all(&mut decoder), pairs(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn test_value_keeps_later_equals() {
        let mut decoder = FormDecoder::from_bytes(b"a=b=c", FormLimits::default());
        assert_eq!(decode_all(&mut decoder), pairs(&[("a", "b=c")]));
    }

    #[test]
    fn test_percent_decoding() {
        let mut decoder = FormDecoder::from_bytes(
            b"first+name=J%C3%BCrgen&q=a%26b%3Dc&bad=%zz%4",
            FormLimits::default(),
        );
        assert_eq!(
            decode_all(&mut decoder),
            pairs(&[("first name", "Jürgen"), ("q", "a&b=c"), ("bad", "%zz%4")])
        );
    }

    #[test]
    fn test_incremental_feed() {
        let mut decoder = FormDecoder::new();
        decoder.feed(b"fo");
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::NeedMoreData);
        decoder.feed(b"o=b");
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::NeedMoreData);
        decoder.feed(b"ar&x");
        assert_eq!(decoder.decode_pair().unwrap(), pair("foo", "bar"));
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::NeedMoreData);
        decoder.mark_eof();
        assert_eq!(decoder.decode_pair().unwrap(), pair("x", ""));
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::End);
    }

    #[test]
    fn test_byte_by_byte_matches_buffered() {
        let body = b"a=1&b=%E6%97%A5+x&&c&=d&a=2%";
        let mut buffered = FormDecoder::from_bytes(body, FormLimits::default());
        let expected = decode_all(&mut buffered);

        let mut streaming = FormDecoder::new();
        let mut actual = Vec::new();
        for byte in body.iter() {
            streaming.feed(std::slice::from_ref(byte));
            while let PairProgress::Pair { key, value } = streaming.decode_pair().unwrap() {
                actual.push((key, value));
            }
        }
        streaming.mark_eof();
        actual.extend(decode_all(&mut streaming));

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut decoder = FormDecoder::from_bytes(b"a=1", FormLimits::default());
        assert_eq!(decoder.decode_pair().unwrap(), pair("a", "1"));
        for _ in 0..3 {
            assert_eq!(decoder.decode_pair().unwrap(), PairProgress::End);
        }
        decoder.feed(b"&b=2");
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::End);
    }

    #[test]
    fn test_key_length_limit_only() {
        // 値長が無制限ならキー長の制限値で報告する
        let limits = FormLimits::default().with_key_length_limit(10);
        let mut decoder = FormDecoder::from_bytes(b"foo=1&baz1234567890=2", limits);
        assert_eq!(decoder.decode_pair().unwrap(), pair("foo", "1"));
        let err = decoder.decode_pair().unwrap_err();
        assert_eq!(err, Error::KeyOrValueLengthLimitExceeded { limit: 10 });
    }

    #[test]
    fn test_key_length_limit_reports_value_limit() {
        let limits = FormLimits::default()
            .with_key_length_limit(10)
            .with_value_length_limit(4096);
        let mut decoder = FormDecoder::from_bytes(b"foo=1&baz1234567890=2", limits);
        assert_eq!(decoder.decode_pair().unwrap(), pair("foo", "1"));
        let err = decoder.decode_pair().unwrap_err();
        assert_eq!(err, Error::KeyOrValueLengthLimitExceeded { limit: 4096 });
    }

    #[test]
    fn test_oversized_key_fails_before_delimiter_without_value_limit() {
        let limits = FormLimits::default().with_key_length_limit(2);
        let mut decoder = FormDecoder::with_limits(limits);
        decoder.feed(b"abcdefg");
        assert_eq!(
            decoder.decode_pair().unwrap_err(),
            Error::KeyOrValueLengthLimitExceeded { limit: 2 }
        );
    }

    #[test]
    fn test_key_length_limit_message_uses_value_limit() {
        let limits = FormLimits::default()
            .with_key_length_limit(10)
            .with_value_length_limit(10);
        let mut decoder = FormDecoder::from_bytes(b"foo=1&baz1234567890=2", limits);
        assert_eq!(decoder.decode_pair().unwrap(), pair("foo", "1"));
        assert_eq!(
            decoder.decode_pair().unwrap_err().to_string(),
            "Form key or value length limit 10 exceeded."
        );
    }

    #[test]
    fn test_value_length_limit() {
        let limits = FormLimits::default().with_value_length_limit(10);
        let mut decoder = FormDecoder::from_bytes(b"foo=1&baz=1234567890123", limits);
        assert_eq!(decoder.decode_pair().unwrap(), pair("foo", "1"));
        assert_eq!(
            decoder.decode_pair().unwrap_err().to_string(),
            "Form key or value length limit 10 exceeded."
        );
    }

    #[test]
    fn test_length_limit_counts_decoded_bytes() {
        // 生では 9 バイトだがデコード後は 3 バイト
        let limits = FormLimits::default().with_value_length_limit(3);
        let mut decoder = FormDecoder::from_bytes(b"k=%41%42%43", limits);
        assert_eq!(decode_all(&mut decoder), pairs(&[("k", "ABC")]));
    }

    #[test]
    fn test_length_limit_at_boundary() {
        let limits = FormLimits::default()
            .with_key_length_limit(3)
            .with_value_length_limit(3);
        let mut decoder = FormDecoder::from_bytes(b"abc=xyz", limits);
        assert_eq!(decode_all(&mut decoder), pairs(&[("abc", "xyz")]));
    }

    #[test]
    fn test_error_is_sticky() {
        let limits = FormLimits::default().with_value_length_limit(1);
        let mut decoder = FormDecoder::from_bytes(b"a=12&b=1", limits);
        let err = decoder.decode_pair().unwrap_err();
        assert_eq!(decoder.decode_pair().unwrap_err(), err);
        assert_eq!(decoder.buffered_len(), 0);
    }

    #[test]
    fn test_oversized_segment_fails_before_delimiter() {
        let limits = FormLimits::default().with_value_length_limit(4);
        let mut decoder = FormDecoder::with_limits(limits);
        decoder.feed(b"k=");
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::NeedMoreData);
        decoder.feed(b"%41%41%41%41");
        // 12 バイトはまだ 4 バイトに収まる可能性がある
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::NeedMoreData);
        decoder.feed(b"%");
        assert_eq!(
            decoder.decode_pair().unwrap_err(),
            Error::KeyOrValueLengthLimitExceeded { limit: 4 }
        );
    }

    #[test]
    fn test_oversized_key_fails_before_delimiter() {
        let limits = FormLimits::default()
            .with_key_length_limit(2)
            .with_value_length_limit(100);
        let mut decoder = FormDecoder::with_limits(limits);
        decoder.feed(b"abcdefg");
        assert_eq!(
            decoder.decode_pair().unwrap_err(),
            Error::KeyOrValueLengthLimitExceeded { limit: 100 }
        );
    }

    #[test]
    fn test_consumed_bytes_are_released_on_feed() {
        let mut decoder = FormDecoder::new();
        decoder.feed(b"a=1&b=2&c");
        assert_eq!(decoder.decode_pair().unwrap(), pair("a", "1"));
        assert_eq!(decoder.decode_pair().unwrap(), pair("b", "2"));
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::NeedMoreData);
        assert_eq!(decoder.buffered_len(), 1);

        // 消費済みの 8 バイトは次の feed で捨てられる
        decoder.feed(b"=3");
        assert_eq!(decoder.buf.len(), 3);
        assert_eq!(decoder.buffered_len(), 3);
        decoder.mark_eof();
        assert_eq!(decode_all(&mut decoder), pairs(&[("c", "3")]));
    }

    #[test]
    fn test_equals_position_survives_compaction() {
        let mut decoder = FormDecoder::new();
        decoder.feed(b"xxxxxxxx=1&ab=c");
        assert_eq!(decoder.decode_pair().unwrap(), pair("xxxxxxxx", "1"));
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::NeedMoreData);
        decoder.feed(b"d&");
        assert_eq!(decoder.decode_pair().unwrap(), pair("ab", "cd"));
    }

    #[test]
    fn test_many_segments_in_linear_time() {
        let body = vec![b'&'; 2 * 1024 * 1024];
        let started = std::time::Instant::now();
        let mut decoder = FormDecoder::from_bytes(&body, FormLimits::recommended());
        assert_eq!(decoder.decode_pair().unwrap(), PairProgress::End);
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_feed_after_eof_is_ignored() {
        let mut decoder = FormDecoder::new();
        decoder.feed(b"a=1");
        decoder.mark_eof();
        decoder.feed(b"&b=2");
        assert_eq!(decode_all(&mut decoder), pairs(&[("a", "1")]));
    }
}
