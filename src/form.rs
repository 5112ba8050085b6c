//! フォームデータの集約
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_form_urlencoded::{FormLimits, parse_form};
//!
//! let form = parse_form(b"baz=3&foo=1&baz=4", &FormLimits::default()).unwrap();
//!
//! // キーは最初に現れた順
//! let keys: Vec<&str> = form.keys().collect();
//! assert_eq!(keys, ["baz", "foo"]);
//!
//! // 値は読み取った順
//! assert_eq!(form.get("baz").unwrap(), ["3", "4"]);
//! assert_eq!(form.get_first("foo"), Some("1"));
//! ```

use std::collections::HashMap;

use crate::decoder::{FormDecoder, PairProgress};
use crate::error::Error;
use crate::limits::FormLimits;

/// デコード済みフォームデータ
///
/// キーから値のリストへの順序付きマップ。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl FormData {
    /// 空のフォームデータを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// キー数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 値の総数
    pub fn value_count(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }

    /// キーに対応する値をすべて取得
    pub fn get(&self, key: &str) -> Option<&[String]> {
        let i = *self.index.get(key)?;
        Some(&self.entries[i].1)
    }

    /// キーに対応する最初の値を取得
    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.get(key)?.first().map(String::as_str)
    }

    /// キーが存在するかどうか
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// キーを出現順に列挙
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// キーと値のリストを出現順に列挙
    pub fn iter(&self) -> FormDataIter<'_> {
        FormDataIter {
            inner: self.entries.iter(),
        }
    }

    fn append(&mut self, key: String, value: String) {
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1.push(value);
            return;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, vec![value]));
    }
}

/// [`FormData`] のイテレーター
#[derive(Debug, Clone)]
pub struct FormDataIter<'a> {
    inner: std::slice::Iter<'a, (String, Vec<String>)>,
}

impl<'a> Iterator for FormDataIter<'a> {
    type Item = (&'a str, &'a [String]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a FormData {
    type Item = (&'a str, &'a [String]);
    type IntoIter = FormDataIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for FormData {
    type Item = (String, Vec<String>);
    type IntoIter = std::vec::IntoIter<(String, Vec<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// フォームデータの集約器
///
/// ペアを順に受け取り、重複を除いたキー数の制限を確認しながら [`FormData`] を組み立てる。
#[derive(Debug, Clone)]
pub struct FormAccumulator {
    data: FormData,
    key_count_limit: usize,
}

impl Default for FormAccumulator {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

impl FormAccumulator {
    /// 新しい集約器を作成
    pub fn new(key_count_limit: usize) -> Self {
        Self {
            data: FormData::new(),
            key_count_limit,
        }
    }

    /// ペアを追加
    ///
    /// 既存のキーへの追加は制限の対象外。
    pub fn append(&mut self, key: String, value: String) -> Result<(), Error> {
        if !self.data.contains_key(&key) && self.data.len() >= self.key_count_limit {
            return Err(Error::KeyCountLimitExceeded {
                limit: self.key_count_limit,
            });
        }
        self.data.append(key, value);
        Ok(())
    }

    /// 現在のキー数
    pub fn key_count(&self) -> usize {
        self.data.len()
    }

    /// デコーダーから取り出せるペアをすべて追加
    ///
    /// デコーダーが終端に達したら true、データ待ちなら false を返す。
    pub fn drain(&mut self, decoder: &mut FormDecoder) -> Result<bool, Error> {
        loop {
            match decoder.decode_pair()? {
                PairProgress::Pair { key, value } => self.append(key, value)?,
                PairProgress::NeedMoreData => return Ok(false),
                PairProgress::End => return Ok(true),
            }
        }
    }

    /// 集約結果を取得
    pub fn finish(self) -> FormData {
        self.data
    }
}

/// バッファ済みのボディ全体をフォームデータとしてデコード
pub fn parse_form(body: &[u8], limits: &FormLimits) -> Result<FormData, Error> {
    let mut decoder = FormDecoder::from_bytes(body, limits.clone());
    let mut accumulator = FormAccumulator::new(limits.key_count_limit);
    // mark_eof() 済みのデコーダーはデータ待ちにならない
    let complete = accumulator.drain(&mut decoder)?;
    debug_assert!(complete);
    Ok(accumulator.finish())
}
