//! 非同期フォームリーダー
//!
//! `AsyncRead` からチャンク単位で読み取りながらフォームをデコードする。
//! ボディ全体をメモリに載せる必要はない。
//!
//! ## 使い方
//!
//! ```ignore
//! use tokio_form_urlencoded::{FormLimits, FormReader};
//!
//! let mut reader = FormReader::with_limits(stream, FormLimits::recommended());
//!
//! // ペア単位
//! while let Some((key, value)) = reader.read_next_pair().await? {
//!     println!("{} = {}", key, value);
//! }
//!
//! // まとめて
//! let form = tokio_form_urlencoded::read_form(stream, FormLimits::recommended()).await?;
//! ```

use shiguredo_form_urlencoded::{FormAccumulator, FormData, FormDecoder, FormLimits, PairProgress};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Result;

const DEFAULT_READ_BUFFER_SIZE: usize = 8192;

/// 非同期フォームリーダー
///
/// 読み取りで待機するのはデコーダーが追加データを必要とした時だけ。
/// 終端に達した後は読み取り元に触れず、常に `None` を返す。
#[derive(Debug)]
pub struct FormReader<R> {
    reader: R,
    decoder: FormDecoder,
    read_buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> FormReader<R> {
    /// 新しいリーダーを作成
    pub fn new(reader: R) -> Self {
        Self::with_limits(reader, FormLimits::default())
    }

    /// 制限付きでリーダーを作成
    pub fn with_limits(reader: R, limits: FormLimits) -> Self {
        Self {
            reader,
            decoder: FormDecoder::with_limits(limits),
            read_buf: vec![0; DEFAULT_READ_BUFFER_SIZE],
        }
    }

    /// 読み取りバッファサイズを設定
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buf = vec![0; size.max(1)];
        self
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &FormLimits {
        self.decoder.limits()
    }

    /// デコーダーが保持している未消費のバイト数
    pub fn buffered_len(&self) -> usize {
        self.decoder.buffered_len()
    }

    /// 読み取り元を取り出す
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// 次のペアを読み取る
    ///
    /// 終端に達したら `None` を返す。
    pub async fn read_next_pair(&mut self) -> Result<Option<(String, String)>> {
        loop {
            match self.decoder.decode_pair() {
                Ok(PairProgress::Pair { key, value }) => return Ok(Some((key, value))),
                Ok(PairProgress::End) => return Ok(None),
                Ok(PairProgress::NeedMoreData) => {}
                Err(e) => {
                    log::debug!("form decode failed: {}", e);
                    return Err(e.into());
                }
            }

            let n = self.reader.read(&mut self.read_buf).await?;
            if n == 0 {
                log::debug!(
                    "form body reached EOF with {} bytes pending",
                    self.decoder.buffered_len()
                );
                self.decoder.mark_eof();
            } else {
                log::trace!("read {} bytes of form body", n);
                self.decoder.feed(&self.read_buf[..n]);
            }
        }
    }

    /// 終端まで読み取ってフォームデータを返す
    pub async fn read_form(&mut self) -> Result<FormData> {
        let mut accumulator = FormAccumulator::new(self.decoder.limits().key_count_limit);
        while let Some((key, value)) = self.read_next_pair().await? {
            if let Err(e) = accumulator.append(key, value) {
                log::debug!("form decode failed: {}", e);
                return Err(e.into());
            }
        }
        let form = accumulator.finish();
        log::debug!(
            "form decoded: {} keys, {} values",
            form.len(),
            form.value_count()
        );
        Ok(form)
    }
}

/// 読み取り元を終端まで読み取ってフォームデータを返す
pub async fn read_form<R: AsyncRead + Unpin>(reader: R, limits: FormLimits) -> Result<FormData> {
    FormReader::with_limits(reader, limits).read_form().await
}
