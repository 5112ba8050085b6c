//! tokio_form_urlencoded - Tokio integration for shiguredo_form_urlencoded
//!
//! tokio の `AsyncRead` から application/x-www-form-urlencoded ボディを読み取るライブラリ。
//!
//! ## 特徴
//!
//! - **shiguredo_form_urlencoded ベース**: Sans I/O デコーダーをベースにした設計
//! - **非同期 I/O**: 追加データを待つ時だけ待機する
//! - **ストリーミング**: チャンク単位で読み取り、ボディ全体をメモリに載せない
//!
//! ## 使い方
//!
//! ```ignore
//! use tokio_form_urlencoded::{FormLimits, FormReader};
//!
//! let mut reader = FormReader::with_limits(stream, FormLimits::recommended());
//! let form = reader.read_form().await?;
//!
//! if let Some(name) = form.get_first("name") {
//!     println!("name: {}", name);
//! }
//! ```

pub mod error;
pub mod reader;

pub use error::{Error, Result};
pub use reader::{FormReader, read_form};

// shiguredo_form_urlencoded の型を re-export
pub use shiguredo_form_urlencoded::{FormData, FormLimits};
