//! # shiguredo_form_urlencoded
//!
//! 依存なしの application/x-www-form-urlencoded デコーダーライブラリ (Sans I/O)
//!
//! ## 特徴
//!
//! - **依存なし**: 標準ライブラリのみ使用
//! - **Sans I/O**: I/O を完全に分離した設計
//! - **ストリーミング**: ボディ全体をメモリに載せずにペア単位でデコード
//! - **制限**: キー数、キー長、値長の上限を設定可能
//!
//! ## 使い方
//!
//! ### 一括デコード
//!
//! ```rust
//! use shiguredo_form_urlencoded::{FormLimits, parse_form};
//!
//! let form = parse_form(b"k1=v1&k2=v2&k1=v3", &FormLimits::default()).unwrap();
//! assert_eq!(form.get("k1").unwrap(), ["v1", "v3"]);
//! assert_eq!(form.get_first("k2"), Some("v2"));
//! ```
//!
//! ### ストリーミングデコード
//!
//! ```rust
//! use shiguredo_form_urlencoded::{FormAccumulator, FormDecoder, FormLimits};
//!
//! let limits = FormLimits::default().with_key_count_limit(10);
//! let mut decoder = FormDecoder::with_limits(limits.clone());
//! let mut accumulator = FormAccumulator::new(limits.key_count_limit);
//!
//! // 受信したデータを順に feed...
//! for chunk in [&b"name=ta"[..], b"ro&lang=", b"ja"] {
//!     decoder.feed(chunk);
//!     accumulator.drain(&mut decoder).unwrap();
//! }
//!
//! // ストリーム終端を通知
//! decoder.mark_eof();
//! assert!(accumulator.drain(&mut decoder).unwrap());
//!
//! let form = accumulator.finish();
//! assert_eq!(form.get_first("name"), Some("taro"));
//! assert_eq!(form.get_first("lang"), Some("ja"));
//! ```
//!
//! ### 制限超過
//!
//! ```rust
//! use shiguredo_form_urlencoded::{FormLimits, parse_form};
//!
//! let limits = FormLimits::default().with_key_count_limit(1);
//! let err = parse_form(b"a=1&b=2", &limits).unwrap_err();
//! assert_eq!(err.to_string(), "Form key count limit 1 exceeded.");
//! ```

mod decoder;
mod encoder;
mod error;
mod form;
mod limits;
pub mod percent;

pub use decoder::{FormDecoder, PairProgress};
pub use encoder::{CONTENT_TYPE, FormBuilder};
pub use error::Error;
pub use form::{FormAccumulator, FormData, FormDataIter, parse_form};
pub use limits::FormLimits;
