//! tokio-form-urlencoded エラー型

use std::fmt;

/// tokio-form-urlencoded エラー
#[derive(Debug)]
pub enum Error {
    /// I/O エラー (読み取り元のエラーをそのまま保持する)
    Io(std::io::Error),
    /// フォームの制限超過
    Form(shiguredo_form_urlencoded::Error),
}

impl Error {
    /// 制限超過エラーかどうか
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, Error::Form(e) if e.is_limit_exceeded())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            // 制限超過のメッセージはそのまま見せる
            Error::Form(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Form(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<shiguredo_form_urlencoded::Error> for Error {
    fn from(e: shiguredo_form_urlencoded::Error) -> Self {
        Error::Form(e)
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
