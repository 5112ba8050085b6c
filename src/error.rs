use std::fmt;

/// フォームデコードエラー
///
/// どちらも「入力が大きすぎる」という同じ種類のエラーで、区別はメッセージのみ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// キー数超過
    KeyCountLimitExceeded { limit: usize },
    /// キー長または値長の超過
    ///
    /// `limit` はキー長超過の場合でも値長の制限値になる。
    KeyOrValueLengthLimitExceeded { limit: usize },
}

impl Error {
    /// 制限超過エラーかどうか
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(
            self,
            Error::KeyCountLimitExceeded { .. } | Error::KeyOrValueLengthLimitExceeded { .. }
        )
    }

    /// 超過した制限値
    pub fn limit(&self) -> usize {
        match self {
            Error::KeyCountLimitExceeded { limit } => *limit,
            Error::KeyOrValueLengthLimitExceeded { limit } => *limit,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyCountLimitExceeded { limit } => {
                write!(f, "Form key count limit {} exceeded.", limit)
            }
            Error::KeyOrValueLengthLimitExceeded { limit } => {
                write!(f, "Form key or value length limit {} exceeded.", limit)
            }
        }
    }
}

impl std::error::Error for Error {}
