/// フォームデコーダーの制限設定
///
/// 長さはデコード後の UTF-8 バイト数で数える。
/// デフォルトはすべて無制限 (`usize::MAX`)。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLimits {
    /// 最大キー数 (重複を除いた数)
    pub key_count_limit: usize,
    /// 最大キー長
    pub key_length_limit: usize,
    /// 最大値長
    pub value_length_limit: usize,
}

impl Default for FormLimits {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl FormLimits {
    /// 推奨設定のキー数 (1024)
    pub const RECOMMENDED_KEY_COUNT_LIMIT: usize = 1024;
    /// 推奨設定のキー長 (2KB)
    pub const RECOMMENDED_KEY_LENGTH_LIMIT: usize = 2 * 1024;
    /// 推奨設定の値長 (4MB)
    pub const RECOMMENDED_VALUE_LENGTH_LIMIT: usize = 4 * 1024 * 1024;

    /// 制限なしの設定を作成
    pub fn unlimited() -> Self {
        Self {
            key_count_limit: usize::MAX,
            key_length_limit: usize::MAX,
            value_length_limit: usize::MAX,
        }
    }

    /// サーバー向けの推奨設定を作成
    ///
    /// キー数 1024、キー長 2KB、値長 4MB。
    pub fn recommended() -> Self {
        Self {
            key_count_limit: Self::RECOMMENDED_KEY_COUNT_LIMIT,
            key_length_limit: Self::RECOMMENDED_KEY_LENGTH_LIMIT,
            value_length_limit: Self::RECOMMENDED_VALUE_LENGTH_LIMIT,
        }
    }

    /// 最大キー数を設定
    pub fn with_key_count_limit(mut self, limit: usize) -> Self {
        self.key_count_limit = limit;
        self
    }

    /// 最大キー長を設定
    pub fn with_key_length_limit(mut self, limit: usize) -> Self {
        self.key_length_limit = limit;
        self
    }

    /// 最大値長を設定
    pub fn with_value_length_limit(mut self, limit: usize) -> Self {
        self.value_length_limit = limit;
        self
    }
}
