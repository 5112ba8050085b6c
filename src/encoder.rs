//! application/x-www-form-urlencoded ボディの生成

use crate::percent::encode_component;

/// Content-Type ヘッダー値
pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// フォームボディビルダー
///
/// # 例
///
/// ```
/// use shiguredo_form_urlencoded::FormBuilder;
///
/// let body = FormBuilder::new()
///     .pair("name", "山田 太郎")
///     .pair("tag", "a&b")
///     .build();
/// assert_eq!(body, "name=%E5%B1%B1%E7%94%B0+%E5%A4%AA%E9%83%8E&tag=a%26b");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    pairs: Vec<(String, String)>,
}

impl FormBuilder {
    /// 新しいビルダーを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ペアを追加
    pub fn pair(mut self, key: &str, value: &str) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Content-Type ヘッダー値を取得
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    /// ボディをビルド
    pub fn build(&self) -> String {
        let mut result = String::new();
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                result.push('&');
            }
            result.push_str(&encode_component(key));
            result.push('=');
            result.push_str(&encode_component(value));
        }
        result
    }
}
