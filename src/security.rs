//! Security Module
//!
//! 入力サイズの制限と、出力ファイル名の無害化を提供するモジュール。

use crate::error::NoticeError;

/// 入力ファイルの既定最大サイズ（64MiB）
pub(crate) const DEFAULT_MAX_INPUT_BYTES: u64 = 64 * 1024 * 1024;

/// 入力制限
///
/// 読み込み時に適用されるサイズ上限を定義します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InputLimits {
    /// 入力の最大バイト数
    pub max_input_bytes: u64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl InputLimits {
    /// 入力サイズを検証
    pub fn check_size(&self, len: usize) -> Result<(), NoticeError> {
        if len as u64 > self.max_input_bytes {
            return Err(NoticeError::InputLimit(format!(
                "input is {} bytes (max: {} bytes)",
                len, self.max_input_bytes
            )));
        }
        Ok(())
    }
}

/// ファイル名の一部として安全な文字列に変換する
///
/// 村名などのユーザー入力をダウンロードファイル名に埋め込むため、
/// パス区切り文字・制御文字・Windowsの予約文字を`_`に置き換えます。
/// `..`のみの名前や空文字列は`fallback`になります。
pub(crate) fn sanitize_file_component(value: &str, fallback: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        fallback.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_size() {
        let limits = InputLimits { max_input_bytes: 10 };
        assert!(limits.check_size(10).is_ok());
        assert!(matches!(
            limits.check_size(11),
            Err(NoticeError::InputLimit(_))
        ));
    }

    #[test]
    fn test_sanitize_plain_names() {
        assert_eq!(sanitize_file_component("Kondapur", "village"), "Kondapur");
        assert_eq!(sanitize_file_component("కొండాపూర్", "village"), "కొండాపూర్");
    }

    #[test]
    fn test_sanitize_empty_uses_fallback() {
        assert_eq!(sanitize_file_component("", "village"), "village");
        assert_eq!(sanitize_file_component("   ", "village"), "village");
        assert_eq!(sanitize_file_component("..", "village"), "village");
    }

    #[test]
    fn test_sanitize_path_traversal() {
        assert_eq!(sanitize_file_component("../etc/passwd", "village"), ".._etc_passwd");
        assert_eq!(sanitize_file_component("a\\b:c", "village"), "a_b_c");
        assert_eq!(sanitize_file_component("a\nb", "village"), "a_b");
    }
}
