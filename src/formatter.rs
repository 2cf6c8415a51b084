//! Formatter Module
//!
//! 通知文書に埋め込む値（日付、時刻、プレースホルダー）のフォーマット処理を提供するモジュール。

use chrono::{NaiveDate, NaiveTime};

/// 日付として解釈を試みる書式
const DATE_INPUT_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

/// 時刻として解釈を試みる書式
const TIME_INPUT_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// 日付を`DD-MM-YYYY`形式（インドの地域慣習）に変換
///
/// 解釈できない場合は入力をそのまま返します。空文字列は空文字列のままです。
///
/// ```rust
/// use land_notices::format_date;
///
/// assert_eq!(format_date("2024-03-05"), "05-03-2024");
/// assert_eq!(format_date("next week"), "next week");
/// ```
pub fn format_date(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(|date| date.format("%d-%m-%Y").to_string())
        .unwrap_or_else(|| input.to_string())
}

/// 24時間表記の時刻を12時間表記（AM/PM）に変換
///
/// 解釈できない場合は入力をそのまま返します。
///
/// ```rust
/// use land_notices::format_time;
///
/// assert_eq!(format_time("14:30"), "2:30 PM");
/// assert_eq!(format_time("00:05"), "12:05 AM");
/// ```
pub fn format_time(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    TIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .map(|time| time.format("%-I:%M %p").to_string())
        .unwrap_or_else(|| input.to_string())
}

/// 空の値をプレースホルダー（下線の並び）に置き換える
pub(crate) fn or_placeholder(value: &str, width: usize) -> String {
    if value.trim().is_empty() {
        "_".repeat(width)
    } else {
        value.to_string()
    }
}

/// HTML特殊文字をエスケープ
pub(crate) fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_iso() {
        assert_eq!(format_date("2024-03-05"), "05-03-2024");
        assert_eq!(format_date("2024-12-31"), "31-12-2024");
    }

    #[test]
    fn test_format_date_other_inputs() {
        assert_eq!(format_date("2024/03/05"), "05-03-2024");
        assert_eq!(format_date("05/03/2024"), "05-03-2024");
        assert_eq!(format_date(" 2024-03-05 "), "05-03-2024");
    }

    #[test]
    fn test_format_date_fallback() {
        assert_eq!(format_date("2024-02-30"), "2024-02-30");
        assert_eq!(format_date("tomorrow"), "tomorrow");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time("14:30"), "2:30 PM");
        assert_eq!(format_time("09:00"), "9:00 AM");
        assert_eq!(format_time("12:00"), "12:00 PM");
        assert_eq!(format_time("00:00"), "12:00 AM");
        assert_eq!(format_time("23:59:10"), "11:59 PM");
    }

    #[test]
    fn test_format_time_fallback() {
        assert_eq!(format_time("25:00"), "25:00");
        assert_eq!(format_time("noon"), "noon");
        assert_eq!(format_time(""), "");
    }

    #[test]
    fn test_or_placeholder() {
        assert_eq!(or_placeholder("", 5), "_____");
        assert_eq!(or_placeholder("  ", 3), "___");
        assert_eq!(or_placeholder("Medak", 5), "Medak");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape_html("భర్త/తండ్రి పేరు"), "భర్త/తండ్రి పేరు");
    }
}
