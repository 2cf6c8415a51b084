//! Delimited Text Reader
//!
//! カンマ区切りテキストを`RawTable`に変換する。

use csv::{ReaderBuilder, Trim};

use crate::error::NoticeError;
use crate::security::InputLimits;
use crate::types::RawTable;

/// 区切り文字
const DELIMITER: u8 = b',';

/// 区切りテキストを解析する
///
/// 1行目をヘッダー、以降の空でない行をデータとして扱います。
/// 行が2行未満の場合はデータなし（`Ok(None)`）を返します。
///
/// # 引数
///
/// * `content` - 入力テキスト（UTF-8）
/// * `limits` - 入力制限
///
/// # 戻り値
///
/// * `Ok(Some(RawTable))` - ヘッダーとデータ行
/// * `Ok(None)` - 入力が短すぎる場合
/// * `Err(NoticeError)` - サイズ制限違反など
pub(crate) fn parse_delimited(
    content: &str,
    limits: &InputLimits,
) -> Result<Option<RawTable>, NoticeError> {
    limits.check_size(content.len())?;

    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.split('\n').count() < 2 {
        return Ok(None);
    }

    // 引用符は通常の文字として扱う
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(DELIMITER)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();

        if headers.is_none() {
            // csvは空行を読み飛ばすため、1行目が空行だった場合はここで補う
            let on_first_line = record.position().map_or(true, |p| p.line() == 1);
            if on_first_line {
                headers = Some(cells);
                continue;
            }
            headers = Some(vec![String::new()]);
        }

        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(cells);
    }

    let headers = headers.unwrap_or_else(|| vec![String::new()]);
    log::debug!(
        "parsed delimited input: {} columns, {} rows",
        headers.len(),
        rows.len()
    );

    Ok(Some(RawTable::new(headers, rows)))
}
