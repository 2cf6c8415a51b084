//! Workbook Reader
//!
//! calamineを使用して、ワークブックの最初のワークシートを`RawTable`に変換する。

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate};
use std::io::Cursor;

use crate::error::NoticeError;
use crate::security::InputLimits;
use crate::types::RawTable;

/// ワークブックを解析する
///
/// 最初のワークシートの1行目をヘッダー、以降の空でない行をデータとして扱います。
/// 区切りテキストと同じく、行が2行未満の場合は`Ok(None)`を返します。
///
/// # 引数
///
/// * `bytes` - ワークブックのバイト列
/// * `limits` - 入力制限
pub(crate) fn parse_workbook(
    bytes: &[u8],
    limits: &InputLimits,
) -> Result<Option<RawTable>, NoticeError> {
    limits.check_size(bytes.len())?;

    let mut sheets = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = match sheets.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(None),
    };

    let mut lines = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());

    let headers = match lines.next() {
        Some(headers) => headers,
        None => return Ok(None),
    };

    let mut rows = Vec::new();
    let mut line_count = 1usize;
    for cells in lines {
        line_count += 1;
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(cells);
    }

    if line_count < 2 {
        return Ok(None);
    }

    log::debug!(
        "parsed workbook: {} columns, {} rows",
        headers.len(),
        rows.len()
    );

    Ok(Some(RawTable::new(headers, rows)))
}

/// セル値を表示用文字列に変換
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => format_serial_date(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// 整数値の浮動小数点数は`.0`なしで出力する
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// シリアル日付値を`YYYY-MM-DD`に変換（1900年システム）
fn format_serial_date(serial: f64) -> String {
    let epoch = match NaiveDate::from_ymd_opt(1899, 12, 30) {
        Some(epoch) => epoch,
        None => return serial.to_string(),
    };
    epoch
        .checked_add_signed(Duration::days(serial.floor() as i64))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| serial.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(55.0), "55");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_format_serial_date() {
        // 45356 = 2024-03-05
        assert_eq!(format_serial_date(45356.0), "2024-03-05");
        assert_eq!(format_serial_date(45356.75), "2024-03-05");
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("  Ravi ".to_string())), "Ravi");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "TRUE");
    }

    #[test]
    fn test_invalid_workbook_is_error() {
        let result = parse_workbook(b"not a workbook", &InputLimits::default());
        assert!(result.is_err());
    }
}
