//! Parser Module
//!
//! 入力ファイル（区切りテキスト、ワークブック）を`RawTable`に変換するモジュール。

mod delimited;
mod workbook;

use crate::api::InputFormat;
use crate::error::NoticeError;
use crate::security::InputLimits;
use crate::types::RawTable;

pub(crate) use delimited::parse_delimited;
pub(crate) use workbook::parse_workbook;

/// 入力バイト列を指定形式で解析する
///
/// 区切りテキストはUTF-8として解釈し、不正なバイト列は置換文字に変換します。
pub(crate) fn read_table(
    bytes: &[u8],
    format: InputFormat,
    limits: &InputLimits,
) -> Result<Option<RawTable>, NoticeError> {
    match format {
        InputFormat::Delimited => parse_delimited(&String::from_utf8_lossy(bytes), limits),
        InputFormat::Workbook => parse_workbook(bytes, limits),
    }
}
