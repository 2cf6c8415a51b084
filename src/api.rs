//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::path::Path;

/// 入力ファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputFormat {
    /// カンマ区切りテキスト（1行目がヘッダー）
    ///
    /// 引用符は解釈しません。各セルの前後の空白は除去されます。
    Delimited,

    /// Excelワークブック（最初のワークシートのみ）
    Workbook,
}

impl InputFormat {
    /// ファイルの拡張子から入力形式を判定する
    ///
    /// `.xlsx`/`.xlsm`はワークブック、それ以外は区切りテキストとして扱います。
    ///
    /// ```rust
    /// use land_notices::InputFormat;
    ///
    /// assert_eq!(InputFormat::from_path("owners.XLSX"), InputFormat::Workbook);
    /// assert_eq!(InputFormat::from_path("owners.csv"), InputFormat::Delimited);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("xlsx") | Some("xlsm") => InputFormat::Workbook,
            _ => InputFormat::Delimited,
        }
    }
}

/// 描画ターゲット
///
/// 同じ論理構造（ヘッダー、本文、表、フッター）を、出力先ごとに異なる形で実現します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RenderTarget {
    /// 画面プレビュー用のHTML断片
    ///
    /// ヘッダーと本文は先頭に1回だけ表示し、各グループは印刷用のヘッダーと
    /// 自身の表・フッターを持ちます。
    Preview,

    /// 印刷用の完全なHTML文書（プレビューに印刷用CSSを付与したもの）
    Print,

    /// Word互換文書（CSS埋め込みHTML、`.doc`）
    ///
    /// グループごとに1ページ。最後のグループ以外の後に改ページが入ります。
    Word,

    /// ページ分割されたPDF
    Pdf,
}

impl RenderTarget {
    /// 出力のMIMEタイプ
    pub fn mime_type(&self) -> &'static str {
        match self {
            RenderTarget::Preview | RenderTarget::Print => "text/html; charset=utf-8",
            RenderTarget::Word => "application/msword",
            RenderTarget::Pdf => "application/pdf",
        }
    }

    /// 出力ファイルの拡張子
    pub fn extension(&self) -> &'static str {
        match self {
            RenderTarget::Preview | RenderTarget::Print => "html",
            RenderTarget::Word => "doc",
            RenderTarget::Pdf => "pdf",
        }
    }
}

/// 表の列幅指定
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// 固定幅（px）
    Fixed(f32),
    /// 残り幅を自動配分
    Auto,
}
