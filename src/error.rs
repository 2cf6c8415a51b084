//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// land-noticesクレート全体で使用するエラー型
///
/// 入力ファイルの読み込み、列マッピング、通知文書の生成、エクスポート処理中に
/// 発生するすべてのエラーを統一的に扱うために使用されます。
///
/// 入力が短すぎる場合（2行未満）はエラーではなく`Ok(None)`として扱われます。
///
/// # 使用例
///
/// ```rust,no_run
/// use land_notices::NoticeError;
/// use std::fs::File;
///
/// fn open_input(path: &str) -> Result<(), NoticeError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum NoticeError {
    /// I/O操作中に発生したエラー
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 区切り文字テキストの読み込みエラー
    #[error("Failed to read delimited input: {0}")]
    Csv(#[from] csv::Error),

    /// ワークブック（.xlsx）の解析エラー
    ///
    /// `#[from]`属性により、`calamine::Error`から自動的に変換されます。
    #[error("Failed to parse workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// JSON（通知コンテキスト、列マッピング）の解析エラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PDF文書の生成エラー
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// フォントの読み込み・解析エラー
    #[error("Font error: {0}")]
    Font(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `RendererBuilder::build()`時に無効な設定が検出された場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use land_notices::{RendererBuilder, NoticeError};
    ///
    /// let result = RendererBuilder::new()
    ///     .with_page_margin_mm(80.0)  // 無効な余白
    ///     .build();
    ///
    /// match result {
    ///     Err(NoticeError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 入力サイズ制限に違反したエラー
    #[error("Input limit exceeded: {0}")]
    InputLimit(String),

    /// フィールドカタログに存在しないフィールド名
    #[error("Unknown field: '{0}'")]
    UnknownField(String),

    /// 必須フィールドが未マッピングのまま送信された
    #[error("Required fields are not mapped: {}", .missing.join(", "))]
    IncompleteMapping {
        /// 未マッピングの必須フィールド（正規名）
        missing: Vec<String>,
    },

    /// マッピング送信前に通知グループを要求した
    #[error("No data to render: load a table and submit the field mapping first")]
    NoMappingSubmitted,

    /// 別のエクスポート処理が実行中
    #[error("Another export is already in progress")]
    ExportInProgress,
}
