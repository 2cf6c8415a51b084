//! Builder Module
//!
//! Fluent Builder APIを提供し、`DocumentRenderer`インスタンスを段階的に構築する。

use crate::api::{InputFormat, RenderTarget};
use crate::error::NoticeError;
use crate::output::{build_blocks, mm_to_pt, OutputFormatter, PdfFont, PdfLayout};
use crate::security::{InputLimits, DEFAULT_MAX_INPUT_BYTES};
use crate::types::{NoticeContext, NoticeGroup, RawTable};
use std::io::Write;
use std::path::PathBuf;

/// 余白の許容範囲（mm）
const MARGIN_RANGE_MM: (f32, f32) = (0.0, 50.0);

/// PDF本文の文字サイズの許容範囲（pt）
const FONT_SIZE_RANGE: (f32, f32) = (6.0, 24.0);

/// PDF出力に使用するフォントの指定
#[derive(Debug, Clone, Default)]
enum FontSource {
    #[default]
    None,
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// 描画処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct RenderConfig {
    /// PDFフォント
    font: FontSource,

    /// ページ余白（mm）
    pub page_margin_mm: f32,

    /// PDF本文の文字サイズ（pt）
    pub pdf_font_size: f32,

    /// 入力の最大バイト数
    pub max_input_bytes: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font: FontSource::None,
            page_margin_mm: 15.0,
            pdf_font_size: 11.0,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `DocumentRenderer`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use land_notices::RendererBuilder;
///
/// # fn main() -> Result<(), land_notices::NoticeError> {
/// let renderer = RendererBuilder::new()
///     .with_font_path("fonts/NotoSansTelugu-Regular.ttf")
///     .with_page_margin_mm(20.0)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RendererBuilder {
    /// 内部設定（構築中）
    config: RenderConfig,
}

impl RendererBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - フォント: なし（PDFはHelveticaで出力）
    /// - 余白: 15mm
    /// - PDF本文: 11pt
    /// - 入力上限: 64MiB
    pub fn new() -> Self {
        Self {
            config: RenderConfig::default(),
        }
    }

    /// PDFに埋め込むTrueType/OpenTypeフォントのパスを指定する
    ///
    /// ファイルは`build()`時に読み込まれます。読み込めない場合はHelveticaで出力します。
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font = FontSource::Path(path.into());
        self
    }

    /// PDFに埋め込むフォントをバイト列で指定する
    pub fn with_font_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.config.font = FontSource::Bytes(bytes);
        self
    }

    /// PDFのページ余白をmm単位で指定する
    ///
    /// # 制約
    ///
    /// * 0〜50mmの範囲でなければならない
    /// * 制約違反の場合、`build()`時に`NoticeError::Config`を返す
    pub fn with_page_margin_mm(mut self, margin: f32) -> Self {
        self.config.page_margin_mm = margin;
        self
    }

    /// PDF本文の文字サイズ（pt）を指定する
    ///
    /// # 制約
    ///
    /// * 6〜24ptの範囲でなければならない
    pub fn with_pdf_font_size(mut self, size: f32) -> Self {
        self.config.pdf_font_size = size;
        self
    }

    /// 入力ファイルの最大バイト数を指定する
    ///
    /// ```rust
    /// use land_notices::{RendererBuilder, NoticeError};
    ///
    /// let result = RendererBuilder::new().with_max_input_bytes(0).build();
    /// assert!(matches!(result, Err(NoticeError::Config(_))));
    /// ```
    pub fn with_max_input_bytes(mut self, bytes: u64) -> Self {
        self.config.max_input_bytes = bytes;
        self
    }

    /// 設定を検証して`DocumentRenderer`を構築する
    ///
    /// # 戻り値
    ///
    /// * `Ok(DocumentRenderer)` - 構築に成功した場合
    /// * `Err(NoticeError::Config)` - 設定値が範囲外の場合
    pub fn build(self) -> Result<DocumentRenderer, NoticeError> {
        let config = self.config;

        // 1. 余白の検証
        let margin = config.page_margin_mm;
        if !margin.is_finite() || margin < MARGIN_RANGE_MM.0 || margin > MARGIN_RANGE_MM.1 {
            return Err(NoticeError::Config(format!(
                "Invalid page margin: {} mm (expected {}-{} mm)",
                margin, MARGIN_RANGE_MM.0, MARGIN_RANGE_MM.1
            )));
        }

        // 2. 文字サイズの検証
        let size = config.pdf_font_size;
        if !size.is_finite() || size < FONT_SIZE_RANGE.0 || size > FONT_SIZE_RANGE.1 {
            return Err(NoticeError::Config(format!(
                "Invalid PDF font size: {} pt (expected {}-{} pt)",
                size, FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1
            )));
        }

        // 3. 入力上限の検証
        if config.max_input_bytes == 0 {
            return Err(NoticeError::Config(
                "Maximum input size must be greater than zero".to_string(),
            ));
        }

        // 4. フォントの読み込み（失敗時はフォールバック）
        let font = match &config.font {
            FontSource::None => PdfFont::load_or_fallback(None),
            FontSource::Bytes(bytes) => PdfFont::load_or_fallback(Some(bytes.as_slice())),
            FontSource::Path(path) => match std::fs::read(path) {
                Ok(bytes) => PdfFont::load_or_fallback(Some(bytes.as_slice())),
                Err(e) => {
                    log::warn!("cannot read font {}: {}", path.display(), e);
                    PdfFont::load_or_fallback(None)
                }
            },
        };

        Ok(DocumentRenderer {
            layout: PdfLayout {
                margin: mm_to_pt(margin),
                body_size: size,
            },
            limits: InputLimits {
                max_input_bytes: config.max_input_bytes,
            },
            font,
        })
    }
}

/// 入力の読み込みと通知文書の描画を行う構造体
///
/// `RendererBuilder::build()`で生成します。状態を持たないため、同じインスタンスで
/// 何度でも描画できます。
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    layout: PdfLayout,
    limits: InputLimits,
    font: PdfFont,
}

impl DocumentRenderer {
    /// 入力バイト列を`RawTable`に読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(Some(RawTable))` - 読み込みに成功した場合
    /// * `Ok(None)` - 入力が2行未満の場合
    /// * `Err(NoticeError)` - 入力上限超過、またはワークブックの解析に失敗した場合
    pub fn read_table(
        &self,
        bytes: &[u8],
        format: InputFormat,
    ) -> Result<Option<RawTable>, NoticeError> {
        let table = crate::parser::read_table(bytes, format, &self.limits)?;
        match &table {
            Some(t) => log::info!(
                "loaded {} rows with {} columns",
                t.row_count(),
                t.headers.len()
            ),
            None => log::info!("input has fewer than two lines; nothing loaded"),
        }
        Ok(table)
    }

    /// グループを指定ターゲットで描画し、バイト列として返す
    ///
    /// 描画はすべてメモリ上で行われるため、失敗時に部分的な出力は返りません。
    ///
    /// ```rust
    /// use land_notices::{NoticeContext, RenderTarget, RendererBuilder};
    ///
    /// # fn main() -> Result<(), land_notices::NoticeError> {
    /// let renderer = RendererBuilder::new().build()?;
    /// let html = renderer.render(&[], &NoticeContext::default(), RenderTarget::Word)?;
    /// assert!(String::from_utf8_lossy(&html).starts_with("<!DOCTYPE html>"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn render(
        &self,
        groups: &[NoticeGroup],
        ctx: &NoticeContext,
        target: RenderTarget,
    ) -> Result<Vec<u8>, NoticeError> {
        let mut buffer = Vec::new();
        self.render_to(groups, ctx, target, &mut buffer)?;
        Ok(buffer)
    }

    /// グループを指定ターゲットで描画し、ライターに書き込む
    ///
    /// # 引数
    ///
    /// * `groups` - 描画するグループ
    /// * `ctx` - 通知コンテキスト（空の値はプレースホルダーになります）
    /// * `target` - 描画ターゲット
    /// * `writer` - 出力先
    pub fn render_to<W: Write>(
        &self,
        groups: &[NoticeGroup],
        ctx: &NoticeContext,
        target: RenderTarget,
        writer: &mut W,
    ) -> Result<(), NoticeError> {
        let blocks = build_blocks(groups, ctx);
        let formatter = OutputFormatter::from_target(target, self.layout);
        formatter.render(&blocks, &self.font, writer)?;
        log::debug!("rendered {} groups as {:?}", groups.len(), target);
        Ok(())
    }

    /// PDFがHelveticaのフォールバックで出力されるかどうか
    pub fn uses_fallback_font(&self) -> bool {
        self.font.is_fallback()
    }

    /// 入力の最大バイト数
    pub fn max_input_bytes(&self) -> u64 {
        self.limits.max_input_bytes
    }
}
