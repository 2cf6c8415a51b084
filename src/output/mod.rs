//! Output Format Module
//!
//! Strategy Patternによる描画ターゲットの抽象化を提供するモジュール。

mod font;
mod html;
mod pdf;
mod template;

use crate::api::RenderTarget;
use crate::error::NoticeError;
use std::io::Write;

pub(crate) use font::PdfFont;
pub(crate) use html::{PreviewFormatter, PrintFormatter, WordFormatter};
pub(crate) use pdf::{mm_to_pt, PdfFormatter, PdfLayout};
pub(crate) use template::{build_blocks, NoticeBlock};

/// 出力フォーマッター（Strategy Pattern）
///
/// 各描画ターゲット（プレビュー、印刷、Word、PDF）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub(crate) enum OutputFormatter {
    Preview,
    Print,
    Word,
    Pdf(PdfLayout),
}

impl OutputFormatter {
    /// 描画ターゲットからフォーマッターを生成
    pub fn from_target(target: RenderTarget, layout: PdfLayout) -> Self {
        match target {
            RenderTarget::Preview => OutputFormatter::Preview,
            RenderTarget::Print => OutputFormatter::Print,
            RenderTarget::Word => OutputFormatter::Word,
            RenderTarget::Pdf => OutputFormatter::Pdf(layout),
        }
    }

    /// 通知ブロックを指定されたターゲットで出力する
    ///
    /// # 引数
    ///
    /// * `blocks` - グループごとの通知ブロック
    /// * `font` - PDF出力に使用するフォント（使用グリフの記録のため描画ごとに複製されます）
    /// * `writer` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 出力に成功した場合
    /// * `Err(NoticeError)` - エラーが発生した場合
    pub fn render<W: Write>(
        &self,
        blocks: &[NoticeBlock],
        font: &PdfFont,
        writer: &mut W,
    ) -> Result<(), NoticeError> {
        match self {
            OutputFormatter::Preview => PreviewFormatter.render(blocks, writer),
            OutputFormatter::Print => PrintFormatter.render(blocks, writer),
            OutputFormatter::Word => WordFormatter.render(blocks, writer),
            OutputFormatter::Pdf(layout) => {
                let mut font = font.clone();
                PdfFormatter.render(blocks, &mut font, *layout, writer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PdfLayout {
        PdfLayout {
            margin: mm_to_pt(15.0),
            body_size: 11.0,
        }
    }

    #[test]
    fn test_from_target() {
        assert!(matches!(
            OutputFormatter::from_target(RenderTarget::Word, layout()),
            OutputFormatter::Word
        ));
        assert!(matches!(
            OutputFormatter::from_target(RenderTarget::Pdf, layout()),
            OutputFormatter::Pdf(_)
        ));
    }

    #[test]
    fn test_render_empty_preview() {
        let mut out = Vec::new();
        OutputFormatter::Preview
            .render(&[], &PdfFont::Helvetica, &mut out)
            .unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("ground-truth-notice"));
        assert!(!html.contains("khata-group"));
    }
}
