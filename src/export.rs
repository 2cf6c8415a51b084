//! Export Module
//!
//! 印刷用HTML、Word文書、PDFのエクスポートを提供するモジュール。
//! 同時に実行できるエクスポートは1つだけです。

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tempfile::NamedTempFile;

use crate::api::RenderTarget;
use crate::builder::DocumentRenderer;
use crate::error::NoticeError;
use crate::security::sanitize_file_component;
use crate::types::{NoticeContext, NoticeGroup};

/// ファイル名の接頭辞
const FILE_PREFIX: &str = "land-notices";

/// 村名が空の場合にファイル名に使う文字列
const DEFAULT_VILLAGE: &str = "village";

/// エクスポート結果
///
/// 描画済みのバイト列と、ダウンロード時のファイル名・MIMEタイプを保持します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// ファイル名（例: `land-notices-Kondapur.doc`）
    pub file_name: String,
    /// MIMEタイプ
    pub mime_type: &'static str,
    /// 文書のバイト列
    pub bytes: Vec<u8>,
}

impl Export {
    /// 指定ディレクトリにファイルとして書き出す
    ///
    /// 一時ファイルに書き込んでから名前を変更するため、失敗しても部分的なファイルは残りません。
    /// 同名のファイルは置き換えられます。
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, NoticeError> {
        let dir = dir.as_ref();
        let target = dir.join(&self.file_name);

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&self.bytes)?;
        tmp.flush()?;
        tmp.persist(&target).map_err(|e| NoticeError::Io(e.error))?;

        log::info!("wrote {} ({} bytes)", target.display(), self.bytes.len());
        Ok(target)
    }
}

/// エクスポートのファイル名を生成する
///
/// ```rust
/// use land_notices::{export_file_name, RenderTarget};
///
/// assert_eq!(export_file_name("Kondapur", RenderTarget::Word), "land-notices-Kondapur.doc");
/// assert_eq!(export_file_name("", RenderTarget::Pdf), "land-notices-village.pdf");
/// ```
pub fn export_file_name(village: &str, target: RenderTarget) -> String {
    format!(
        "{}-{}.{}",
        FILE_PREFIX,
        sanitize_file_component(village, DEFAULT_VILLAGE),
        target.extension()
    )
}

/// 実行中のエクスポートを表すガード
///
/// ドロップ時にビジーフラグを解除します。
#[derive(Debug)]
pub struct ExportGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// エクスポートの調停役
///
/// ビジーフラグにより、エクスポートの実行中に開始された別のエクスポートを
/// `NoticeError::ExportInProgress`で拒否します。
#[derive(Debug, Default)]
pub struct ExportCoordinator {
    busy: AtomicBool,
}

impl ExportCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// エクスポートが実行中かどうか
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// エクスポートの開始を試みる
    ///
    /// # エラー
    ///
    /// * `NoticeError::ExportInProgress` - 別のエクスポートが実行中の場合
    pub fn try_begin(&self) -> Result<ExportGuard<'_>, NoticeError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| NoticeError::ExportInProgress)?;
        Ok(ExportGuard { busy: &self.busy })
    }

    /// 印刷用のHTML文書
    pub fn print(
        &self,
        renderer: &DocumentRenderer,
        groups: &[NoticeGroup],
        ctx: &NoticeContext,
    ) -> Result<Export, NoticeError> {
        self.export(renderer, groups, ctx, RenderTarget::Print)
    }

    /// Word互換文書（`.doc`）
    pub fn word(
        &self,
        renderer: &DocumentRenderer,
        groups: &[NoticeGroup],
        ctx: &NoticeContext,
    ) -> Result<Export, NoticeError> {
        self.export(renderer, groups, ctx, RenderTarget::Word)
    }

    /// PDF文書
    pub fn pdf(
        &self,
        renderer: &DocumentRenderer,
        groups: &[NoticeGroup],
        ctx: &NoticeContext,
    ) -> Result<Export, NoticeError> {
        self.export(renderer, groups, ctx, RenderTarget::Pdf)
    }

    fn export(
        &self,
        renderer: &DocumentRenderer,
        groups: &[NoticeGroup],
        ctx: &NoticeContext,
        target: RenderTarget,
    ) -> Result<Export, NoticeError> {
        let _guard = self.try_begin()?;
        let bytes = renderer.render(groups, ctx, target)?;
        Ok(Export {
            file_name: export_file_name(&ctx.village, target),
            mime_type: target.mime_type(),
            bytes,
        })
    }
}
