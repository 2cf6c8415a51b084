//! Session Module
//!
//! 1回の作業単位（入力の読み込み → 列マッピング → プレビュー → エクスポート）の状態と、
//! 各段階で利用者に表示する通知を管理するモジュール。

use crate::api::{InputFormat, RenderTarget};
use crate::builder::DocumentRenderer;
use crate::error::NoticeError;
use crate::export::{Export, ExportCoordinator};
use crate::grouping::group_rows;
use crate::mapping::{FieldMapper, FieldMapping};
use crate::types::{NoticeContext, NoticeGroup, RawTable};

/// 通知の重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// 通常の通知
    Info,
    /// 失敗の通知
    Destructive,
}

/// 利用者に表示する通知（トースト）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    fn destructive(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity: Severity::Destructive,
        }
    }
}

/// 作業セッション
///
/// 通知コンテキスト、読み込んだ表、列マッパー、確定したグループを保持します。
/// エクスポートに失敗してもセッションは引き続き使用できます。
///
/// ```rust
/// use land_notices::{InputFormat, RendererBuilder, Session};
///
/// # fn main() -> Result<(), land_notices::NoticeError> {
/// let mut session = Session::new(RendererBuilder::new().build()?);
/// let csv = "Survey No,Khata No,Pattadar Name,Relation Name\n12,55,Ravi,Rao\n";
/// assert!(session.load(csv.as_bytes(), InputFormat::Delimited)?);
///
/// if let Some(mapper) = session.mapper_mut() {
///     mapper.auto_map();
/// }
/// let groups = session.submit_mapping()?;
/// assert_eq!(groups.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session {
    context: NoticeContext,
    table: Option<RawTable>,
    mapper: Option<FieldMapper>,
    groups: Option<Vec<NoticeGroup>>,
    renderer: DocumentRenderer,
    exporter: ExportCoordinator,
    notifications: Vec<Notification>,
}

impl Session {
    /// 新しいセッションを生成
    pub fn new(renderer: DocumentRenderer) -> Self {
        Self {
            context: NoticeContext::default(),
            table: None,
            mapper: None,
            groups: None,
            renderer,
            exporter: ExportCoordinator::new(),
            notifications: Vec::new(),
        }
    }

    /// 通知コンテキスト
    pub fn context(&self) -> &NoticeContext {
        &self.context
    }

    /// 通知コンテキストを編集する（次回の描画から反映されます）
    pub fn context_mut(&mut self) -> &mut NoticeContext {
        &mut self.context
    }

    pub fn set_context(&mut self, context: NoticeContext) {
        self.context = context;
    }

    /// 入力を読み込む
    ///
    /// 読み込みに成功すると、以前のマッピングとグループは破棄されます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(true)` - 表を読み込んだ場合
    /// * `Ok(false)` - 入力が2行未満で何も読み込まなかった場合（状態は変わりません）
    pub fn load(&mut self, bytes: &[u8], format: InputFormat) -> Result<bool, NoticeError> {
        match self.renderer.read_table(bytes, format)? {
            Some(table) => {
                self.load_table(table);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 解析済みの表を読み込む
    pub fn load_table(&mut self, table: RawTable) {
        self.notifications.push(Notification::info(
            "CSV Uploaded Successfully",
            format!("{} rows loaded. Please map the columns.", table.row_count()),
        ));
        self.mapper = Some(FieldMapper::new(table.headers.clone()));
        self.table = Some(table);
        self.groups = None;
    }

    /// 読み込んだ表
    pub fn table(&self) -> Option<&RawTable> {
        self.table.as_ref()
    }

    /// 列マッパー（表の読み込み後のみ）
    pub fn mapper(&self) -> Option<&FieldMapper> {
        self.mapper.as_ref()
    }

    pub fn mapper_mut(&mut self) -> Option<&mut FieldMapper> {
        self.mapper.as_mut()
    }

    /// マッピングを一括で設定する（JSONから読み込んだマッピングなど）
    pub fn apply_mapping(&mut self, mapping: FieldMapping) -> Result<(), NoticeError> {
        self.mapper
            .as_mut()
            .ok_or(NoticeError::NoMappingSubmitted)?
            .replace(mapping)
    }

    /// マッピングを確定し、グループを計算する
    ///
    /// # エラー
    ///
    /// * `NoticeError::NoMappingSubmitted` - 表が読み込まれていない場合
    /// * `NoticeError::IncompleteMapping` - 必須フィールドが未マッピングの場合
    pub fn submit_mapping(&mut self) -> Result<&[NoticeGroup], NoticeError> {
        let (table, mapper) = match (&self.table, &self.mapper) {
            (Some(table), Some(mapper)) => (table, mapper),
            _ => return Err(NoticeError::NoMappingSubmitted),
        };

        let mapping = mapper.submit()?;
        let resolved = mapping.resolve(&table.headers);
        let groups = group_rows(&table.rows, &resolved);
        log::info!(
            "computed {} notice groups from {} rows",
            groups.len(),
            table.row_count()
        );

        self.notifications.push(Notification::info(
            "Column Mapping Complete",
            "Preview generated. You can now print the notices.",
        ));
        Ok(self.groups.insert(groups).as_slice())
    }

    /// 確定済みのグループ
    pub fn groups(&self) -> Option<&[NoticeGroup]> {
        self.groups.as_deref()
    }

    fn submitted_groups(&self) -> Result<&[NoticeGroup], NoticeError> {
        self.groups.as_deref().ok_or(NoticeError::NoMappingSubmitted)
    }

    /// プレビュー（HTML断片）を描画する
    pub fn preview(&self) -> Result<String, NoticeError> {
        let bytes = self
            .renderer
            .render(self.submitted_groups()?, &self.context, RenderTarget::Preview)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// 印刷用HTML文書をエクスポートする
    pub fn print(&self) -> Result<Export, NoticeError> {
        let groups = self.submitted_groups()?;
        self.exporter.print(&self.renderer, groups, &self.context)
    }

    /// Word文書をエクスポートする
    pub fn export_word(&mut self) -> Result<Export, NoticeError> {
        let result = self
            .submitted_groups()
            .and_then(|groups| self.exporter.word(&self.renderer, groups, &self.context));
        let notification = match &result {
            Ok(_) => Notification::info(
                "Word Document Downloaded Successfully",
                "Land notices have been saved to your device.",
            ),
            Err(e) => {
                log::error!("Word export failed: {}", e);
                Notification::destructive(
                    "Word Document Generation Failed",
                    "There was an error creating the document. Please try again.",
                )
            }
        };
        self.notifications.push(notification);
        result
    }

    /// PDFをエクスポートする
    pub fn export_pdf(&mut self) -> Result<Export, NoticeError> {
        self.notifications.push(Notification::info(
            "Preparing PDF",
            "Please wait while we generate your PDF...",
        ));
        let result = self
            .submitted_groups()
            .and_then(|groups| self.exporter.pdf(&self.renderer, groups, &self.context));
        let notification = match &result {
            Ok(_) => Notification::info(
                "PDF Downloaded Successfully",
                "Land notices have been saved as a PDF document with selectable text.",
            ),
            Err(e) => {
                log::error!("PDF export failed: {}", e);
                Notification::destructive(
                    "PDF Generation Failed",
                    "There was an error creating the PDF. Please try again.",
                )
            }
        };
        self.notifications.push(notification);
        result
    }

    /// 溜まった通知を取り出す
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
