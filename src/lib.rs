//! land-notices - Bilingual (Telugu/English) land survey notices from landholder spreadsheets
//!
//! This crate turns a spreadsheet of landholder records into Form-19 ground-truthing
//! notices, one notice per holding (Khata) number, rendered as an HTML preview,
//! a printable HTML document, a Word-compatible `.doc` file, or a paginated PDF.
//!
//! The pipeline runs strictly one way:
//! input reader → field mapper → grouper → renderer → export.
//!
//! # Quick Start
//!
//! ```rust
//! use land_notices::{parse_csv, group_rows, FieldMapper, NoticeContext, RenderTarget, RendererBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let csv = "Col1,Col2,Col3,Col4\n12,55,Ravi,Rao\n13,55,Sita,Rao\n";
//!     let table = parse_csv(csv)?.ok_or("input too short")?;
//!
//!     // Map the semantic fields to the input headers
//!     let mut mapper = FieldMapper::new(table.headers.clone());
//!     mapper.set("Survey No", "Col1")?;
//!     mapper.set("Khata No", "Col2")?;
//!     mapper.set("Pattadar Name", "Col3")?;
//!     mapper.set("Relation Name", "Col4")?;
//!     let mapping = mapper.submit()?;
//!
//!     // One group per Khata number
//!     let groups = group_rows(&table.rows, &mapping.resolve(&table.headers));
//!     assert_eq!(groups.len(), 1);
//!
//!     let renderer = RendererBuilder::new().build()?;
//!     let ctx = NoticeContext {
//!         village: "Kondapur".to_string(),
//!         date: "2024-03-05".to_string(),
//!         ..Default::default()
//!     };
//!     let word = renderer.render(&groups, &ctx, RenderTarget::Word)?;
//!     assert!(String::from_utf8(word)?.contains("05-03-2024"));
//!
//!     Ok(())
//! }
//! ```
//!
//! # PDF with an embedded Telugu font
//!
//! ```rust,no_run
//! use land_notices::{RendererBuilder, RenderTarget, NoticeContext};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let renderer = RendererBuilder::new()
//!         .with_font_path("fonts/NotoSansTelugu-Regular.ttf")
//!         .with_page_margin_mm(15.0)
//!         .with_pdf_font_size(11.0)
//!         .build()?;
//!
//!     let pdf = renderer.render(&[], &NoticeContext::default(), RenderTarget::Pdf)?;
//!     std::fs::write("notices.pdf", pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! # Sessions and exports
//!
//! [`Session`] keeps the state of one run (context, table, mapping, groups) and records
//! the user-facing notifications; [`ExportCoordinator`] serializes exports and writes
//! files atomically.

mod api;
mod builder;
mod error;
mod export;
mod formatter;
mod grouping;
mod mapping;
mod output;
mod parser;
mod security;
mod session;
mod types;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod wasm;

// 公開API
pub use api::{ColumnWidth, InputFormat, RenderTarget};
pub use builder::{DocumentRenderer, RendererBuilder};
pub use error::NoticeError;
pub use export::{export_file_name, Export, ExportCoordinator, ExportGuard};
pub use formatter::{format_date, format_time};
pub use grouping::{group_rows, group_rows_with_fields};
pub use mapping::{FieldMapper, FieldMapping, FieldStatus};
pub use session::{Notification, Session, Severity};
pub use types::{
    find_field, FieldDefinition, GroupKey, IndexMapping, NoticeContext, NoticeGroup, RawTable,
    FIELD_CATALOG, KHATA_NO,
};

/// 区切りテキストを既定の入力制限で解析する
///
/// 2行未満の入力は`Ok(None)`になります。
///
/// ```rust
/// use land_notices::parse_csv;
///
/// let table = parse_csv("Survey No,Khata No\n12,55\n").unwrap().unwrap();
/// assert_eq!(table.headers, vec!["Survey No", "Khata No"]);
/// assert_eq!(table.rows, vec![vec!["12", "55"]]);
/// assert!(parse_csv("Survey No,Khata No").unwrap().is_none());
/// ```
pub fn parse_csv(content: &str) -> Result<Option<RawTable>, NoticeError> {
    parser::parse_delimited(content, &security::InputLimits::default())
}
