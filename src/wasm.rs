//! WASM Bindings
//!
//! ブラウザ上でCSVテキストから通知文書を生成するためのバインディング。
//! セッション内容（通知コンテキストと列マッピング）はJSONで受け取ります。

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::api::RenderTarget;
use crate::builder::RendererBuilder;
use crate::grouping::group_rows;
use crate::mapping::{FieldMapper, FieldMapping};
use crate::types::NoticeContext;

/// JavaScriptから渡されるセッション内容
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SessionRequest {
    context: NoticeContext,
    mapping: FieldMapping,
}

fn render(
    csv: &str,
    session_json: &str,
    target: RenderTarget,
    font: Option<Vec<u8>>,
) -> Result<Vec<u8>, String> {
    let request: SessionRequest = serde_json::from_str(session_json)
        .map_err(|e| format!("Invalid session description: {}", e))?;

    let mut builder = RendererBuilder::new();
    if let Some(bytes) = font {
        builder = builder.with_font_bytes(bytes);
    }
    let renderer = builder
        .build()
        .map_err(|e| format!("Failed to create renderer: {}", e))?;

    let table = crate::parse_csv(csv)
        .map_err(|e| format!("Failed to read CSV: {}", e))?
        .ok_or_else(|| "CSV must contain a header row and at least one data row".to_string())?;

    let mut mapper = FieldMapper::new(table.headers.clone());
    mapper
        .replace(request.mapping)
        .map_err(|e| e.to_string())?;
    let mapping = mapper.submit().map_err(|e| e.to_string())?;
    let groups = group_rows(&table.rows, &mapping.resolve(&table.headers));

    renderer
        .render(&groups, &request.context, target)
        .map_err(|e| e.to_string())
}

/// CSVのヘッダー行をJSON配列として返す
#[wasm_bindgen]
pub fn list_headers(csv: &str) -> Result<String, String> {
    let table = crate::parse_csv(csv)
        .map_err(|e| format!("Failed to read CSV: {}", e))?
        .ok_or_else(|| "CSV must contain a header row and at least one data row".to_string())?;
    serde_json::to_string(&table.headers).map_err(|e| e.to_string())
}

/// プレビュー用のHTML断片を生成
///
/// # Arguments
/// * `csv` - CSVテキスト
/// * `session_json` - `{"context": {...}, "mapping": {"Survey No": "Col1", ...}}`
#[wasm_bindgen]
pub fn render_preview(csv: &str, session_json: &str) -> Result<String, String> {
    let bytes = render(csv, session_json, RenderTarget::Preview, None)?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// Word互換文書（HTML）を生成
#[wasm_bindgen]
pub fn render_word(csv: &str, session_json: &str) -> Result<String, String> {
    let bytes = render(csv, session_json, RenderTarget::Word, None)?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// PDFを生成
///
/// `font`にテルグ文字を含むTrueTypeフォントを渡すと埋め込まれます。
#[wasm_bindgen]
pub fn render_pdf(csv: &str, session_json: &str, font: Option<Vec<u8>>) -> Result<Vec<u8>, String> {
    render(csv, session_json, RenderTarget::Pdf, font)
}

/// Get version information
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
