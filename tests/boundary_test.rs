//! Boundary Tests for land-notices
//!
//! Edge cases of the input readers, the grouper and the renderer.

use land_notices::{
    group_rows, parse_csv, GroupKey, IndexMapping, InputFormat, NoticeContext, NoticeError,
    RenderTarget, RendererBuilder, KHATA_NO,
};
use rust_xlsxwriter::*;

// Helper module for generating boundary test fixtures
mod fixtures {
    use super::*;

    /// Workbook with an empty sheet (no cells)
    pub fn generate_empty_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("EmptySheet")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Workbook with a header row only
    pub fn generate_header_only() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Survey No")?;
        worksheet.write_string(0, 1, "Khata No")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Corrupted workbook (invalid ZIP)
    pub fn generate_corrupted_file() -> Vec<u8> {
        b"PK\x03\x04 this is not really a workbook".to_vec()
    }
}

fn khata_at(idx: usize) -> IndexMapping {
    let mut mapping = IndexMapping::new();
    mapping.insert(KHATA_NO.to_string(), idx);
    mapping
}

#[test]
fn test_empty_input() {
    assert!(parse_csv("").unwrap().is_none());
}

#[test]
fn test_header_without_newline() {
    assert!(parse_csv("Survey No,Khata No,Pattadar Name").unwrap().is_none());
}

#[test]
fn test_header_with_trailing_newline_has_no_rows() {
    let table = parse_csv("Survey No,Khata No\n").unwrap().unwrap();
    assert_eq!(table.headers.len(), 2);
    assert_eq!(table.row_count(), 0);
}

#[test]
fn test_only_blank_data_lines() {
    let table = parse_csv("A,B\n\n,\n  ,  \n").unwrap().unwrap();
    assert_eq!(table.row_count(), 0);
}

#[test]
fn test_duplicate_headers_first_occurrence_wins() {
    let table = parse_csv("Khata,Khata\n1,2\n").unwrap().unwrap();
    let mut mapper = land_notices::FieldMapper::new(table.headers.clone());
    mapper.set("Khata No", "Khata").unwrap();
    let resolved = mapper.mapping().resolve(&table.headers);
    assert_eq!(resolved.get(KHATA_NO), Some(&0));
}

#[test]
fn test_key_column_beyond_short_row() {
    let rows = vec![vec!["only".to_string()]];
    let groups = group_rows(&rows, &khata_at(3));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, GroupKey::Unknown);
}

#[test]
fn test_single_row_single_group() {
    let rows = vec![vec!["1".to_string(), "55".to_string()]];
    let groups = group_rows(&rows, &khata_at(1));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].rows.len(), 1);
}

#[test]
fn test_zero_groups_render() {
    let renderer = RendererBuilder::new().build().unwrap();
    let ctx = NoticeContext::default();

    let preview = String::from_utf8(renderer.render(&[], &ctx, RenderTarget::Preview).unwrap()).unwrap();
    assert!(!preview.contains("<table"));

    let word = String::from_utf8(renderer.render(&[], &ctx, RenderTarget::Word).unwrap()).unwrap();
    assert!(!word.contains("notice-section"));

    let pdf = renderer.render(&[], &ctx, RenderTarget::Pdf).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn test_very_long_cell_content_wraps_in_pdf() {
    let long = "x".repeat(2000);
    let rows = vec![vec!["1".to_string(), "55".to_string(), long]];
    let mut mapping = khata_at(1);
    mapping.insert("Pattadar Name".to_string(), 2);
    let groups = group_rows(&rows, &mapping);

    let renderer = RendererBuilder::new().build().unwrap();
    let pdf = renderer
        .render(&groups, &NoticeContext::default(), RenderTarget::Pdf)
        .unwrap();
    let doc = lopdf::Document::load_mem(&pdf).unwrap();
    assert!(doc.get_pages().len() > 1);

    // 1ページに収まらないセルも、すべての文字がページ内に描画される
    let mut drawn = 0;
    for page_id in doc.get_pages().values() {
        let content = lopdf::content::Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
        for op in &content.operations {
            match op.operator.as_str() {
                "Td" => assert!(op.operands[1].as_float().unwrap() >= 0.0),
                "Tj" => {
                    let text = op.operands[0].as_str().unwrap();
                    if !text.is_empty() && text.iter().all(|b| *b == b'x') {
                        drawn += text.len();
                    }
                }
                _ => {}
            }
        }
    }
    assert_eq!(drawn, 2000);
}

#[test]
fn test_many_rows_paginate() {
    let rows: Vec<Vec<String>> = (0..200)
        .map(|i| vec![i.to_string(), "55".to_string()])
        .collect();
    let groups = group_rows(&rows, &khata_at(1));
    assert_eq!(groups.len(), 1);

    let renderer = RendererBuilder::new().build().unwrap();
    let pdf = renderer
        .render(&groups, &NoticeContext::default(), RenderTarget::Pdf)
        .unwrap();
    let doc = lopdf::Document::load_mem(&pdf).unwrap();
    assert!(doc.get_pages().len() > 3);
}

#[test]
fn test_markup_in_cells_is_escaped() {
    let rows = vec![vec!["<script>".to_string(), "a&b".to_string()]];
    let mut mapping = khata_at(1);
    mapping.insert("Survey No".to_string(), 0);
    let groups = group_rows(&rows, &mapping);

    let renderer = RendererBuilder::new().build().unwrap();
    let html = String::from_utf8(
        renderer
            .render(&groups, &NoticeContext::default(), RenderTarget::Word)
            .unwrap(),
    )
    .unwrap();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("a&amp;b"));
}

#[test]
fn test_unparseable_date_and_time_are_kept() {
    let renderer = RendererBuilder::new().build().unwrap();
    let ctx = NoticeContext {
        date: "next Monday".to_string(),
        time: "noon".to_string(),
        ..Default::default()
    };
    let groups = group_rows(&[vec!["1".to_string()]], &khata_at(0));
    let html = String::from_utf8(renderer.render(&groups, &ctx, RenderTarget::Preview).unwrap()).unwrap();
    assert!(html.contains("next Monday తేదీన"));
    assert!(html.contains("noon గం.ని.లకు"));
}

#[test]
fn test_empty_sheet_workbook() {
    let data = fixtures::generate_empty_sheet().unwrap();
    let renderer = RendererBuilder::new().build().unwrap();
    assert!(renderer.read_table(&data, InputFormat::Workbook).unwrap().is_none());
}

#[test]
fn test_header_only_workbook() {
    let data = fixtures::generate_header_only().unwrap();
    let renderer = RendererBuilder::new().build().unwrap();
    assert!(renderer.read_table(&data, InputFormat::Workbook).unwrap().is_none());
}

#[test]
fn test_corrupted_workbook() {
    let data = fixtures::generate_corrupted_file();
    let renderer = RendererBuilder::new().build().unwrap();
    let result = renderer.read_table(&data, InputFormat::Workbook);
    assert!(matches!(result, Err(NoticeError::Workbook(_))));
}

#[test]
fn test_input_size_limit() {
    let renderer = RendererBuilder::new().with_max_input_bytes(16).build().unwrap();
    let csv = "Survey No,Khata No\n1,2\n";
    let result = renderer.read_table(csv.as_bytes(), InputFormat::Delimited);
    assert!(matches!(result, Err(NoticeError::InputLimit(_))));
}
