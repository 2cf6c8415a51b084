//! HTML Renderers
//!
//! プレビュー（画面表示・印刷）とWord互換文書のHTML出力を提供するモジュール。

use std::io::Write;

use crate::api::ColumnWidth;
use crate::error::NoticeError;
use crate::formatter::escape_html;
use crate::output::template::{column_widths, NoticeBlock, NoticeIntro, NoticeTable};

/// 本文に指定するフォントファミリー
const FONT_FAMILY: &str = "'Gautami', 'Noto Sans Telugu', sans-serif";

/// Word互換文書に埋め込むCSS
const WORD_STYLE: &str = r#"
@font-face {
  font-family: 'Gautami';
  src: url('fonts/gautami.ttf') format('truetype');
}
body { font-family: 'Gautami', 'Noto Sans Telugu', sans-serif; margin: 0; padding: 0; }
.thirdpoint { font-size: 12pt; line-height: 1.5; padding: 0; }
table { width: 100%; border-collapse: collapse; table-layout: fixed; font-family: 'Gautami', 'Noto Sans Telugu', sans-serif; }
th, td { border: 1px solid black; padding: 6px; text-align: center; word-break: break-word; overflow-wrap: break-word; font-family: 'Gautami', 'Noto Sans Telugu', sans-serif; }
th { font-weight: bold; }
.header { text-align: center; font-weight: bold; margin-top: 0; padding-top: 0; margin-bottom: 10px; }
.header h1 { font-size: 14pt; }
.content { text-align: left; margin-bottom: 15px; }
.content p { font-size: 12pt; line-height: 1.5; }
.footer { margin-top: 10px; }
.left-footer { float: left; text-align: left; }
.right-footer { float: right; text-align: right; }
.notice-section { padding: 15mm 15mm 20mm 15mm; margin-top: 0; }
.signature-column { width: 120px !important; }
@page { margin: 5mm; }
"#;

/// 画面・印刷用のCSS
const PRINT_STYLE: &str = r#"
body { font-family: 'Gautami', 'Noto Sans Telugu', sans-serif; }
.notice-intro h3, .telugu-header-print h3 { text-align: center; font-weight: bold; }
.khata-table { width: 100%; border-collapse: collapse; table-layout: fixed; margin-top: 1rem; }
.khata-table th, .khata-table td { border: 1px solid black; padding: 0.5rem; text-align: center; }
.footer-signature-row { display: flex; justify-content: space-between; }
.print-only { display: none; }
@media print {
  .no-print { display: none; }
  .print-only { display: block; }
  .khata-group { page-break-after: always; }
  .khata-group:last-child { page-break-after: avoid; }
  @page { size: A4; margin: 15mm; }
}
"#;

/// 列幅をHTMLの`<col>`属性値に変換
fn col_style(width: ColumnWidth) -> String {
    match width {
        ColumnWidth::Fixed(px) => format!("width: {}px", px),
        ColumnWidth::Auto => "width: auto".to_string(),
    }
}

/// 表を出力する（全HTMLターゲット共通）
fn write_table<W: Write>(
    writer: &mut W,
    table: &NoticeTable,
    class: &str,
    widths: &[ColumnWidth],
) -> Result<(), NoticeError> {
    writeln!(writer, "<table class=\"{}\">", class)?;

    writeln!(writer, "  <colgroup>")?;
    let last = widths.len().saturating_sub(1);
    for (i, width) in widths.iter().enumerate() {
        if i == last {
            writeln!(
                writer,
                "    <col class=\"signature-column\" style=\"{}\">",
                col_style(*width)
            )?;
        } else {
            writeln!(writer, "    <col style=\"{}\">", col_style(*width))?;
        }
    }
    writeln!(writer, "  </colgroup>")?;

    writeln!(writer, "  <thead>")?;
    write!(writer, "    <tr>")?;
    for column in &table.columns {
        write!(writer, "<th>{}</th>", escape_html(column))?;
    }
    writeln!(writer, "</tr>")?;
    writeln!(writer, "  </thead>")?;

    writeln!(writer, "  <tbody>")?;
    for row in &table.rows {
        write!(writer, "    <tr>")?;
        for (i, cell) in row.iter().enumerate() {
            if i == row.len() - 1 {
                // 署名欄
                write!(writer, "<td class=\"signature-col\">&nbsp;</td>")?;
            } else {
                write!(writer, "<td>{}</td>", escape_html(cell))?;
            }
        }
        writeln!(writer, "</tr>")?;
    }
    writeln!(writer, "  </tbody>")?;

    writeln!(writer, "</table>")?;
    Ok(())
}

fn write_intro<W: Write>(writer: &mut W, intro: &NoticeIntro, tag: &str) -> Result<(), NoticeError> {
    for line in intro.header.iter() {
        writeln!(writer, "  <{tag}>{}</{tag}>", escape_html(line), tag = tag)?;
    }
    for paragraph in intro.paragraphs.iter() {
        writeln!(writer, "  <p>{}</p>", escape_html(paragraph))?;
    }
    Ok(())
}

/// プレビュー用HTML断片のフォーマッター
///
/// ヘッダーと本文は先頭に1回だけ表示し、各グループには印刷時のみ表示されるヘッダーを付けます。
pub struct PreviewFormatter;

impl PreviewFormatter {
    pub fn render<W: Write>(
        &self,
        blocks: &[NoticeBlock],
        writer: &mut W,
    ) -> Result<(), NoticeError> {
        writeln!(writer, "<div class=\"ground-truth-notice\">")?;

        if let Some(first) = blocks.first() {
            writeln!(writer, "<div class=\"notice-intro no-print\">")?;
            write_intro(writer, &first.intro, "h3")?;
            writeln!(writer, "</div>")?;
        }

        for block in blocks {
            writeln!(writer, "<div class=\"khata-group\">")?;

            writeln!(writer, "<div class=\"telugu-header-print print-only\">")?;
            write_intro(writer, &block.intro, "h3")?;
            writeln!(writer, "</div>")?;

            let widths = column_widths(block.table.field_count(), 100.0);
            write_table(writer, &block.table, "khata-table", &widths)?;

            writeln!(writer, "<p class=\"closing\">{}</p>", escape_html(block.closing))?;

            writeln!(writer, "<div class=\"page-footer\">")?;
            writeln!(writer, "  <div class=\"footer-signature-row\">")?;
            writeln!(
                writer,
                "    <div class=\"left-column\"><p>{}</p><p>{}</p></div>",
                escape_html(&block.footer.place),
                escape_html(&block.footer.date)
            )?;
            writeln!(
                writer,
                "    <div class=\"right-column\"><p>{}</p></div>",
                escape_html(block.footer.signature)
            )?;
            writeln!(writer, "  </div>")?;
            writeln!(writer, "</div>")?;

            writeln!(writer, "</div>")?;
        }

        writeln!(writer, "</div>")?;
        writer.flush()?;
        Ok(())
    }
}

/// 印刷用の完全なHTML文書のフォーマッター
pub struct PrintFormatter;

impl PrintFormatter {
    pub fn render<W: Write>(
        &self,
        blocks: &[NoticeBlock],
        writer: &mut W,
    ) -> Result<(), NoticeError> {
        writeln!(writer, "<!DOCTYPE html>")?;
        writeln!(writer, "<html>")?;
        writeln!(writer, "<head>")?;
        writeln!(writer, "<meta charset=\"UTF-8\">")?;
        writeln!(writer, "<title>Land Notices</title>")?;
        writeln!(writer, "<style>{}</style>", PRINT_STYLE)?;
        writeln!(writer, "</head>")?;
        writeln!(writer, "<body>")?;
        PreviewFormatter.render(blocks, writer)?;
        writeln!(writer, "</body>")?;
        writeln!(writer, "</html>")?;
        writer.flush()?;
        Ok(())
    }
}

/// Word互換文書のフォーマッター
///
/// 各グループを1ページとし、グループ間に明示的な改ページを入れます（最後のグループの後には入れません）。
pub struct WordFormatter;

impl WordFormatter {
    pub fn render<W: Write>(
        &self,
        blocks: &[NoticeBlock],
        writer: &mut W,
    ) -> Result<(), NoticeError> {
        writeln!(writer, "<!DOCTYPE html>")?;
        writeln!(writer, "<html>")?;
        writeln!(writer, "<head>")?;
        writeln!(writer, "<meta charset=\"UTF-8\">")?;
        writeln!(writer, "<title>Land Notices</title>")?;
        writeln!(writer, "<style>{}</style>", WORD_STYLE)?;
        writeln!(writer, "</head>")?;
        writeln!(writer, "<body>")?;

        for (index, block) in blocks.iter().enumerate() {
            let page_break = if index + 1 < blocks.len() {
                "always"
            } else {
                "avoid"
            };
            writeln!(
                writer,
                "<div class=\"notice-section\" style=\"page-break-after: {}\">",
                page_break
            )?;

            writeln!(writer, "<div class=\"header\">")?;
            for line in block.intro.header.iter() {
                writeln!(writer, "  <h1>{}</h1>", escape_html(line))?;
            }
            writeln!(writer, "</div>")?;

            writeln!(writer, "<div class=\"content\">")?;
            for paragraph in block.intro.paragraphs.iter() {
                writeln!(writer, "  <p>{}</p>", escape_html(paragraph))?;
            }
            writeln!(writer, "</div>")?;

            let widths = column_widths(block.table.field_count(), 90.0);
            write_table(writer, &block.table, "notice-table", &widths)?;

            writeln!(
                writer,
                "<p class=\"thirdpoint\" style=\"font-family: {}\">{}</p>",
                FONT_FAMILY,
                escape_html(block.closing)
            )?;

            writeln!(writer, "<div class=\"footer\">")?;
            writeln!(
                writer,
                "  <div class=\"right-footer\"><p>{}</p></div>",
                escape_html(block.footer.signature)
            )?;
            writeln!(
                writer,
                "  <div class=\"left-footer\"><p>{}</p><p>{}</p></div>",
                escape_html(&block.footer.place),
                escape_html(&block.footer.date)
            )?;
            writeln!(writer, "  <div style=\"clear: both;\"></div>")?;
            writeln!(writer, "</div>")?;

            writeln!(writer, "</div>")?;
        }

        writeln!(writer, "</body>")?;
        writeln!(writer, "</html>")?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_rows;
    use crate::output::template::build_blocks;
    use crate::types::{IndexMapping, NoticeContext};

    fn blocks(keys: &[&str]) -> Vec<NoticeBlock> {
        let mut mapping = IndexMapping::new();
        mapping.insert("Survey No".to_string(), 0);
        mapping.insert("Khata No".to_string(), 1);
        let rows: Vec<Vec<String>> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| vec![format!("{}", i + 1), k.to_string()])
            .collect();
        build_blocks(&group_rows(&rows, &mapping), &NoticeContext::default())
    }

    fn render_to_string(f: impl FnOnce(&mut Vec<u8>) -> Result<(), NoticeError>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_preview_intro_shown_once() {
        let html = render_to_string(|w| PreviewFormatter.render(&blocks(&["1", "2", "3"]), w));
        assert_eq!(html.matches("notice-intro no-print").count(), 1);
        assert_eq!(html.matches("telugu-header-print print-only").count(), 3);
        assert_eq!(html.matches("<table class=\"khata-table\">").count(), 3);
    }

    #[test]
    fn test_preview_empty_groups() {
        let html = render_to_string(|w| PreviewFormatter.render(&[], w));
        assert!(!html.contains("notice-intro"));
        assert!(html.contains("ground-truth-notice"));
    }

    #[test]
    fn test_word_page_breaks_between_groups_only() {
        let html = render_to_string(|w| WordFormatter.render(&blocks(&["1", "2", "3"]), w));
        assert_eq!(html.matches("page-break-after: always\"").count(), 2);
        assert_eq!(html.matches("page-break-after: avoid\"").count(), 1);
        let last_section = html.rfind("notice-section").unwrap();
        assert!(html[last_section..].contains("page-break-after: avoid"));
        // 見出しはグループごとに繰り返す
        assert_eq!(html.matches("<h1>ఫారం-19</h1>").count(), 3);
    }

    #[test]
    fn test_word_declares_bilingual_font() {
        let html = render_to_string(|w| WordFormatter.render(&blocks(&["1"]), w));
        assert!(html.contains("font-family: 'Gautami'"));
        assert!(html.contains("@font-face"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_column_widths_per_target() {
        let preview = render_to_string(|w| PreviewFormatter.render(&blocks(&["1"]), w));
        let word = render_to_string(|w| WordFormatter.render(&blocks(&["1"]), w));
        assert!(preview.contains("<col style=\"width: 100px\">"));
        assert!(word.contains("<col style=\"width: 90px\">"));
        for html in [&preview, &word] {
            assert!(html.contains("<col style=\"width: 80px\">"));
            assert!(html.contains("<col style=\"width: 110px\">"));
            assert_eq!(html.matches("<col style=\"width: auto\">").count(), 2);
            assert!(html.contains("<col class=\"signature-column\" style=\"width: 120px\">"));
        }
    }

    #[test]
    fn test_cells_are_escaped() {
        let mut mapping = IndexMapping::new();
        mapping.insert("Pattadar Name".to_string(), 0);
        let rows = vec![vec!["<b>Ravi & Sons</b>".to_string()]];
        let blocks = build_blocks(&group_rows(&rows, &mapping), &NoticeContext::default());
        let html = render_to_string(|w| PreviewFormatter.render(&blocks, w));
        assert!(html.contains("<td>&lt;b&gt;Ravi &amp; Sons&lt;/b&gt;</td>"));
    }

    #[test]
    fn test_print_document_wraps_preview() {
        let html = render_to_string(|w| PrintFormatter.render(&blocks(&["1", "2"]), w));
        assert!(html.contains("@media print"));
        assert!(html.contains("ground-truth-notice"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
