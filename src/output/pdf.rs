//! PDF Renderer
//!
//! 通知をA4縦のPDFとして出力するモジュール。
//! 各グループは新しいページから始まり、表がページに収まらない場合は次のページに続きます。

use std::io::Write;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object};

use crate::api::ColumnWidth;
use crate::error::NoticeError;
use crate::output::font::PdfFont;
use crate::output::template::{column_widths, NoticeBlock, NoticeTable};

/// A4の幅（pt）
const PAGE_WIDTH: f32 = 595.28;
/// A4の高さ（pt）
const PAGE_HEIGHT: f32 = 841.89;
/// 本文の下限（ページ下端からの距離、mm）
const BOTTOM_LIMIT_MM: f32 = 30.0;

const HEADER_SIZE: f32 = 14.0;
const TABLE_SIZE: f32 = 10.0;
const CELL_PADDING: f32 = 3.0;
const MIN_ROW_HEIGHT: f32 = 20.0;

/// mmをptに変換
pub(crate) fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

/// PDFのレイアウト設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PdfLayout {
    /// 余白（pt）
    pub margin: f32,
    /// 本文の文字サイズ（pt）
    pub body_size: f32,
}

impl PdfLayout {
    fn content_width(&self) -> f32 {
        PAGE_WIDTH - 2.0 * self.margin
    }

    /// 行を配置できる最下位置（上端からの距離）
    fn bottom(&self) -> f32 {
        PAGE_HEIGHT - mm_to_pt(BOTTOM_LIMIT_MM)
    }

    fn line_height(&self, size: f32) -> f32 {
        size * 1.5
    }
}

/// テキストを指定幅で折り返す
///
/// 空白で単語に分割し、1単語が幅を超える場合は文字単位で分割します。
pub(crate) fn wrap_text(font: &PdfFont, text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if font.text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if font.text_width(word, size) <= max_width {
            current = word.to_string();
        } else {
            for ch in word.chars() {
                let mut next = current.clone();
                next.push(ch);
                if !current.is_empty() && font.text_width(&next, size) > max_width {
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                } else {
                    current = next;
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// 列幅（px指定）をptに解決する
///
/// 固定幅の合計が表の幅を超える場合は比例縮小し、残りを自動列で等分します。
pub(crate) fn resolve_column_widths(widths: &[ColumnWidth], total: f32) -> Vec<f32> {
    let fixed: f32 = widths
        .iter()
        .map(|w| match w {
            ColumnWidth::Fixed(px) => px * 0.75,
            ColumnWidth::Auto => 0.0,
        })
        .sum();
    let auto_count = widths.iter().filter(|w| **w == ColumnWidth::Auto).count();

    let min_auto = if auto_count > 0 { total * 0.1 } else { 0.0 };
    let available_for_fixed = total - min_auto * auto_count as f32;
    let shrink = if fixed > available_for_fixed && fixed > 0.0 {
        available_for_fixed / fixed
    } else {
        1.0
    };
    let remaining = total - fixed * shrink;
    let auto_width = if auto_count > 0 {
        remaining / auto_count as f32
    } else {
        0.0
    };

    widths
        .iter()
        .map(|w| match w {
            ColumnWidth::Fixed(px) => {
                if auto_count == 0 && fixed > 0.0 {
                    px * 0.75 * total / fixed
                } else {
                    px * 0.75 * shrink
                }
            }
            ColumnWidth::Auto => auto_width,
        })
        .collect()
}

/// ページ単位の描画状態
struct PageWriter<'a> {
    font: &'a mut PdfFont,
    layout: PdfLayout,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    /// 上端からの現在位置
    y: f32,
}

impl<'a> PageWriter<'a> {
    fn new(font: &'a mut PdfFont, layout: PdfLayout) -> Self {
        Self {
            font,
            layout,
            pages: Vec::new(),
            ops: Vec::new(),
            y: layout.margin,
        }
    }

    fn new_page(&mut self) {
        if !self.ops.is_empty() || !self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.ops));
        }
        self.y = self.layout.margin;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y + height > self.layout.bottom() && self.y > self.layout.margin {
            self.new_page();
        }
    }

    fn text(&mut self, x: f32, baseline: f32, size: f32, text: &str) {
        let encoded = self.font.encode(text);
        self.ops.push(Operation::new("BT", vec![]));
        self.ops
            .push(Operation::new("Tf", vec!["F1".into(), size.into()]));
        self.ops.push(Operation::new(
            "Td",
            vec![x.into(), (PAGE_HEIGHT - baseline).into()],
        ));
        self.ops.push(Operation::new("Tj", vec![encoded]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn centered_text(&mut self, center: f32, baseline: f32, size: f32, text: &str) {
        let width = self.font.text_width(text, size);
        self.text(center - width / 2.0, baseline, size, text);
    }

    fn rect(&mut self, x: f32, top: f32, width: f32, height: f32, fill_gray: Option<f32>) {
        let args = vec![
            x.into(),
            (PAGE_HEIGHT - top - height).into(),
            width.into(),
            height.into(),
        ];
        if let Some(gray) = fill_gray {
            self.ops.push(Operation::new("g", vec![gray.into()]));
            self.ops.push(Operation::new("re", args.clone()));
            self.ops.push(Operation::new("f", vec![]));
            self.ops.push(Operation::new("g", vec![0.0f32.into()]));
        }
        self.ops.push(Operation::new("re", args));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn paragraph(&mut self, text: &str, size: f32) {
        let line_height = self.layout.line_height(size);
        let lines = wrap_text(self.font, text, size, self.layout.content_width());
        for line in lines {
            self.ensure_space(line_height);
            self.y += line_height;
            self.text(self.layout.margin, self.y - size * 0.35, size, &line);
        }
    }

    /// 表の1行を描画する
    ///
    /// 行がページの残りに収まらない場合は次のページに送り、1ページに収まらない行は
    /// 折り返した行の単位で分割し、各ページに罫線を描き直します。
    fn table_row(&mut self, cells: &[String], widths: &[f32], header: bool) {
        let line_height = self.layout.line_height(TABLE_SIZE);
        let font: &PdfFont = self.font;
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| wrap_text(font, cell, TABLE_SIZE, w - 2.0 * CELL_PADDING))
            .collect();
        let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let chunk_height =
            |lines: usize| (lines as f32 * line_height + 2.0 * CELL_PADDING).max(MIN_ROW_HEIGHT);

        let mut start = 0;
        while start < max_lines {
            let remaining = max_lines - start;
            let available = self.layout.bottom() - self.y;
            if chunk_height(remaining) <= available {
                let centered = start == 0;
                self.row_chunk(&wrapped, widths, header, start..max_lines, centered);
                return;
            }
            if self.y > self.layout.margin {
                self.new_page();
                continue;
            }

            let capacity = ((available - 2.0 * CELL_PADDING) / line_height).floor() as usize;
            let end = start + capacity.clamp(1, remaining);
            self.row_chunk(&wrapped, widths, header, start..end, false);
            self.new_page();
            start = end;
        }
    }

    /// 折り返し済みの行のうち`range`の範囲を1つのセル行として描画する
    fn row_chunk(
        &mut self,
        wrapped: &[Vec<String>],
        widths: &[f32],
        header: bool,
        range: std::ops::Range<usize>,
        centered: bool,
    ) {
        let line_height = self.layout.line_height(TABLE_SIZE);
        let height = (range.len() as f32 * line_height + 2.0 * CELL_PADDING).max(MIN_ROW_HEIGHT);
        let top = self.y;
        let mut x = self.layout.margin;

        for (lines, w) in wrapped.iter().zip(widths) {
            let fill = if header { Some(0.94) } else { None };
            self.rect(x, top, *w, height, fill);

            let end = range.end.min(lines.len());
            let visible = lines.get(range.start..end).unwrap_or(&[]);
            let mut baseline = if centered {
                let text_block = visible.len() as f32 * line_height;
                top + (height - text_block) / 2.0 + line_height * 0.7
            } else {
                top + CELL_PADDING + line_height * 0.7
            };
            for line in visible {
                self.centered_text(x + w / 2.0, baseline, TABLE_SIZE, line);
                baseline += line_height;
            }
            x += w;
        }
        self.y += height;
    }

    fn table(&mut self, table: &NoticeTable) {
        let widths = resolve_column_widths(
            &column_widths(table.field_count(), 90.0),
            self.layout.content_width(),
        );
        self.table_row(&table.columns, &widths, true);
        for row in &table.rows {
            self.table_row(row, &widths, false);
        }
    }

    fn block(&mut self, block: &NoticeBlock) {
        let center = PAGE_WIDTH / 2.0;
        for line in block.intro.header.iter() {
            self.y += HEADER_SIZE * 1.6;
            self.centered_text(center, self.y, HEADER_SIZE, line);
        }
        self.y += HEADER_SIZE * 0.8;

        let body = self.layout.body_size;
        for paragraph in block.intro.paragraphs.iter() {
            self.paragraph(paragraph, body);
        }
        self.y += body;

        self.table(&block.table);

        self.y += body;
        self.paragraph(block.closing, body);

        let line_height = self.layout.line_height(body);
        self.ensure_space(line_height * 3.0);
        self.y += line_height * 1.5;
        let right = PAGE_WIDTH - self.layout.margin;
        let signature_width = self.font.text_width(block.footer.signature, body);
        self.text(self.layout.margin, self.y, body, &block.footer.place);
        self.text(right - signature_width, self.y, body, block.footer.signature);
        self.y += line_height;
        self.text(self.layout.margin, self.y, body, &block.footer.date);
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.ops));
        }
        self.pages
    }
}

/// PDF形式のフォーマッター
pub struct PdfFormatter;

impl PdfFormatter {
    /// 通知をPDFとして出力する
    ///
    /// 文書全体をメモリ上で構築してから書き出すため、失敗時に部分的な出力は残りません。
    pub(crate) fn render<W: Write>(
        &self,
        blocks: &[NoticeBlock],
        font: &mut PdfFont,
        layout: PdfLayout,
        writer: &mut W,
    ) -> Result<(), NoticeError> {
        let mut pages_ops = {
            let mut page_writer = PageWriter::new(font, layout);
            for (index, block) in blocks.iter().enumerate() {
                if index > 0 {
                    page_writer.new_page();
                }
                page_writer.block(block);
            }
            page_writer.finish()
        };

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = font.write_objects(&mut doc);
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::with_capacity(pages_ops.len());
        for operations in pages_ops.drain(..) {
            let content = Content { operations };
            let encoded = content
                .encode()
                .map_err(|e| NoticeError::Pdf(format!("content stream: {}", e)))?;
            let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        let media_box: Vec<Object> = vec![
            Object::Integer(0),
            Object::Integer(0),
            PAGE_WIDTH.into(),
            PAGE_HEIGHT.into(),
        ];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "MediaBox" => media_box,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| NoticeError::Pdf(format!("serialization: {}", e)))?;
        writer.write_all(&buffer)?;
        writer.flush()?;

        log::debug!("rendered {} notices into {} PDF pages", blocks.len(), page_count);
        Ok(())
    }
}
