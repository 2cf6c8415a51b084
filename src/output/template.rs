//! Notice Template
//!
//! 全ターゲット共通の論理構造（ヘッダー、本文、表、フッター）を組み立てる。

use crate::api::ColumnWidth;
use crate::formatter::{format_date, format_time, or_placeholder};
use crate::types::{NoticeContext, NoticeGroup};

/// 見出し3行
pub(crate) const HEADER_LINES: [&str; 3] = [
    "ఫారం-19",
    "భూ యాజమాన్య దారులకు నోటీసు",
    "భూ నిజ నిర్దారణ కొరకు",
];

/// 署名列の見出し
pub(crate) const SIGNATURE_LABEL: &str = "సంతకం";

/// 本文2段落目（固定文）
const SECOND_PARAGRAPH: &str = "2) సర్వే మరియు సరిహద్దుల చట్టం, 1923లోని నియమ నిబంధనలు అనుసరించి సర్వే సమయం నందు ఈ క్రింది షెడ్యూల్ లోని భూ యజమానులు భూమి వద్ద హాజరై మీ పొలము యొక్క సరిహద్దులను చూపించి, తగిన సమాచారం మరియు అవసరమైన సహాయ సహకారములు అందించవలసినదిగా తెలియజేయడమైనది.";

/// 表の後の3項目目
pub(crate) const CLOSING_LINE: &str = "3) నోటీసు యొక్క ప్రతిని సంతకం చేసి తిరిగి పంపించవలెను";

/// フッター右側の署名行
pub(crate) const SURVEYOR_SIGNATURE: &str = "గ్రామ సర్వేయర్ సంతకం";

/// プレースホルダーの長さ
mod placeholder {
    pub const NOTIFICATION: usize = 13;
    pub const DISTRICT: usize = 20;
    pub const MANDAL: usize = 21;
    pub const VILLAGE: usize = 20;
    pub const DATE: usize = 13;
    pub const TIME: usize = 8;
    pub const FOOTER: usize = 13;
}

/// ヘッダーと本文（グループに依存しない部分）
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NoticeIntro {
    pub header: [&'static str; 3],
    pub paragraphs: [String; 2],
}

impl NoticeIntro {
    /// 通知コンテキストから本文を組み立てる
    pub fn from_context(ctx: &NoticeContext) -> Self {
        let first = format!(
            "1) సర్వే సహాయక సంచాలకులు Assistant Director వారి నోటిఫికేషన్ RC నెం. {}, అనుసరించి, {} జిల్లా, {} మండలం, {} గ్రామములో సీమానిర్ణయం (demarcation) మరియు సర్వే పనులు {} తేదీన {} గం.ని.లకు ప్రారంభిచబడును అని తెలియజేయడమైనది.",
            or_placeholder(&ctx.notification_number, placeholder::NOTIFICATION),
            or_placeholder(&ctx.district, placeholder::DISTRICT),
            or_placeholder(&ctx.mandal, placeholder::MANDAL),
            or_placeholder(&ctx.village, placeholder::VILLAGE),
            or_placeholder(&format_date(&ctx.date), placeholder::DATE),
            or_placeholder(&format_time(&ctx.time), placeholder::TIME),
        );

        Self {
            header: HEADER_LINES,
            paragraphs: [first, SECOND_PARAGRAPH.to_string()],
        }
    }
}

/// 通知の表
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NoticeTable {
    /// 列見出し（フィールドのラベル + 署名列）
    pub columns: Vec<String>,
    /// 本体行（署名列は空）
    pub rows: Vec<Vec<String>>,
}

impl NoticeTable {
    /// グループの行をフィールド順に射影して表を作る
    pub fn from_group(group: &NoticeGroup) -> Self {
        let mut columns: Vec<String> = group.fields.iter().map(|f| f.label.to_string()).collect();
        columns.push(SIGNATURE_LABEL.to_string());

        let rows = group
            .projected_rows()
            .into_iter()
            .map(|cells| {
                let mut row: Vec<String> = cells.into_iter().map(str::to_string).collect();
                row.push(String::new());
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// 署名列を除いたデータ列の数
    pub fn field_count(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }
}

/// フッター
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NoticeFooter {
    pub place: String,
    pub date: String,
    pub signature: &'static str,
}

impl NoticeFooter {
    pub fn from_context(ctx: &NoticeContext) -> Self {
        Self {
            place: format!("స్తలం: {}", or_placeholder(&ctx.village, placeholder::FOOTER)),
            date: format!("తేది: {}", "_".repeat(placeholder::FOOTER)),
            signature: SURVEYOR_SIGNATURE,
        }
    }
}

/// 1グループ分の通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NoticeBlock {
    pub intro: NoticeIntro,
    pub table: NoticeTable,
    pub closing: &'static str,
    pub footer: NoticeFooter,
}

/// 全グループ分の通知を組み立てる
pub(crate) fn build_blocks(groups: &[NoticeGroup], ctx: &NoticeContext) -> Vec<NoticeBlock> {
    let intro = NoticeIntro::from_context(ctx);
    let footer = NoticeFooter::from_context(ctx);
    groups
        .iter()
        .map(|group| NoticeBlock {
            intro: intro.clone(),
            table: NoticeTable::from_group(group),
            closing: CLOSING_LINE,
            footer: footer.clone(),
        })
        .collect()
}

/// 列幅の規則
///
/// 1列目・2列目・5列目（任意フィールド）は固定幅、それ以外は自動、署名列は固定幅。
pub(crate) fn column_widths(field_count: usize, first: f32) -> Vec<ColumnWidth> {
    let mut widths: Vec<ColumnWidth> = (0..field_count)
        .map(|i| match i {
            0 => ColumnWidth::Fixed(first),
            1 => ColumnWidth::Fixed(80.0),
            4 => ColumnWidth::Fixed(110.0),
            _ => ColumnWidth::Auto,
        })
        .collect();
    widths.push(ColumnWidth::Fixed(120.0));
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_rows;
    use crate::types::IndexMapping;

    fn sample_group() -> NoticeGroup {
        let mut mapping = IndexMapping::new();
        mapping.insert("Survey No".to_string(), 0);
        mapping.insert("Khata No".to_string(), 1);
        let rows = vec![vec!["12".to_string(), "55".to_string()]];
        group_rows(&rows, &mapping).remove(0)
    }

    #[test]
    fn test_intro_placeholders_when_context_empty() {
        let intro = NoticeIntro::from_context(&NoticeContext::default());
        let p = &intro.paragraphs[0];
        assert!(p.contains(&format!("{} జిల్లా", "_".repeat(20))));
        assert!(p.contains(&format!("{} మండలం", "_".repeat(21))));
        assert!(p.contains(&format!("{} తేదీన", "_".repeat(13))));
        assert!(p.contains(&format!("{} గం.ని.లకు", "_".repeat(8))));
    }

    #[test]
    fn test_intro_interpolates_context() {
        let ctx = NoticeContext {
            district: "Medak".to_string(),
            mandal: "Narsapur".to_string(),
            village: "Kondapur".to_string(),
            date: "2024-03-05".to_string(),
            time: "14:30".to_string(),
            notification_number: "6(i)/2024".to_string(),
        };
        let p = &NoticeIntro::from_context(&ctx).paragraphs[0];
        assert!(p.contains("RC నెం. 6(i)/2024,"));
        assert!(p.contains("Medak జిల్లా"));
        assert!(p.contains("Narsapur మండలం"));
        assert!(p.contains("Kondapur గ్రామములో"));
        assert!(p.contains("05-03-2024 తేదీన"));
        assert!(p.contains("2:30 PM గం.ని.లకు"));
    }

    #[test]
    fn test_table_has_signature_column_and_empty_cells() {
        let table = NoticeTable::from_group(&sample_group());
        assert_eq!(table.columns.len(), 6);
        assert_eq!(table.columns[5], SIGNATURE_LABEL);
        assert_eq!(table.field_count(), 5);
        assert_eq!(table.rows, vec![vec!["12", "55", "", "", "", ""]]);
    }

    #[test]
    fn test_footer() {
        let footer = NoticeFooter::from_context(&NoticeContext::default());
        assert_eq!(footer.place, "స్తలం: _____________");
        assert_eq!(footer.date, "తేది: _____________");
    }

    #[test]
    fn test_column_widths() {
        let widths = column_widths(5, 90.0);
        assert_eq!(
            widths,
            vec![
                ColumnWidth::Fixed(90.0),
                ColumnWidth::Fixed(80.0),
                ColumnWidth::Auto,
                ColumnWidth::Auto,
                ColumnWidth::Fixed(110.0),
                ColumnWidth::Fixed(120.0),
            ]
        );
    }
}
