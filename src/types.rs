//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 読み込んだ表データ
///
/// ヘッダー行と、データ行（セル文字列の並び）を保持します。
/// 行のセル数はヘッダー数と一致しない場合があり、欠けたセルは空文字列として扱います。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// ヘッダー文字列（入力ファイルの1行目）
    pub headers: Vec<String>,
    /// データ行
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// 新しい表を生成
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// データ行の数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// ヘッダー名から列インデックスを取得（最初に一致した列）
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// 指定行・列のセル値を取得（範囲外は空文字列）
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// 意味フィールドの定義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    /// 正規名（英語、マッピングのキー）
    pub name: &'static str,
    /// 表示ラベル（テルグ語、表の列見出し）
    pub label: &'static str,
    /// 必須フィールドかどうか
    pub required: bool,
}

/// 保有番号（Khata No）フィールドの正規名
pub const KHATA_NO: &str = "Khata No";

/// フィールドカタログ
///
/// 必須フィールド4件と任意フィールド（携帯番号）1件。この順序が表の列順になります。
pub const FIELD_CATALOG: [FieldDefinition; 5] = [
    FieldDefinition {
        name: "Survey No",
        label: "సర్వే నెం",
        required: true,
    },
    FieldDefinition {
        name: KHATA_NO,
        label: "ఖాతా సంఖ్య",
        required: true,
    },
    FieldDefinition {
        name: "Pattadar Name",
        label: "భూ యజమాని పేరు",
        required: true,
    },
    FieldDefinition {
        name: "Relation Name",
        label: "భర్త/తండ్రి పేరు",
        required: true,
    },
    FieldDefinition {
        name: "Mobile Number",
        label: "మొబైల్ నెంబరు",
        required: false,
    },
];

/// 正規名からフィールド定義を検索
pub fn find_field(name: &str) -> Option<&'static FieldDefinition> {
    FIELD_CATALOG.iter().find(|f| f.name == name)
}

/// 列マッピング（フィールド正規名 → 列位置）
///
/// `FieldMapping`のヘッダー文字列を`RawTable`のヘッダー位置に解決したもの。
/// ヘッダーが見つからないフィールドは含まれません。
pub type IndexMapping = IndexMap<String, usize>;

/// 通知文書に埋め込むセッション単位のメタデータ
///
/// すべての項目は任意です。空の項目はプレースホルダー（下線）として出力されます。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeContext {
    /// 郡（District）名
    pub district: String,
    /// マンダル名
    pub mandal: String,
    /// 村名
    pub village: String,
    /// 開始日（`YYYY-MM-DD`想定、自由入力）
    pub date: String,
    /// 開始時刻（`HH:MM`想定、自由入力）
    pub time: String,
    /// 告示番号
    pub notification_number: String,
}

/// 通知グループのキー
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// 保有番号の値
    Value(String),
    /// 保有番号が空または欠落している行
    Unknown,
    /// 保有番号が未マッピングのため、全行を1グループにまとめたもの
    Ungrouped,
}

impl GroupKey {
    /// 表示用ラベル
    pub fn label(&self) -> &str {
        match self {
            GroupKey::Value(v) => v,
            GroupKey::Unknown => "Unknown",
            GroupKey::Ungrouped => "All Data",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 1通の通知文書に対応する行のまとまり
///
/// マッピング送信のたびに新しく計算され、以後変更されません。
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeGroup {
    /// グループキー
    pub key: GroupKey,
    /// このグループに属する行（入力順）
    pub rows: Vec<Vec<String>>,
    /// 列マッピング
    pub mapping: IndexMapping,
    /// 出力するフィールド
    pub fields: Vec<FieldDefinition>,
}

impl NoticeGroup {
    /// 行をフィールド順に射影したセル値を返す
    ///
    /// 未マッピングのフィールドや欠けたセルは空文字列になります。
    pub fn project_row<'a>(&self, row: &'a [String]) -> Vec<&'a str> {
        self.fields
            .iter()
            .map(|field| {
                self.mapping
                    .get(field.name)
                    .and_then(|&idx| row.get(idx))
                    .map(String::as_str)
                    .unwrap_or("")
            })
            .collect()
    }

    /// 全行の射影
    pub fn projected_rows(&self) -> Vec<Vec<&str>> {
        self.rows.iter().map(|row| self.project_row(row)).collect()
    }
}
