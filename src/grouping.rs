//! Notice Grouping Module
//!
//! データ行を保有番号（Khata No）ごとの通知グループに分割するモジュール。

use indexmap::IndexMap;

use crate::types::{FieldDefinition, GroupKey, IndexMapping, NoticeGroup, FIELD_CATALOG, KHATA_NO};

/// 行を通知グループに分割する
///
/// 保有番号フィールドがマッピングされている場合は、その値ごとにグループ化します。
/// 値が空または欠落している行、および値が`Unknown`そのものの行は`GroupKey::Unknown`にまとめます。
/// グループの順序はキーが最初に現れた順です。
///
/// 保有番号フィールドが未マッピングの場合は、全行を`GroupKey::Ungrouped`の1グループにします。
///
/// 行の除外・並べ替え・重複排除は行いません。
pub fn group_rows(rows: &[Vec<String>], mapping: &IndexMapping) -> Vec<NoticeGroup> {
    group_rows_with_fields(rows, mapping, &FIELD_CATALOG)
}

/// 出力フィールドを指定してグループ化する
pub fn group_rows_with_fields(
    rows: &[Vec<String>],
    mapping: &IndexMapping,
    fields: &[FieldDefinition],
) -> Vec<NoticeGroup> {
    let make_group = |key: GroupKey, rows: Vec<Vec<String>>| NoticeGroup {
        key,
        rows,
        mapping: mapping.clone(),
        fields: fields.to_vec(),
    };

    let Some(&key_idx) = mapping.get(KHATA_NO) else {
        return vec![make_group(GroupKey::Ungrouped, rows.to_vec())];
    };

    let mut buckets: IndexMap<GroupKey, Vec<Vec<String>>> = IndexMap::new();
    for row in rows {
        let key = match row.get(key_idx).map(String::as_str) {
            Some(value) if !value.is_empty() && value != GroupKey::Unknown.label() => {
                GroupKey::Value(value.to_string())
            }
            _ => GroupKey::Unknown,
        };
        buckets.entry(key).or_default().push(row.clone());
    }

    log::debug!("grouped {} rows into {} notices", rows.len(), buckets.len());

    buckets
        .into_iter()
        .map(|(key, rows)| make_group(key, rows))
        .collect()
}
