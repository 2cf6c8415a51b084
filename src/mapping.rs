//! Field Mapping Module
//!
//! 意味フィールドと入力列の対応付け（マッピング）を管理するモジュール。

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::NoticeError;
use crate::types::{find_field, FieldDefinition, IndexMapping, FIELD_CATALOG};

/// フィールド正規名 → ヘッダー文字列の対応
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(IndexMap<String, String>);

impl FieldMapping {
    /// 空のマッピングを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// フィールドに対応するヘッダーを取得（空文字列は未マッピング扱い）
    pub fn header_for(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .map(String::as_str)
            .filter(|h| !h.is_empty())
    }

    /// ヘッダーの位置に解決して`IndexMapping`を作る
    ///
    /// ヘッダーが見つからないフィールドは含まれません。同名のヘッダーが複数ある場合は
    /// 最初の列を使用します。
    pub fn resolve(&self, headers: &[String]) -> IndexMapping {
        let mut resolved = IndexMapping::new();
        for (field, header) in &self.0 {
            if let Some(idx) = headers.iter().position(|h| h == header) {
                resolved.insert(field.clone(), idx);
            }
        }
        resolved
    }

    /// (フィールド, ヘッダー)の組を列挙
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// マッピング表の1行分の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStatus {
    /// フィールド定義
    pub field: FieldDefinition,
    /// 対応付けられたヘッダー
    pub header: Option<String>,
}

impl FieldStatus {
    /// マッピング済みかどうか
    pub fn is_mapped(&self) -> bool {
        self.header.is_some()
    }
}

/// フィールドマッパー
///
/// 入力ファイルのヘッダーと現在のマッピングを保持し、変更のたびに完了フラグを再計算します。
/// 完了フラグは、すべての必須フィールドに空でないヘッダーが対応付けられている場合にのみ`true`になります。
///
/// # 使用例
///
/// ```rust
/// use land_notices::FieldMapper;
///
/// # fn main() -> Result<(), land_notices::NoticeError> {
/// let headers = vec!["Col1".to_string(), "Col2".to_string()];
/// let mut mapper = FieldMapper::new(headers);
/// mapper.set("Survey No", "Col1")?;
/// assert!(!mapper.is_complete());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FieldMapper {
    headers: Vec<String>,
    mapping: FieldMapping,
    complete: bool,
}

impl FieldMapper {
    /// 入力ヘッダーから新しいマッパーを生成
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            mapping: FieldMapping::new(),
            complete: false,
        }
    }

    /// フィールドカタログ
    pub fn catalog(&self) -> &'static [FieldDefinition] {
        &FIELD_CATALOG
    }

    /// 選択可能なヘッダー
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// 現在のマッピング
    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// フィールドにヘッダーを対応付ける
    ///
    /// 空文字列を渡すとマッピングを解除します。
    ///
    /// # エラー
    ///
    /// * `NoticeError::UnknownField` - カタログにないフィールド名の場合
    pub fn set(&mut self, field: &str, header: &str) -> Result<(), NoticeError> {
        let def = find_field(field).ok_or_else(|| NoticeError::UnknownField(field.to_string()))?;

        if header.is_empty() {
            self.mapping.0.shift_remove(def.name);
        } else {
            self.mapping
                .0
                .insert(def.name.to_string(), header.to_string());
        }
        self.recompute();
        Ok(())
    }

    /// フィールドのマッピングを解除する
    pub fn clear(&mut self, field: &str) -> Result<(), NoticeError> {
        self.set(field, "")
    }

    /// マッピングを一括で置き換える
    pub fn replace(&mut self, mapping: FieldMapping) -> Result<(), NoticeError> {
        if let Some((field, _)) = mapping.iter().find(|(f, _)| find_field(f).is_none()) {
            return Err(NoticeError::UnknownField(field.to_string()));
        }
        self.mapping = mapping;
        self.recompute();
        Ok(())
    }

    /// ヘッダー名からマッピングを推測して、未設定のフィールドを埋める
    ///
    /// ヘッダーが正規名またはテルグ語ラベルと一致（英字は大文字小文字を区別しない）する場合に対応付けます。
    /// 設定済みのフィールドは変更しません。推測したフィールド数を返します。
    pub fn auto_map(&mut self) -> usize {
        let mut filled = 0;
        for field in FIELD_CATALOG.iter() {
            if self.mapping.header_for(field.name).is_some() {
                continue;
            }
            let found = self.headers.iter().find(|h| {
                let h = h.trim();
                h.eq_ignore_ascii_case(field.name) || h == field.label
            });
            if let Some(header) = found {
                self.mapping
                    .0
                    .insert(field.name.to_string(), header.clone());
                filled += 1;
            }
        }
        self.recompute();
        filled
    }

    /// すべての必須フィールドがマッピング済みかどうか
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// 未マッピングの必須フィールド
    pub fn missing_required(&self) -> Vec<&'static str> {
        FIELD_CATALOG
            .iter()
            .filter(|f| f.required && self.mapping.header_for(f.name).is_none())
            .map(|f| f.name)
            .collect()
    }

    /// フィールドごとの状態（マッピング表の表示用）
    pub fn statuses(&self) -> Vec<FieldStatus> {
        FIELD_CATALOG
            .iter()
            .map(|f| FieldStatus {
                field: *f,
                header: self.mapping.header_for(f.name).map(str::to_string),
            })
            .collect()
    }

    /// マッピングを確定する
    ///
    /// # エラー
    ///
    /// * `NoticeError::IncompleteMapping` - 必須フィールドが未マッピングの場合
    pub fn submit(&self) -> Result<FieldMapping, NoticeError> {
        if !self.complete {
            return Err(NoticeError::IncompleteMapping {
                missing: self
                    .missing_required()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            });
        }
        log::info!("field mapping submitted ({} fields)", self.mapping.0.len());
        Ok(self.mapping.clone())
    }

    fn recompute(&mut self) {
        self.complete = self.missing_required().is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["Col1", "Col2", "Col3", "Col4", "Col5"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_completion_flips_on_last_required_field() {
        let mut mapper = FieldMapper::new(headers());
        mapper.set("Survey No", "Col1").unwrap();
        mapper.set("Khata No", "Col2").unwrap();
        mapper.set("Pattadar Name", "Col3").unwrap();
        assert!(!mapper.is_complete());
        assert!(mapper.submit().is_err());

        mapper.set("Relation Name", "Col4").unwrap();
        assert!(mapper.is_complete());
        assert!(mapper.submit().is_ok());

        mapper.clear("Khata No").unwrap();
        assert!(!mapper.is_complete());
        match mapper.submit() {
            Err(NoticeError::IncompleteMapping { missing }) => {
                assert_eq!(missing, vec!["Khata No".to_string()]);
            }
            other => panic!("Expected IncompleteMapping, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_field_never_blocks() {
        let mut mapper = FieldMapper::new(headers());
        for (field, header) in [
            ("Survey No", "Col1"),
            ("Khata No", "Col2"),
            ("Pattadar Name", "Col3"),
            ("Relation Name", "Col4"),
        ] {
            mapper.set(field, header).unwrap();
        }
        assert!(mapper.is_complete());
        assert!(mapper.mapping().header_for("Mobile Number").is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut mapper = FieldMapper::new(headers());
        assert!(matches!(
            mapper.set("Plot No", "Col1"),
            Err(NoticeError::UnknownField(_))
        ));
    }

    #[test]
    fn test_resolve_omits_missing_headers() {
        let mut mapper = FieldMapper::new(headers());
        mapper.set("Survey No", "Col3").unwrap();
        mapper.set("Khata No", "Gone").unwrap();
        let resolved = mapper.mapping().resolve(&headers());
        assert_eq!(resolved.get("Survey No"), Some(&2));
        assert!(!resolved.contains_key("Khata No"));
    }

    #[test]
    fn test_resolve_uses_first_duplicate_header() {
        let dup = vec!["A".to_string(), "A".to_string()];
        let mut mapping = FieldMapping::new();
        mapping.0.insert("Survey No".to_string(), "A".to_string());
        assert_eq!(mapping.resolve(&dup).get("Survey No"), Some(&0));
    }

    #[test]
    fn test_auto_map_by_name_and_label() {
        let headers = vec![
            "survey no".to_string(),
            "ఖాతా సంఖ్య".to_string(),
            "Pattadar Name".to_string(),
            "Father".to_string(),
        ];
        let mut mapper = FieldMapper::new(headers);
        assert_eq!(mapper.auto_map(), 3);
        assert_eq!(mapper.mapping().header_for("Survey No"), Some("survey no"));
        assert_eq!(mapper.mapping().header_for("Khata No"), Some("ఖాతా సంఖ్య"));
        assert_eq!(mapper.missing_required(), vec!["Relation Name"]);
    }

    #[test]
    fn test_replace_validates_fields() {
        let mut mapper = FieldMapper::new(headers());
        let mapping: FieldMapping = serde_json::from_str(
            r#"{"Survey No":"Col1","Khata No":"Col2","Pattadar Name":"Col3","Relation Name":"Col4"}"#,
        )
        .unwrap();
        mapper.replace(mapping).unwrap();
        assert!(mapper.is_complete());

        let bad: FieldMapping = serde_json::from_str(r#"{"Plot":"Col1"}"#).unwrap();
        assert!(mapper.replace(bad).is_err());
    }

    #[test]
    fn test_mapping_json_keeps_insertion_order() {
        let mut mapper = FieldMapper::new(headers());
        mapper.set("Relation Name", "Col4").unwrap();
        mapper.set("Survey No", "Col1").unwrap();
        let json = serde_json::to_string(mapper.mapping()).unwrap();
        assert_eq!(json, r#"{"Relation Name":"Col4","Survey No":"Col1"}"#);

        let back: FieldMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, mapper.mapping());
    }

    #[test]
    fn test_statuses_follow_catalog_order() {
        let mut mapper = FieldMapper::new(headers());
        mapper.set("Mobile Number", "Col5").unwrap();
        let statuses = mapper.statuses();
        assert_eq!(statuses.len(), 5);
        assert!(!statuses[0].is_mapped());
        assert_eq!(statuses[4].header.as_deref(), Some("Col5"));
    }
}
