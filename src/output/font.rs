//! PDF Font Handling
//!
//! PDF出力で使用するフォントを管理するモジュール。
//!
//! テルグ文字を描画できるTrueType/OpenTypeフォントが与えられた場合は、
//! Type0/CIDFontType2（Identity-Hエンコーディング）として埋め込み、
//! テキスト抽出用のToUnicode CMapを付けます。
//! フォントがない場合はBase-14のHelveticaにフォールバックします
//! （WinAnsiで表現できない文字は`?`になります）。

use std::collections::{BTreeMap, HashMap};

use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use ttf_parser::{name_id, Face};
use unicode_width::UnicodeWidthChar;

use crate::error::NoticeError;

/// フォールバック時の平均文字幅（1/1000 em）
const FALLBACK_CHAR_WIDTH: f32 = 556.0;

/// 埋め込みフォント
#[derive(Debug, Clone)]
pub(crate) struct EmbeddedFont {
    /// PostScript名
    name: String,
    /// フォントファイルのバイト列
    data: Vec<u8>,
    /// Unicode → グリフID
    glyphs: HashMap<char, u16>,
    /// グリフID → 幅（1/1000 em）
    widths: HashMap<u16, u16>,
    /// 使用したグリフ（ToUnicode CMap、W配列用）
    used: BTreeMap<u16, char>,
    ascent: i32,
    descent: i32,
    cap_height: i32,
    bbox: [i32; 4],
}

impl EmbeddedFont {
    /// フォントファイルのバイト列から生成
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, NoticeError> {
        let face = Face::parse(&data, 0)
            .map_err(|e| NoticeError::Font(format!("failed to parse font: {}", e)))?;

        let units_per_em = face.units_per_em().max(1) as f32;
        let scale = |v: f32| (v * 1000.0 / units_per_em).round() as i32;

        let mut glyphs = HashMap::new();
        let mut widths = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|cp| {
                    let Some(ch) = char::from_u32(cp) else {
                        return;
                    };
                    if let Some(gid) = face.glyph_index(ch) {
                        glyphs.insert(ch, gid.0);
                        let advance = face.glyph_hor_advance(gid).unwrap_or(0) as f32;
                        widths.insert(gid.0, scale(advance).max(0) as u16);
                    }
                });
            }
        }

        if glyphs.is_empty() {
            return Err(NoticeError::Font(
                "font has no unicode character map".to_string(),
            ));
        }

        let name = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == name_id::POST_SCRIPT_NAME)
            .find_map(|n| n.to_string())
            .map(|n| n.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-').collect::<String>())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "NoticeFont".to_string());

        let bbox = face.global_bounding_box();
        let ascent = scale(face.ascender() as f32);
        let descent = scale(face.descender() as f32);
        let cap_height = face
            .capital_height()
            .map(|h| scale(h as f32))
            .unwrap_or(ascent);
        let bbox = [
            scale(bbox.x_min as f32),
            scale(bbox.y_min as f32),
            scale(bbox.x_max as f32),
            scale(bbox.y_max as f32),
        ];

        log::debug!("loaded font {} ({} glyphs mapped)", name, glyphs.len());

        Ok(Self {
            name,
            data,
            glyphs,
            widths,
            used: BTreeMap::new(),
            ascent,
            descent,
            cap_height,
            bbox,
        })
    }

    /// 文字がこのフォントで描画できるか
    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    fn char_width(&self, ch: char) -> f32 {
        self.glyphs
            .get(&ch)
            .and_then(|gid| self.widths.get(gid))
            .map(|w| *w as f32)
            .unwrap_or(FALLBACK_CHAR_WIDTH)
    }

    /// グリフIDの並び（2バイト、ビッグエンディアン）に変換
    fn encode(&mut self, text: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let gid = self.glyphs.get(&ch).copied().unwrap_or(0);
            if gid != 0 {
                self.used.entry(gid).or_insert(ch);
            }
            bytes.extend_from_slice(&gid.to_be_bytes());
        }
        bytes
    }

    /// CIDフォントのW配列
    fn widths_array(&self) -> Vec<Object> {
        let mut array = Vec::new();
        for (&gid, _) in &self.used {
            let width = self.widths.get(&gid).copied().unwrap_or(0);
            array.push(Object::Integer(gid as i64));
            array.push(Object::Array(vec![Object::Integer(width as i64)]));
        }
        array
    }

    /// ToUnicode CMap
    fn to_unicode_cmap(&self) -> String {
        let mut cmap = String::new();
        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

        let entries: Vec<(u16, char)> = self.used.iter().map(|(g, c)| (*g, *c)).collect();
        for chunk in entries.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for (gid, ch) in chunk {
                let mut units = [0u16; 2];
                let hex: String = ch
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|u| format!("{:04X}", u))
                    .collect();
                cmap.push_str(&format!("<{:04X}> <{}>\n", gid, hex));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\nend\n");
        cmap
    }

    /// フォント関連オブジェクトを文書に追加し、Type0フォントのIDを返す
    fn write_objects(&self, doc: &mut Document) -> ObjectId {
        let file_id = doc.add_object(Stream::new(
            dictionary! { "Length1" => self.data.len() as i64 },
            self.data.clone(),
        ));

        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => self.name.as_str(),
            "Flags" => 32,
            "FontBBox" => self.bbox.iter().map(|v| Object::Integer(*v as i64)).collect::<Vec<Object>>(),
            "ItalicAngle" => 0,
            "Ascent" => self.ascent as i64,
            "Descent" => self.descent as i64,
            "CapHeight" => self.cap_height as i64,
            "StemV" => 80,
            "FontFile2" => file_id,
        });

        let cid_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => self.name.as_str(),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => 1000,
            "W" => self.widths_array(),
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode_id = doc.add_object(Stream::new(
            dictionary! {},
            self.to_unicode_cmap().into_bytes(),
        ));

        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => self.name.as_str(),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
            "ToUnicode" => to_unicode_id,
        })
    }
}

/// PDF出力に使用するフォント
#[derive(Debug, Clone)]
pub(crate) enum PdfFont {
    /// 埋め込みフォント（テルグ文字対応）
    Embedded(Box<EmbeddedFont>),
    /// Base-14 Helvetica（フォールバック）
    Helvetica,
}

impl PdfFont {
    /// フォントのバイト列から生成し、失敗した場合はHelveticaにフォールバックする
    pub fn load_or_fallback(data: Option<&[u8]>) -> Self {
        match data {
            Some(bytes) => match EmbeddedFont::from_bytes(bytes.to_vec()) {
                Ok(font) => {
                    if !font.has_glyph('అ') {
                        log::warn!("font {} has no Telugu glyphs; notices may not render correctly", font.name);
                    }
                    PdfFont::Embedded(Box::new(font))
                }
                Err(e) => {
                    log::warn!("{}; falling back to Helvetica", e);
                    PdfFont::Helvetica
                }
            },
            None => {
                log::warn!("no Telugu-capable font configured; falling back to Helvetica");
                PdfFont::Helvetica
            }
        }
    }

    /// フォールバックフォントかどうか
    pub fn is_fallback(&self) -> bool {
        matches!(self, PdfFont::Helvetica)
    }

    /// テキスト幅（pt）
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: f32 = match self {
            PdfFont::Embedded(font) => text.chars().map(|c| font.char_width(c)).sum(),
            PdfFont::Helvetica => text
                .chars()
                .filter(|c| c.width() != Some(0))
                .count() as f32
                * FALLBACK_CHAR_WIDTH,
        };
        units * size / 1000.0
    }

    /// コンテンツストリーム用の文字列オブジェクトに変換
    pub fn encode(&mut self, text: &str) -> Object {
        match self {
            PdfFont::Embedded(font) => Object::String(font.encode(text), StringFormat::Hexadecimal),
            PdfFont::Helvetica => Object::String(encode_win_ansi(text), StringFormat::Literal),
        }
    }

    /// フォントのリソースオブジェクトを文書に追加する
    pub fn write_objects(&self, doc: &mut Document) -> ObjectId {
        match self {
            PdfFont::Embedded(font) => font.write_objects(doc),
            PdfFont::Helvetica => doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
                "Encoding" => "WinAnsiEncoding",
            }),
        }
    }
}

/// WinAnsiで表現できない文字を`?`に置き換える（結合文字は除去）
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter(|c| c.width() != Some(0))
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_replaces_telugu() {
        assert_eq!(encode_win_ansi("RC 6(i)"), b"RC 6(i)".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        // "సర్వే" = స + ర + ్ + వ + ే  (結合記号は除去)
        assert_eq!(encode_win_ansi("సర్వే"), b"???".to_vec());
    }

    #[test]
    fn test_fallback_when_no_font() {
        let font = PdfFont::load_or_fallback(None);
        assert!(font.is_fallback());
    }

    #[test]
    fn test_fallback_when_font_is_invalid() {
        let font = PdfFont::load_or_fallback(Some(&b"definitely not a font"[..]));
        assert!(font.is_fallback());
    }

    #[test]
    fn test_fallback_width_matches_encoding() {
        let font = PdfFont::load_or_fallback(None);
        let text = "సర్వే నెం";
        let expected = encode_win_ansi(text).len() as f32 * FALLBACK_CHAR_WIDTH * 10.0 / 1000.0;
        assert!((font.text_width(text, 10.0) - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn test_helvetica_resources() {
        let mut doc = Document::with_version("1.5");
        let id = PdfFont::Helvetica.write_objects(&mut doc);
        let dict = doc.get_dictionary(id).unwrap();
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica");
    }
}
