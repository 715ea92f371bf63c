//! Group-code level DXF reading and writing.

use regex_lite::Regex;
use thiserror::Error;

use super::entity::{AttributeElement, Entity, Space};

const BINARY_SENTINEL: &[u8] = b"AutoCAD Binary DXF";

/// First `$ACADVER` (AutoCAD 2007) whose text is stored as UTF-8.
const FIRST_UNICODE_VERSION: &str = "AC1021";

/// Errors raised while decoding a DXF file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DxfError {
    /// Binary DXF is not supported.
    #[error("Binary DXF files are not supported")]
    Binary,

    /// A group code line is not an integer.
    #[error("Invalid group code {code:?} at line {line}")]
    InvalidGroupCode { line: usize, code: String },

    /// The file ends after a group code without its value.
    #[error("Unexpected end of file after group code at line {line}")]
    Truncated { line: usize },
}

/// Text encoding of the source file, reused when saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// Single-byte code page (`$DWGCODEPAGE`). Bytes are kept one char each
    /// so that untouched values are written back unchanged.
    CodePage,
}

/// One group code/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupPair {
    /// The code line as found in the file (keeps its padding).
    raw_code: String,
    pub(crate) code: i32,
    pub(crate) value: String,
}

/// An ASCII DXF document.
#[derive(Debug, Clone)]
pub struct DxfDocument {
    pairs: Vec<GroupPair>,
    line_ending: &'static str,
    encoding: Encoding,
    version: Option<String>,
}

impl DxfDocument {
    /// Decodes a DXF file from bytes.
    ///
    /// Files from AutoCAD 2007 on are UTF-8. Older files, and files without
    /// `$ACADVER`, use a code page; their bytes are decoded one char each.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DxfError> {
        if bytes.starts_with(BINARY_SENTINEL) {
            return Err(DxfError::Binary);
        }

        if let Ok(text) = std::str::from_utf8(bytes) {
            let document = Self::parse(text, Encoding::Utf8)?;
            if document.is_unicode() {
                return Ok(document);
            }
        }

        let text: String = bytes.iter().map(|&b| b as char).collect();
        // Also covers a 2007+ header over bytes that are not valid UTF-8
        Self::parse(&text, Encoding::CodePage)
    }

    fn parse(text: &str, encoding: Encoding) -> Result<Self, DxfError> {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };

        let mut pairs = Vec::new();
        let mut lines = text.lines().enumerate();

        while let Some((index, code_line)) = lines.next() {
            let trimmed = code_line.trim();
            if trimmed.is_empty() {
                // Trailing blank lines after EOF
                if lines.clone().all(|(_, l)| l.trim().is_empty()) {
                    break;
                }
            }

            let code = trimmed
                .parse::<i32>()
                .map_err(|_| DxfError::InvalidGroupCode {
                    line: index + 1,
                    code: trimmed.to_string(),
                })?;

            let (_, value) = lines
                .next()
                .ok_or(DxfError::Truncated { line: index + 1 })?;

            pairs.push(GroupPair {
                raw_code: code_line.to_string(),
                code,
                value: value.to_string(),
            });
        }

        let version = header_variable(&pairs, "$ACADVER").map(|v| v.trim().to_string());

        Ok(Self {
            pairs,
            line_ending,
            encoding,
            version,
        })
    }

    /// Encodes the document back to bytes, in the source encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut text = String::new();
        for pair in &self.pairs {
            text.push_str(&pair.raw_code);
            text.push_str(self.line_ending);
            text.push_str(&pair.value);
            text.push_str(self.line_ending);
        }

        match self.encoding {
            Encoding::Utf8 => text.into_bytes(),
            Encoding::CodePage => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The `$ACADVER` header value, e.g. `AC1015`.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Whether text values are stored as UTF-8.
    pub fn is_unicode(&self) -> bool {
        self.version
            .as_deref()
            .is_some_and(|v| v >= FIRST_UNICODE_VERSION)
    }

    #[cfg(test)]
    pub(crate) fn pairs(&self) -> &[GroupPair] {
        &self.pairs
    }

    /// All graphical entities of the ENTITIES and BLOCKS sections, with the
    /// space they belong to.
    pub fn entities(&self) -> Vec<Entity<'_>> {
        super::entity::scan(&self.pairs)
    }

    /// ATTRIB elements owned by block references placed in a paper-space
    /// layout.
    pub fn attribute_elements(&self) -> Vec<AttributeElement> {
        let mut owner_space: Option<Space> = None;
        let mut elements = Vec::new();

        for entity in self.entities() {
            match entity.kind {
                "INSERT" => owner_space = Some(entity.space.clone()),
                "ATTRIB" => {
                    let space = owner_space.clone().unwrap_or_else(|| entity.space.clone());
                    if !space.is_paper() {
                        continue;
                    }
                    if let Some(tag) = entity.value(2) {
                        elements.push(AttributeElement {
                            tag: tag.trim().to_uppercase(),
                            text_index: entity.index_of(1),
                            entity_start: entity.start(),
                        });
                    }
                }
                _ => owner_space = None,
            }
        }

        elements
    }

    /// Replaces the text of an attribute element. Line breaks are flattened
    /// to spaces since a value must stay on one line. In code page files
    /// non-ASCII characters are written as `\U+XXXX` escapes.
    pub fn set_attribute_text(&mut self, element: &AttributeElement, text: &str) -> bool {
        let Some(index) = element.text_index else {
            return false;
        };
        let text = text.replace(['\r', '\n'], " ");
        let text = if self.encoding == Encoding::CodePage {
            escape_unicode(&text)
        } else {
            text
        };
        match self.pairs.get_mut(index) {
            Some(pair) if pair.code == 1 => {
                pair.value = text;
                true
            }
            _ => false,
        }
    }
}

/// Value of a HEADER variable (`9 $NAME` followed by its value pair).
fn header_variable<'a>(pairs: &'a [GroupPair], name: &str) -> Option<&'a str> {
    let position = pairs
        .iter()
        .position(|p| p.code == 9 && p.value.trim() == name)?;
    pairs.get(position + 1).map(|p| p.value.as_str())
}

/// Writes every non-ASCII character as a DXF `\U+XXXX` escape.
fn escape_unicode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut [0; 2]) {
                out.push_str(&format!("\\U+{:04X}", unit));
            }
        }
    }
    out
}

/// Replaces DXF `\U+XXXX` escapes with the characters they stand for.
/// Escapes that do not form a valid character are left as written.
pub fn decode_unicode_escapes(text: &str) -> String {
    let Ok(escape) = Regex::new(r"\\U\+([0-9A-Fa-f]{4})") else {
        return text.to_string();
    };
    escape
        .replace_all(text, |caps: &regex_lite::Captures<'_>| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrib_document() -> String {
        [
            "  0", "SECTION", "  2", "HEADER", "  0", "ENDSEC",
            "  0", "SECTION", "  2", "ENTITIES",
            "  0", "INSERT", "  8", "0", " 66", "1", " 67", "1", "  2", "TITLE", " 10", "0.0", " 20", "0.0",
            "  0", "ATTRIB", "  8", "0", " 67", "1", " 10", "5.0", " 20", "5.0", " 40", "2.5", "  1", "", "  2", "posicao",
            "  0", "ATTRIB", "  8", "0", " 67", "1", " 10", "5.0", " 20", "10.0", " 40", "2.5", "  1", "old", "  2", "H",
            "  0", "SEQEND",
            "  0", "INSERT", "  8", "0", " 66", "1", "  2", "MODELBLOCK", " 10", "0.0", " 20", "0.0",
            "  0", "ATTRIB", "  8", "0", "  1", "model", "  2", "L",
            "  0", "SEQEND",
            "  0", "ENDSEC",
            "  0", "EOF",
        ]
        .join("\r\n")
            + "\r\n"
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let source = attrib_document();
        let doc = DxfDocument::from_bytes(source.as_bytes()).unwrap();
        assert_eq!(doc.to_bytes(), source.as_bytes());
    }

    #[test]
    fn test_attribute_elements_only_in_paper_space() {
        let doc = DxfDocument::from_bytes(attrib_document().as_bytes()).unwrap();
        let tags: Vec<String> = doc.attribute_elements().into_iter().map(|a| a.tag).collect();
        assert_eq!(tags, vec!["POSICAO", "H"]);
    }

    #[test]
    fn test_set_attribute_text() {
        let mut doc = DxfDocument::from_bytes(attrib_document().as_bytes()).unwrap();
        let elements = doc.attribute_elements();
        assert!(doc.set_attribute_text(&elements[1], "150\n2"));

        let text = String::from_utf8(doc.to_bytes()).unwrap();
        assert!(text.contains("  1\r\n150 2\r\n  2\r\nH"));
        assert!(!text.contains("old"));
    }

    #[test]
    fn test_binary_dxf_is_rejected() {
        let result = DxfDocument::from_bytes(b"AutoCAD Binary DXF\r\n\x1a\x00");
        assert_eq!(result.unwrap_err(), DxfError::Binary);
    }

    #[test]
    fn test_invalid_group_code() {
        let result = DxfDocument::from_bytes(b"  0\nSECTION\nabc\nHEADER\n");
        assert!(matches!(
            result,
            Err(DxfError::InvalidGroupCode { line: 3, .. })
        ));
    }

    #[test]
    fn test_truncated_file() {
        let result = DxfDocument::from_bytes(b"  0\nSECTION\n  2\n");
        assert!(matches!(result, Err(DxfError::Truncated { line: 3 })));
    }

    #[test]
    fn test_latin1_round_trip() {
        let mut bytes = b"  0\nSECTION\n  2\nENTITIES\n  0\nTEXT\n  1\nAp".to_vec();
        bytes.push(0xF3); // 'ó' in Latin-1
        bytes.extend_from_slice(b"io\n  0\nENDSEC\n  0\nEOF\n");

        let doc = DxfDocument::from_bytes(&bytes).unwrap();
        assert_eq!(doc.encoding(), Encoding::CodePage);
        assert_eq!(doc.to_bytes(), bytes);
    }

    fn versioned_document(version: &str) -> String {
        [
            "  0", "SECTION", "  2", "HEADER",
            "  9", "$ACADVER", "  1", version,
            "  9", "$DWGCODEPAGE", "  3", "ANSI_1252",
            "  0", "ENDSEC",
            "  0", "SECTION", "  2", "ENTITIES",
            "  0", "INSERT", " 66", "1", " 67", "1", "  2", "TITLE",
            "  0", "ATTRIB", " 67", "1", "  1", "", "  2", "CLIENTE",
            "  0", "SEQEND",
            "  0", "ENDSEC",
            "  0", "EOF",
        ]
        .join("\n")
            + "\n"
    }

    #[test]
    fn test_legacy_version_escapes_non_ascii_values() {
        let mut doc = DxfDocument::from_bytes(versioned_document("AC1015").as_bytes()).unwrap();
        assert_eq!(doc.version(), Some("AC1015"));
        assert!(!doc.is_unicode());
        assert_eq!(doc.encoding(), Encoding::CodePage);

        let elements = doc.attribute_elements();
        assert!(doc.set_attribute_text(&elements[0], "São Paulo"));

        let bytes = doc.to_bytes();
        assert!(bytes.is_ascii());
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("  1\nS\\U+00E3o Paulo\n  2\nCLIENTE"));
    }

    #[test]
    fn test_unicode_version_writes_utf8() {
        let mut doc = DxfDocument::from_bytes(versioned_document("AC1024").as_bytes()).unwrap();
        assert!(doc.is_unicode());
        assert_eq!(doc.encoding(), Encoding::Utf8);

        let elements = doc.attribute_elements();
        assert!(doc.set_attribute_text(&elements[0], "São Paulo"));
        let text = String::from_utf8(doc.to_bytes()).unwrap();
        assert!(text.contains("  1\nSão Paulo\n  2\nCLIENTE"));
    }

    #[test]
    fn test_missing_version_is_treated_as_legacy() {
        let mut doc = DxfDocument::from_bytes(attrib_document().as_bytes()).unwrap();
        assert_eq!(doc.version(), None);

        let elements = doc.attribute_elements();
        assert!(doc.set_attribute_text(&elements[1], "Ø 50"));
        let text = String::from_utf8(doc.to_bytes()).unwrap();
        assert!(text.contains("\\U+00D8 50"));
    }

    #[test]
    fn test_decode_unicode_escapes() {
        assert_eq!(decode_unicode_escapes("S\\U+00E3o Paulo"), "São Paulo");
        assert_eq!(decode_unicode_escapes("45\\U+00b0 TYP"), "45° TYP");
        assert_eq!(decode_unicode_escapes("\\U+D800 x"), "\\U+D800 x");
        assert_eq!(decode_unicode_escapes("\\U+00"), "\\U+00");
    }

    #[test]
    fn test_trailing_blank_lines_are_tolerated() {
        let doc = DxfDocument::from_bytes(b"  0\nEOF\n\n\n").unwrap();
        assert_eq!(doc.pairs().len(), 1);
    }
}
