//! Entity scanning over group pairs.

use super::document::GroupPair;

/// Where an entity lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Space {
    /// Model space.
    Model,
    /// A paper-space (print) layout, keyed by layout or block name.
    Paper(String),
    /// An ordinary block definition.
    Block(String),
}

impl Space {
    pub fn is_paper(&self) -> bool {
        matches!(self, Self::Paper(_))
    }
}

/// A view over one entity's group pairs.
#[derive(Debug, Clone)]
pub struct Entity<'a> {
    /// Entity type (`LINE`, `INSERT`, `ATTRIB`, ...).
    pub kind: &'a str,
    pub space: Space,
    /// Whether the entity sits in a block definition rather than ENTITIES.
    pub in_blocks: bool,
    start: usize,
    pairs: &'a [GroupPair],
}

impl<'a> Entity<'a> {
    /// First value with the given group code.
    pub fn value(&self, code: i32) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|p| p.code == code)
            .map(|p| p.value.as_str())
    }

    /// All values with the given group code, in file order.
    pub fn values(&self, code: i32) -> impl Iterator<Item = &'a str> + '_ {
        self.pairs
            .iter()
            .filter(move |p| p.code == code)
            .map(|p| p.value.as_str())
    }

    /// First value with the given group code parsed as a number.
    pub fn number(&self, code: i32) -> Option<f64> {
        self.value(code).and_then(|v| v.trim().parse().ok())
    }

    /// All values with the given group code parsed as numbers.
    pub fn numbers(&self, code: i32) -> Vec<f64> {
        self.values(code)
            .filter_map(|v| v.trim().parse().ok())
            .collect()
    }

    /// Index (in the whole document) of the first pair with the given code.
    pub(crate) fn index_of(&self, code: i32) -> Option<usize> {
        self.pairs
            .iter()
            .position(|p| p.code == code)
            .map(|offset| self.start + offset)
    }

    pub fn start(&self) -> usize {
        self.start
    }
}

/// An attribute element that can receive a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeElement {
    /// Attribute tag, upper-cased.
    pub tag: String,
    /// Index of the text pair (group code 1), when the attribute has one.
    pub text_index: Option<usize>,
    /// Index of the entity's first pair.
    pub entity_start: usize,
}

pub(crate) fn scan(pairs: &[GroupPair]) -> Vec<Entity<'_>> {
    let mut entities = Vec::new();
    let mut section: Option<&str> = None;
    let mut block: Option<Space> = None;
    let mut i = 0;

    while i < pairs.len() {
        if pairs[i].code != 0 {
            i += 1;
            continue;
        }

        let end = pairs[i + 1..]
            .iter()
            .position(|p| p.code == 0)
            .map(|offset| i + 1 + offset)
            .unwrap_or(pairs.len());
        let slice = &pairs[i..end];
        let kind = pairs[i].value.trim();

        match kind {
            "SECTION" => section = find_value(slice, 2),
            "ENDSEC" => {
                section = None;
                block = None;
            }
            "BLOCK" if section == Some("BLOCKS") => {
                block = Some(block_space(find_value(slice, 2).unwrap_or_default()));
            }
            "ENDBLK" => block = None,
            _ => match (section, &block) {
                (Some("ENTITIES"), _) => entities.push(Entity {
                    kind,
                    space: entity_space(slice),
                    in_blocks: false,
                    start: i,
                    pairs: slice,
                }),
                (Some("BLOCKS"), Some(space)) => entities.push(Entity {
                    kind,
                    space: space.clone(),
                    in_blocks: true,
                    start: i,
                    pairs: slice,
                }),
                _ => {}
            },
        }

        i = end;
    }

    entities
}

fn find_value(slice: &[GroupPair], code: i32) -> Option<&str> {
    slice
        .iter()
        .skip(1)
        .find(|p| p.code == code)
        .map(|p| p.value.trim())
}

fn block_space(name: &str) -> Space {
    let lower = name.to_ascii_lowercase();
    if lower.starts_with("*paper_space") {
        Space::Paper(name.to_string())
    } else if lower.starts_with("*model_space") {
        Space::Model
    } else {
        Space::Block(name.to_string())
    }
}

fn entity_space(slice: &[GroupPair]) -> Space {
    let layout = find_value(slice, 410);
    let paper_flag = find_value(slice, 67) == Some("1");

    match layout {
        Some(name) if !name.eq_ignore_ascii_case("Model") => Space::Paper(name.to_string()),
        _ if paper_flag => Space::Paper("*Paper_Space".to_string()),
        _ => Space::Model,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dxf::DxfDocument;

    fn doc(lines: &[&str]) -> DxfDocument {
        DxfDocument::from_bytes(lines.join("\n").as_bytes()).unwrap()
    }

    #[test]
    fn test_spaces_of_entities() {
        let doc = doc(&[
            "0", "SECTION", "2", "BLOCKS",
            "0", "BLOCK", "2", "*Paper_Space0",
            "0", "LINE", "10", "0", "20", "0", "11", "1", "21", "1",
            "0", "ENDBLK",
            "0", "BLOCK", "2", "BOLT",
            "0", "CIRCLE", "10", "0", "20", "0", "40", "1",
            "0", "ENDBLK",
            "0", "ENDSEC",
            "0", "SECTION", "2", "ENTITIES",
            "0", "LINE", "10", "0", "20", "0", "11", "1", "21", "1",
            "0", "TEXT", "67", "1", "1", "hello",
            "0", "MTEXT", "410", "Layout2", "1", "note",
            "0", "ENDSEC",
            "0", "EOF",
        ]);

        let entities = doc.entities();
        let summary: Vec<(&str, Space, bool)> = entities
            .iter()
            .map(|e| (e.kind, e.space.clone(), e.in_blocks))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("LINE", Space::Paper("*Paper_Space0".to_string()), true),
                ("CIRCLE", Space::Block("BOLT".to_string()), true),
                ("LINE", Space::Model, false),
                ("TEXT", Space::Paper("*Paper_Space".to_string()), false),
                ("MTEXT", Space::Paper("Layout2".to_string()), false),
            ]
        );
    }

    #[test]
    fn test_entity_values() {
        let doc = doc(&[
            "0", "SECTION", "2", "ENTITIES",
            "0", "LWPOLYLINE", "90", "2", "70", "1", "10", "1.5", "20", "2", "10", "3", "20", " 4.25",
            "0", "ENDSEC",
            "0", "EOF",
        ]);

        let entities = doc.entities();
        let poly = &entities[0];
        assert_eq!(poly.kind, "LWPOLYLINE");
        assert_eq!(poly.number(70), Some(1.0));
        assert_eq!(poly.numbers(10), vec![1.5, 3.0]);
        assert_eq!(poly.numbers(20), vec![2.0, 4.25]);
        assert_eq!(poly.value(999), None);
    }

    #[test]
    fn test_model_layout_name_is_model_space() {
        let doc = doc(&[
            "0", "SECTION", "2", "ENTITIES",
            "0", "LINE", "410", "Model",
            "0", "ENDSEC",
        ]);
        assert_eq!(doc.entities()[0].space, Space::Model);
    }
}
