//! Extraction of paper-space content for rendering.

use regex_lite::{Captures, Regex};

use crate::dxf::{decode_unicode_escapes, DxfDocument, Entity, Space};

const DEFAULT_TEXT_HEIGHT: f64 = 2.5;
const ARC_STEP_DEGREES: f64 = 10.0;
const FULL_TURN: f64 = 360.0;

/// A drawable primitive in drawing units.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polyline {
        points: Vec<(f64, f64)>,
        closed: bool,
    },
    Text {
        x: f64,
        y: f64,
        height: f64,
        text: String,
    },
}

impl Shape {
    fn points(&self) -> Vec<(f64, f64)> {
        match self {
            Self::Polyline { points, .. } => points.clone(),
            Self::Text { x, y, height, .. } => vec![(*x, *y), (*x, *y + *height)],
        }
    }
}

/// The drawable content of one paper-space layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPage {
    pub name: String,
    pub shapes: Vec<Shape>,
}

impl LayoutPage {
    /// Bounding box `(min_x, min_y, max_x, max_y)` of all shapes.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut points = self.shapes.iter().flat_map(Shape::points);
        let (x0, y0) = points.next()?;
        Some(points.fold((x0, y0, x0, y0), |(ax, ay, bx, by), (x, y)| {
            (ax.min(x), ay.min(y), bx.max(x), by.max(y))
        }))
    }
}

/// Extracts the first paper-space layout with drawable content.
///
/// The active layout (paper-space entities of the ENTITIES section) comes
/// first, then the other layouts stored as `*Paper_Space` blocks.
pub fn extract_layout(document: &DxfDocument) -> Option<LayoutPage> {
    let entities = document.entities();

    let active = entities.iter().filter(|e| !e.in_blocks);
    let stored = entities.iter().filter(|e| e.in_blocks);

    let mut candidates: Vec<(&str, Vec<&Entity<'_>>)> = Vec::new();
    for entity in active.chain(stored) {
        if let Space::Paper(name) = &entity.space {
            match candidates.iter().position(|(n, _)| *n == name.as_str()) {
                Some(i) => candidates[i].1.push(entity),
                None => candidates.push((name.as_str(), vec![entity])),
            }
        }
    }

    candidates.into_iter().find_map(|(name, members)| {
        let shapes: Vec<Shape> = members.into_iter().filter_map(to_shape).collect();
        (!shapes.is_empty()).then(|| LayoutPage {
            name: name.to_string(),
            shapes,
        })
    })
}

fn to_shape(entity: &Entity<'_>) -> Option<Shape> {
    let point = |x: i32, y: i32| Some((entity.number(x)?, entity.number(y)?));

    match entity.kind {
        "LINE" => Some(Shape::Polyline {
            points: vec![point(10, 20)?, point(11, 21)?],
            closed: false,
        }),
        "LWPOLYLINE" => {
            let points: Vec<(f64, f64)> = entity
                .numbers(10)
                .into_iter()
                .zip(entity.numbers(20))
                .collect();
            let closed = entity.number(70).map(|f| f as i64 & 1 == 1).unwrap_or(false);
            (points.len() >= 2).then_some(Shape::Polyline { points, closed })
        }
        "CIRCLE" => {
            let (cx, cy) = point(10, 20)?;
            let radius = entity.number(40)?;
            Some(Shape::Polyline {
                points: arc_points(cx, cy, radius, 0.0, FULL_TURN),
                closed: true,
            })
        }
        "ARC" => {
            let (cx, cy) = point(10, 20)?;
            let radius = entity.number(40)?;
            let start = entity.number(50).unwrap_or(0.0);
            let end = entity.number(51).unwrap_or(FULL_TURN);
            Some(Shape::Polyline {
                points: arc_points(cx, cy, radius, start, start + arc_sweep(start, end)),
                closed: false,
            })
        }
        "TEXT" | "ATTRIB" => {
            let invisible = entity.number(70).map(|f| f as i64 & 1 == 1).unwrap_or(false);
            if entity.kind == "ATTRIB" && invisible {
                return None;
            }
            text_shape(entity, decode_unicode_escapes(entity.value(1)?))
        }
        "MTEXT" => {
            let mut text: String = entity.values(3).collect();
            text.push_str(entity.value(1)?);
            text_shape(entity, strip_mtext_codes(&text))
        }
        _ => None,
    }
}

fn text_shape(entity: &Entity<'_>, text: String) -> Option<Shape> {
    let text = text.trim().to_string();
    if text.is_empty() {
        return None;
    }
    Some(Shape::Text {
        x: entity.number(10)?,
        y: entity.number(20)?,
        height: entity.number(40).unwrap_or(DEFAULT_TEXT_HEIGHT),
        text,
    })
}

/// Counter-clockwise sweep from `start` to `end`, in `(0, 360]` degrees.
fn arc_sweep(start: f64, end: f64) -> f64 {
    let sweep = (end - start).rem_euclid(FULL_TURN);
    if sweep > 0.0 && sweep.is_finite() {
        sweep
    } else {
        FULL_TURN
    }
}

fn arc_points(cx: f64, cy: f64, radius: f64, start_deg: f64, end_deg: f64) -> Vec<(f64, f64)> {
    let span = (end_deg - start_deg).clamp(0.0, FULL_TURN);
    let steps = ((span / ARC_STEP_DEGREES).ceil() as usize).max(1);
    (0..=steps)
        .map(|i| {
            let angle = (start_deg + span * i as f64 / steps as f64).to_radians();
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

/// Drops MTEXT inline formatting: paragraph breaks become spaces, grouping
/// braces, toggles and `\X...;` codes are removed, stacked fractions are
/// written with a slash and `\U+XXXX` escapes are decoded.
fn strip_mtext_codes(text: &str) -> String {
    let Ok(code) = Regex::new(
        r"\\U\+[0-9A-Fa-f]{4}|\\S[^;]*;|\\[ACcfFHQTWp][^;]*;|\\[LlOoKk]|\\[P~]|\\[\\{}]|[{}]",
    ) else {
        return text.to_string();
    };

    code.replace_all(text, |caps: &Captures<'_>| {
        let matched = &caps[0];
        match matched.as_bytes() {
            [b'{'] | [b'}'] => String::new(),
            [b'\\', b'U', ..] => decode_unicode_escapes(matched),
            [b'\\', b'S', ..] => matched[2..matched.len() - 1].replace(['^', '#'], "/"),
            [b'\\', b'P'] | [b'\\', b'~'] => " ".to_string(),
            [b'\\', escaped @ (b'\\' | b'{' | b'}')] => char::from(*escaped).to_string(),
            _ => String::new(),
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> DxfDocument {
        DxfDocument::from_bytes(lines.join("\n").as_bytes()).unwrap()
    }

    #[test]
    fn test_extracts_active_paper_space() {
        let doc = doc(&[
            "0", "SECTION", "2", "ENTITIES",
            "0", "LINE", "10", "0", "20", "0", "11", "100", "21", "0",
            "0", "LINE", "67", "1", "10", "0", "20", "0", "11", "10", "21", "5",
            "0", "ATTRIB", "67", "1", "10", "1", "20", "2", "40", "3", "1", "POS-001", "2", "POSICAO",
            "0", "ATTRIB", "67", "1", "70", "1", "10", "1", "20", "2", "1", "hidden", "2", "X",
            "0", "ENDSEC", "0", "EOF",
        ]);

        let page = extract_layout(&doc).unwrap();
        assert_eq!(page.name, "*Paper_Space");
        assert_eq!(
            page.shapes,
            vec![
                Shape::Polyline {
                    points: vec![(0.0, 0.0), (10.0, 5.0)],
                    closed: false
                },
                Shape::Text {
                    x: 1.0,
                    y: 2.0,
                    height: 3.0,
                    text: "POS-001".to_string()
                },
            ]
        );
        assert_eq!(page.bounds(), Some((0.0, 0.0, 10.0, 5.0)));
    }

    #[test]
    fn test_falls_back_to_paper_space_block() {
        let doc = doc(&[
            "0", "SECTION", "2", "BLOCKS",
            "0", "BLOCK", "2", "*Paper_Space0",
            "0", "CIRCLE", "10", "0", "20", "0", "40", "2",
            "0", "ENDBLK",
            "0", "ENDSEC",
            "0", "SECTION", "2", "ENTITIES",
            "0", "LINE", "10", "0", "20", "0", "11", "1", "21", "1",
            "0", "ENDSEC", "0", "EOF",
        ]);

        let page = extract_layout(&doc).unwrap();
        assert_eq!(page.name, "*Paper_Space0");
        match &page.shapes[0] {
            Shape::Polyline { points, closed } => {
                assert!(closed);
                assert_eq!(points.len(), 37);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_model_space_only_has_no_layout() {
        let doc = doc(&[
            "0", "SECTION", "2", "ENTITIES",
            "0", "LINE", "10", "0", "20", "0", "11", "1", "21", "1",
            "0", "ENDSEC", "0", "EOF",
        ]);
        assert!(extract_layout(&doc).is_none());
    }

    #[test]
    fn test_lwpolyline_closed_flag() {
        let doc = doc(&[
            "0", "SECTION", "2", "ENTITIES",
            "0", "LWPOLYLINE", "67", "1", "90", "3", "70", "1",
            "10", "0", "20", "0", "10", "4", "20", "0", "10", "4", "20", "3",
            "0", "ENDSEC", "0", "EOF",
        ]);
        let page = extract_layout(&doc).unwrap();
        assert_eq!(
            page.shapes[0],
            Shape::Polyline {
                points: vec![(0.0, 0.0), (4.0, 0.0), (4.0, 3.0)],
                closed: true
            }
        );
    }

    #[test]
    fn test_strip_mtext_codes() {
        assert_eq!(strip_mtext_codes("{\\fArial|b1;Title}\\PLine two"), "Title Line two");
        assert_eq!(strip_mtext_codes("50\\\\60"), "50\\60");
        assert_eq!(strip_mtext_codes("\\{A\\}"), "{A}");
        assert_eq!(strip_mtext_codes("\\H2.5x;\\C1;EL\\~+12.5"), "EL +12.5");
    }

    #[test]
    fn test_strip_mtext_toggles_keep_text() {
        assert_eq!(strip_mtext_codes("\\LPOS\\l-001 EL +12.5"), "POS-001 EL +12.5");
        assert_eq!(strip_mtext_codes("\\Oover\\o \\Kstrike\\k"), "over strike");
    }

    #[test]
    fn test_strip_mtext_unicode_and_stacking() {
        assert_eq!(strip_mtext_codes("ANGLE 45\\U+00B0 TYP"), "ANGLE 45° TYP");
        assert_eq!(strip_mtext_codes("S\\U+00e3o Paulo"), "São Paulo");
        assert_eq!(strip_mtext_codes("1\\S1^2; IN"), "11/2 IN");
    }

    #[test]
    fn test_attrib_text_decodes_escapes() {
        let doc = doc(&[
            "0", "SECTION", "2", "ENTITIES",
            "0", "ATTRIB", "67", "1", "10", "0", "20", "0", "1", "S\\U+00E3o Paulo", "2", "CLIENTE",
            "0", "ENDSEC", "0", "EOF",
        ]);
        let page = extract_layout(&doc).unwrap();
        assert!(matches!(&page.shapes[0], Shape::Text { text, .. } if text == "São Paulo"));
    }

    #[test]
    fn test_arc_sweep_is_bounded() {
        assert_eq!(arc_sweep(0.0, 90.0), 90.0);
        assert_eq!(arc_sweep(270.0, 90.0), 180.0);
        assert_eq!(arc_sweep(45.0, 45.0), 360.0);
        assert_eq!(arc_sweep(0.0, 1.0e12 + 30.0), (1.0e12f64 + 30.0).rem_euclid(360.0));
        assert_eq!(arc_sweep(0.0, f64::INFINITY), 360.0);
        assert!(arc_points(0.0, 0.0, 1.0, 0.0, 1.0e12).len() <= 37);
    }

    #[test]
    fn test_corrupt_arc_stays_small() {
        let doc = doc(&[
            "0", "SECTION", "2", "ENTITIES",
            "0", "ARC", "67", "1", "10", "0", "20", "0", "40", "5", "50", "0", "51", "1e15",
            "0", "ENDSEC", "0", "EOF",
        ]);
        let page = extract_layout(&doc).unwrap();
        match &page.shapes[0] {
            Shape::Polyline { points, closed } => {
                assert!(!closed);
                assert!(points.len() <= 37);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }
}
