use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

/// Average advance of a proportional sans face, as a fraction of the font size.
const AVERAGE_ADVANCE: f32 = 0.56;

static MEASURER: Lazy<Mutex<ChipTextMeasurer>> =
    Lazy::new(|| Mutex::new(ChipTextMeasurer::default()));

/// Character-count estimate used when no font is available.
pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    if font_size <= 0.0 {
        return 0.0;
    }
    text.chars().filter(|ch| *ch != '\n').count() as f32 * font_size * AVERAGE_ADVANCE
}

/// Width of `text` in the first installed face of `font_family`, if any.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

pub fn text_width(text: &str, font_size: f32, font_family: &str, measure: bool) -> f32 {
    if measure
        && let Some(width) = measure_text_width(text, font_size, font_family)
    {
        return width;
    }
    estimate_text_width(text, font_size)
}

#[derive(Default)]
struct ChipTextMeasurer {
    db: Option<Database>,
    faces: HashMap<String, Option<LoadedFace>>,
}

struct LoadedFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: f32,
    advances: HashMap<char, Option<u16>>,
}

impl ChipTextMeasurer {
    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = font_family.trim().to_string();
        if !self.faces.contains_key(&key) {
            let face = self.load(font_family);
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get_mut(&key)?.as_mut()?;
        face.width(text, font_size)
    }

    fn load(&mut self, font_family: &str) -> Option<LoadedFace> {
        let db = self.db.get_or_insert_with(|| {
            let mut db = Database::new();
            db.load_system_fonts();
            db
        });

        let names: Vec<&str> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\''))
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "monospace" | "ui-monospace" => Family::Monospace,
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    Family::SansSerif
                }
                _ => Family::Name(name),
            })
            .collect();
        families.push(Family::SansSerif);

        let query = Query {
            families: &families,
            weight: Weight::SEMIBOLD,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = db.query(&query)?;
        db.with_face_data(id, |data, index| {
            let face = Face::parse(data, index).ok()?;
            Some(LoadedFace {
                data: data.to_vec(),
                index,
                units_per_em: face.units_per_em().max(1) as f32,
                advances: HashMap::new(),
            })
        })
        .flatten()
    }
}

impl LoadedFace {
    fn width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let face = Face::parse(&self.data, self.index).ok()?;
        let scale = font_size / self.units_per_em;
        let fallback = font_size * AVERAGE_ADVANCE;
        let mut width = 0.0f32;
        for ch in text.chars().filter(|ch| *ch != '\n') {
            let advance = *self.advances.entry(ch).or_insert_with(|| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
            });
            width += match advance {
                Some(units) if units > 0 => units as f32 * scale,
                _ => fallback,
            };
        }
        Some(width)
    }
}
