use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

/// ColorBrewer "Set1", used while there are enough entries.
const SET1: [(u8, u8, u8); 9] = [
    (0xe4, 0x1a, 0x1c),
    (0x37, 0x7e, 0xb8),
    (0x4d, 0xaf, 0x4a),
    (0x98, 0x4e, 0xa3),
    (0xff, 0x7f, 0x00),
    (0xff, 0xff, 0x33),
    (0xa6, 0x56, 0x28),
    (0xf7, 0x81, 0xbf),
    (0x99, 0x99, 0x99),
];

/// Fill colour of histogram bars.
pub const HISTOGRAM_FILL: Color32 = Color32::from_rgb(0x87, 0xce, 0xeb);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// `n` visually distinct colours: Set1 for up to nine, evenly spaced hues beyond.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n <= SET1.len() {
        return SET1
            .iter()
            .take(n)
            .map(|&(r, g, b)| Color32::from_rgb(r, g, b))
            .collect();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of the category column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign colours in the given order, so the first group seen gets the
    /// first palette entry.
    pub fn new<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut ordered: Vec<&CellValue> = Vec::new();
        let mut seen = BTreeSet::new();
        for v in values {
            if seen.insert(v) {
                ordered.push(v);
            }
        }
        let palette = generate_palette(ordered.len());
        let mapping = ordered
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given category value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
