use serde::{Deserialize, Serialize};

/// One colour stop of the connector gradient; `offset` is a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: String,
}

impl GradientStop {
    pub fn new(offset: f32, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
        }
    }

    /// Spreads plain colours evenly from 0% to 100%.
    pub fn evenly(colors: Vec<String>) -> Vec<GradientStop> {
        let count = colors.len();
        colors
            .into_iter()
            .enumerate()
            .map(|(idx, color)| {
                let offset = if count > 1 {
                    idx as f32 / (count - 1) as f32 * 100.0
                } else {
                    0.0
                };
                GradientStop { offset, color }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub panel_background: String,
    pub panel_border: String,
    pub cell_fill: String,
    pub cell_border: String,
    pub cell_text_color: String,
    pub hot_cell_fill: String,
    pub hot_cell_border: String,
    pub hot_cell_text_color: String,
    pub marker_color: String,
    pub marker_ring: String,
    pub connector_stops: Vec<GradientStop>,
    pub connector_width: f32,
    pub chip_fill: String,
    pub chip_border: String,
    pub chip_icon_fill: String,
    pub chip_icon_border: String,
    pub chip_label_color: String,
    pub chip_amount_color: String,
}

impl Theme {
    /// Palette of the phone "Track" screen.
    pub fn track() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            background: "#FFFFFF".to_string(),
            panel_background: "rgba(255,255,255,0.80)".to_string(),
            panel_border: "rgba(226,232,240,0.60)".to_string(),
            cell_fill: "rgba(255,255,255,0.78)".to_string(),
            cell_border: "rgba(226,232,240,0.70)".to_string(),
            cell_text_color: "#475569".to_string(),
            hot_cell_fill: "rgba(84,100,255,0.10)".to_string(),
            hot_cell_border: "rgba(37,99,235,0.18)".to_string(),
            hot_cell_text_color: "#0F192D".to_string(),
            marker_color: "rgba(14,165,233,0.65)".to_string(),
            marker_ring: "rgba(255,255,255,0.85)".to_string(),
            connector_stops: vec![
                GradientStop::new(0.0, "rgba(30,162,255,0.38)"),
                GradientStop::new(55.0, "rgba(84,100,255,0.26)"),
                GradientStop::new(100.0, "rgba(15,25,45,0.10)"),
            ],
            connector_width: 1.15,
            chip_fill: "rgba(255,255,255,0.82)".to_string(),
            chip_border: "rgba(226,232,240,0.70)".to_string(),
            chip_icon_fill: "rgba(255,255,255,0.82)".to_string(),
            chip_icon_border: "rgba(226,232,240,0.80)".to_string(),
            chip_label_color: "#334155".to_string(),
            chip_amount_color: "#0F192D".to_string(),
        }
    }

    /// Palette of the hero "Calendar signals" module.
    pub fn hero() -> Self {
        Self {
            font_size: 10.0,
            cell_fill: "rgba(255,255,255,0.60)".to_string(),
            cell_text_color: "#64748B".to_string(),
            hot_cell_fill: "rgba(15,23,42,0.03)".to_string(),
            hot_cell_border: "rgba(226,232,240,0.70)".to_string(),
            hot_cell_text_color: "#334155".to_string(),
            marker_color: "rgba(14,165,233,0.70)".to_string(),
            marker_ring: "rgba(255,255,255,0.82)".to_string(),
            connector_stops: vec![
                GradientStop::new(0.0, "rgba(15,25,45,0.08)"),
                GradientStop::new(100.0, "rgba(30,162,255,0.18)"),
            ],
            connector_width: 1.0,
            chip_fill: "rgba(255,255,255,0.64)".to_string(),
            chip_border: "rgba(255,255,255,0.20)".to_string(),
            ..Self::track()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::track()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_gradient_bends_past_the_middle() {
        let offsets: Vec<f32> = Theme::track().connector_stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 55.0, 100.0]);
    }

    #[test]
    fn plain_colours_spread_evenly() {
        let stops = GradientStop::evenly(vec!["red".into(), "green".into(), "blue".into()]);
        assert_eq!(stops[1], GradientStop::new(50.0, "green"));
        assert_eq!(stops[2].offset, 100.0);
    }
}
