use crate::layout::{BoundingBox, CalendarLayout, CellLayout, Point};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub month: Option<String>,
    pub width: f32,
    pub height: f32,
    pub cells: Vec<CellLayout>,
    pub signals: Vec<SignalDump>,
    pub skipped: Vec<SkippedDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalDump {
    pub day: i32,
    pub label: String,
    pub amount: String,
    pub side: String,
    pub row: i32,
    pub col: i32,
    pub anchor: Point,
    pub chip_center: Point,
    pub chip_anchor_transform: String,
    pub clamped: bool,
    pub connector_path: String,
    pub local_bounding_box: BoundingBox,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDump {
    pub index: usize,
    pub day: i32,
    pub label: String,
    pub reason: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &CalendarLayout, month: Option<&str>) -> Self {
        let signals = layout
            .signals
            .iter()
            .map(|signal| SignalDump {
                day: signal.signal.day,
                label: signal.signal.label.clone(),
                amount: signal.signal.amount.clone(),
                side: signal.placement.side.as_str().to_string(),
                row: signal.cell.row,
                col: signal.cell.col,
                anchor: signal.anchor(),
                chip_center: signal.chip_center(),
                chip_anchor_transform: signal.placement.anchor_css(),
                clamped: signal.placement.was_clamped(),
                connector_path: signal.connector.d(),
                local_bounding_box: signal.connector.bbox,
            })
            .collect();

        let skipped = layout
            .skipped
            .iter()
            .map(|skip| SkippedDump {
                index: skip.index,
                day: skip.signal.day,
                label: skip.signal.label.clone(),
                reason: skip.reason.to_string(),
            })
            .collect();

        LayoutDump {
            month: month.map(str::to_string),
            width: layout.width,
            height: layout.height,
            cells: layout.cells.clone(),
            signals,
            skipped,
        }
    }
}

pub fn layout_json(layout: &CalendarLayout, month: Option<&str>) -> anyhow::Result<String> {
    let dump = LayoutDump::from_layout(layout, month);
    Ok(serde_json::to_string_pretty(&dump)?)
}

pub fn write_layout_dump(
    path: &Path,
    layout: &CalendarLayout,
    month: Option<&str>,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, month);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::ir::{CalendarSignal, Side};
    use crate::layout::compute_layout;

    #[test]
    fn dump_carries_output_tuple() {
        let signals = vec![
            CalendarSignal::new(16, "Spotify", "$9.99").with_side(Side::Right),
            CalendarSignal::new(40, "Gym", "$40.00"),
        ];
        let layout = compute_layout(&signals, &GridConfig::track());
        let json = layout_json(&layout, Some("Feb")).expect("serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["month"], "Feb");
        let signal = &value["signals"][0];
        assert_eq!(signal["side"], "right");
        assert_eq!(signal["chipCenter"]["x"], 346.0);
        assert_eq!(signal["chipAnchorTransform"], "translate(-30%,-50%)");
        assert_eq!(signal["clamped"], true);
        assert_eq!(
            signal["connectorPath"],
            "M 16.00 16.00 C 97.63 25.00, 179.26 7.00, 263.36 16.00"
        );
        assert_eq!(signal["localBoundingBox"]["top"], 90.0);
        assert_eq!(value["skipped"][0]["day"], 40);
        assert_eq!(value["cells"].as_array().map(Vec::len), Some(28));
    }
}
