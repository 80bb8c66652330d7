use crate::config::{ChipConfig, Config, RenderConfig};
use crate::layout::{BoundingBox, CalendarLayout, CellLayout, ConnectorPath, SignalLayout};
use crate::text_metrics::text_width;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const ELLIPSIS: char = '\u{2026}';

/// Chip pill resolved against its placement, in panel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ChipBox {
    pub bbox: BoundingBox,
    pub label: String,
    pub icon_center: (f32, f32),
    pub label_x: f32,
    pub amount_x: f32,
    pub baseline_y: f32,
}

pub fn chip_box(layout: &SignalLayout, chip: &ChipConfig, theme: &Theme, measure: bool) -> ChipBox {
    let font = theme.font_family.as_str();
    let amount_w = text_width(&layout.signal.amount, chip.font_size, font, measure);
    let fixed = chip.padding_x * 2.0 + chip.icon_size + chip.item_gap * 2.0 + amount_w;

    let mut label = layout.signal.label.clone();
    let mut label_w = text_width(&label, chip.font_size, font, measure);
    if let Some(max_width) = chip.max_width {
        let available = (max_width - fixed).max(0.0);
        if label_w > available {
            let mut chars: Vec<char> = label.chars().collect();
            while !chars.is_empty() {
                chars.pop();
                let candidate: String = chars.iter().chain(std::iter::once(&ELLIPSIS)).collect();
                let width = text_width(&candidate, chip.font_size, font, measure);
                if width <= available {
                    label = candidate;
                    label_w = width;
                    break;
                }
            }
            if chars.is_empty() {
                label = ELLIPSIS.to_string();
                label_w = text_width(&label, chip.font_size, font, measure);
            }
        }
    }

    let width = fixed + label_w;
    let height = chip.height;
    let center = layout.placement.center;
    let transform = layout.placement.transform;
    let left = center.x + transform.x * width;
    let top = center.y + transform.y * height;

    let icon_x = left + chip.padding_x + chip.icon_size / 2.0;
    let label_x = left + chip.padding_x + chip.icon_size + chip.item_gap;
    let amount_x = label_x + label_w + chip.item_gap;
    ChipBox {
        bbox: BoundingBox {
            left,
            top,
            width,
            height,
        },
        label,
        icon_center: (icon_x, top + height / 2.0),
        label_x,
        amount_x,
        baseline_y: top + height / 2.0 + chip.font_size * 0.35,
    }
}

/// Everything that must be visible: the panel, every connector surface and every chip.
pub fn canvas_bounds(layout: &CalendarLayout, chips: &[ChipBox], margin: f32) -> BoundingBox {
    let mut bounds = BoundingBox {
        left: 0.0,
        top: 0.0,
        width: layout.width,
        height: layout.height,
    };
    for signal in &layout.signals {
        bounds = bounds.union(&signal.connector.bbox);
    }
    for chip in chips {
        bounds = bounds.union(&chip.bbox);
    }
    BoundingBox {
        left: bounds.left - margin,
        top: bounds.top - margin,
        width: bounds.width + margin * 2.0,
        height: bounds.height + margin * 2.0,
    }
}

pub fn render_svg(layout: &CalendarLayout, config: &Config) -> String {
    let theme = &config.theme;
    let chips: Vec<ChipBox> = layout
        .signals
        .iter()
        .map(|signal| chip_box(signal, &config.chip, theme, config.render.measure_text))
        .collect();
    let bounds = canvas_bounds(layout, &chips, config.render.margin);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.2}\" height=\"{:.2}\" viewBox=\"{:.2} {:.2} {:.2} {:.2}\">",
        bounds.width, bounds.height, bounds.left, bounds.top, bounds.width, bounds.height
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        bounds.left, bounds.top, config.render.background
    ));

    svg.push_str(&format!(
        "<rect class=\"panel\" x=\"0\" y=\"0\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        layout.width,
        layout.height,
        config.grid.corner_radius,
        config.grid.corner_radius,
        escape_xml(&theme.panel_background),
        escape_xml(&theme.panel_border)
    ));

    svg.push_str("<defs>");
    for (idx, signal) in layout.signals.iter().enumerate() {
        svg.push_str(&gradient_svg(&gradient_id(idx, signal), theme));
    }
    svg.push_str("</defs>");

    // connectors sit under the cells
    svg.push_str("<g class=\"connectors\">");
    for (idx, signal) in layout.signals.iter().enumerate() {
        svg.push_str(&connector_svg(&signal.connector, &gradient_id(idx, signal), theme));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"cells\">");
    for cell in &layout.cells {
        svg.push_str(&cell_svg(cell, config.grid.corner_radius, theme));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"chips\">");
    for (signal, chip) in layout.signals.iter().zip(&chips) {
        svg.push_str(&chip_svg(signal, chip, &config.chip, theme));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn gradient_id(idx: usize, signal: &SignalLayout) -> String {
    format!("sig-{}-{}", idx, signal.signal.day)
}

fn gradient_svg(id: &str, theme: &Theme) -> String {
    let mut out = format!("<linearGradient id=\"{id}\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"0\">");
    for stop in &theme.connector_stops {
        out.push_str(&format!(
            "<stop offset=\"{}%\" stop-color=\"{}\"/>",
            stop.offset,
            escape_xml(&stop.color)
        ));
    }
    out.push_str("</linearGradient>");
    out
}

fn connector_svg(connector: &ConnectorPath, gradient: &str, theme: &Theme) -> String {
    let bbox = connector.bbox;
    let mut out = format!(
        "<g transform=\"translate({:.2} {:.2})\"><path d=\"{}\" fill=\"none\" stroke=\"url(#{gradient})\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
        bbox.left,
        bbox.top,
        connector.d(),
        theme.connector_width
    );
    if let Some(arrow) = connector.arrow {
        out.push_str(&format!(
            "<path d=\"M -4 -4 L 0 0 L -4 4\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\" transform=\"translate({:.2} {:.2}) rotate({})\"/>",
            theme.chip_border, arrow.at.x, arrow.at.y, arrow.rotation_deg
        ));
    }
    out.push_str("</g>");
    out
}

fn cell_svg(cell: &CellLayout, radius: f32, theme: &Theme) -> String {
    let (fill, stroke, text) = if cell.hot {
        (
            &theme.hot_cell_fill,
            &theme.hot_cell_border,
            &theme.hot_cell_text_color,
        )
    } else {
        (&theme.cell_fill, &theme.cell_border, &theme.cell_text_color)
    };
    let weight = if cell.hot { "600" } else { "400" };
    let center_x = cell.x + cell.size / 2.0;
    let baseline = cell.y + cell.size / 2.0 + theme.font_size * 0.35;
    let mut out = format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"1\"/>",
        cell.x, cell.y, cell.size, cell.size
    );
    out.push_str(&format!(
        "<text x=\"{center_x:.2}\" y=\"{baseline:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{weight}\" fill=\"{text}\">{}</text>",
        escape_xml(&theme.font_family),
        theme.font_size,
        cell.day
    ));
    if let Some((center, size)) = cell.marker {
        out.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
            center.x,
            center.y,
            size / 2.0,
            theme.marker_color,
            theme.marker_ring
        ));
    }
    out
}

fn chip_svg(signal: &SignalLayout, chip: &ChipBox, config: &ChipConfig, theme: &Theme) -> String {
    let bbox = chip.bbox;
    let side = signal.placement.side.as_str();
    let mut out = format!("<g class=\"chip chip-{side}\" data-day=\"{}\">", signal.signal.day);
    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        bbox.left,
        bbox.top,
        bbox.width,
        bbox.height,
        config.corner_radius,
        config.corner_radius,
        theme.chip_fill,
        theme.chip_border
    ));
    out.push_str(&format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"",
        chip.icon_center.0,
        chip.icon_center.1,
        config.icon_size / 2.0,
        theme.chip_icon_fill,
        theme.chip_icon_border
    ));
    if let Some(icon) = signal.signal.icon.as_deref() {
        out.push_str(&format!(" data-icon=\"{}\"", escape_xml(icon)));
    }
    if let Some(tone) = signal.signal.tone.as_deref() {
        out.push_str(&format!(" data-tone=\"{}\"", escape_xml(tone)));
    }
    out.push_str("/>");
    let font = escape_xml(&theme.font_family);
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{font}\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{}</text>",
        chip.label_x,
        chip.baseline_y,
        config.font_size,
        theme.chip_label_color,
        escape_xml(&chip.label)
    ));
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"ui-monospace, monospace\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{}</text>",
        chip.amount_x,
        chip.baseline_y,
        config.font_size,
        theme.chip_amount_color,
        escape_xml(&signal.signal.amount)
    ));
    out.push_str("</g>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
