use crate::theme::{GradientStop, Theme};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Days per grid row.
pub const COLUMNS: i32 = 7;
/// Highest day number a grid may start on.
pub const MAX_MONTH_DAY: i32 = 31;
/// Six full weeks.
pub const MAX_DAY_COUNT: i32 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Track,
    Hero,
}

impl Surface {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "track" | "phone" => Some(Self::Track),
            "hero" => Some(Self::Hero),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStyle {
    Squiggle,
    Rule,
}

/// Which point of the chip box sits on the computed centre, as fractions of
/// the chip size (CSS `translate(x%, y%)`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChipTransform {
    pub x: f32,
    pub y: f32,
}

impl ChipTransform {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn css(&self) -> String {
        format!(
            "translate({}%,{}%)",
            percent(self.x),
            percent(self.y)
        )
    }
}

fn percent(fraction: f32) -> String {
    let value = (fraction * 100.0).round() as i32;
    value.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    pub style: ConnectorStyle,
    pub squiggle_amplitude: f32,
    pub padding: f32,
    pub rule_start_inset_left: f32,
    pub rule_start_inset_right: f32,
    pub rule_end_inset: f32,
    pub rule_min_length: f32,
    pub arrow_inset: f32,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            style: ConnectorStyle::Squiggle,
            squiggle_amplitude: 9.0,
            padding: 16.0,
            rule_start_inset_left: 18.0,
            rule_start_inset_right: 6.0,
            rule_end_inset: 14.0,
            rule_min_length: 18.0,
            arrow_inset: 18.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub size: f32,
    pub inset_right: f32,
    pub inset_top: f32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            size: 7.0,
            inset_right: 8.0,
            inset_top: 9.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub cell_size: f32,
    pub gap: f32,
    pub padding_x: f32,
    pub first_displayed_day: i32,
    pub day_count: i32,
    pub anchor_x_fraction: f32,
    pub anchor_y_fraction: f32,
    pub out: f32,
    pub clamp_margin: f32,
    pub top_offset: f32,
    pub corner_radius: f32,
    pub left_transform: ChipTransform,
    pub right_transform: ChipTransform,
    pub top_transform: ChipTransform,
    pub connector: ConnectorConfig,
    pub marker: MarkerConfig,
}

impl GridConfig {
    /// Phone "Track" screen: 36px cells, days 1..=28.
    pub fn track() -> Self {
        Self {
            cell_size: 36.0,
            gap: 8.0,
            padding_x: 28.0,
            first_displayed_day: 1,
            day_count: 28,
            anchor_x_fraction: 0.74,
            anchor_y_fraction: 0.5,
            out: 40.0,
            clamp_margin: 18.0,
            top_offset: 8.0,
            corner_radius: 12.0,
            left_transform: ChipTransform::new(-0.7, -0.5),
            right_transform: ChipTransform::new(-0.3, -0.5),
            top_transform: ChipTransform::new(-0.5, -1.0),
            connector: ConnectorConfig::default(),
            marker: MarkerConfig::default(),
        }
    }

    /// Hero "Calendar signals" module: 24px cells starting at day 7.
    pub fn hero() -> Self {
        Self {
            cell_size: 24.0,
            gap: 4.0,
            padding_x: 28.0,
            first_displayed_day: 7,
            day_count: 21,
            anchor_x_fraction: 0.78,
            anchor_y_fraction: 0.52,
            out: 44.0,
            // The hero chips sit further out than the track ones.
            clamp_margin: 62.0,
            top_offset: 8.0,
            corner_radius: 8.0,
            left_transform: ChipTransform::new(-0.6, -0.5),
            connector: ConnectorConfig {
                style: ConnectorStyle::Rule,
                ..ConnectorConfig::default()
            },
            marker: MarkerConfig {
                size: 6.0,
                inset_right: 6.0,
                inset_top: 7.0,
            },
            ..Self::track()
        }
    }

    pub fn for_surface(surface: Surface) -> Self {
        match surface {
            Surface::Track => Self::track(),
            Surface::Hero => Self::hero(),
        }
    }

    /// `7 * cell + 6 * gap`.
    pub fn grid_width(&self) -> f32 {
        COLUMNS as f32 * self.cell_size + (COLUMNS - 1) as f32 * self.gap
    }

    pub fn pitch(&self) -> f32 {
        self.cell_size + self.gap
    }

    pub fn last_displayed_day(&self) -> i32 {
        self.first_displayed_day
            .saturating_add(self.day_count.max(0))
            .saturating_sub(1)
    }

    pub fn row_count(&self) -> i32 {
        (self.day_count.max(0) + COLUMNS - 1) / COLUMNS
    }

    pub fn grid_height(&self) -> f32 {
        let rows = self.row_count();
        if rows == 0 {
            return 0.0;
        }
        rows as f32 * self.cell_size + (rows - 1) as f32 * self.gap
    }

    pub fn panel_width(&self) -> f32 {
        self.padding_x * 2.0 + self.grid_width()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let numeric = [
            ("cellSize", self.cell_size),
            ("gap", self.gap),
            ("paddingX", self.padding_x),
            ("anchorXFraction", self.anchor_x_fraction),
            ("anchorYFraction", self.anchor_y_fraction),
            ("out", self.out),
            ("clampMargin", self.clamp_margin),
            ("topOffset", self.top_offset),
            ("squiggleAmplitude", self.connector.squiggle_amplitude),
            ("connectorPadding", self.connector.padding),
        ];
        for (name, value) in numeric {
            if !value.is_finite() {
                return Err(anyhow::anyhow!("grid.{name} must be a finite number"));
            }
        }
        if self.cell_size <= 0.0 {
            return Err(anyhow::anyhow!("grid.cellSize must be positive"));
        }
        if self.gap < 0.0 || self.clamp_margin < 0.0 || self.connector.padding < 0.0 {
            return Err(anyhow::anyhow!(
                "grid.gap, grid.clampMargin and grid.connector.padding must not be negative"
            ));
        }
        if !(1..=MAX_MONTH_DAY).contains(&self.first_displayed_day) {
            return Err(anyhow::anyhow!(
                "grid.firstDisplayedDay must be between 1 and {MAX_MONTH_DAY}"
            ));
        }
        if !(1..=MAX_DAY_COUNT).contains(&self.day_count) {
            return Err(anyhow::anyhow!(
                "grid.dayCount must be between 1 and {MAX_DAY_COUNT}"
            ));
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::track()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipConfig {
    pub height: f32,
    pub padding_x: f32,
    pub icon_size: f32,
    pub item_gap: f32,
    pub font_size: f32,
    pub max_width: Option<f32>,
    pub corner_radius: f32,
}

impl ChipConfig {
    pub fn track() -> Self {
        Self {
            height: 34.0,
            padding_x: 8.0,
            icon_size: 22.0,
            item_gap: 6.0,
            font_size: 10.5,
            max_width: Some(144.0),
            corner_radius: 17.0,
        }
    }

    pub fn hero() -> Self {
        Self {
            height: 36.0,
            padding_x: 10.0,
            icon_size: 24.0,
            item_gap: 8.0,
            max_width: None,
            corner_radius: 18.0,
            ..Self::track()
        }
    }
}

impl Default for ChipConfig {
    fn default() -> Self {
        Self::track()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub background: String,
    /// Measure chip text with installed fonts instead of estimating it.
    pub measure_text: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 320.0,
            margin: 12.0,
            background: "#FFFFFF".to_string(),
            measure_text: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub surface: Surface,
    pub theme: Theme,
    pub grid: GridConfig,
    pub chip: ChipConfig,
    pub render: RenderConfig,
}

impl Config {
    pub fn for_surface(surface: Surface) -> Self {
        let (theme, grid, chip) = match surface {
            Surface::Track => (Theme::track(), GridConfig::track(), ChipConfig::track()),
            Surface::Hero => (Theme::hero(), GridConfig::hero(), ChipConfig::hero()),
        };
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            surface,
            theme,
            grid,
            chip,
            render,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_surface(Surface::Track)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    surface: Option<String>,
    grid: Option<GridConfigFile>,
    chip: Option<ChipConfigFile>,
    theme_variables: Option<ThemeVariables>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GridConfigFile {
    cell_size: Option<f32>,
    gap: Option<f32>,
    padding_x: Option<f32>,
    first_displayed_day: Option<i32>,
    day_count: Option<i32>,
    anchor_x_fraction: Option<f32>,
    anchor_y_fraction: Option<f32>,
    out: Option<f32>,
    clamp_margin: Option<f32>,
    top_offset: Option<f32>,
    corner_radius: Option<f32>,
    left_transform: Option<ChipTransform>,
    right_transform: Option<ChipTransform>,
    top_transform: Option<ChipTransform>,
    connector: Option<ConnectorConfigFile>,
    marker: Option<MarkerConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConnectorConfigFile {
    style: Option<ConnectorStyle>,
    squiggle_amplitude: Option<f32>,
    padding: Option<f32>,
    rule_start_inset_left: Option<f32>,
    rule_start_inset_right: Option<f32>,
    rule_end_inset: Option<f32>,
    rule_min_length: Option<f32>,
    arrow_inset: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct MarkerConfigFile {
    size: Option<f32>,
    inset_right: Option<f32>,
    inset_top: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ChipConfigFile {
    height: Option<f32>,
    padding_x: Option<f32>,
    icon_size: Option<f32>,
    item_gap: Option<f32>,
    font_size: Option<f32>,
    max_width: Option<f32>,
    corner_radius: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    margin: Option<f32>,
    measure_text: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    panel_background: Option<String>,
    panel_border: Option<String>,
    cell_fill: Option<String>,
    cell_border: Option<String>,
    cell_text_color: Option<String>,
    hot_cell_fill: Option<String>,
    hot_cell_border: Option<String>,
    hot_cell_text_color: Option<String>,
    marker_color: Option<String>,
    connector_stops: Option<ConnectorStopsFile>,
    connector_width: Option<f32>,
    chip_fill: Option<String>,
    chip_border: Option<String>,
    chip_label_color: Option<String>,
    chip_amount_color: Option<String>,
}

/// `["#fff", "#000"]` or `[{ offset: 0, color: "#fff" }, ...]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConnectorStopsFile {
    Colors(Vec<String>),
    Stops(Vec<GradientStop>),
}

impl ConnectorStopsFile {
    fn into_stops(self) -> Vec<GradientStop> {
        match self {
            ConnectorStopsFile::Colors(colors) => GradientStop::evenly(colors),
            ConnectorStopsFile::Stops(stops) => stops,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    load_config_with_surface(path, None)
}

/// Like [`load_config`], with `surface` taking precedence over the file's own `surface` key.
pub fn load_config_with_surface(
    path: Option<&Path>,
    surface: Option<Surface>,
) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::for_surface(surface.unwrap_or(Surface::Track)));
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config_with_surface(&contents, surface)
}

/// Parses a JSON or JSON5 config document on top of the surface preset it names.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    parse_config_with_surface(contents, None)
}

fn parse_config_with_surface(contents: &str, forced: Option<Surface>) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)
        .map_err(|err| anyhow::anyhow!("invalid config file: {err}"))?;

    let surface = match (forced, parsed.surface.as_deref()) {
        (Some(surface), _) => surface,
        (None, Some(token)) => Surface::from_token(token)
            .ok_or_else(|| anyhow::anyhow!("unknown surface '{token}' (expected track or hero)"))?,
        (None, None) => Surface::Track,
    };
    let mut config = Config::for_surface(surface);

    if let Some(grid) = parsed.grid {
        apply_grid(&mut config.grid, grid);
    }

    if let Some(chip) = parsed.chip {
        if let Some(v) = chip.height {
            config.chip.height = v;
        }
        if let Some(v) = chip.padding_x {
            config.chip.padding_x = v;
        }
        if let Some(v) = chip.icon_size {
            config.chip.icon_size = v;
        }
        if let Some(v) = chip.item_gap {
            config.chip.item_gap = v;
        }
        if let Some(v) = chip.font_size {
            config.chip.font_size = v;
        }
        if chip.max_width.is_some() {
            config.chip.max_width = chip.max_width;
        }
        if let Some(v) = chip.corner_radius {
            config.chip.corner_radius = v;
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.panel_background {
            config.theme.panel_background = v;
        }
        if let Some(v) = vars.panel_border {
            config.theme.panel_border = v;
        }
        if let Some(v) = vars.cell_fill {
            config.theme.cell_fill = v;
        }
        if let Some(v) = vars.cell_border {
            config.theme.cell_border = v;
        }
        if let Some(v) = vars.cell_text_color {
            config.theme.cell_text_color = v;
        }
        if let Some(v) = vars.hot_cell_fill {
            config.theme.hot_cell_fill = v;
        }
        if let Some(v) = vars.hot_cell_border {
            config.theme.hot_cell_border = v;
        }
        if let Some(v) = vars.hot_cell_text_color {
            config.theme.hot_cell_text_color = v;
        }
        if let Some(v) = vars.marker_color {
            config.theme.marker_color = v;
        }
        if let Some(v) = vars.connector_stops {
            let stops = v.into_stops();
            if !stops.is_empty() {
                config.theme.connector_stops = stops;
            }
        }
        if let Some(v) = vars.connector_width {
            config.theme.connector_width = v;
        }
        if let Some(v) = vars.chip_fill {
            config.theme.chip_fill = v;
        }
        if let Some(v) = vars.chip_border {
            config.theme.chip_border = v;
        }
        if let Some(v) = vars.chip_label_color {
            config.theme.chip_label_color = v;
        }
        if let Some(v) = vars.chip_amount_color {
            config.theme.chip_amount_color = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.margin {
            config.render.margin = v;
        }
        if let Some(v) = render.measure_text {
            config.render.measure_text = v;
        }
    }

    config.render.background = config.theme.background.clone();
    config.grid.validate()?;

    Ok(config)
}

fn apply_grid(grid: &mut GridConfig, file: GridConfigFile) {
    if let Some(v) = file.cell_size {
        grid.cell_size = v;
    }
    if let Some(v) = file.gap {
        grid.gap = v;
    }
    if let Some(v) = file.padding_x {
        grid.padding_x = v;
    }
    if let Some(v) = file.first_displayed_day {
        grid.first_displayed_day = v;
    }
    if let Some(v) = file.day_count {
        grid.day_count = v;
    }
    if let Some(v) = file.anchor_x_fraction {
        grid.anchor_x_fraction = v;
    }
    if let Some(v) = file.anchor_y_fraction {
        grid.anchor_y_fraction = v;
    }
    if let Some(v) = file.out {
        grid.out = v;
    }
    if let Some(v) = file.clamp_margin {
        grid.clamp_margin = v;
    }
    if let Some(v) = file.top_offset {
        grid.top_offset = v;
    }
    if let Some(v) = file.corner_radius {
        grid.corner_radius = v;
    }
    if let Some(v) = file.left_transform {
        grid.left_transform = v;
    }
    if let Some(v) = file.right_transform {
        grid.right_transform = v;
    }
    if let Some(v) = file.top_transform {
        grid.top_transform = v;
    }
    if let Some(connector) = file.connector {
        if let Some(v) = connector.style {
            grid.connector.style = v;
        }
        if let Some(v) = connector.squiggle_amplitude {
            grid.connector.squiggle_amplitude = v;
        }
        if let Some(v) = connector.padding {
            grid.connector.padding = v;
        }
        if let Some(v) = connector.rule_start_inset_left {
            grid.connector.rule_start_inset_left = v;
        }
        if let Some(v) = connector.rule_start_inset_right {
            grid.connector.rule_start_inset_right = v;
        }
        if let Some(v) = connector.rule_end_inset {
            grid.connector.rule_end_inset = v;
        }
        if let Some(v) = connector.rule_min_length {
            grid.connector.rule_min_length = v;
        }
        if let Some(v) = connector.arrow_inset {
            grid.connector.arrow_inset = v;
        }
    }
    if let Some(marker) = file.marker {
        if let Some(v) = marker.size {
            grid.marker.size = v;
        }
        if let Some(v) = marker.inset_right {
            grid.marker.inset_right = v;
        }
        if let Some(v) = marker.inset_top {
            grid.marker.inset_top = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_grid_width_matches_cells_and_gaps() {
        let grid = GridConfig::track();
        assert_eq!(grid.grid_width(), 300.0);
        assert_eq!(grid.last_displayed_day(), 28);
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.grid_height(), 4.0 * 36.0 + 3.0 * 8.0);
    }

    #[test]
    fn hero_preset_starts_at_day_seven() {
        let grid = GridConfig::hero();
        assert_eq!(grid.first_displayed_day, 7);
        assert_eq!(grid.last_displayed_day(), 27);
        assert_eq!(grid.grid_width(), 192.0);
        assert_eq!(grid.connector.style, ConnectorStyle::Rule);
        assert_eq!(grid.left_transform.css(), "translate(-60%,-50%)");
        assert_eq!(grid.right_transform.css(), "translate(-30%,-50%)");
    }

    #[test]
    fn chip_transforms_render_as_css() {
        let grid = GridConfig::track();
        assert_eq!(grid.left_transform.css(), "translate(-70%,-50%)");
        assert_eq!(grid.top_transform.css(), "translate(-50%,-100%)");
    }

    #[test]
    fn config_file_overrides_preset() {
        let config = parse_config(
            r##"{
                // json5 comments are accepted
                surface: "hero",
                grid: { out: 40, connector: { style: "squiggle", squiggleAmplitude: 6 } },
                themeVariables: { chipFill: "#000000" },
                render: { margin: 4 },
            }"##,
        )
        .expect("config should parse");
        assert_eq!(config.surface, Surface::Hero);
        assert_eq!(config.grid.cell_size, 24.0);
        assert_eq!(config.grid.out, 40.0);
        assert_eq!(config.grid.connector.style, ConnectorStyle::Squiggle);
        assert_eq!(config.grid.connector.squiggle_amplitude, 6.0);
        assert_eq!(config.theme.chip_fill, "#000000");
        assert_eq!(config.render.margin, 4.0);
    }

    #[test]
    fn config_rejects_unknown_surface() {
        let err = parse_config(r#"{"surface": "sidebar"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown surface"));
    }

    #[test]
    fn config_rejects_non_positive_cell_size() {
        assert!(parse_config(r#"{"grid": {"cellSize": 0}}"#).is_err());
        assert!(parse_config(r#"{"grid": {"dayCount": 0}}"#).is_err());
    }

    #[test]
    fn config_rejects_days_outside_a_month_view() {
        let err = parse_config(r#"{"grid": {"firstDisplayedDay": 2147483647}}"#).unwrap_err();
        assert!(err.to_string().contains("firstDisplayedDay"));
        assert!(parse_config(r#"{"grid": {"firstDisplayedDay": 0}}"#).is_err());
        assert!(parse_config(r#"{"grid": {"dayCount": 43}}"#).is_err());
        let config = parse_config(r#"{"grid": {"firstDisplayedDay": 31, "dayCount": 42}}"#)
            .expect("widest month view is accepted");
        assert_eq!(config.grid.last_displayed_day(), 72);
    }

    #[test]
    fn last_displayed_day_saturates() {
        let grid = GridConfig {
            first_displayed_day: i32::MAX,
            ..GridConfig::track()
        };
        assert_eq!(grid.last_displayed_day(), i32::MAX - 1);
    }

    #[test]
    fn connector_stops_accept_colours_or_offsets() {
        let config = parse_config(r#"{"themeVariables": {"connectorStops": ["red", "blue"]}}"#)
            .expect("plain colours");
        assert_eq!(
            config.theme.connector_stops,
            vec![GradientStop::new(0.0, "red"), GradientStop::new(100.0, "blue")]
        );
        let config = parse_config(
            r#"{"themeVariables": {"connectorStops": [
                {"offset": 0, "color": "red"},
                {"offset": 30, "color": "blue"}
            ]}}"#,
        )
        .expect("explicit offsets");
        assert_eq!(config.theme.connector_stops[1], GradientStop::new(30.0, "blue"));
    }

    #[test]
    fn forced_surface_beats_file_surface() {
        let config = parse_config_with_surface(r#"{"surface": "hero"}"#, Some(Surface::Track))
            .expect("config should parse");
        assert_eq!(config.surface, Surface::Track);
        assert_eq!(config.grid.cell_size, 36.0);
    }

    #[test]
    fn missing_path_yields_default() {
        let config = load_config(None).expect("default config");
        assert_eq!(config.surface, Surface::Track);
        assert_eq!(config.grid.out, 40.0);
    }
}
