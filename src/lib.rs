#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod lint;
pub mod log;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, GridConfig, Surface, load_config, parse_config};
pub use ir::{CalendarSignal, Side, SignalDocument, SignalMonth};
pub use layout::{CalendarLayout, LayoutError, compute_layout, layout_signal};
pub use lint::{SignalIssue, lint_signals};
pub use parser::parse_signals;
pub use render::render_svg;
pub use theme::Theme;

/// Options for one-call rendering from a signal document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub config: Config,
    /// Month to render; the first month when unset.
    pub month: Option<String>,
}

impl RenderOptions {
    pub fn track() -> Self {
        Self::for_surface(Surface::Track)
    }

    pub fn hero() -> Self {
        Self::for_surface(Surface::Hero)
    }

    pub fn for_surface(surface: Surface) -> Self {
        Self {
            config: Config::for_surface(surface),
            month: None,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::track()
    }
}

fn select_month<'a>(document: &'a SignalDocument, month: Option<&str>) -> anyhow::Result<&'a SignalMonth> {
    match month {
        Some(name) => document
            .month(name)
            .ok_or_else(|| anyhow::anyhow!("month '{name}' not found in signal document")),
        None => document
            .first()
            .ok_or_else(|| anyhow::anyhow!("signal document has no months")),
    }
}

pub fn layout_with_options(input: &str, options: &RenderOptions) -> anyhow::Result<CalendarLayout> {
    let document = parse_signals(input)?;
    let month = select_month(&document, options.month.as_deref())?;
    Ok(compute_layout(&month.signals, &options.config.grid))
}

pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let layout = layout_with_options(input, &options)?;
    Ok(render_svg(&layout, &options.config))
}

pub fn layout_json_with_options(input: &str, options: &RenderOptions) -> anyhow::Result<String> {
    let document = parse_signals(input)?;
    let month = select_month(&document, options.month.as_deref())?;
    let layout = compute_layout(&month.signals, &options.config.grid);
    layout_dump::layout_json(&layout, month.name.as_deref())
}
