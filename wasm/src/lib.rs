use calsig::{RenderOptions, Surface, layout_json_with_options, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarRenderOptions {
    surface: Option<String>,
    month: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    out: Option<f32>,
    squiggle_amplitude: Option<f32>,
}

fn build_render_options(options: CalendarRenderOptions) -> Result<RenderOptions, String> {
    let surface = match options.surface.as_deref() {
        Some(token) => Surface::from_token(token)
            .ok_or_else(|| format!("unknown surface '{token}' (expected track or hero)"))?,
        None => Surface::Track,
    };
    let mut render_options = RenderOptions::for_surface(surface);
    // No system fonts in the browser.
    render_options.config.render.measure_text = false;
    render_options.month = options.month;

    if let Some(font_family) = options.font_family {
        render_options.config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.config.theme.font_size = font_size;
    }
    if let Some(out) = options.out {
        render_options.config.grid.out = out;
    }
    if let Some(amplitude) = options.squiggle_amplitude {
        render_options.config.grid.connector.squiggle_amplitude = amplitude;
    }

    render_options
        .config
        .grid
        .validate()
        .map_err(|error| error.to_string())?;
    Ok(render_options)
}

fn parse_options(options_json: Option<String>) -> Result<CalendarRenderOptions, JsValue> {
    match options_json {
        Some(raw_options) => serde_json::from_str::<CalendarRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(CalendarRenderOptions::default()),
    }
}

#[wasm_bindgen]
pub fn render_calendar_svg(signals_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = build_render_options(parse_options(options_json)?)
        .map_err(|error| JsValue::from_str(&error))?;
    render_with_options(signals_json, options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn layout_calendar_json(signals_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = build_render_options(parse_options(options_json)?)
        .map_err(|error| JsValue::from_str(&error))?;
    layout_json_with_options(signals_json, &options)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
