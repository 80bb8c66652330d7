use std::path::{Path, PathBuf};

use calsig::{
    Config, RenderOptions, Side, Surface, compute_layout, layout_json_with_options, lint_signals,
    load_config, parse_signals, render_svg, render_with_options,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).expect("fixture read failed")
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
    assert!(!svg.contains("NaN"), "{fixture}: NaN coordinate");
}

fn estimated(surface: Surface) -> Config {
    let mut config = Config::for_surface(surface);
    config.render.measure_text = false;
    config
}

#[test]
fn render_all_fixtures() {
    let candidates = [
        ("track.json5", Surface::Track),
        ("hero.json", Surface::Hero),
        ("defaults.json", Surface::Track),
    ];
    for (name, surface) in candidates {
        let document = parse_signals(&read_fixture(name)).expect("parse failed");
        let config = estimated(surface);
        for month in &document.months {
            let layout = compute_layout(&month.signals, &config.grid);
            let svg = render_svg(&layout, &config);
            assert_valid_svg(&svg, name);
            for signal in &layout.signals {
                assert!(svg.contains(&signal.signal.amount), "{name}: missing amount");
            }
        }
    }
}

#[test]
fn track_months_avoid_the_date_grid() {
    let document = parse_signals(&read_fixture("track.json5")).expect("parse failed");
    assert_eq!(document.months.len(), 2);
    let config = estimated(Surface::Track);
    let grid = &config.grid;
    let grid_left = grid.padding_x;
    let grid_right = grid.padding_x + grid.grid_width();
    for month in &document.months {
        let layout = compute_layout(&month.signals, grid);
        assert!(layout.skipped.is_empty());
        for signal in &layout.signals {
            let center = signal.chip_center();
            match signal.placement.side {
                Side::Left => assert!(center.x <= grid_left),
                Side::Right => assert!(center.x >= grid_right),
                Side::Top => assert!(center.y <= grid.top_offset + signal.signal.bias_y),
            }
            assert!(center.x >= grid_left - 18.0 && center.x <= grid_right + 18.0);
            assert!(signal.connector.is_finite());
        }
    }
}

#[test]
fn default_sides_and_clamping_from_fixture() {
    let document = parse_signals(&read_fixture("defaults.json")).expect("parse failed");
    let month = document.month("apr").expect("april");
    let config = estimated(Surface::Track);
    let layout = compute_layout(&month.signals, &config.grid);

    let sides: Vec<(i32, Side)> = layout
        .signals
        .iter()
        .map(|s| (s.signal.day, s.placement.side))
        .collect();
    assert_eq!(
        sides,
        vec![
            (3, Side::Top),
            (11, Side::Left),
            (19, Side::Right),
            (27, Side::Right)
        ]
    );
    let youtube = layout.signal_for_day(27).expect("youtube");
    assert_eq!(youtube.chip_center().x, 28.0 + 300.0 + 18.0);
    assert!(youtube.placement.was_clamped());

    assert_eq!(layout.skipped.len(), 1);
    assert_eq!(layout.skipped[0].signal.label, "Rent");

    let issues = lint_signals(&month.signals, &config.grid);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].to_string().contains("day 31"));
}

#[test]
fn hero_config_file_drives_layout() {
    let config = load_config(Some(&fixture("hero_config.json5"))).expect("config loads");
    assert_eq!(config.surface, Surface::Hero);
    assert!(!config.render.measure_text);
    let document = parse_signals(&read_fixture("hero.json")).expect("parse failed");
    let layout = compute_layout(&document.months[0].signals, &config.grid);
    assert_eq!(layout.cells.first().map(|c| c.day), Some(7));
    assert_eq!(layout.cells.len(), 21);
    let spotify = layout.signal_for_day(16).expect("spotify");
    assert_eq!((spotify.cell.col, spotify.cell.row), (2, 1));
    assert!(spotify.connector.arrow.is_some());
}

#[test]
fn one_call_render_and_json() {
    let input = read_fixture("track.json5");
    let mut options = RenderOptions::track();
    options.config.render.measure_text = false;
    options.month = Some("Mar".to_string());

    let svg = render_with_options(&input, options.clone()).expect("renders");
    assert_valid_svg(&svg, "track.json5");
    assert!(svg.contains("Verizon"));
    assert!(!svg.contains("Dropbox"));

    let json = layout_json_with_options(&input, &options).expect("dumps");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["month"], "Mar");
    assert_eq!(value["signals"].as_array().map(Vec::len), Some(3));

    options.month = Some("Jun".to_string());
    assert!(render_with_options(&input, options).is_err());
}

#[test]
fn rendering_is_deterministic() {
    let input = read_fixture("track.json5");
    let mut options = RenderOptions::track();
    options.config.render.measure_text = false;
    let first = render_with_options(&input, options.clone()).expect("renders");
    let second = render_with_options(&input, options).expect("renders");
    assert_eq!(first, second);
}
