use crate::config::{Config, Surface, load_config_with_surface};
use crate::ir::{SignalDocument, SignalMonth};
use crate::layout::compute_layout;
use crate::layout_dump::{layout_json, write_layout_dump};
use crate::lint::lint_signals;
use crate::parser::parse_signals;
use crate::render::{render_svg, write_output_png, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::collections::HashSet;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "calsig", version, about = "Calendar signal-chip layout and SVG renderer")]
pub struct Args {
    /// Signal document (.json / .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file (grid constants, chip sizing, themeVariables)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Layout preset; overrides the config file's `surface`
    #[arg(short = 's', long = "surface", value_enum)]
    pub surface: Option<SurfaceArg>,

    /// Month to render (by name); defaults to the first month
    #[arg(short = 'm', long = "month")]
    pub month: Option<String>,

    /// Render every month, one output file each
    #[arg(long = "allMonths")]
    pub all_months: bool,

    /// Only lint the signal document; exit non-zero on issues
    #[arg(long = "check")]
    pub check: bool,

    /// Estimate chip text widths instead of measuring installed fonts
    #[arg(long = "fastText")]
    pub fast_text: bool,

    /// PNG width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// PNG height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SurfaceArg {
    Track,
    Hero,
}

impl From<SurfaceArg> for Surface {
    fn from(value: SurfaceArg) -> Self {
        match value {
            SurfaceArg::Track => Surface::Track,
            SurfaceArg::Hero => Surface::Hero,
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config_with_surface(args.config.as_deref(), args.surface.map(Into::into))?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.fast_text {
        config.render.measure_text = false;
    }

    let input = read_input(args.input.as_deref())?;
    let document = parse_signals(&input)?;

    if args.check {
        return check_document(&document, &config);
    }

    let months = select_months(&document, args.month.as_deref(), args.all_months)?;

    if !args.all_months {
        return write_month(months[0], &config, args.output_format, args.output.as_deref());
    }

    let outputs = resolve_multi_outputs(args.output.as_deref(), args.output_format, &months)?;
    for (month, output) in months.iter().zip(&outputs) {
        write_month(month, &config, args.output_format, Some(output))?;
    }
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing() {}

fn write_month(
    month: &SignalMonth,
    config: &Config,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let layout = compute_layout(&month.signals, &config.grid);
    for skip in &layout.skipped {
        eprintln!("warning: signal #{} skipped: {}", skip.index, skip.reason);
    }
    match format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, config);
            write_output_svg(&svg, output)?;
        }
        OutputFormat::Png => {
            let output = output
                .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
            let svg = render_svg(&layout, config);
            write_output_png(&svg, output, &config.render)?;
        }
        OutputFormat::Json => match output {
            Some(path) => write_layout_dump(path, &layout, month.name.as_deref())?,
            None => println!("{}", layout_json(&layout, month.name.as_deref())?),
        },
    }
    Ok(())
}

fn check_document(document: &SignalDocument, config: &Config) -> Result<()> {
    let mut total = 0usize;
    for (idx, month) in document.months.iter().enumerate() {
        let name = month
            .name
            .clone()
            .unwrap_or_else(|| format!("month {}", idx + 1));
        for issue in lint_signals(&month.signals, &config.grid) {
            eprintln!("{name}: {issue}");
            total += 1;
        }
    }
    if total > 0 {
        return Err(anyhow::anyhow!("{total} issue(s) found in signal document"));
    }
    println!("ok");
    Ok(())
}

fn select_months<'a>(
    document: &'a SignalDocument,
    month: Option<&str>,
    all: bool,
) -> Result<Vec<&'a SignalMonth>> {
    if all {
        return Ok(document.months.iter().collect());
    }
    let selected = match month {
        Some(name) => document
            .month(name)
            .ok_or_else(|| anyhow::anyhow!("month '{name}' not found in signal document"))?,
        None => document
            .first()
            .ok_or_else(|| anyhow::anyhow!("signal document has no months"))?,
    };
    Ok(vec![selected])
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn month_slug(month: &SignalMonth, idx: usize) -> String {
    let slug: String = month
        .name
        .as_deref()
        .unwrap_or_default()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        format!("{}", idx + 1)
    } else {
        slug
    }
}

/// One slug per month; repeated names get `-2`, `-3`, ... so no file is overwritten.
fn unique_slugs(months: &[&SignalMonth]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    months
        .iter()
        .enumerate()
        .map(|(idx, month)| {
            let base = month_slug(month, idx);
            let mut slug = base.clone();
            let mut n = 2;
            while taken.contains(&slug) {
                slug = format!("{base}-{n}");
                n += 1;
            }
            taken.insert(slug.clone());
            slug
        })
        .collect()
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    months: &[&SignalMonth],
) -> Result<Vec<PathBuf>> {
    let ext = match format {
        OutputFormat::Svg => "svg",
        OutputFormat::Png => "png",
        OutputFormat::Json => "json",
    };
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for --allMonths"))?;
    let slugs = unique_slugs(months);
    if base.is_dir() {
        return Ok(slugs
            .iter()
            .map(|slug| base.join(format!("calendar-{slug}.{ext}")))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("calendar");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok(slugs
        .iter()
        .map(|slug| parent.join(format!("{stem}-{slug}.{ext}")))
        .collect())
}
