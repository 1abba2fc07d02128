use crate::config::load_config;
use crate::layout::LabelPlan;
use crate::render::render_svg;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::write_output_svg;
use crate::scene::{GridGeometry, MemoryScene};
use crate::toggle::{LabelToggle, ToggleError, ToggleOutcome};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use futures::executor::block_on;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "gridlabels", version, about = "Grid coordinate labels for tabletop scenes")]
pub struct Args {
    /// Scene JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for text formats if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Override the scene's cell width
    #[arg(long = "cell-width")]
    pub cell_width: Option<f64>,

    /// Override the scene's cell height
    #[arg(long = "cell-height")]
    pub cell_height: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Planned label items
    Json,
    /// Preview of the planned labels
    Svg,
    /// Rasterised preview
    Png,
    /// The scene after toggling labels once
    Scene,
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let scene = MemoryScene::from_json(&input)?;
    apply_grid_overrides(&scene, args.cell_width, args.cell_height);
    let toggle = LabelToggle::new(scene, config);

    let config = toggle.config();
    match args.output_format {
        OutputFormat::Scene => {
            let outcome = block_on(toggle.toggle())?;
            if let ToggleOutcome::Skipped(err) = &outcome {
                return Err(anyhow::anyhow!("labels not added: {err}"));
            }
            log::info!("{outcome:?}");
            write_text(&toggle.store().to_json()?, args.output.as_deref())?;
        }
        OutputFormat::Json => {
            let plan = current_plan(&toggle)?;
            write_text(&serde_json::to_string_pretty(&plan.items)?, args.output.as_deref())?;
        }
        OutputFormat::Svg => {
            let plan = current_plan(&toggle)?;
            let svg = render_svg(&plan, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let plan = current_plan(&toggle)?;
            let svg = render_svg(&plan, &config.theme, &config.render);
            write_png(&svg, &output, config)?;
        }
    }
    Ok(())
}

fn current_plan(toggle: &LabelToggle<MemoryScene>) -> Result<LabelPlan> {
    match block_on(toggle.plan_current()) {
        Ok(plan) => Ok(plan),
        Err(ToggleError::Layout(err)) => Err(anyhow::anyhow!("cannot plan labels: {err}")),
        Err(err) => Err(err.into()),
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &crate::config::Config) -> Result<()> {
    write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &crate::config::Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn apply_grid_overrides(scene: &MemoryScene, cell_width: Option<f64>, cell_height: Option<f64>) {
    if cell_width.is_none() && cell_height.is_none() {
        return;
    }
    let current = scene.document().grid;
    scene.set_grid(GridGeometry::new(
        cell_width.unwrap_or(current.cell_width),
        cell_height.unwrap_or(current.cell_height),
    ));
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => println!("{text}"),
    }
    Ok(())
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
