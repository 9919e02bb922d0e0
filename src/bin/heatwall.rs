use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use heatwall::{
    CycleReport, DesktopWallpaper, FontResolver, GithubFetcher, HeatmapRenderer, Pipeline,
    Settings, stop_pair,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "heatwall", version, about = "GitHub contribution heatmap wallpaper")]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct Overrides {
    /// Settings file (TOML). Defaults to $HEATWALL_CONFIG or ~/.config/heatwall/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GitHub login whose contributions are drawn.
    #[arg(long, global = true, env = "GITHUB_USERNAME")]
    username: Option<String>,

    /// GitHub token used for the GraphQL API.
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GraphQL endpoint.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Output PNG path.
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long, global = true)]
    height: Option<u32>,

    /// Font file used for the title and caption.
    #[arg(long, global = true)]
    font_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, render and save the wallpaper once.
    Render,
    /// Fetch, render, save and set the desktop wallpaper once.
    Apply,
    /// Update the wallpaper now and then periodically until interrupted.
    Watch(WatchArgs),
}

#[derive(Args, Debug)]
struct WatchArgs {
    /// Seconds between updates.
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Seconds between checks for due work or Ctrl-C.
    #[arg(long)]
    poll_secs: Option<u64>,

    /// Save the image without setting it as the wallpaper.
    #[arg(long)]
    no_apply: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut settings = load_settings(&cli.overrides)?;
    match cli.cmd {
        Command::Render => cmd_once(&settings, false),
        Command::Apply => cmd_once(&settings, true),
        Command::Watch(args) => {
            if let Some(secs) = args.interval_secs {
                settings.interval_secs = secs;
            }
            if let Some(secs) = args.poll_secs {
                settings.poll_secs = secs;
            }
            settings.validate()?;
            cmd_watch(&settings, !args.no_apply)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(o: &Overrides) -> anyhow::Result<Settings> {
    let mut s = Settings::load(o.config.as_deref()).context("load settings")?;
    if let Some(v) = &o.username {
        s.username = Some(v.clone());
    }
    if let Some(v) = &o.token {
        s.token = Some(v.clone());
    }
    if let Some(v) = &o.endpoint {
        s.endpoint = v.clone();
    }
    if let Some(v) = &o.output {
        s.output = v.clone();
    }
    if let Some(v) = o.width {
        s.width = v;
    }
    if let Some(v) = o.height {
        s.height = v;
    }
    if let Some(v) = &o.font_path {
        s.font_path = Some(v.clone());
    }
    s.validate()?;
    Ok(s)
}

fn build_pipeline(settings: &Settings, apply: bool) -> anyhow::Result<Pipeline<GithubFetcher>> {
    let font = FontResolver::resolve(&settings.font_config());
    tracing::info!(font = %font.describe(), "resolved font");

    let renderer = HeatmapRenderer::new(settings.render_config()?, font);
    let fetcher = GithubFetcher::new(settings.fetch_opts())?;
    let pipeline = Pipeline::new(fetcher, renderer, settings.username(), &settings.output);
    if !apply {
        return Ok(pipeline);
    }

    let desktop = DesktopWallpaper::detect();
    tracing::info!(desktop = %desktop.name(), "wallpaper target");
    Ok(pipeline.with_applier(Box::new(desktop)))
}

fn cmd_once(settings: &Settings, apply: bool) -> anyhow::Result<()> {
    let mut pipeline = build_pipeline(settings, apply)?;
    let report = pipeline
        .run_once()
        .with_context(|| format!("update wallpaper for '{}'", settings.username()))?;
    print_summary(&report);
    Ok(())
}

fn cmd_watch(settings: &Settings, apply: bool) -> anyhow::Result<()> {
    let mut pipeline = build_pipeline(settings, apply)?;
    let scheduler = settings.scheduler();

    let (stop, signal) = stop_pair();
    ctrlc::set_handler(move || stop.stop()).context("install Ctrl-C handler")?;

    let schedule = scheduler
        .run_watch(&mut pipeline, &signal)
        .with_context(|| format!("first update for '{}'", settings.username()))?;
    eprintln!(
        "stopped after {} cycles ({} skipped)",
        schedule.cycles, schedule.failures
    );
    Ok(())
}

fn print_summary(report: &CycleReport) {
    eprintln!(
        "wrote {} ({}x{}, {} contributions{})",
        report.path.display(),
        report.width,
        report.height,
        report.total_contributions,
        if report.applied { ", applied" } else { "" }
    );
}
