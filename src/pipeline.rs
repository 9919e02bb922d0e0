use std::path::PathBuf;

use crate::{
    calendar::fetch::ContributionSource,
    foundation::error::HeatwallResult,
    output::{png::write_png, wallpaper::WallpaperApplier},
    render::cpu::HeatmapRenderer,
};

/// Outcome of one successful fetch, render, write (and apply) cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleReport {
    pub total_contributions: u32,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub applied: bool,
}

/// One update cycle's collaborators, wired once and reused by every cycle.
pub struct Pipeline<S> {
    source: S,
    renderer: HeatmapRenderer,
    display_name: String,
    output: PathBuf,
    applier: Option<Box<dyn WallpaperApplier>>,
}

impl<S: ContributionSource> Pipeline<S> {
    pub fn new(
        source: S,
        renderer: HeatmapRenderer,
        display_name: impl Into<String>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            renderer,
            display_name: display_name.into(),
            output: output.into(),
            applier: None,
        }
    }

    pub fn with_applier(mut self, applier: Box<dyn WallpaperApplier>) -> Self {
        self.applier = Some(applier);
        self
    }

    pub fn output(&self) -> &PathBuf {
        &self.output
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Fetch, render, write and optionally apply. A failed fetch writes nothing.
    pub fn run_once(&mut self) -> HeatwallResult<CycleReport> {
        tracing::info!("fetching contribution data");
        let calendar = self.source.fetch()?;

        tracing::info!(weeks = calendar.week_count(), "rendering wallpaper");
        let raster = self.renderer.render(&calendar, &self.display_name)?;

        tracing::info!(path = %self.output.display(), "saving wallpaper");
        let path = write_png(&raster, &self.output)?;

        let applied = match &self.applier {
            Some(applier) => {
                tracing::info!("setting desktop wallpaper");
                applier.apply(&path)?;
                true
            }
            None => false,
        };

        if let Some(day) = calendar.busiest_day() {
            tracing::debug!(date = %day.date, count = day.contribution_count, "busiest day");
        }

        Ok(CycleReport {
            total_contributions: calendar.total_contributions,
            path,
            width: raster.width,
            height: raster.height,
            applied,
        })
    }
}
