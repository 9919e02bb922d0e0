//! Heatwall renders a GitHub contribution calendar into a desktop wallpaper.
//!
//! One update cycle is:
//!
//! - Fetch the last year of contributions through a [`ContributionSource`]
//! - Render the heatmap with a [`HeatmapRenderer`] into a [`Raster`]
//! - Write it as PNG and optionally hand it to a [`WallpaperApplier`]
//!
//! [`Pipeline`] wires these together and [`Scheduler`] repeats it until stopped.
#![forbid(unsafe_code)]

mod foundation;

pub mod calendar;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod schedule;

pub use crate::foundation::core::{Canvas, Rgb8};
pub use crate::foundation::error::{FetchError, HeatwallError, HeatwallResult, PlatformError};

pub use crate::calendar::fetch::{
    ContributionSource, DEFAULT_ENDPOINT, FetchOpts, GithubFetcher, parse_response, request_body,
};
pub use crate::calendar::model::{CalendarData, DAYS_PER_WEEK, Day, Week};
pub use crate::config::Settings;
pub use crate::output::png::{DEFAULT_OUTPUT, write_png};
pub use crate::output::wallpaper::{DesktopWallpaper, LinuxDesktop, WallpaperApplier};
pub use crate::pipeline::{CycleReport, Pipeline};
pub use crate::render::cpu::{HeatmapRenderer, Raster, caption_text, render, title_text};
pub use crate::render::fonts::{BuiltinFont, FontConfig, FontResolver, LoadedFont, ResolvedFont};
pub use crate::render::layout::{GridLayout, RenderConfig};
pub use crate::render::palette::ColorBucket;
pub use crate::schedule::{ScheduleReport, Scheduler, StopHandle, StopSignal, stop_pair};
