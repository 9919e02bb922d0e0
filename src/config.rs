use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    calendar::fetch::{DEFAULT_ENDPOINT, FetchOpts},
    foundation::{
        core::Canvas,
        error::{HeatwallError, HeatwallResult},
    },
    output::png::DEFAULT_OUTPUT,
    render::{fonts::FontConfig, layout::RenderConfig},
    schedule::Scheduler,
};

const CONFIG_PATH_ENV_VAR: &str = "HEATWALL_CONFIG";

/// Runtime settings, read from TOML and overridden from the command line.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub username: Option<String>,
    pub token: Option<String>,
    pub endpoint: String,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
    pub cell_gap: u32,
    pub window_days: u32,
    pub interval_secs: u64,
    pub poll_secs: u64,
    pub timeout_secs: u64,
    pub font_path: Option<PathBuf>,
    pub font_families: Vec<String>,
    pub system_fonts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let fonts = FontConfig::default();
        Self {
            username: None,
            token: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            width: 1920,
            height: 1080,
            cell_size: 12,
            cell_gap: 2,
            window_days: 365,
            interval_secs: 6 * 60 * 60,
            poll_secs: 60,
            timeout_secs: 30,
            font_path: fonts.path,
            font_families: fonts.families,
            system_fonts: fonts.system,
        }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> HeatwallResult<Self> {
        toml::from_str(s).map_err(|e| HeatwallError::config(format!("parse settings: {e}")))
    }

    pub fn from_path(path: &Path) -> HeatwallResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            HeatwallError::config(format!("read settings '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&s)
    }

    /// Load the first existing config file, or defaults when there is none.
    ///
    /// An explicitly requested file must exist.
    pub fn load(explicit: Option<&Path>) -> HeatwallResult<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        for candidate in default_locations() {
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "using settings file");
                return Self::from_path(&candidate);
            }
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> HeatwallResult<()> {
        let username = self.username.as_deref().map(str::trim).unwrap_or_default();
        if username.is_empty() {
            return Err(HeatwallError::config(
                "a GitHub username is required (--username or GITHUB_USERNAME)",
            ));
        }
        let token = self.token.as_deref().map(str::trim).unwrap_or_default();
        if token.is_empty() {
            return Err(HeatwallError::config(
                "a GitHub token is required (--token or GITHUB_TOKEN)",
            ));
        }
        Canvas::new(self.width, self.height)
            .map_err(|e| HeatwallError::config(format!("invalid canvas: {e}")))?;
        if self.cell_size == 0 {
            return Err(HeatwallError::config("cell_size must be > 0"));
        }
        if self.window_days == 0 {
            return Err(HeatwallError::config("window_days must be > 0"));
        }
        if self.interval_secs == 0 || self.poll_secs == 0 {
            return Err(HeatwallError::config(
                "interval_secs and poll_secs must be > 0",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(HeatwallError::config("timeout_secs must be > 0"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(HeatwallError::config("output path must be non-empty"));
        }
        Ok(())
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default().trim()
    }

    pub fn fetch_opts(&self) -> FetchOpts {
        FetchOpts {
            endpoint: self.endpoint.clone(),
            username: self.username().to_string(),
            token: self.token.as_deref().unwrap_or_default().trim().to_string(),
            window_days: self.window_days,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn render_config(&self) -> HeatwallResult<RenderConfig> {
        Ok(RenderConfig {
            canvas: Canvas::new(self.width, self.height)?,
            cell_size: self.cell_size,
            cell_gap: self.cell_gap,
        })
    }

    pub fn font_config(&self) -> FontConfig {
        FontConfig {
            path: self.font_path.clone(),
            families: self.font_families.clone(),
            system: self.system_fonts,
        }
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(
            Duration::from_secs(self.interval_secs),
            Duration::from_secs(self.poll_secs),
        )
    }
}

/// `$HEATWALL_CONFIG`, then the XDG config dir, then `~/.config`.
pub fn default_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(path) = env::var_os(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
        locations.push(PathBuf::from(dir).join("heatwall").join("config.toml"));
    }
    if let Some(home) = env::var_os("HOME").or_else(|| env::var_os("USERPROFILE")) {
        locations.push(
            PathBuf::from(home)
                .join(".config")
                .join("heatwall")
                .join("config.toml"),
        );
    }
    locations
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
