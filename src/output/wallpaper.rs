//! Desktop background backends.
//!
//! Each platform is driven through the command-line tool it ships with, so the crate
//! stays free of `unsafe` FFI. Platforms without a known backend fail explicitly.

use std::{
    path::Path,
    process::{Command, Stdio},
};

use crate::foundation::error::PlatformError;

/// Capability to set the desktop background to an image file.
pub trait WallpaperApplier {
    fn apply(&self, path: &Path) -> Result<(), PlatformError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinuxDesktop {
    /// GNOME and its derivatives (`gsettings`).
    Gnome,
    /// KDE Plasma (`plasma-apply-wallpaperimage`).
    Kde,
    /// Other Wayland compositors (`swww`).
    Wayland,
    /// Plain X11 window managers (`feh`).
    X11,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DesktopWallpaper {
    Windows,
    MacOs,
    Linux(LinuxDesktop),
    Unsupported(String),
}

/// One external program run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl Invocation {
    fn new(program: &'static str, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            program,
            args: args.into_iter().collect(),
        }
    }
}

impl DesktopWallpaper {
    pub fn detect() -> Self {
        let desktop = std::env::var("XDG_CURRENT_DESKTOP").ok();
        let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
        Self::detect_from(std::env::consts::OS, desktop.as_deref(), wayland)
    }

    pub fn detect_from(os: &str, desktop: Option<&str>, wayland: bool) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => {
                let desktop = desktop.unwrap_or_default().to_ascii_lowercase();
                let gnome_like = ["gnome", "unity", "cinnamon", "budgie", "pantheon"];
                if gnome_like.iter().any(|d| desktop.contains(d)) {
                    Self::Linux(LinuxDesktop::Gnome)
                } else if desktop.contains("kde") {
                    Self::Linux(LinuxDesktop::Kde)
                } else if wayland {
                    Self::Linux(LinuxDesktop::Wayland)
                } else {
                    Self::Linux(LinuxDesktop::X11)
                }
            }
            other => Self::Unsupported(other.to_string()),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Windows => "windows".to_string(),
            Self::MacOs => "macos".to_string(),
            Self::Linux(d) => format!("linux ({d:?})").to_ascii_lowercase(),
            Self::Unsupported(os) => os.clone(),
        }
    }

    /// Programs to run, in order, to show `abs_path` as the background.
    pub fn invocations(&self, abs_path: &str) -> Result<Vec<Invocation>, PlatformError> {
        let path = abs_path.to_string();
        let plan = match self {
            Self::Windows => {
                let script = format!(
                    "Add-Type -TypeDefinition 'using System.Runtime.InteropServices; \
                     public class Wp {{ [DllImport(\"user32.dll\", CharSet = CharSet.Unicode)] \
                     public static extern int SystemParametersInfo(int a, int b, string c, int d); }}'; \
                     if ([Wp]::SystemParametersInfo(20, 0, '{}', 3) -eq 0) {{ exit 1 }}",
                    abs_path.replace('\'', "''")
                );
                vec![Invocation::new(
                    "powershell",
                    ["-NoProfile", "-NonInteractive", "-Command"]
                        .map(String::from)
                        .into_iter()
                        .chain([script]),
                )]
            }
            Self::MacOs => {
                let script = format!(
                    "tell application \"System Events\" to tell every desktop to set picture to \"{}\"",
                    abs_path.replace('\\', "\\\\").replace('"', "\\\"")
                );
                vec![Invocation::new("osascript", ["-e".to_string(), script])]
            }
            Self::Linux(LinuxDesktop::Gnome) => {
                let uri = format!("file://{abs_path}");
                ["picture-uri", "picture-uri-dark"]
                    .into_iter()
                    .map(|key| {
                        Invocation::new(
                            "gsettings",
                            [
                                "set".to_string(),
                                "org.gnome.desktop.background".to_string(),
                                key.to_string(),
                                uri.clone(),
                            ],
                        )
                    })
                    .collect()
            }
            Self::Linux(LinuxDesktop::Kde) => {
                vec![Invocation::new("plasma-apply-wallpaperimage", [path])]
            }
            Self::Linux(LinuxDesktop::Wayland) => {
                vec![Invocation::new("swww", ["img".to_string(), path])]
            }
            Self::Linux(LinuxDesktop::X11) => {
                vec![Invocation::new("feh", ["--bg-fill".to_string(), path])]
            }
            Self::Unsupported(os) => {
                return Err(PlatformError::Unsupported {
                    platform: os.clone(),
                });
            }
        };
        Ok(plan)
    }
}

impl WallpaperApplier for DesktopWallpaper {
    fn apply(&self, path: &Path) -> Result<(), PlatformError> {
        if let Self::Unsupported(os) = self {
            return Err(PlatformError::Unsupported {
                platform: os.clone(),
            });
        }

        let abs = std::path::absolute(path).map_err(|e| PlatformError::Spawn {
            program: "path resolution".to_string(),
            reason: e.to_string(),
        })?;
        let abs_str = abs
            .to_str()
            .ok_or_else(|| PlatformError::InvalidPath(abs.display().to_string()))?;

        for inv in self.invocations(abs_str)? {
            run(&inv)?;
        }
        tracing::info!(platform = %self.name(), path = %abs.display(), "wallpaper applied");
        Ok(())
    }
}

fn run(inv: &Invocation) -> Result<(), PlatformError> {
    let output = Command::new(inv.program)
        .args(&inv.args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| PlatformError::Spawn {
            program: inv.program.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PlatformError::CommandFailed {
            program: inv.program.to_string(),
            status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/output/wallpaper.rs"]
mod tests;
