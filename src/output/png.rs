use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{HeatwallError, HeatwallResult},
    render::cpu::Raster,
};

pub const DEFAULT_OUTPUT: &str = "github_wallpaper.png";

pub fn ensure_parent_dir(path: &Path) -> HeatwallResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            HeatwallError::write(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Encode `raster` as PNG at `path`, replacing any existing file.
///
/// Returns the absolute path of the written file.
pub fn write_png(raster: &Raster, path: &Path) -> HeatwallResult<PathBuf> {
    if raster.data.len() != raster.width as usize * raster.height as usize * 4 {
        return Err(HeatwallError::write(
            "raster data size mismatch with width*height*4",
        ));
    }
    ensure_parent_dir(path)?;

    image::save_buffer_with_format(
        path,
        &raster.data,
        raster.width,
        raster.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| HeatwallError::write(format!("write png '{}': {e}", path.display())))?;

    let abs = std::path::absolute(path).map_err(|e| {
        HeatwallError::write(format!("resolve absolute path '{}': {e}", path.display()))
    })?;
    tracing::info!(path = %abs.display(), "saved wallpaper");
    Ok(abs)
}

#[cfg(test)]
#[path = "../../tests/unit/output/png.rs"]
mod tests;
