use crate::{
    calendar::model::DAYS_PER_WEEK,
    foundation::{
        core::Canvas,
        error::{HeatwallError, HeatwallResult},
    },
};

/// Vertical shift of the grid above the true canvas centre.
pub const GRID_LIFT_PX: i64 = 50;
/// Distance from the title's top edge down to the grid's top edge.
pub const TITLE_ABOVE_GRID_PX: i64 = 80;
/// Distance from the title's top edge down to the caption's top edge.
pub const CAPTION_BELOW_TITLE_PX: i64 = 50;

pub const TITLE_SIZE_PX: f32 = 36.0;
pub const CAPTION_SIZE_PX: f32 = 18.0;

/// Geometry and labelling inputs for one heatmap render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub canvas: Canvas,
    pub cell_size: u32,
    pub cell_gap: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            cell_size: 12,
            cell_gap: 2,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> HeatwallResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        if self.cell_size == 0 {
            return Err(HeatwallError::render_precondition(
                "cell size must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Resolved pixel placement of the contribution grid and its text band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub origin_x: i64,
    pub origin_y: i64,
    pub width: i64,
    pub height: i64,
    pub cell_size: i64,
    pub pitch: i64,
}

impl GridLayout {
    /// Centre `weeks` columns horizontally and lift the grid above the vertical centre.
    ///
    /// Fails when the grid or the title band above it would leave the canvas.
    pub fn compute(config: &RenderConfig, weeks: usize) -> HeatwallResult<Self> {
        config.validate()?;
        if weeks == 0 {
            return Err(HeatwallError::render_precondition(
                "grid needs at least one week",
            ));
        }

        let cell_size = i64::from(config.cell_size);
        let pitch = cell_size + i64::from(config.cell_gap);
        let canvas_w = i64::from(config.canvas.width);
        let canvas_h = i64::from(config.canvas.height);

        let width = weeks as i64 * pitch - i64::from(config.cell_gap);
        let height = DAYS_PER_WEEK as i64 * pitch - i64::from(config.cell_gap);

        let origin_x = (canvas_w - width).div_euclid(2);
        let origin_y = (canvas_h - height).div_euclid(2) - GRID_LIFT_PX;

        if width > canvas_w {
            return Err(HeatwallError::render_precondition(format!(
                "{weeks} weeks need {width}px but the canvas is {canvas_w}px wide"
            )));
        }
        if origin_y - TITLE_ABOVE_GRID_PX < 0 || origin_y + height > canvas_h {
            return Err(HeatwallError::render_precondition(format!(
                "grid of {height}px plus title band does not fit a {canvas_h}px tall canvas"
            )));
        }

        Ok(Self {
            origin_x,
            origin_y,
            width,
            height,
            cell_size,
            pitch,
        })
    }

    /// Top-left corner of the cell at column `week`, row `day`.
    pub fn cell_origin(&self, week: usize, day: usize) -> (i64, i64) {
        (
            self.origin_x + week as i64 * self.pitch,
            self.origin_y + day as i64 * self.pitch,
        )
    }

    pub fn title_y(&self) -> i64 {
        self.origin_y - TITLE_ABOVE_GRID_PX
    }

    pub fn caption_y(&self) -> i64 {
        self.title_y() + CAPTION_BELOW_TITLE_PX
    }
}

/// Left edge that horizontally centres a span of `text_width` on the canvas.
pub fn centered_x(canvas: Canvas, text_width: f64) -> f64 {
    ((f64::from(canvas.width) - text_width) / 2.0).floor()
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
