use crate::{
    calendar::model::CalendarData,
    foundation::error::{HeatwallError, HeatwallResult},
    render::{
        fonts::{BuiltinFont, LoadedFont, ResolvedFont},
        layout::{CAPTION_SIZE_PX, GridLayout, RenderConfig, TITLE_SIZE_PX, centered_x},
        palette::{BACKGROUND, CAPTION, ColorBucket, TITLE},
        text::{
            RgbaTarget, TextBrush, TextLayoutEngine, draw_mono_text, fill_layout, mono_text_width,
        },
    },
};

/// Rendered wallpaper in straight (non-premultiplied) RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Raster {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

pub fn title_text(display_name: &str) -> String {
    format!("{display_name}'s GitHub Contributions")
}

pub fn caption_text(total_contributions: u32) -> String {
    format!("Total Contributions: {total_contributions}")
}

/// Draws contribution calendars onto a fixed-size canvas.
///
/// The renderer keeps its shaping context between calls so scheduled cycles reuse
/// the registered font.
pub struct HeatmapRenderer {
    config: RenderConfig,
    font: ResolvedFont,
    text: TextLayoutEngine,
    glyph_font: Option<vello_cpu::peniko::FontData>,
}

impl HeatmapRenderer {
    pub fn new(config: RenderConfig, font: ResolvedFont) -> Self {
        let glyph_font = match &font {
            ResolvedFont::Found(f) => Some(vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(f.bytes.as_ref().clone()),
                f.index,
            )),
            ResolvedFont::Fallback(_) => None,
        };
        Self {
            config,
            font,
            text: TextLayoutEngine::new(),
            glyph_font,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn font(&self) -> &ResolvedFont {
        &self.font
    }

    #[tracing::instrument(skip_all, fields(weeks = calendar.week_count()))]
    pub fn render(
        &mut self,
        calendar: &CalendarData,
        display_name: &str,
    ) -> HeatwallResult<Raster> {
        calendar.validate()?;
        if display_name.trim().is_empty() {
            return Err(HeatwallError::render_precondition(
                "display name must be non-empty",
            ));
        }

        let grid = GridLayout::compute(&self.config, calendar.week_count())?;
        let canvas = self.config.canvas;
        let (w, h) = canvas.as_u16();

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint(BACKGROUND.to_cpu());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));

        let cell = grid.cell_size as f64;
        for (week_idx, week) in calendar.weeks.iter().enumerate() {
            for (day_idx, day) in week.days.iter().enumerate() {
                let (x, y) = grid.cell_origin(week_idx, day_idx);
                let (x, y) = (x as f64, y as f64);
                let color = ColorBucket::for_count(day.contribution_count).color();
                ctx.set_paint(color.to_cpu());
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x, y, x + cell, y + cell));
            }
        }

        let title = title_text(display_name);
        let caption = caption_text(calendar.total_contributions);

        if let (ResolvedFont::Found(font), Some(glyph_font)) = (&self.font, &self.glyph_font) {
            let font = font.clone();
            let glyph_font = glyph_font.clone();
            self.fill_outline_text(&mut ctx, &font, &glyph_font, &title, &caption, &grid)?;
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        // Every pixel is opaque, so premultiplied bytes equal straight RGBA.
        let mut data = pixmap.data_as_u8_slice().to_vec();

        if let ResolvedFont::Fallback(builtin) = self.font {
            let mut target = RgbaTarget::new(&mut data, canvas.width, canvas.height)?;
            draw_builtin_text(&mut target, builtin, &title, &caption, &grid, &self.config);
        }

        Ok(Raster {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }

    fn fill_outline_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        font: &LoadedFont,
        glyph_font: &vello_cpu::peniko::FontData,
        title: &str,
        caption: &str,
        grid: &GridLayout,
    ) -> HeatwallResult<()> {
        let canvas = self.config.canvas;
        let lines = [
            (title, TITLE_SIZE_PX, TITLE, grid.title_y()),
            (caption, CAPTION_SIZE_PX, CAPTION, grid.caption_y()),
        ];
        for (text, size, color, y) in lines {
            let layout = self
                .text
                .layout_line(text, font, size, TextBrush::from(color))?;
            let x = centered_x(canvas, f64::from(layout.width()));
            fill_layout(ctx, &layout, glyph_font, (x, y as f64));
        }
        Ok(())
    }
}

fn draw_builtin_text(
    target: &mut RgbaTarget<'_>,
    builtin: BuiltinFont,
    title: &str,
    caption: &str,
    grid: &GridLayout,
    config: &RenderConfig,
) {
    let lines = [
        (title, builtin.title(), TITLE, grid.title_y()),
        (caption, builtin.caption(), CAPTION, grid.caption_y()),
    ];
    for (text, font, color, y) in lines {
        let x = centered_x(config.canvas, f64::from(mono_text_width(text, font)));
        draw_mono_text(target, text, font, color, x as i32, y as i32);
    }
}

/// Render `calendar` once with a fresh renderer.
pub fn render(
    calendar: &CalendarData,
    display_name: &str,
    config: &RenderConfig,
    font: &ResolvedFont,
) -> HeatwallResult<Raster> {
    HeatmapRenderer::new(config.clone(), font.clone()).render(calendar, display_name)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
