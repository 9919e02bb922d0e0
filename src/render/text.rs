use std::sync::Arc;

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};

use crate::{
    foundation::{
        core::Rgb8,
        error::{HeatwallError, HeatwallResult},
    },
    render::fonts::LoadedFont,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush colour carried through Parley layout runs.
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgb8> for TextBrush {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// Stateful helper for shaping single-line labels from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    registered: Option<(Arc<Vec<u8>>, String)>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: None,
        }
    }

    // Registers the font bytes once per distinct buffer and returns the family name.
    fn family_for(&mut self, font: &LoadedFont) -> HeatwallResult<String> {
        if let Some((bytes, family)) = &self.registered
            && Arc::ptr_eq(bytes, &font.bytes)
        {
            return Ok(family.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            HeatwallError::render_precondition("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| {
                HeatwallError::render_precondition("registered font family has no name")
            })?
            .to_string();
        self.registered = Some((font.bytes.clone(), family_name.clone()));
        Ok(family_name)
    }

    /// Shape `text` as a single unwrapped line.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: &LoadedFont,
        size_px: f32,
        brush: TextBrush,
    ) -> HeatwallResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(HeatwallError::render_precondition(
                "text size must be finite and > 0",
            ));
        }

        let family_name = self.family_for(font)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Draw a shaped layout with its top-left corner at `origin`.
pub fn fill_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrush>,
    font: &vello_cpu::peniko::FontData,
    origin: (f64, f64),
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate(origin));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            // Line-relative positions with the baseline applied.
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

/// `embedded-graphics` view over a straight RGBA8 buffer.
pub struct RgbaTarget<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> RgbaTarget<'a> {
    pub fn new(data: &'a mut [u8], width: u32, height: u32) -> HeatwallResult<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(HeatwallError::render_precondition(
                "rgba buffer length does not match its dimensions",
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }
}

impl DrawTarget for RgbaTarget<'_> {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
                continue;
            }
            let offset = (y as usize * self.width as usize + x as usize) * 4;
            self.data[offset..offset + 4]
                .copy_from_slice(&[color.r(), color.g(), color.b(), 255]);
        }
        Ok(())
    }
}

impl OriginDimensions for RgbaTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Advance width of `text` set in a monospace bitmap font.
pub fn mono_text_width(text: &str, font: &MonoFont<'_>) -> u32 {
    let style = MonoTextStyle::new(font, Rgb888::WHITE);
    Text::with_baseline(text, Point::zero(), style, Baseline::Top)
        .bounding_box()
        .size
        .width
}

/// Draw `text` with its top-left corner at `(x, y)`.
pub fn draw_mono_text(
    target: &mut RgbaTarget<'_>,
    text: &str,
    font: &MonoFont<'_>,
    color: Rgb8,
    x: i32,
    y: i32,
) {
    let style = MonoTextStyle::new(font, Rgb888::new(color.r, color.g, color.b));
    let Ok(_) = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(target);
}
