use chrono::NaiveDate;

use super::*;
use crate::{
    calendar::model::{Day, Week},
    foundation::core::{Canvas, Rgb8},
    render::fonts::{FontConfig, FontResolver},
};

fn week(counts: [u32; 7]) -> Week {
    let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
    Week {
        days: counts
            .iter()
            .enumerate()
            .map(|(i, &c)| Day::new(sunday + chrono::Duration::days(i as i64), c))
            .collect(),
    }
}

fn calendar(weeks: Vec<Week>) -> CalendarData {
    let total = weeks
        .iter()
        .flat_map(|w| w.days.iter())
        .map(|d| d.contribution_count)
        .sum();
    CalendarData {
        total_contributions: total,
        weeks,
    }
}

fn small_config() -> RenderConfig {
    RenderConfig {
        canvas: Canvas::new(800, 400).unwrap(),
        ..RenderConfig::default()
    }
}

fn close(px: [u8; 4], c: Rgb8) -> bool {
    let want = c.to_rgba();
    px.iter().zip(want).all(|(&a, b)| a.abs_diff(b) <= 1)
}

fn cell_centre(grid: &GridLayout, week: usize, day: usize) -> (u32, u32) {
    let (x, y) = grid.cell_origin(week, day);
    ((x + grid.cell_size / 2) as u32, (y + grid.cell_size / 2) as u32)
}

#[test]
fn output_matches_canvas_for_any_week_count() {
    let cfg = small_config();
    for n in [1usize, 17, 53] {
        let cal = calendar((0..n).map(|i| week([i as u32 % 12; 7])).collect());
        let raster = render(&cal, "octocat", &cfg, &ResolvedFont::fallback()).unwrap();
        assert_eq!((raster.width, raster.height), (800, 400), "weeks {n}");
        assert_eq!(raster.data.len(), 800 * 400 * 4);
    }
}

#[test]
fn rendering_is_deterministic() {
    let cfg = small_config();
    let cal = calendar((0..40).map(|i| week([i % 13, 0, 1, 2, 3, 7, 12])).collect());
    let a = render(&cal, "octocat", &cfg, &ResolvedFont::fallback()).unwrap();
    let b = render(&cal, "octocat", &cfg, &ResolvedFont::fallback()).unwrap();
    assert_eq!(a, b);

    let mut renderer = HeatmapRenderer::new(cfg.clone(), ResolvedFont::fallback());
    let c = renderer.render(&cal, "octocat").unwrap();
    let d = renderer.render(&cal, "octocat").unwrap();
    assert_eq!(c, d);
    assert_eq!(a, c);
}

#[test]
fn cells_use_their_count_bucket() {
    let cfg = small_config();
    let counts = [0, 1, 3, 6, 11, 2, 5];
    let cal = calendar(vec![week([0; 7]), week(counts)]);
    let raster = render(&cal, "octocat", &cfg, &ResolvedFont::fallback()).unwrap();
    let grid = GridLayout::compute(&cfg, 2).unwrap();

    for (day, &count) in counts.iter().enumerate() {
        let (x, y) = cell_centre(&grid, 1, day);
        let px = raster.pixel(x, y).unwrap();
        assert!(
            close(px, ColorBucket::for_count(count).color()),
            "day {day} count {count}: {px:?}"
        );
    }

    // Cell corners are filled and the gap between columns shows the background.
    let (x0, y0) = grid.cell_origin(1, 4);
    let px = raster.pixel(x0 as u32, y0 as u32).unwrap();
    assert!(close(px, ColorBucket::High.color()), "{px:?}");
    let (gx, gy) = grid.cell_origin(0, 0);
    let gap_x = (gx + grid.cell_size) as u32;
    assert!(close(raster.pixel(gap_x, gy as u32).unwrap(), BACKGROUND));
}

#[test]
fn empty_year_renders_only_empty_cells_and_text() {
    let cfg = small_config();
    let cal = calendar(vec![week([0; 7])]);
    assert_eq!(caption_text(cal.total_contributions), "Total Contributions: 0");

    let raster = render(&cal, "octocat", &cfg, &ResolvedFont::fallback()).unwrap();
    let grid = GridLayout::compute(&cfg, 1).unwrap();

    for day in 0..7 {
        let (x, y) = cell_centre(&grid, 0, day);
        assert!(close(raster.pixel(x, y).unwrap(), ColorBucket::Empty.color()));
    }

    let allowed = [BACKGROUND, ColorBucket::Empty.color(), TITLE, CAPTION];
    assert!(
        raster
            .pixels()
            .all(|px| allowed.iter().any(|&c| close(px, c)))
    );
    for bucket in &ColorBucket::ALL[1..] {
        assert!(!raster.pixels().any(|px| close(px, bucket.color())));
    }

    // The caption band carries caption-coloured text.
    let caption_rows = grid.caption_y() as u32..grid.origin_y as u32;
    let has_caption = caption_rows
        .flat_map(|y| (0..raster.width).map(move |x| (x, y)))
        .any(|(x, y)| raster.pixel(x, y) == Some(CAPTION.to_rgba()));
    assert!(has_caption);
    assert!(raster.pixels().any(|px| px == TITLE.to_rgba()));
}

#[test]
fn grid_pixels_do_not_depend_on_the_font() {
    let cfg = small_config();
    let cal = calendar((0..20).map(|i| week([i, 0, 2, 4, 6, 8, 10])).collect());
    let fallback = render(&cal, "octocat", &cfg, &ResolvedFont::fallback()).unwrap();

    let resolved = FontResolver::resolve(&FontConfig::default());
    let other = render(&cal, "octocat", &cfg, &resolved).unwrap();

    let grid = GridLayout::compute(&cfg, 20).unwrap();
    for y in grid.origin_y..grid.origin_y + grid.height {
        for x in grid.origin_x..grid.origin_x + grid.width {
            let (x, y) = (x as u32, y as u32);
            assert_eq!(fallback.pixel(x, y), other.pixel(x, y), "({x}, {y})");
        }
    }
}

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn outline_font() -> Option<ResolvedFont> {
    let path = FONT_CANDIDATES
        .iter()
        .map(std::path::PathBuf::from)
        .find(|p| p.is_file())?;
    let font = FontResolver::resolve(&FontConfig {
        path: Some(path),
        families: vec![],
        system: false,
    });
    (!font.is_fallback()).then_some(font)
}

#[test]
fn outline_text_is_centred_inside_the_title_band() {
    let Some(font) = outline_font() else {
        eprintln!("no outline font file found, skipping");
        return;
    };
    let cfg = RenderConfig::default();
    let cal = calendar((0..53).map(|_| week([0; 7])).collect());
    let raster = render(&cal, "octocat", &cfg, &font).unwrap();
    let grid = GridLayout::compute(&cfg, 53).unwrap();

    let background = BACKGROUND.to_rgba();
    let mut ink: Option<(u32, u32, u32, u32)> = None;
    for y in 0..grid.origin_y as u32 {
        for x in 0..raster.width {
            if raster.pixel(x, y) == Some(background) {
                continue;
            }
            let (x0, x1, y0, y1) = ink.unwrap_or((x, x, y, y));
            ink = Some((x0.min(x), x1.max(x), y0.min(y), y1.max(y)));
        }
    }

    let (x0, x1, y0, y1) = ink.expect("title and caption leave ink above the grid");
    let centre = (x0 + x1) as i64 / 2;
    assert!(
        (centre - i64::from(raster.width) / 2).abs() <= 2,
        "ink spans x {x0}..{x1}"
    );
    assert!(y0 as i64 >= grid.title_y(), "ink starts at y {y0}");
    assert!((y1 as i64) < grid.origin_y, "ink ends at y {y1}");
}

#[test]
fn malformed_calendars_are_rejected() {
    let cfg = small_config();
    let font = ResolvedFont::fallback();

    let empty = calendar(vec![]);
    assert!(matches!(
        render(&empty, "octocat", &cfg, &font),
        Err(HeatwallError::RenderPrecondition(_))
    ));

    let mut short = week([1; 7]);
    short.days.pop();
    let ragged = calendar(vec![week([0; 7]), short]);
    assert!(matches!(
        render(&ragged, "octocat", &cfg, &font),
        Err(HeatwallError::RenderPrecondition(_))
    ));

    let ok = calendar(vec![week([0; 7])]);
    assert!(render(&ok, "  ", &cfg, &font).is_err());

    let tiny = RenderConfig {
        canvas: Canvas::new(64, 64).unwrap(),
        ..RenderConfig::default()
    };
    assert!(render(&ok, "octocat", &tiny, &font).is_err());
}

#[test]
fn labels_follow_the_display_name_and_total() {
    assert_eq!(title_text("octocat"), "octocat's GitHub Contributions");
    assert_eq!(caption_text(1234), "Total Contributions: 1234");
}

#[test]
fn pixel_lookup_is_bounds_checked() {
    let raster = Raster {
        width: 2,
        height: 1,
        data: vec![1, 2, 3, 4, 5, 6, 7, 8],
    };
    assert_eq!(raster.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(raster.pixel(2, 0), None);
    assert_eq!(raster.pixel(0, 1), None);
}
