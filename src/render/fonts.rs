//! Font resolution for the title and caption text.
//!
//! Resolution never fails: when no usable outline font can be found the renderer
//! falls back to the built-in monospace bitmap fonts, so the heatmap is always drawn.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use embedded_graphics::mono_font::{
    MonoFont,
    ascii::{FONT_7X13, FONT_10X20},
};

/// Where to look for an outline font.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontConfig {
    /// Explicit font file, tried first.
    pub path: Option<PathBuf>,
    /// Preferred installed families, in order.
    pub families: Vec<String>,
    /// Whether to consult the system font database at all.
    pub system: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            families: ["Arial", "Helvetica", "DejaVu Sans", "Liberation Sans"]
                .into_iter()
                .map(String::from)
                .collect(),
            system: true,
        }
    }
}

/// Outline font bytes ready for shaping.
#[derive(Clone)]
pub struct LoadedFont {
    pub family: String,
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a font collection.
    pub index: u32,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("family", &self.family)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Monospace bitmap fonts compiled into the binary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuiltinFont;

impl BuiltinFont {
    pub fn title(self) -> &'static MonoFont<'static> {
        &FONT_10X20
    }

    pub fn caption(self) -> &'static MonoFont<'static> {
        &FONT_7X13
    }
}

#[derive(Clone, Debug)]
pub enum ResolvedFont {
    Found(LoadedFont),
    Fallback(BuiltinFont),
}

impl ResolvedFont {
    pub fn fallback() -> Self {
        Self::Fallback(BuiltinFont)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Found(f) => f.family.clone(),
            Self::Fallback(_) => "built-in monospace".to_string(),
        }
    }
}

pub struct FontResolver;

impl FontResolver {
    #[tracing::instrument]
    pub fn resolve(cfg: &FontConfig) -> ResolvedFont {
        if let Some(path) = &cfg.path {
            match load_font_file(path) {
                Ok(font) => return ResolvedFont::Found(font),
                Err(e) => tracing::warn!(path = %path.display(), "cannot use font file: {e}"),
            }
        }

        if cfg.system {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            if let Some(font) = query_database(&db, &cfg.families) {
                return ResolvedFont::Found(font);
            }
        }

        tracing::warn!("no outline font available, using the built-in monospace font");
        ResolvedFont::fallback()
    }
}

/// Read a font file and name it after its first face.
pub fn load_font_file(path: &Path) -> anyhow::Result<LoadedFont> {
    use anyhow::Context as _;

    let bytes =
        std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    let mut db = usvg::fontdb::Database::new();
    db.load_font_data(bytes.clone());
    let face = db
        .faces()
        .next()
        .with_context(|| format!("'{}' contains no usable font faces", path.display()))?;
    let family = face
        .families
        .first()
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| path.display().to_string());

    Ok(LoadedFont {
        family,
        index: face.index,
        bytes: Arc::new(bytes),
    })
}

/// Pick the first installed preferred family, then any sans-serif face.
pub fn query_database(db: &usvg::fontdb::Database, preferred: &[String]) -> Option<LoadedFont> {
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    if db.is_empty() {
        return None;
    }

    let mut families: Vec<Family<'_>> = preferred
        .iter()
        .map(|n| Family::Name(n.as_str()))
        .collect();
    families.push(Family::SansSerif);
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db.query(&query)?;
    let face = db.face(id)?;
    let family = face.families.first().map(|(name, _)| name.clone())?;
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;

    Some(LoadedFont {
        family,
        bytes: Arc::new(bytes),
        index,
    })
}
