use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{AlbumError, AlbumResult};

/// DejaVu Sans, bundled so caption rendering never depends on system fonts.
const BUNDLED_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Family name of the bundled font.
pub const BUNDLED_FAMILY: &str = "DejaVu Sans";

/// Font set used for captions: the bundled face plus an optional override file.
#[derive(Clone, Debug)]
pub struct FontSet {
    db: Arc<usvg::fontdb::Database>,
    family: String,
}

impl FontSet {
    /// Only the bundled font.
    pub fn bundled() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(BUNDLED_SANS.to_vec());
        Self {
            db: Arc::new(db),
            family: BUNDLED_FAMILY.to_string(),
        }
    }

    /// Bundled font plus the face in `path`, which becomes the caption family.
    pub fn with_override(path: &Path) -> AlbumResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;

        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(BUNDLED_SANS.to_vec());
        let before = db.len();
        db.load_font_data(bytes);

        let family = db
            .faces()
            .skip(before)
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .ok_or_else(|| {
                AlbumError::validation(format!(
                    "font file '{}' contains no usable face",
                    path.display()
                ))
            })?;

        Ok(Self {
            db: Arc::new(db),
            family,
        })
    }

    /// Load from an optional override path.
    pub fn load(font_path: Option<&Path>) -> AlbumResult<Self> {
        match font_path {
            Some(p) => Self::with_override(p),
            None => Ok(Self::bundled()),
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub(crate) fn database(&self) -> Arc<usvg::fontdb::Database> {
        Arc::clone(&self.db)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
