use crate::foundation::error::{AlbumError, AlbumResult};

/// Separator between style and variation in a composite key.
pub const KEY_SEPARATOR: char = '_';

/// One requested output: a style plus its 1-based variation number.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct SlotId {
    pub style: String,
    pub variation: u32,
}

impl SlotId {
    pub fn new(style: impl Into<String>, variation: u32) -> Self {
        Self {
            style: style.into(),
            variation,
        }
    }

    /// Composite key, `"{style}_{variation}"`.
    pub fn key(&self) -> String {
        format!("{}{KEY_SEPARATOR}{}", self.style, self.variation)
    }

    /// Parse a composite key.
    pub fn parse(key: &str) -> AlbumResult<Self> {
        let parsed = ParsedKey::parse(key)?;
        Ok(Self::new(parsed.style, parsed.variation))
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.style, self.variation)
    }
}

/// Borrowed view of a composite key, split on its last separator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedKey<'a> {
    pub style: &'a str,
    /// Variation exactly as written in the key.
    pub variation_text: &'a str,
    pub variation: u32,
}

impl<'a> ParsedKey<'a> {
    pub fn parse(key: &'a str) -> AlbumResult<Self> {
        let (style, variation_text) = key.rsplit_once(KEY_SEPARATOR).ok_or_else(|| {
            AlbumError::validation(format!(
                "album key '{key}' must look like '<style>{KEY_SEPARATOR}<variation>'"
            ))
        })?;
        if style.is_empty() {
            return Err(AlbumError::validation(format!(
                "album key '{key}' has an empty style"
            )));
        }
        let variation = variation_text
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0 && variation_text.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| {
                AlbumError::validation(format!(
                    "album key '{key}' has a non-positive or non-numeric variation"
                ))
            })?;
        Ok(Self {
            style,
            variation_text,
            variation,
        })
    }

    /// Caption drawn under the image: `"{style} (v{variation})"`.
    pub fn caption(&self) -> String {
        format!("{} (v{})", self.style, self.variation_text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/album/key.rs"]
mod tests;
