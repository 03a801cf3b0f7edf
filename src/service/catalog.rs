use std::path::Path;

use anyhow::Context;

use crate::{
    album::key::SlotId,
    foundation::error::{AlbumError, AlbumResult},
};

/// Shared instruction prepended to every style prompt.
const PROMPT_PREAMBLE: &str = "Re-style the person in this portrait photo. Keep their face, \
     identity and expression clearly recognizable. Output a single square image.";

/// One target look, usually named after the network it is meant for.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleSpec {
    pub name: String,
    pub prompt: String,
}

impl StyleSpec {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
        }
    }

    /// Full prompt for a 1-based variation; later variations ask for a different take.
    pub fn prompt_for(&self, variation: u32) -> String {
        let mut out = format!("{PROMPT_PREAMBLE} {}", self.prompt.trim());
        if variation > 1 {
            out.push_str(&format!(
                " This is alternative version {variation}: use a clearly different pose, \
                 framing and background from the first version."
            ));
        }
        out
    }
}

/// Ordered styles plus the number of variations requested per style.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleCatalog {
    pub styles: Vec<StyleSpec>,
    #[serde(default = "default_variations")]
    pub variations: u32,
}

fn default_variations() -> u32 {
    2
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self {
            styles: vec![
                StyleSpec::new(
                    "LinkedIn",
                    "Make it a polished professional headshot: business attire, soft studio \
                     lighting, neutral office background.",
                ),
                StyleSpec::new(
                    "Instagram",
                    "Make it a casual lifestyle shot: natural golden-hour light, relaxed outfit, \
                     vibrant outdoor setting.",
                ),
                StyleSpec::new(
                    "Facebook",
                    "Make it a warm, friendly everyday photo: smart-casual clothes, bright \
                     daylight, approachable smile.",
                ),
                StyleSpec::new(
                    "X",
                    "Make it a bold, high-contrast profile picture: formal look, dramatic \
                     lighting, minimal dark background.",
                ),
            ],
            variations: default_variations(),
        }
    }
}

impl StyleCatalog {
    pub fn from_path(path: impl AsRef<Path>) -> AlbumResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read style catalog '{}'", path.display()))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> AlbumResult<Self> {
        let catalog: Self = serde_json::from_str(text)
            .map_err(|e| AlbumError::serde(format!("style catalog: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> AlbumResult<()> {
        if self.styles.is_empty() {
            return Err(AlbumError::validation("style catalog has no styles"));
        }
        if self.variations == 0 {
            return Err(AlbumError::validation("style catalog variations must be >= 1"));
        }
        for (i, s) in self.styles.iter().enumerate() {
            if s.name.trim().is_empty() {
                return Err(AlbumError::validation(format!("style #{i} has an empty name")));
            }
            if s.name.chars().any(|c| c.is_control() || c == '/' || c == '\\') {
                return Err(AlbumError::validation(format!(
                    "style name '{}' contains a path separator or control character",
                    s.name
                )));
            }
            if s.prompt.trim().is_empty() {
                return Err(AlbumError::validation(format!(
                    "style '{}' has an empty prompt",
                    s.name
                )));
            }
            if self.styles[..i].iter().any(|o| o.name == s.name) {
                return Err(AlbumError::validation(format!(
                    "style '{}' is declared twice",
                    s.name
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.styles.iter().map(|s| s.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&StyleSpec> {
        self.styles.iter().find(|s| s.name == name)
    }

    /// Every slot the catalog asks for, in style then variation order.
    pub fn slot_ids(&self) -> Vec<SlotId> {
        self.styles
            .iter()
            .flat_map(|s| (1..=self.variations).map(move |v| SlotId::new(s.name.clone(), v)))
            .collect()
    }

    pub fn slot_count(&self) -> usize {
        self.styles.len() * self.variations as usize
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/catalog.rs"]
mod tests;
