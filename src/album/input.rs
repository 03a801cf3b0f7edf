use std::collections::BTreeMap;

use crate::{
    album::key::SlotId,
    assets::encoded::EncodedImage,
    foundation::error::AlbumResult,
};

/// Composite key to encoded image, iterated in plain lexicographic key order.
///
/// The order is byte-wise string order, so `"A_10"` comes before `"A_2"`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlbumInput {
    entries: BTreeMap<String, EncodedImage>,
}

impl AlbumInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, data URL)` pairs.
    pub fn from_data_urls<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> AlbumResult<Self>
    where
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut out = Self::new();
        for (k, v) in pairs {
            out.insert(k, EncodedImage::from_data_url(v.as_ref())?);
        }
        Ok(out)
    }

    /// Insert an image, returning the one previously stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, image: EncodedImage) -> Option<EncodedImage> {
        self.entries.insert(key.into(), image)
    }

    pub fn insert_slot(&mut self, slot: &SlotId, image: EncodedImage) -> Option<EncodedImage> {
        self.insert(slot.key(), image)
    }

    pub fn get(&self, key: &str) -> Option<&EncodedImage> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in grid fill order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in grid fill order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EncodedImage)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, EncodedImage)> for AlbumInput {
    fn from_iter<T: IntoIterator<Item = (K, EncodedImage)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/album/input.rs"]
mod tests;
