use std::{path::Path, sync::Arc};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::foundation::{
    error::{AlbumError, AlbumResult},
    math::truncate_identifier,
};

/// Longest identifier carried in diagnostics for an encoded source.
pub(crate) const MAX_IDENTIFIER_CHARS: usize = 48;

/// An encoded raster image (PNG/JPEG/WebP/...) plus its MIME type.
///
/// Bytes are shared, so clones are cheap. The identifier is a short description of where the
/// image came from and is what errors report; it never holds the full payload.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime: Arc<str>,
    bytes: Arc<[u8]>,
    identifier: Arc<str>,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime", &self.mime)
            .field("bytes_len", &self.bytes.len())
            .field("identifier", &self.identifier)
            .finish()
    }
}

impl EncodedImage {
    /// Wrap already-encoded bytes with a known MIME type.
    pub fn from_bytes(mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let mime: String = mime.into();
        let bytes: Arc<[u8]> = bytes.into();
        let identifier = format!("<{mime}, {} bytes>", bytes.len());
        Self {
            mime: mime.into(),
            bytes,
            identifier: identifier.into(),
        }
    }

    /// Wrap encoded bytes, detecting the MIME type from the magic number.
    pub fn from_bytes_sniffed(bytes: impl Into<Arc<[u8]>>) -> AlbumResult<Self> {
        let bytes: Arc<[u8]> = bytes.into();
        let format = image::guess_format(&bytes).map_err(|e| {
            AlbumError::image_decode(format!("<{} bytes>", bytes.len()), e)
        })?;
        Ok(Self::from_bytes(format.to_mime_type(), bytes))
    }

    /// Parse a `data:<mime>[;params];base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> AlbumResult<Self> {
        let identifier = truncate_identifier(url, MAX_IDENTIFIER_CHARS);
        let fail = |reason: &str| AlbumError::image_decode(identifier.clone(), reason);

        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| fail("not a data URL"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| fail("data URL has no ',' separator"))?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or_default().trim();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(fail("data URL payload is not base64"));
        }
        let mime = if mime.is_empty() {
            "application/octet-stream"
        } else {
            mime
        };

        let compact: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| AlbumError::image_decode(identifier.clone(), e))?;

        Ok(Self {
            mime: mime.into(),
            bytes: bytes.into(),
            identifier: identifier.into(),
        })
    }

    /// Read an encoded image from disk, detecting its MIME type from the content.
    pub fn from_path(path: impl AsRef<Path>) -> AlbumResult<Self> {
        let path = path.as_ref();
        let identifier = truncate_identifier(&path.display().to_string(), MAX_IDENTIFIER_CHARS);
        let bytes =
            std::fs::read(path).map_err(|e| AlbumError::image_decode(identifier.clone(), e))?;
        let format = image::guess_format(&bytes)
            .map_err(|e| AlbumError::image_decode(identifier.clone(), e))?;
        Ok(Self {
            mime: format.to_mime_type().into(),
            bytes: bytes.into(),
            identifier: identifier.into(),
        })
    }

    /// Format as a base64 data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64.encode(&self.bytes))
    }

    /// MIME type, e.g. `image/png`.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` when there are no encoded bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Short diagnostic identifier of the source.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        image::ImageFormat::from_mime_type(self.mime.as_ref())
            .and_then(|f| f.extensions_str().first().copied())
            .unwrap_or("bin")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encoded.rs"]
mod tests;
