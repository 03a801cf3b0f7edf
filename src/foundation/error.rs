/// Convenience result type used across the crate.
pub type AlbumResult<T> = Result<T, AlbumError>;

/// Top-level error taxonomy used by album, session and service APIs.
#[derive(thiserror::Error, Debug)]
pub enum AlbumError {
    /// An encoded image could not be fetched or decoded.
    ///
    /// `source_id` is a truncated identifier of the source (never the full payload).
    #[error("image decode error: {source_id}: {reason}")]
    ImageDecode {
        /// Short identifier of the failing source.
        source_id: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// The drawing surface (or a raster it depends on) could not be allocated.
    #[error("canvas unavailable: {0}")]
    CanvasUnavailable(String),

    /// Invalid user-provided input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// An album was requested before every slot finished successfully.
    #[error("album not ready: pending [{}], failed [{}]", pending.join(", "), failed.join(", "))]
    NotReady {
        /// Composite keys of slots still waiting for a result.
        pending: Vec<String>,
        /// Composite keys of slots that settled with an error.
        failed: Vec<String>,
    },

    /// The external styling service failed or returned no image.
    #[error("styling service error: {0}")]
    Service(String),

    /// Serialising the composed surface failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AlbumError {
    /// Build an [`AlbumError::ImageDecode`] value.
    pub fn image_decode(source_id: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ImageDecode {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`AlbumError::CanvasUnavailable`] value.
    pub fn canvas_unavailable(msg: impl Into<String>) -> Self {
        Self::CanvasUnavailable(msg.into())
    }

    /// Build an [`AlbumError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AlbumError::Service`] value.
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Build an [`AlbumError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`AlbumError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
