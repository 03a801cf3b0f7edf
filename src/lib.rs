//! portrait-album restyles one portrait into several social-media looks and lays the results
//! out as a captioned collage.
//!
//! # Pipeline overview
//!
//! 1. **Generate**: an [`Orchestrator`] sends one [`RestyleRequest`] per style and variation to a
//!    [`StyleService`] (for example [`GeminiStyleService`]) and folds each result into a
//!    [`SessionState`].
//! 2. **Collect**: [`SessionState::album_input`] turns a fully settled session into an
//!    [`AlbumInput`], keyed `"{style}_{variation}"`.
//! 3. **Compose**: [`AlbumCompositor::compose`] decodes every entry, draws it with a drop shadow
//!    into a fixed grid, captions each cell, adds a footer and encodes a JPEG [`Album`].
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: grid order depends only on sorted keys, and identical input gives
//!   identical bytes.
//! - **All or nothing**: one undecodable entry fails the whole album.
//! - **Premultiplied RGBA8** on the drawing surface until the final JPEG encode.
#![forbid(unsafe_code)]

mod album;
mod assets;
mod foundation;
mod layout;
mod render;
mod service;
mod session;

pub use album::compositor::{Album, AlbumCompositor, compose_album};
pub use album::config::AlbumConfig;
pub use album::input::AlbumInput;
pub use album::key::{KEY_SEPARATOR, ParsedKey, SlotId};
pub use assets::PreparedImage;
pub use assets::decode::{decode_image, load_images};
pub use assets::encoded::EncodedImage;
pub use assets::fonts::{BUNDLED_FAMILY, FontSet};
pub use foundation::core::{Canvas, Color, Point, Rect, Rgba8Premul};
pub use foundation::error::{AlbumError, AlbumResult};
pub use layout::grid::{AlbumLayout, CellLayout, GridSpec, compute_grid_layout, grid_position};
pub use render::surface::Surface;
pub use service::catalog::{StyleCatalog, StyleSpec};
pub use service::gemini::{GeminiConfig, GeminiStyleService};
pub use service::{RestyleRequest, StyleService};
pub use session::orchestrator::{Orchestrator, OrchestratorConfig};
pub use session::state::{
    Progress, SessionEvent, SessionState, SlotStatus, StyleCollection, StyledImageSlot,
};
