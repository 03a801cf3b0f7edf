use crate::{assets::encoded::EncodedImage, foundation::error::AlbumResult};

pub(crate) mod catalog;
pub(crate) mod gemini;

use catalog::StyleSpec;

/// One restyle call: a portrait, the target style and which variation of it.
#[derive(Clone, Copy, Debug)]
pub struct RestyleRequest<'a> {
    pub portrait: &'a EncodedImage,
    pub style: &'a StyleSpec,
    /// 1-based.
    pub variation: u32,
}

impl RestyleRequest<'_> {
    pub fn prompt(&self) -> String {
        self.style.prompt_for(self.variation)
    }
}

/// Anything that can turn a portrait into a styled image.
///
/// Implementations are called concurrently from the generation pool, one call per slot.
pub trait StyleService: Sync {
    fn name(&self) -> &str;

    fn restyle(&self, request: &RestyleRequest<'_>) -> AlbumResult<EncodedImage>;
}

impl<S: StyleService + ?Sized> StyleService for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn restyle(&self, request: &RestyleRequest<'_>) -> AlbumResult<EncodedImage> {
        (**self).restyle(request)
    }
}

impl<S: StyleService + ?Sized> StyleService for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn restyle(&self, request: &RestyleRequest<'_>) -> AlbumResult<EncodedImage> {
        (**self).restyle(request)
    }
}
