pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod encode;
pub(crate) mod shadow;
pub(crate) mod surface;
pub(crate) mod text;
