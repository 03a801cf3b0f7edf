pub(crate) mod compositor;
pub(crate) mod config;
pub(crate) mod input;
pub(crate) mod key;
