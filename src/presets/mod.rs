pub mod kernels;
pub(crate) mod look;
pub mod matrices;
pub(crate) mod registry;
