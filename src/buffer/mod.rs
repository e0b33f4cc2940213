pub(crate) mod acquire;
pub(crate) mod pixel;
pub(crate) mod range;
