pub(crate) mod blend;
pub(crate) mod color_matrix;
pub(crate) mod convolution;
pub(crate) mod effect;
pub(crate) mod geometric;
pub(crate) mod gradient;
pub(crate) mod hsl;
