//! lookfx applies per-pixel and per-neighborhood numeric transforms to raster images
//! and composes them into multi-stage "looks".
//!
//! # Pipeline overview
//!
//! 1. **Acquire**: an [`ImageResource`] hands out a [`PixelBuffer`] in B, G, R, (A) order.
//! 2. **Transform**: one or more [`Effect`]s (color matrix, convolution, gradient,
//!    blend, HSL, geometric) each produce a new buffer; the input is never mutated.
//! 3. **Compose**: a [`Chain`] sequences effects with per-stage mix amounts; a
//!    [`Look`] is a named chain from the [`Registry`] or a JSON [`LookFile`].
//! 4. **Release**: the final buffer is written back to the image resource.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No IO in engines**: file decode/encode lives in the `lookfx` binary only.
//! - **Deterministic**: serial and parallel runs produce identical bytes.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod buffer;
mod compose;
mod effects;
mod foundation;
mod presets;

pub use buffer::acquire::{ImageResource, acquire, process, release};
pub use buffer::pixel::{ALPHA, BLUE, GREEN, PixelBuffer, RED};
pub use buffer::range::Range;
pub use compose::chain::{Chain, ExecOpts, Stage, StageOp, Transform};
pub use compose::merge::{average, merge, partial_apply};
pub use effects::blend::{
    BlendCtx, BlendFn, BlendFunction, BlendMode, ReferenceColor, blend_bitmaps, blend_color,
};
pub use effects::color_matrix::{ColorMatrix, LUMA_BGR, apply_color_matrix};
pub use effects::convolution::{Convolution, EdgeMode, Kernel, convolve};
pub use effects::effect::{Effect, EffectInstance, is_engine_kind, parse_effect};
pub use effects::geometric::{Geometric, apply_geometric};
pub use effects::gradient::{ChannelAffine, DualConvolution, GradientCombine, convolve_gradient};
pub use effects::hsl::{HslOp, apply_hsl, hsl_to_rgb, rgb_to_hsl};
pub use foundation::error::{LookError, LookResult};
pub use presets::look::{Look, LookFile, StageSpec};
pub use presets::registry::{ChainFactory, Registry};
pub use presets::{kernels, matrices};
