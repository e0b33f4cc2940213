//! Name to chain-factory lookup for the built-in looks.

use std::collections::BTreeMap;

use crate::{
    compose::chain::Chain,
    effects::{
        blend::{BlendMode, ReferenceColor},
        color_matrix::ColorMatrix,
        convolution::{Convolution, EdgeMode, Kernel},
        effect::Effect,
        geometric::Geometric,
        gradient::{DualConvolution, GradientCombine},
        hsl::HslOp,
    },
    foundation::error::{LookError, LookResult},
    presets::{kernels, look::Look, matrices},
};

/// Builds a fresh chain each time a look is requested.
pub type ChainFactory = fn() -> Chain;

/// Explicit preset table.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: BTreeMap<String, ChainFactory>,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}

impl Registry {
    /// Registry with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding every built-in look.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(name, f)| ((*name).to_string(), *f))
            .collect();
        Self { entries }
    }

    /// Add a look; names are unique after normalization.
    pub fn register(&mut self, name: &str, factory: ChainFactory) -> LookResult<()> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(LookError::validation("look name must be non-empty"));
        }
        if self.entries.contains_key(&key) {
            return Err(LookError::validation(format!(
                "look '{key}' is already registered"
            )));
        }
        self.entries.insert(key, factory);
        Ok(())
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether `name` resolves to a look.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize(name))
    }

    /// Build the look registered under `name`.
    pub fn get(&self, name: &str) -> LookResult<Look> {
        let key = normalize(name);
        let factory = self
            .entries
            .get(&key)
            .ok_or_else(|| LookError::validation(format!("unknown look '{name}'")))?;
        Ok(Look::new(key, factory()))
    }
}

fn matrix(m: ColorMatrix) -> Chain {
    Chain::new().then(Effect::color_matrix(m))
}

fn kernel(k: Kernel) -> Chain {
    Chain::new().then(Effect::convolution(Convolution::new(k).preserving_alpha()))
}

fn edges((horizontal, vertical): (Kernel, Kernel)) -> DualConvolution {
    DualConvolution {
        horizontal,
        vertical,
        grayscale_first: false,
        edge: EdgeMode::Wrap,
        preserve_alpha: true,
        combine: GradientCombine::Magnitude,
        post: None,
    }
}

fn gradient(pair: (Kernel, Kernel)) -> Chain {
    Chain::new().then(Effect::dual_convolution(edges(pair)))
}

fn normal_map() -> Chain {
    let smooth = || {
        Effect::convolution(
            Convolution::new(kernels::box3())
                .with_edge(EdgeMode::Wrap)
                .preserving_alpha(),
        )
    };
    let dual = edges(kernels::sobel()).with_combine(GradientCombine::Normal { strength: 0.125 });
    Chain::new()
        .then(Effect::dual_convolution(dual))
        .then(smooth())
        .then(smooth())
}

fn golden_hour() -> Chain {
    let glow = Effect::color_blend(
        ReferenceColor::from_rgba8(255, 196, 128, 255),
        BlendMode::SoftLight,
    );
    Chain::new()
        .then(Effect::color_matrix(matrices::warm()))
        .then_partial(glow, 0.5)
}

fn hsl(op: HslOp) -> Chain {
    Chain::new().then(Effect::hsl(op))
}

fn geometric(geo: Geometric) -> Chain {
    Chain::new().then(Effect::geometric(geo))
}

const BUILTIN: &[(&str, ChainFactory)] = &[
    ("grayscale", || matrix(matrices::grayscale())),
    ("sepia", || matrix(matrices::sepia())),
    ("invert", || matrix(matrices::invert())),
    ("polaroid", || matrix(matrices::polaroid())),
    ("kodachrome", || matrix(matrices::kodachrome())),
    ("technicolor", || matrix(matrices::technicolor())),
    ("vintage", || matrix(matrices::vintage())),
    ("cool", || matrix(matrices::cool())),
    ("warm", || matrix(matrices::warm())),
    ("cross-process", || matrix(matrices::cross_process())),
    ("lomo", || {
        Chain::new()
            .then(Effect::color_matrix(matrices::saturation(1.4)))
            .then(Effect::color_matrix(matrices::contrast(1.3)))
    }),
    ("golden-hour", golden_hour),
    ("noir", || {
        Chain::new()
            .then(Effect::color_matrix(matrices::grayscale()))
            .then(Effect::color_matrix(matrices::contrast(1.6)))
    }),
    ("blur", || kernel(kernels::box3())),
    ("blur-5", || kernel(kernels::box5())),
    ("gaussian", || kernel(kernels::gaussian3())),
    ("gaussian-5", || kernel(kernels::gaussian5())),
    ("sharpen", || kernel(kernels::sharpen())),
    ("mean-removal", || kernel(kernels::mean_removal())),
    ("emboss", || kernel(kernels::emboss())),
    ("edge-enhance", || kernel(kernels::edge_enhance())),
    ("laplacian", || {
        Chain::new().then(Effect::convolution(
            Convolution::new(kernels::laplacian())
                .grayscale_first()
                .preserving_alpha(),
        ))
    }),
    ("sobel", || gradient(kernels::sobel())),
    ("prewitt", || gradient(kernels::prewitt())),
    ("scharr", || gradient(kernels::scharr())),
    ("kirsch", || gradient(kernels::kirsch())),
    ("normal-map", normal_map),
    ("tint-90", || hsl(HslOp::Tint { angle_deg: 90.0 })),
    ("tint-180", || hsl(HslOp::Tint { angle_deg: 180.0 })),
    ("tint-270", || hsl(HslOp::Tint { angle_deg: 270.0 })),
    ("desaturate", || hsl(HslOp::Saturation { factor: 0.0 })),
    ("brighten", || hsl(HslOp::Brightness { delta: 0.1 })),
    ("flip-h", || geometric(Geometric::flip_horizontal())),
    ("flip-v", || geometric(Geometric::flip_vertical())),
    ("rotate-90", || geometric(Geometric::rotate(90.0))),
    ("zoom-2x", || geometric(Geometric::zoom(2.0))),
];

#[cfg(test)]
#[path = "../../tests/unit/presets/registry.rs"]
mod tests;
