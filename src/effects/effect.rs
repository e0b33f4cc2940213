use std::sync::Arc;

use crate::{
    buffer::{pixel::PixelBuffer, range::Range},
    effects::{
        blend::{BlendFn, BlendMode, ReferenceColor, blend_bitmaps, blend_color},
        color_matrix::{ColorMatrix, apply_color_matrix},
        convolution::{Convolution, convolve},
        geometric::{Geometric, apply_geometric},
        gradient::{DualConvolution, convolve_gradient},
        hsl::{HslOp, apply_hsl},
    },
    foundation::error::{LookError, LookResult},
};

/// One configured transform. Configuration is immutable and safe to reuse across calls.
#[derive(Clone, Debug)]
pub enum Effect {
    /// 5x5 color matrix.
    ColorMatrix {
        /// Matrix weights.
        matrix: ColorMatrix,
        /// Optional restriction rectangle.
        range: Option<Range>,
    },
    /// Single-kernel convolution.
    Convolution {
        /// Kernel and scalar parameters.
        conv: Convolution,
        /// Optional restriction rectangle.
        range: Option<Range>,
    },
    /// Horizontal + vertical kernel pair.
    DualConvolution {
        /// Kernel pair and combination settings.
        dual: DualConvolution,
        /// Optional restriction rectangle.
        range: Option<Range>,
    },
    /// Blend the input with a second bitmap.
    BitmapBlend {
        /// Second operand; must match the input layout.
        overlay: Arc<PixelBuffer>,
        /// Per-channel function.
        blend: BlendFn,
        /// Blend the alpha channel instead of copying it.
        use_alpha: bool,
        /// Optional restriction rectangle.
        range: Option<Range>,
    },
    /// Blend the input with a constant color.
    ColorBlend {
        /// Constant second operand.
        color: ReferenceColor,
        /// Per-channel function.
        blend: BlendFn,
        /// Blend the alpha channel instead of copying it.
        use_alpha: bool,
        /// Optional restriction rectangle.
        range: Option<Range>,
    },
    /// Forward-mapped coordinate transform.
    Geometric {
        /// 2x2 map about the image center.
        geo: Geometric,
        /// Optional restriction rectangle.
        range: Option<Range>,
    },
    /// HSL-space adjustment.
    Hsl {
        /// Adjustment.
        op: HslOp,
        /// Optional restriction rectangle.
        range: Option<Range>,
    },
}

impl Effect {
    /// Unrestricted color matrix effect.
    pub fn color_matrix(matrix: ColorMatrix) -> Self {
        Self::ColorMatrix {
            matrix,
            range: None,
        }
    }

    /// Unrestricted convolution effect.
    pub fn convolution(conv: Convolution) -> Self {
        Self::Convolution { conv, range: None }
    }

    /// Unrestricted dual-kernel effect.
    pub fn dual_convolution(dual: DualConvolution) -> Self {
        Self::DualConvolution { dual, range: None }
    }

    /// Unrestricted bitmap blend; alpha is copied from the input.
    pub fn bitmap_blend(overlay: PixelBuffer, blend: impl Into<BlendFn>) -> Self {
        Self::BitmapBlend {
            overlay: Arc::new(overlay),
            blend: blend.into(),
            use_alpha: false,
            range: None,
        }
    }

    /// Unrestricted constant-color blend; alpha is copied from the input.
    pub fn color_blend(color: ReferenceColor, blend: impl Into<BlendFn>) -> Self {
        Self::ColorBlend {
            color,
            blend: blend.into(),
            use_alpha: false,
            range: None,
        }
    }

    /// Unrestricted geometric effect.
    pub fn geometric(geo: Geometric) -> Self {
        Self::Geometric { geo, range: None }
    }

    /// Unrestricted HSL effect.
    pub fn hsl(op: HslOp) -> Self {
        Self::Hsl { op, range: None }
    }

    /// Stable kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ColorMatrix { .. } => "color_matrix",
            Self::Convolution { .. } => "convolution",
            Self::DualConvolution { .. } => "dual_convolution",
            Self::BitmapBlend { .. } => "bitmap_blend",
            Self::ColorBlend { .. } => "color_blend",
            Self::Geometric { .. } => "geometric",
            Self::Hsl { .. } => "hsl",
        }
    }

    /// Restriction rectangle, if any.
    pub fn range(&self) -> Option<Range> {
        match self {
            Self::ColorMatrix { range, .. }
            | Self::Convolution { range, .. }
            | Self::DualConvolution { range, .. }
            | Self::BitmapBlend { range, .. }
            | Self::ColorBlend { range, .. }
            | Self::Geometric { range, .. }
            | Self::Hsl { range, .. } => *range,
        }
    }

    /// Copy restricted to `range`.
    pub fn with_range(mut self, new: Option<Range>) -> Self {
        match &mut self {
            Self::ColorMatrix { range, .. }
            | Self::Convolution { range, .. }
            | Self::DualConvolution { range, .. }
            | Self::BitmapBlend { range, .. }
            | Self::ColorBlend { range, .. }
            | Self::Geometric { range, .. }
            | Self::Hsl { range, .. } => *range = new,
        }
        self
    }

    /// Blend the alpha channel as well (blend variants only).
    pub fn with_alpha(mut self) -> Self {
        if let Self::BitmapBlend { use_alpha, .. } | Self::ColorBlend { use_alpha, .. } = &mut self
        {
            *use_alpha = true;
        }
        self
    }

    /// Check configuration without touching pixels.
    pub fn validate(&self) -> LookResult<()> {
        match self {
            Self::ColorMatrix { .. } => Ok(()),
            Self::Convolution { conv, .. } => conv.validate(),
            Self::DualConvolution { dual, .. } => dual.validate(),
            Self::BitmapBlend { .. } => Ok(()),
            Self::ColorBlend { color, .. } => color.validate(),
            Self::Geometric { geo, .. } => geo.validate(),
            Self::Hsl { op, .. } => op.validate(),
        }
    }

    /// Transform `buffer` into a new buffer.
    pub fn apply(&self, buffer: &PixelBuffer) -> LookResult<PixelBuffer> {
        self.validate()?;
        match self {
            Self::ColorMatrix { matrix, range } => Ok(apply_color_matrix(buffer, matrix, *range)),
            Self::Convolution { conv, range } => convolve(buffer, conv, *range),
            Self::DualConvolution { dual, range } => convolve_gradient(buffer, dual, *range),
            Self::BitmapBlend {
                overlay,
                blend,
                use_alpha,
                range,
            } => blend_bitmaps(buffer, overlay, blend, *range, *use_alpha),
            Self::ColorBlend {
                color,
                blend,
                use_alpha,
                range,
            } => blend_color(buffer, blend, *color, *range, *use_alpha),
            Self::Geometric { geo, range } => apply_geometric(buffer, geo, *range),
            Self::Hsl { op, range } => apply_hsl(buffer, *op, *range),
        }
    }
}

/// Untyped effect description: a kind name plus JSON parameters.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectInstance {
    /// Engine kind, e.g. `"convolution"`.
    pub kind: String,
    /// Kind-specific parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Whether `kind` names one of the engine kinds understood by [`parse_effect`].
pub fn is_engine_kind(kind: &str) -> bool {
    normalize_kind(kind).is_some()
}

#[derive(Clone, Copy)]
enum Kind {
    ColorMatrix,
    Convolution,
    DualConvolution,
    ColorBlend,
    BitmapBlend,
    Geometric,
    Hsl,
}

fn normalize_kind(kind: &str) -> Option<Kind> {
    let kind = kind.trim().to_ascii_lowercase().replace('-', "_");
    Some(match kind.as_str() {
        "color_matrix" | "colormatrix" | "matrix" => Kind::ColorMatrix,
        "convolution" | "convolve" | "kernel" => Kind::Convolution,
        "dual_convolution" | "dualconvolution" | "gradient" => Kind::DualConvolution,
        "color_blend" | "colorblend" => Kind::ColorBlend,
        "bitmap_blend" | "bitmapblend" => Kind::BitmapBlend,
        "geometric" | "transform" => Kind::Geometric,
        "hsl" => Kind::Hsl,
        _ => return None,
    })
}

/// Parse an engine-kind [`EffectInstance`] into an [`Effect`].
pub fn parse_effect(inst: &EffectInstance) -> LookResult<Effect> {
    if inst.kind.trim().is_empty() {
        return Err(LookError::validation("effect kind must be non-empty"));
    }
    let Some(kind) = normalize_kind(&inst.kind) else {
        return Err(LookError::validation(format!(
            "unknown effect kind '{}'",
            inst.kind
        )));
    };
    let params = &inst.params;

    let effect = match kind {
        Kind::ColorMatrix => {
            let v = params
                .get("matrix")
                .ok_or_else(|| LookError::validation("missing effect param 'matrix'"))?;
            Effect::color_matrix(serde_json::from_value(v.clone())?)
        }
        Kind::Convolution => Effect::convolution(serde_json::from_value(params.clone())?),
        Kind::DualConvolution => {
            let dual: DualConvolution = serde_json::from_value(params.clone())?;
            dual.validate()?;
            Effect::dual_convolution(dual)
        }
        Kind::ColorBlend => {
            let mode = get_str(params, "mode")?.parse::<BlendMode>()?;
            let color = match params.get("color") {
                Some(serde_json::Value::String(s)) => ReferenceColor::parse_hex(s)?,
                Some(v) => serde_json::from_value(v.clone())?,
                None => return Err(LookError::validation("missing effect param 'color'")),
            };
            let effect = Effect::color_blend(color, mode);
            if get_bool(params, "use_alpha")? {
                effect.with_alpha()
            } else {
                effect
            }
        }
        Kind::BitmapBlend => {
            return Err(LookError::validation(
                "bitmap_blend needs an in-memory overlay and cannot be described as data",
            ));
        }
        Kind::Geometric => Effect::geometric(parse_geometric(params)?),
        Kind::Hsl => Effect::hsl(serde_json::from_value(params.clone())?),
    };
    effect.validate()?;
    Ok(effect)
}

fn parse_geometric(params: &serde_json::Value) -> LookResult<Geometric> {
    if params.get("matrix").is_some() {
        return Ok(serde_json::from_value(params.clone())?);
    }
    if let Some(v) = params.get("rotate_deg") {
        let deg = v
            .as_f64()
            .ok_or_else(|| LookError::validation("geometric.rotate_deg must be a number"))?;
        return Ok(Geometric::rotate(deg));
    }
    if let Some(v) = params.get("zoom") {
        let f = v
            .as_f64()
            .ok_or_else(|| LookError::validation("geometric.zoom must be a number"))?;
        return Ok(Geometric::zoom(f));
    }
    match params.get("flip").and_then(|v| v.as_str()) {
        Some("horizontal" | "h") => Ok(Geometric::flip_horizontal()),
        Some("vertical" | "v") => Ok(Geometric::flip_vertical()),
        Some(other) => Err(LookError::validation(format!(
            "unknown geometric.flip '{other}'"
        ))),
        None => Err(LookError::validation(
            "geometric needs one of 'matrix', 'rotate_deg', 'zoom' or 'flip'",
        )),
    }
}

fn get_str<'a>(obj: &'a serde_json::Value, key: &str) -> LookResult<&'a str> {
    let Some(v) = obj.get(key) else {
        return Err(LookError::validation(format!(
            "missing effect param '{key}'"
        )));
    };
    v.as_str()
        .ok_or_else(|| LookError::validation(format!("effect param '{key}' must be a string")))
}

fn get_bool(obj: &serde_json::Value, key: &str) -> LookResult<bool> {
    match obj.get(key) {
        None => Ok(false),
        Some(v) => v
            .as_bool()
            .ok_or_else(|| LookError::validation(format!("effect param '{key}' must be a bool"))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/effect.rs"]
mod tests;
