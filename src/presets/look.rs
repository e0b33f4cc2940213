//! Named chains and their JSON description.

use crate::{
    buffer::{pixel::PixelBuffer, range::Range},
    compose::chain::{Chain, ExecOpts, Stage},
    effects::effect::{EffectInstance, is_engine_kind, parse_effect},
    foundation::error::{LookError, LookResult},
    presets::registry::Registry,
};

/// A named effect chain.
#[derive(Clone, Debug)]
pub struct Look {
    /// Display name.
    pub name: String,
    /// Stages run in order.
    pub chain: Chain,
}

impl Look {
    /// Name a chain.
    pub fn new(name: impl Into<String>, chain: Chain) -> Self {
        Self {
            name: name.into(),
            chain,
        }
    }

    /// Parse a JSON look document, resolving preset names through `registry`.
    pub fn from_json_str(s: &str, registry: &Registry) -> LookResult<Self> {
        let file: LookFile = serde_json::from_str(s)?;
        file.resolve(registry)
    }

    /// Run the look on `buffer`.
    #[tracing::instrument(skip(self, buffer, opts), fields(look = %self.name))]
    pub fn apply(&self, buffer: &PixelBuffer, opts: &ExecOpts) -> LookResult<PixelBuffer> {
        self.chain.run(buffer, opts)
    }
}

/// On-disk look description.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookFile {
    /// Optional display name; defaults to `"custom"`.
    #[serde(default)]
    pub name: Option<String>,
    /// Stages in execution order.
    pub stages: Vec<StageSpec>,
}

/// One stage of a [`LookFile`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageSpec {
    /// Engine kind (`"color_matrix"`, `"convolution"`, ...) or a preset name.
    pub effect: String,
    /// Engine parameters; must be absent for preset names.
    #[serde(default)]
    pub params: serde_json::Value,
    /// Mix factor in `[0, 1]`.
    #[serde(default = "full_amount")]
    pub amount: f32,
    /// Optional `[x, y, width, height]` restriction.
    #[serde(default)]
    pub range: Option<[u32; 4]>,
}

fn full_amount() -> f32 {
    1.0
}

impl StageSpec {
    fn resolve(&self, registry: &Registry) -> LookResult<Stage> {
        let range = self.range.map(|[x, y, w, h]| Range::new(x, y, w, h));
        if is_engine_kind(&self.effect) {
            let effect = parse_effect(&EffectInstance {
                kind: self.effect.clone(),
                params: self.params.clone(),
            })?;
            return Ok(Stage::partial(effect.with_range(range), self.amount));
        }
        if !self.params.is_null() {
            return Err(LookError::validation(format!(
                "preset '{}' does not take params",
                self.effect
            )));
        }
        let look = registry.get(&self.effect)?;
        Ok(Stage::nested(look.chain.with_range(range), self.amount))
    }
}

impl LookFile {
    /// Build a validated [`Look`], resolving preset names through `registry`.
    pub fn resolve(&self, registry: &Registry) -> LookResult<Look> {
        let mut chain = Chain::new();
        for (idx, spec) in self.stages.iter().enumerate() {
            let stage = spec.resolve(registry).map_err(|e| match e {
                LookError::Validation(msg) => {
                    LookError::validation(format!("stage {idx} ('{}'): {msg}", spec.effect))
                }
                other => other,
            })?;
            chain.push(stage);
        }
        chain.validate()?;
        Ok(Look::new(
            self.name.clone().unwrap_or_else(|| "custom".to_string()),
            chain,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/presets/look.rs"]
mod tests;
