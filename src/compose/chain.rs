use std::borrow::Cow;

use crate::{
    buffer::{pixel::PixelBuffer, range::Range},
    compose::merge::partial_apply,
    effects::effect::Effect,
    foundation::error::{LookError, LookResult},
};

/// Anything that turns one pixel buffer into a new one without mutating its input.
pub trait Transform: Send + Sync {
    /// Produce the transformed buffer.
    fn apply(&self, buffer: &PixelBuffer) -> LookResult<PixelBuffer>;
}

impl Transform for Effect {
    fn apply(&self, buffer: &PixelBuffer) -> LookResult<PixelBuffer> {
        Effect::apply(self, buffer)
    }
}

/// What a stage runs.
#[derive(Clone, Debug)]
pub enum StageOp {
    /// A single effect.
    Effect(Effect),
    /// A nested chain, mixed in as a whole.
    Chain(Chain),
}

/// One step of a [`Chain`]: an operation mixed with its input by `amount`.
#[derive(Clone, Debug)]
pub struct Stage {
    /// Operation.
    pub op: StageOp,
    /// Mix factor in `[0, 1]`; 1 applies the operation fully.
    pub amount: f32,
}

impl Stage {
    /// Apply `effect` fully.
    pub fn full(effect: Effect) -> Self {
        Self::partial(effect, 1.0)
    }

    /// Apply `effect` mixed by `amount`.
    pub fn partial(effect: Effect, amount: f32) -> Self {
        Self {
            op: StageOp::Effect(effect),
            amount,
        }
    }

    /// Apply a nested chain mixed by `amount`.
    pub fn nested(chain: Chain, amount: f32) -> Self {
        Self {
            op: StageOp::Chain(chain),
            amount,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match &self.op {
            StageOp::Effect(e) => e.kind(),
            StageOp::Chain(_) => "chain",
        }
    }

    fn validate(&self) -> LookResult<()> {
        if !self.amount.is_finite() || !(0.0..=1.0).contains(&self.amount) {
            return Err(LookError::validation(format!(
                "stage amount must be within [0, 1], got {}",
                self.amount
            )));
        }
        match &self.op {
            StageOp::Effect(e) => e.validate(),
            StageOp::Chain(c) => c.validate(),
        }
    }

    fn run(&self, buffer: &PixelBuffer) -> LookResult<PixelBuffer> {
        match &self.op {
            StageOp::Effect(e) => partial_apply(buffer, e, self.amount),
            StageOp::Chain(c) => partial_apply(buffer, c, self.amount),
        }
    }
}

/// Threading controls for a chain run.
#[derive(Clone, Debug)]
pub struct ExecOpts {
    /// Split rows across worker threads when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for ExecOpts {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// Ordered effect stages; stage `i`'s output is stage `i + 1`'s input.
#[derive(Clone, Debug, Default)]
pub struct Chain {
    /// Stages in execution order.
    pub stages: Vec<Stage>,
}

impl Chain {
    /// Empty chain (the identity).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fully applied effect.
    pub fn then(mut self, effect: Effect) -> Self {
        self.stages.push(Stage::full(effect));
        self
    }

    /// Append an effect mixed by `amount`.
    pub fn then_partial(mut self, effect: Effect, amount: f32) -> Self {
        self.stages.push(Stage::partial(effect, amount));
        self
    }

    /// Append an arbitrary stage.
    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Copy with every effect restricted to `range`, nested chains included.
    ///
    /// `None` leaves existing stage ranges in place.
    pub fn with_range(mut self, range: Option<Range>) -> Self {
        if range.is_none() {
            return self;
        }
        for stage in &mut self.stages {
            stage.op = match std::mem::replace(&mut stage.op, StageOp::Chain(Chain::new())) {
                StageOp::Effect(e) => StageOp::Effect(e.with_range(range)),
                StageOp::Chain(c) => StageOp::Chain(c.with_range(range)),
            };
        }
        self
    }

    /// Validate every stage before any pixels are touched.
    pub fn validate(&self) -> LookResult<()> {
        self.stages.iter().try_for_each(Stage::validate)
    }

    /// Validate, then run all stages inside a dedicated rayon pool.
    pub fn run(&self, buffer: &PixelBuffer, opts: &ExecOpts) -> LookResult<PixelBuffer> {
        self.validate()?;
        let pool = build_thread_pool(opts)?;
        pool.install(|| self.run_stages(buffer))
    }

    fn run_stages(&self, buffer: &PixelBuffer) -> LookResult<PixelBuffer> {
        let mut current = Cow::Borrowed(buffer);
        for (idx, stage) in self.stages.iter().enumerate() {
            tracing::debug!(
                stage = idx,
                kind = stage.label(),
                amount = stage.amount,
                "applying stage"
            );
            current = Cow::Owned(stage.run(&current)?);
        }
        Ok(current.into_owned())
    }
}

impl Transform for Chain {
    fn apply(&self, buffer: &PixelBuffer) -> LookResult<PixelBuffer> {
        self.validate()?;
        self.run_stages(buffer)
    }
}

fn build_thread_pool(opts: &ExecOpts) -> LookResult<rayon::ThreadPool> {
    if let Some(n) = opts.threads
        && n == 0
    {
        return Err(LookError::validation(
            "exec option 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if !opts.parallel {
        builder = builder.num_threads(1);
    } else if let Some(n) = opts.threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LookError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/chain.rs"]
mod tests;
