use crate::foundation::error::{LookError, LookResult};

/// Axis-aligned pixel rectangle restricting which pixels an effect rewrites.
///
/// Pixels outside the rectangle are copied unchanged from the primary source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Range {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Range {
    /// Build a rectangle from its origin and size.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Parse `x,y,w,h`.
    pub fn parse(s: &str) -> LookResult<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LookError::validation(format!("range '{s}': {e}")))?;
        match parts.as_slice() {
            [x, y, w, h] => Ok(Self::new(*x, *y, *w, *h)),
            _ => Err(LookError::validation(format!(
                "range '{s}' must have exactly four components x,y,w,h"
            ))),
        }
    }

    /// Right edge (exclusive).
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Whether `(x, y)` lies inside the rectangle.
    pub fn contains(self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Intersect with a `width` x `height` image. `None` when nothing remains.
    pub fn clip(self, width: u32, height: u32) -> Option<Self> {
        let right = self.right().min(width);
        let bottom = self.bottom().min(height);
        if self.x >= right || self.y >= bottom {
            return None;
        }
        Some(Self::new(self.x, self.y, right - self.x, bottom - self.y))
    }

    /// Effective rectangle for an optional range: the whole image when `None`.
    pub(crate) fn resolve(range: Option<Self>, width: u32, height: u32) -> Option<Self> {
        range
            .unwrap_or_else(|| Self::new(0, 0, width, height))
            .clip(width, height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/range.rs"]
mod tests;
