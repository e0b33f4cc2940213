/// Convenience result type used across lookfx.
pub type LookResult<T> = Result<T, LookError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is a configuration error for the current call; nothing here is transient.
#[derive(thiserror::Error, Debug)]
pub enum LookError {
    /// Blend inputs differ in size or channel layout.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Color matrix is not 5x5, or a convolution kernel is non-square, even-sized or
    /// mismatched against its partner kernel.
    #[error("invalid matrix shape: {0}")]
    InvalidMatrixShape(String),

    /// Pixel layout with fewer than three 8-bit channels.
    #[error("unsupported pixel depth: {0}")]
    UnsupportedPixelDepth(String),

    /// Invalid user-provided parameters or buffer geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing look descriptions.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LookError {
    /// Build a [`LookError::DimensionMismatch`] value.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Build a [`LookError::InvalidMatrixShape`] value.
    pub fn invalid_matrix_shape(msg: impl Into<String>) -> Self {
        Self::InvalidMatrixShape(msg.into())
    }

    /// Build a [`LookError::UnsupportedPixelDepth`] value.
    pub fn unsupported_pixel_depth(msg: impl Into<String>) -> Self {
        Self::UnsupportedPixelDepth(msg.into())
    }

    /// Build a [`LookError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LookError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for LookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
