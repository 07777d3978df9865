/// Convenience result type used across cardpress.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy used by the rendering pipeline.
///
/// Components never swallow these: the batch layer matches on [`CardError::kind`] to decide
/// between placeholder substitution, skipping a card, or aborting the run.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Source art could not be decoded, is empty, or has a zero dimension.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Text could not be laid out, even at minimum size with an ellipsis.
    #[error("render error: {0}")]
    Render(String),

    /// Sheet geometry cannot place the requested cards per sheet.
    #[error("layout error: {0}")]
    Layout(String),

    /// Invalid caller-provided specs or records.
    #[error("validation error: {0}")]
    Validation(String),

    /// Filesystem errors raised by collaborators (config loading, output writing).
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Copyable discriminant of [`CardError`], used for policy decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`CardError::InvalidImage`].
    InvalidImage,
    /// See [`CardError::Render`].
    Render,
    /// See [`CardError::Layout`].
    Layout,
    /// See [`CardError::Validation`].
    Validation,
    /// See [`CardError::Io`].
    Io,
    /// See [`CardError::Other`].
    Other,
}

impl CardError {
    /// Build a [`CardError::InvalidImage`] value.
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    /// Build a [`CardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Discriminant of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidImage(_) => ErrorKind::InvalidImage,
            Self::Render(_) => ErrorKind::Render,
            Self::Layout(_) => ErrorKind::Layout,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Io(_) => ErrorKind::Io,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
