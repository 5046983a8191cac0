//! Emitter trait, options and errors.

use crate::{CitationRecord, LabelError, LabelResolver, Locale};

/// When file-specific fragments (file title, file PID) are rendered.
///
/// A blank file title always suppresses them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileNameInclusion {
    /// Only for files the user accessed directly.
    #[default]
    DirectOnly,
    /// Whenever the record names a file.
    Always,
}

/// Options for emitting.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// HTML-escape the plain-text citation and render the PID as a link.
    pub escape_html: bool,
    /// Gate for file-specific fragments.
    pub file_name: FileNameInclusion,
    /// Also emit the series title and UNF where the format has a field for them.
    pub extended: bool,
}

/// Error during emitting.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error("citation rendering failed")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl EmitError {
    pub fn render(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        EmitError::Render(cause.into())
    }
}

/// Render a citation record to one format.
pub trait Emitter: Send + Sync {
    /// Name of the format this emitter produces.
    fn format(&self) -> &str;

    /// Render `record` with labels for `locale`.
    fn emit(
        &self,
        record: &CitationRecord,
        labels: &dyn LabelResolver,
        locale: &Locale,
        options: &EmitOptions,
    ) -> Result<String, EmitError>;
}
