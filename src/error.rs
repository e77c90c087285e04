//! Parse Error Taxonomy
//!
//! Fatal conditions returned from the parse entry points. Warnings are not
//! errors; they travel through the warning accumulator instead.

use thiserror::Error;

/// A fatal parsing error
///
/// Any of these stops event consumption at the point of detection. Packages
/// delivered before that point remain delivered; there is no rollback.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Structural violation in the document itself, e.g. a package element
    /// missing its mandatory `pkgid` attribute
    #[error("malformed metadata document: {0}")]
    MalformedDocument(String),

    /// The caller aborted the parse from one of its callbacks
    #[error("{0}")]
    CallbackInterrupted(String),

    /// Low-level syntax error reported by the XML tokenizer
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl ParseError {
    /// Check whether this error was caller-requested rather than a
    /// document defect
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ParseError::CallbackInterrupted(_))
    }

    /// Check whether this error is a structural document violation
    #[inline]
    pub fn is_malformed(&self) -> bool {
        matches!(self, ParseError::MalformedDocument(_))
    }
}
