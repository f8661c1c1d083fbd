//! # Error Types
//!
//! This module defines error types used throughout the etiqueta library.
//!
//! Errors that concern a single scene element during a render pass live in
//! [`crate::render::ElementError`]; they never abort the pass.

use thiserror::Error;

/// Main error type for etiqueta operations
#[derive(Debug, Error)]
pub enum EtiquetaError {
    /// Rejected document mutation (bad number, non-positive size, unknown key).
    /// The document is left unchanged.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed template file or failed template write
    #[error("Template error: {0}")]
    Persistence(String),

    /// Font file could not be loaded or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Image encoding or export error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EtiquetaError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
