//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`GiftError`] covers the failure modes that can reach
//! the host:
//! - Missing rendering capability (the widget refuses to start)
//! - Invalid configuration
//! - Asset reading and decoding errors
//!
//! Runtime degradation (a bundle that fails to load, a clip that is absent,
//! a name that does not fit on the tag) is logged and absorbed instead of
//! being returned as an error.
//!
//! # Usage
//!
//! ```rust,ignore
//! use gift_reveal::errors::{GiftError, Result};
//!
//! fn load_config() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the gift reveal widget.
#[derive(Error, Debug)]
pub enum GiftError {
    // ========================================================================
    // Environment Errors
    // ========================================================================
    /// The host renderer lacks a required capability.
    #[error("Rendering unavailable: {0}")]
    Unsupported(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A configuration value failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    Gltf(String),

    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// Font parsing error.
    #[error("Font error: {0}")]
    Font(String),

    /// Task join error (when a load task fails to complete).
    #[error("Task join error: {0}")]
    TaskJoin(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<image::ImageError> for GiftError {
    fn from(err: image::ImageError) -> Self {
        GiftError::ImageDecode(err.to_string())
    }
}

impl From<gltf::Error> for GiftError {
    fn from(err: gltf::Error) -> Self {
        GiftError::Gltf(err.to_string())
    }
}

impl From<tokio::task::JoinError> for GiftError {
    fn from(err: tokio::task::JoinError) -> Self {
        GiftError::TaskJoin(err.to_string())
    }
}

/// Alias for `Result<T, GiftError>`.
pub type Result<T> = std::result::Result<T, GiftError>;
