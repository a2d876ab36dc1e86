/*!
 * Error types for the otio-conform library.
 *
 * This module contains custom error types for the different layers of the
 * conform pipeline, using the thiserror crate for ergonomic error
 * definitions. Every error here is terminal: nothing in this crate retries.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while acquiring a host scripting session
#[derive(Error, Debug)]
pub enum SessionError {
    /// A required environment variable for locating the host scripting
    /// runtime is not set
    #[error(
        "'{var}' not set, please check the Resolve developer documentation \
         for the correct configuration"
    )]
    EnvironmentNotConfigured {
        /// Name of the missing variable
        var: &'static str,
    },

    /// The host-supplied scripting binding could not be located or loaded
    #[error("scripting binding unavailable: {reason}")]
    BindingUnavailable {
        /// Why the binding could not be used
        reason: String,
    },

    /// The host returned no session for the requested application
    #[error(
        "cannot get a '{app}' session object; this is either a setup or a \
         license issue (script execution outside the host console is not \
         supported on all editions)"
    )]
    SessionUnavailable {
        /// Application name the session was requested for
        app: String,
    },
}

/// Errors raised while reading an OTIO interchange document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read at all
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The file is not valid OTIO JSON (includes unknown OTIO_SCHEMA tags,
    /// which surface as unknown-variant errors from the deserializer)
    #[error("malformed OTIO document: {0}")]
    Json(#[from] serde_json::Error),

    /// An item carries neither a source range nor a media reference with an
    /// available range, so its placed duration cannot be determined
    #[error("item '{item}' has no source_range and no available media range")]
    UnresolvedDuration {
        /// Name of the offending item
        item: String,
    },

    /// A time range in the document is degenerate (non-positive or
    /// non-finite duration)
    #[error("item '{item}' has an invalid duration of {duration} @ {rate} fps")]
    InvalidDuration {
        /// Name of the offending item
        item: String,
        /// The duration value found
        duration: f64,
        /// The rate the duration was expressed at
        rate: f64,
    },
}

/// Errors reported by the host application while creating constructs
#[derive(Error, Debug)]
pub enum HostError {
    /// The host rejected a creation request
    #[error("host rejected {operation}: {message}")]
    CreationFailed {
        /// The operation that was attempted (e.g. "append_clip")
        operation: &'static str,
        /// Message reported by the host
        message: String,
    },

    /// A handle passed back to the host was not recognized
    #[error("host does not recognize handle {handle}")]
    UnknownHandle {
        /// The raw handle value
        handle: u64,
    },
}

/// Top-level error type returned by the importer
#[derive(Error, Debug)]
pub enum ImportError {
    /// Session acquisition failed; configuration problem, not retryable
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// The interchange document could not be parsed; always raised strictly
    /// before any conversion work starts
    #[error("document parse error: {0}")]
    Parse(#[from] DocumentError),

    /// The host failed a creation call; passed through untranslated
    #[error("host error: {0}")]
    Host(#[from] HostError),
}
