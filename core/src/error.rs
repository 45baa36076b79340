//! Error types for the food API client and the order composer.
//!
//! # Design
//! `ApiError` separates the three ways a round-trip can fail: the host could
//! not reach the service (`Transport`), the service has no such record
//! (`NotFound`), or the service answered with something we cannot read
//! (`DeserializationError`). Any other unexpected status lands in
//! `HttpError` with the raw status code and body for debugging.
//!
//! `ComposerError` wraps `ApiError` for composer operations and adds the one
//! failure that never touches the network: acting on a food that has not
//! been loaded yet.

use thiserror::Error;

/// Errors returned by `FoodClient` parse methods, or reported by the host
/// when the HTTP round-trip itself failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The host could not complete the request (connection refused, DNS,
    /// TLS, dropped connection).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404; the requested record does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// Errors returned by `OrderComposer` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComposerError {
    /// The operation needs the food record, which has not been loaded.
    #[error("food details are not loaded")]
    NotLoaded,

    #[error(transparent)]
    Api(#[from] ApiError),
}
