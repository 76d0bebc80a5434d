//! Errors that abort a scan before any probe is sent.
use thiserror::Error;

/// Fatal errors for a scan session.
///
/// All of these are raised up front, while the port specification and the
/// target address are being validated, so none of them can occur once
/// probing has begun. Per-port connection failures are not errors at this
/// level; see [`ProbeFailure`](crate::scanner::ProbeFailure).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The port specification does not have a single, pair or range shape,
    /// or one of its tokens is not a whole base-10 integer.
    #[error("invalid port specification '{spec}': {reason}")]
    InvalidFormat { spec: String, reason: String },

    /// A well-formed integer outside of 0-65535.
    #[error("port number {value} should be between 0-65535")]
    OutOfRange { value: String },

    /// The target could not be read as an IPv4 address.
    #[error("invalid IP address provided: '{input}'")]
    InvalidAddress { input: String },
}

impl ScanError {
    pub(crate) fn invalid_format(spec: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            spec: spec.to_owned(),
            reason: reason.into(),
        }
    }
}
