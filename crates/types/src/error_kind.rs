//! Error classification shared by every engine crate.

use std::fmt;

/// Broad class of a rejected call.
///
/// Every engine error maps to exactly one kind. None of them is retried
/// internally; the kind tells the caller how to surface the rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller lacks the administrative, signer or transmitter role.
    Authorization,
    /// Malformed rotation input.
    Validation,
    /// Signature count, duplicate signer or unrecognized signer.
    Quorum,
    /// Forked or otherwise inconsistent execution context.
    Context,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Authorization => "authorization",
            ErrorKind::Validation => "validation",
            ErrorKind::Quorum => "quorum",
            ErrorKind::Context => "context",
        };
        f.write_str(name)
    }
}
