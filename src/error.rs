//! Errors shared across the provider seam.

use thiserror::Error;

/// Failure modes of a rate provider.
///
/// `Upstream` carries a presentable message rather than the transport error;
/// adapters log the cause and fold it into this variant so transport types
/// never cross the provider boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The requested currency id is not in the supported-currency registry.
    #[error("Currency '{0}' is not supported.")]
    UnsupportedCurrency(String),

    /// The rate source was unreachable, answered with a non-success status,
    /// or returned a body that could not be used.
    #[error("{0}")]
    Upstream(String),
}
