use thiserror::Error;

use formcast_shared::TemplateError;

use crate::gateway::GatewayError;

/// Errors surfaced by the broadcast engine.
///
/// Every variant is raised before the batch is flushed, so a failed
/// invocation never results in a partial broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    /// The requested-attributes argument could not be normalized
    #[error("attributes must be a map, a sequence of attribute names, or a single attribute name: {reason}")]
    InvalidAttributes { reason: String },

    /// A requested branch has no matching association on the model adapter.
    /// This is a caller/model mismatch, not a runtime condition the engine
    /// can recover from.
    #[error("model {model:?} exposes no association named {association:?}. The requested attribute set does not match the model adapter")]
    AssociationNotFound { model: String, association: String },

    /// A selector template was malformed at its first point of use
    #[error("selector template error: {0}")]
    Template(#[from] TemplateError),

    /// The transport gateway failed to deliver the batch as a whole
    #[error("transport gateway error: {0}")]
    Gateway(#[from] GatewayError),
}
