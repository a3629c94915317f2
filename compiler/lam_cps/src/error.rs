use lam_ir::{MalformedNode, NodeRef};
use thiserror::Error;

/// Why a tree could not be transformed.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TransformError {
    /// A node the transform has no rewrite for; today only an assignment whose
    /// target is not a variable.
    #[error("cannot transform `{node}`: assignment target must be a variable")]
    Unsupported { node: NodeRef },

    #[error(transparent)]
    Malformed(#[from] MalformedNode),
}

pub type TransformResult<T = NodeRef> = Result<T, TransformError>;
