use plater::ArrangeError;
use thiserror::Error;

use crate::scene::NodeKey;

/// Errors raised when querying or mutating the [`Scene`](crate::scene::Scene).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("node {0:?} does not exist or is not part of the scene")]
    InvalidHandle(NodeKey),

    /// The node lacks the capability required by the operation, e.g. it has no sliceable geometry
    #[error("node {node:?} is missing a capability: {reason}")]
    MissingCapability { node: NodeKey, reason: String },

    #[error("node {node:?} cannot be attached to {parent:?}: {reason}")]
    InvalidAttach {
        node: NodeKey,
        parent: NodeKey,
        reason: String,
    },

    #[error("node {0:?} is not attached to a parent")]
    NotAttached(NodeKey),
}

/// Errors raised by a multiply-and-place request.
///
/// All of these are raised before the scene is modified, or after every staged change has been rolled back.
#[derive(Debug, Error)]
pub enum MultiplyError {
    #[error("invalid multiply request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Arrange(#[from] ArrangeError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("a lock was poisoned by a panicking thread")]
    LockPoisoned,
}
