//! Errors returned when a caller breaks the contract of a [`Forest`](crate::Forest) operation.

use thiserror::Error as ThisError;

use crate::node::NodeId;

/// Contract violations reported by [`Forest`](crate::Forest) operations. None of these leave the
/// forest modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The handle refers to a node that was removed.
    #[error("node {0:?} is not live in this forest")]
    StaleNode(NodeId),

    /// Attaching `child` under `parent` would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The node that would gain the child.
        parent: NodeId,
        /// The node that is `parent` itself or one of its ancestors.
        child: NodeId,
    },

    /// One subtree of an [`assign`](crate::Forest::assign) contains the other.
    #[error("destination {dest:?} and source {src:?} subtrees overlap")]
    Overlap {
        /// Root of the destination subtree.
        dest: NodeId,
        /// Root of the source subtree.
        src: NodeId,
    },
}

/// [`Result`](std::result::Result) with `T` if ok, [`Error`] if the contract was broken.
pub type Result<T> = std::result::Result<T, Error>;
