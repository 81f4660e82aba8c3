//! Error taxonomy.
//!
//! Two layers: [`HostError`] for failures of the host capability surface,
//! and [`RenderError`] for failures of a render pass. Host errors always
//! propagate to the caller that triggered the pass (`mount`, `unmount` or a
//! state setter) - the reconciler never logs-and-continues.
//!
//! Hook misuse (calling a hook outside a render pass, or changing the
//! number/kind of hook calls between renders) is a programming error and
//! panics instead; see the `hooks` module.

use thiserror::Error;

use crate::host::NodeId;

/// Failure of a host tree primitive.
#[derive(Debug, Error)]
pub enum HostError {
    /// The referenced host node does not exist (or no longer exists).
    #[error("unknown host node {0:?}")]
    UnknownNode(NodeId),

    /// A parent/child operation named a child that is not attached to
    /// the given parent.
    #[error("host node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The parent named in the operation.
        parent: NodeId,
        /// The node that was expected to be one of its children.
        child: NodeId,
    },

    /// Backend-specific failure.
    #[error("host backend failure: {0}")]
    Backend(String),
}

/// Failure of a render pass.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A render was requested while another render was in flight.
    ///
    /// The engine is strictly synchronous and non-reentrant: calling a
    /// state setter from inside a component body or an effect fails with
    /// this error rather than recursing.
    #[error("a render pass is already in progress; nested re-renders are not supported")]
    ReentrantRender,

    /// The runtime that owned this setter has been dropped.
    #[error("the runtime owning this setter no longer exists")]
    RuntimeDropped,

    /// No component is mounted at the given mount point.
    #[error("nothing is mounted at host node {0:?}")]
    NotMounted(NodeId),

    /// A host primitive failed while applying tree mutations.
    #[error(transparent)]
    Host(#[from] HostError),
}
