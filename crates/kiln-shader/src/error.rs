use crate::graph::{NodeId, Socket};

/// Errors raised while building or binding a shader graph.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("node {0} does not exist")]
    NoSuchNode(NodeId),

    #[error("{kind} node {node} has no input {socket:?}")]
    NoSuchInput {
        node: NodeId,
        kind: &'static str,
        socket: Socket,
    },

    #[error("{kind} node {node} has no output {socket:?}")]
    NoSuchOutput {
        node: NodeId,
        kind: &'static str,
        socket: Socket,
    },

    #[error("texture reads UV set {channel} but the mesh has {available} UV layer(s)")]
    MissingUvChannel { channel: u32, available: usize },
}
