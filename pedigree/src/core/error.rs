//! The error type shared by every layer of the pedigree engine.

use crate::core::base::VertexId;

pub type Result<T> = std::result::Result<T, PedigreeError>;

#[derive(Debug, thiserror::Error)]
pub enum PedigreeError {
    /// A request referenced a vertex that is not in the graph, or a vertex
    /// of the wrong kind.
    #[error("Invalid vertex {id}: {reason}")]
    InvalidVertex { id: VertexId, reason: String },

    /// An explicit id was requested that is already occupied.
    #[error("Vertex id {0} is already in use")]
    InvalidId(VertexId),

    #[error("Invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from: VertexId,
        to: VertexId,
        reason: String,
    },

    /// A structural invariant of the pedigree does not hold.
    #[error("Graph inconsistency: {0}")]
    GraphInconsistency(String),

    #[error("Cyclic pedigree: vertex {vertex} is its own ancestor")]
    CyclicPedigree { vertex: VertexId },

    #[error("Invalid pedigree topology: {0}")]
    InvalidPedigreeTopology(String),

    /// Two neighbours in a rank are closer than their minimum separation.
    #[error(
        "Layout constraint violated in rank {rank}: {left} at {left_x} and {right} at {right_x} need a distance of {required}"
    )]
    LayoutConstraintViolation {
        rank: usize,
        left: VertexId,
        right: VertexId,
        left_x: i64,
        right_x: i64,
        required: i64,
    },

    #[error("Unable to import pedigree: {0}")]
    Import(String),

    #[error("Invalid layout options: {0}")]
    InvalidOptions(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PedigreeError {
    pub fn invalid_vertex(id: VertexId, reason: impl Into<String>) -> Self {
        PedigreeError::InvalidVertex {
            id,
            reason: reason.into(),
        }
    }

    pub fn invalid_edge(
        from: VertexId,
        to: VertexId,
        reason: impl Into<String>,
    ) -> Self {
        PedigreeError::InvalidEdge {
            from,
            to,
            reason: reason.into(),
        }
    }

    pub fn inconsistency(msg: impl Into<String>) -> Self {
        PedigreeError::GraphInconsistency(msg.into())
    }

    pub fn import(msg: impl Into<String>) -> Self {
        PedigreeError::Import(msg.into())
    }
}

#[test]
fn test_error_messages() {
    let err = PedigreeError::invalid_vertex(VertexId::from(3), "not a person");
    assert_eq!(err.to_string(), "Invalid vertex 3: not a person");

    let err = PedigreeError::CyclicPedigree {
        vertex: VertexId::from(1),
    };
    assert!(err.to_string().contains("its own ancestor"));

    let err: PedigreeError =
        serde_json::from_str::<Vec<u32>>("{").unwrap_err().into();
    assert!(matches!(err, PedigreeError::Json(_)));
}
